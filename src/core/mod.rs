//! Core types: data, formulas, options and fit results.

mod dataset;
mod formula;
mod options;
mod result;

pub use dataset::{Dataset, DatasetError, INTERCEPT};
pub use formula::Formula;
pub use options::{
    OptionsError, RegressionOptions, RegressionOptionsBuilder, SelectionOptions,
    SelectionOptionsBuilder,
};
pub use result::RegressionResult;
