//! Variable selection for linear regression.
//!
//! Forward selection, backward elimination (by AIC and by p-value) and
//! bidirectional stepwise selection over the columns of a [`Dataset`],
//! built on an OLS solver with full coefficient inference.
//!
//! # Example
//!
//! ```rust
//! use stepwise_rs::prelude::*;
//!
//! let n = 40;
//! let x1: Vec<f64> = (0..n).map(|i| i as f64 * 0.25).collect();
//! let x2: Vec<f64> = (0..n).map(|i| ((i * 7) % 5) as f64).collect();
//! let y: Vec<f64> = (0..n)
//!     .map(|i| 1.0 + 2.0 * x1[i] + ((i * 11) % 3) as f64 * 0.1)
//!     .collect();
//! let data = Dataset::from_columns(vec![("y", y), ("x1", x1), ("x2", x2)]).unwrap();
//!
//! let selection = ForwardSelector::builder()
//!     .significance_level(0.05)
//!     .build()
//!     .select(&data, "y")
//!     .unwrap();
//!
//! assert_eq!(selection.selected[0], "x1");
//! println!("{}  AIC = {:.2}", selection.model.formula(), selection.model.aic());
//! ```

pub mod core;
pub mod inference;
pub mod selection;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Dataset, DatasetError, Formula, OptionsError, RegressionOptions, RegressionResult,
        SelectionOptions, INTERCEPT,
    };
    pub use crate::selection::{
        backward_selection_aic, backward_selection_pvalue, forward_selection,
        stepwise_selection_both, BackwardAicSelector, BackwardPValueSelector, CachedFitter,
        FittedModel, ForwardSelector, LinearModel, ModelFitter, OlsFitter, Selection,
        SelectionError, SelectionStep, StepAction, StepwiseSelector, SubsetSelector,
    };
    pub use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
}

pub use crate::core::{Dataset, Formula, SelectionOptions};
pub use crate::selection::{
    backward_selection_aic, backward_selection_pvalue, forward_selection, stepwise_selection_both,
    Selection, SelectionError, SubsetSelector,
};
