//! Errors raised by the selection strategies.

use crate::core::{DatasetError, OptionsError};
use crate::solvers::RegressionError;
use thiserror::Error;

/// Anything that can stop a selection run.
///
/// Fit failures are never retried or skipped: the first one aborts the
/// search and is returned together with the formula that failed.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("failed to fit `{formula}`: {source}")]
    Fit {
        formula: String,
        source: RegressionError,
    },

    #[error("term '{term}' is not part of `{formula}`")]
    UnknownTerm { term: String, formula: String },

    #[error("initial variable '{name}' {reason}")]
    InvalidInitialVariable { name: String, reason: &'static str },
}
