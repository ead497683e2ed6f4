//! Estimator traits and solver errors.

use crate::core::RegressionResult;
use faer::{Col, Mat};
use thiserror::Error;

/// Errors that can occur during regression fitting.
#[derive(Debug, Error, PartialEq)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("matrix is singular or nearly singular")]
    SingularMatrix,

    #[error("all features are constant")]
    AllFeaturesConstant,

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] crate::core::OptionsError),
}

/// An estimator that turns `(X, y)` into a fitted model.
pub trait Regressor {
    type Fitted: FittedRegressor;

    /// Fit to a design matrix of shape (n_samples, n_features) and a
    /// response of length n_samples.
    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted model.
pub trait FittedRegressor {
    /// Predict the response for rows of `x` (same column layout as the fit).
    fn predict(&self, x: &Mat<f64>) -> Col<f64>;

    fn result(&self) -> &RegressionResult;

    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }

    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }

    fn aic(&self) -> f64 {
        self.result().aic
    }

    /// R² of the predictions on `(x, y)`.
    fn score(&self, x: &Mat<f64>, y: &Col<f64>) -> f64 {
        let predictions = self.predict(x);
        let y_mean = y.iter().sum::<f64>() / y.nrows() as f64;

        let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
        let rss: f64 = y
            .iter()
            .zip(predictions.iter())
            .map(|(&yi, &pi)| (yi - pi).powi(2))
            .sum();

        if tss == 0.0 {
            if rss == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - rss / tss
        }
    }
}
