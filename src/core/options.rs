//! Solver and selection options.

use thiserror::Error;

/// Configuration options for the OLS solver.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to include an intercept term (default: true).
    pub with_intercept: bool,
    /// Whether to compute standard errors and inference statistics (default: true).
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95).
    pub confidence_level: f64,
    /// Rank tolerance for QR decomposition.
    pub rank_tolerance: f64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            compute_inference: true,
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
        }
    }
}

/// Errors that can occur when validating options.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("rank_tolerance must be positive, got {0}")]
    InvalidRankTolerance(f64),
    #[error("{name} must be in (0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if self.rank_tolerance.is_nan() || self.rank_tolerance <= 0.0 {
            return Err(OptionsError::InvalidRankTolerance(self.rank_tolerance));
        }
        Ok(())
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}

/// Thresholds and reporting switches shared by the selection strategies.
///
/// Each strategy reads only the fields it needs:
///
/// | field                | used by                  | default |
/// |----------------------|--------------------------|---------|
/// | `significance_level` | forward selection        | 0.05    |
/// | `alpha`              | backward (p-value)       | 0.05    |
/// | `threshold_in`       | stepwise, inclusion gate | 0.01    |
/// | `threshold_out`      | stepwise, removal gate   | 0.05    |
/// | `verbose`            | all                      | true    |
#[derive(Debug, Clone)]
pub struct SelectionOptions {
    /// Maximum p-value for a forward-selection candidate to enter.
    pub significance_level: f64,
    /// Backward elimination drops the worst predictor while its p-value exceeds this.
    pub alpha: f64,
    /// A stepwise inclusion needs the candidate's p-value strictly below this.
    pub threshold_in: f64,
    /// A stepwise removal needs the variable's current p-value strictly above this.
    pub threshold_out: f64,
    /// Log each committed step at `info` instead of `debug`.
    pub verbose: bool,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            alpha: 0.05,
            threshold_in: 0.01,
            threshold_out: 0.05,
            verbose: true,
        }
    }
}

impl SelectionOptions {
    /// Create a new builder for selection options.
    pub fn builder() -> SelectionOptionsBuilder {
        SelectionOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        check_threshold("significance_level", self.significance_level)?;
        check_threshold("alpha", self.alpha)?;
        check_threshold("threshold_in", self.threshold_in)?;
        check_threshold("threshold_out", self.threshold_out)?;
        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), OptionsError> {
    // NaN fails both comparisons and lands here too
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(OptionsError::InvalidThreshold { name, value })
    }
}

/// Builder for `SelectionOptions`.
#[derive(Debug, Clone, Default)]
pub struct SelectionOptionsBuilder {
    options: SelectionOptions,
}

impl SelectionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn significance_level(mut self, level: f64) -> Self {
        self.options.significance_level = level;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.options.alpha = alpha;
        self
    }

    pub fn threshold_in(mut self, threshold: f64) -> Self {
        self.options.threshold_in = threshold;
        self
    }

    pub fn threshold_out(mut self, threshold: f64) -> Self {
        self.options.threshold_out = threshold;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<SelectionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> SelectionOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_regression_options() {
        let opts = RegressionOptions::default();
        assert!(opts.with_intercept);
        assert!(opts.compute_inference);
        assert_eq!(opts.confidence_level, 0.95);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_invalid_confidence_level() {
        let result = RegressionOptions::builder().confidence_level(1.0).build();
        assert_eq!(result.unwrap_err(), OptionsError::InvalidConfidenceLevel(1.0));
    }

    #[test]
    fn test_invalid_rank_tolerance() {
        let result = RegressionOptions::builder().rank_tolerance(0.0).build();
        assert!(matches!(result, Err(OptionsError::InvalidRankTolerance(_))));
    }

    #[test]
    fn test_default_selection_options() {
        let opts = SelectionOptions::default();
        assert_eq!(opts.significance_level, 0.05);
        assert_eq!(opts.alpha, 0.05);
        assert_eq!(opts.threshold_in, 0.01);
        assert_eq!(opts.threshold_out, 0.05);
        assert!(opts.verbose);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_selection_threshold_bounds() {
        assert!(SelectionOptions::builder().alpha(1.0).build().is_ok());

        let err = SelectionOptions::builder()
            .threshold_in(0.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            OptionsError::InvalidThreshold {
                name: "threshold_in",
                value: 0.0
            }
        );

        let err = SelectionOptions::builder()
            .significance_level(1.5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            OptionsError::InvalidThreshold {
                name: "significance_level",
                ..
            }
        ));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let result = SelectionOptions::builder().threshold_out(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_unchecked_skips_validation() {
        let opts = SelectionOptions::builder().alpha(-1.0).build_unchecked();
        assert_eq!(opts.alpha, -1.0);
    }
}
