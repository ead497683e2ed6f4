//! Ordinary Least Squares regression solver.

use crate::core::{RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::inference::CoefficientInference;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector, detect_constant_columns};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::f64::consts::PI;

/// Ordinary Least Squares regression estimator.
///
/// Uses QR decomposition with column pivoting so rank-deficient designs
/// still fit; aliased (collinear or constant) coefficients are NaN. A design
/// with zero columns fits the intercept-only model `y ~ 1`.
///
/// # Example
///
/// ```rust
/// use stepwise_rs::solvers::{FittedRegressor, OlsRegressor, Regressor};
/// use faer::{Col, Mat};
///
/// let x = Mat::from_fn(6, 1, |i, _| i as f64);
/// let y = Col::from_fn(6, |i| 1.0 + 2.0 * i as f64 + if i % 2 == 0 { 0.1 } else { -0.1 });
///
/// let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
/// assert!((fitted.coefficients()[0] - 2.0).abs() < 0.1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let n_samples = x.nrows();
        let n_features = x.ncols();
        let with_intercept = self.options.with_intercept;

        if n_samples != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: n_samples,
                y_len: y.nrows(),
            });
        }
        if n_samples < 2 {
            return Err(RegressionError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }
        // Exact fits (n == p) are allowed; inference is then unavailable.
        let max_params = n_features + usize::from(with_intercept);
        if n_samples < max_params {
            return Err(RegressionError::InsufficientObservations {
                needed: max_params,
                got: n_samples,
            });
        }

        let constant_cols = detect_constant_columns(x, self.options.rank_tolerance);
        if !with_intercept && constant_cols.iter().all(|&c| c) {
            return Err(RegressionError::AllFeaturesConstant);
        }

        let (coefficients, aliased, rank, intercept) = if with_intercept {
            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);
            let (coefficients, aliased, rank) =
                self.solve_with_qr(&x_centered, &y_centered, &constant_cols);

            let intercept = y_mean
                - (0..n_features)
                    .filter(|&j| !aliased[j])
                    .map(|j| x_means[j] * coefficients[j])
                    .sum::<f64>();
            (coefficients, aliased, rank, Some(intercept))
        } else {
            let (coefficients, aliased, rank) = self.solve_with_qr(x, y, &constant_cols);
            (coefficients, aliased, rank, None)
        };

        let fitted_values = linear_predictor(x, &coefficients, &aliased, intercept);
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        let mut result = RegressionResult::empty(n_features, n_samples);
        result.coefficients = coefficients;
        result.intercept = intercept;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.rank = rank;
        result.n_parameters = rank + usize::from(with_intercept);
        result.aliased = aliased;
        result.rank_tolerance = self.options.rank_tolerance;
        result.confidence_level = self.options.confidence_level;

        self.compute_statistics(y, &mut result);
        if self.options.compute_inference {
            self.compute_inference(x, &mut result);
        }

        Ok(FittedOls {
            options: self.options.clone(),
            result,
        })
    }
}

impl OlsRegressor {
    /// Solve `min ||y - Xβ||` by column-pivoted QR.
    ///
    /// Returns the coefficients in original column order, the aliased flags
    /// and the numerical rank.
    fn solve_with_qr(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        constant_cols: &[bool],
    ) -> (Col<f64>, Vec<bool>, usize) {
        let n_features = x.ncols();
        let n_samples = x.nrows();

        if n_features == 0 {
            return (Col::zeros(0), Vec::new(), 0);
        }

        let qr = x.col_piv_qr();
        let q = qr.compute_Q();
        let r = qr.R();
        let perm = qr.P();

        // perm_inv[j]: pivoted position of original column j
        let perm_inv = perm.inverse().arrays().0;

        let mut rank = 0;
        for i in 0..n_features.min(n_samples) {
            if r[(i, i)].abs() > self.options.rank_tolerance {
                rank += 1;
            } else {
                break;
            }
        }

        let aliased: Vec<bool> = (0..n_features)
            .map(|j| constant_cols[j] || perm_inv[j] >= rank)
            .collect();

        if rank == 0 {
            return (Col::from_fn(n_features, |_| f64::NAN), aliased, 0);
        }

        let qty = q.transpose() * y;

        // back-substitution on the leading rank × rank block of R
        let mut beta = Col::zeros(rank);
        for i in (0..rank).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..rank {
                sum -= r[(i, j)] * beta[j];
            }
            beta[i] = sum / r[(i, i)];
        }

        let coefficients = Col::from_fn(n_features, |j| {
            if aliased[j] {
                f64::NAN
            } else {
                beta[perm_inv[j]]
            }
        });

        (coefficients, aliased, rank)
    }

    /// Goodness of fit and information criteria.
    fn compute_statistics(&self, y: &Col<f64>, result: &mut RegressionResult) {
        let n = result.n_observations as f64;
        let k = result.n_parameters as f64;
        let df_resid = result.residual_df() as f64;
        let df_model = result.model_df() as f64;

        let y_mean = y.iter().sum::<f64>() / n;
        let rss = result.rss();
        let tss: f64 = if result.intercept.is_some() {
            y.iter().map(|&yi| (yi - y_mean).powi(2)).sum()
        } else {
            // uncentred R² without an intercept
            y.iter().map(|&yi| yi * yi).sum()
        };

        result.r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else if rss < 1e-10 {
            1.0
        } else {
            0.0
        };

        let df_total = if result.intercept.is_some() { n - 1.0 } else { n };
        result.adj_r_squared = if df_resid > 0.0 {
            1.0 - (1.0 - result.r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };

        result.mse = if df_resid > 0.0 { rss / df_resid } else { f64::NAN };
        result.rmse = result.mse.sqrt();

        if df_model > 0.0 && df_resid > 0.0 && result.mse > 0.0 {
            result.f_statistic = ((tss - rss) / df_model) / result.mse;
            result.f_pvalue = FisherSnedecor::new(df_model, df_resid)
                .map_or(f64::NAN, |d| 1.0 - d.cdf(result.f_statistic));
        }

        // ln(0) = -inf, so a perfect fit has llf = +inf and AIC = -inf
        result.log_likelihood = -0.5 * n * ((2.0 * PI).ln() + (rss / n).ln() + 1.0);
        result.aic = 2.0 * k - 2.0 * result.log_likelihood;
        result.bic = k * n.ln() - 2.0 * result.log_likelihood;
        result.aicc = if n - k - 1.0 > 0.0 {
            result.aic + 2.0 * k * (k + 1.0) / (n - k - 1.0)
        } else {
            f64::NAN
        };
    }

    /// Standard errors, t-statistics, p-values and confidence intervals.
    ///
    /// Left unset when the residual df is zero or the variance is not finite.
    fn compute_inference(&self, x: &Mat<f64>, result: &mut RegressionResult) {
        let df = result.residual_df() as f64;
        if df <= 0.0 || !result.mse.is_finite() {
            return;
        }

        let inference = match CoefficientInference::compute(
            x,
            &result.coefficients,
            result.intercept,
            &result.aliased,
            result.mse,
            df,
            self.options.confidence_level,
        ) {
            Ok(inference) => inference,
            Err(_) => return,
        };

        result.std_errors = Some(inference.std_errors);
        result.t_statistics = Some(inference.t_statistics);
        result.p_values = Some(inference.p_values);
        result.conf_interval_lower = Some(inference.conf_interval_lower);
        result.conf_interval_upper = Some(inference.conf_interval_upper);
        if let Some((se, t, p, ci)) = inference.intercept {
            result.intercept_std_error = Some(se);
            result.intercept_t_statistic = Some(t);
            result.intercept_p_value = Some(p);
            result.intercept_conf_interval = Some(ci);
        }
    }
}

fn linear_predictor(
    x: &Mat<f64>,
    coefficients: &Col<f64>,
    aliased: &[bool],
    intercept: Option<f64>,
) -> Col<f64> {
    let b0 = intercept.unwrap_or(0.0);
    Col::from_fn(x.nrows(), |i| {
        b0 + (0..x.ncols())
            .filter(|&j| !aliased[j])
            .map(|j| x[(i, j)] * coefficients[j])
            .sum::<f64>()
    })
}

/// A fitted OLS regression model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        linear_predictor(
            x,
            &self.result.coefficients,
            &self.result.aliased,
            self.result.intercept,
        )
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Build the regressor. Options are validated when `fit` is called.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}
