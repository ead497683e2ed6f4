//! Output of a single OLS fit.

use faer::Col;

/// Everything an OLS fit produces.
///
/// Coefficient-indexed vectors follow the column order of the design matrix
/// the model was fit on; the intercept is carried separately. Aliased
/// (collinear or constant) columns have a NaN coefficient and are flagged in
/// `aliased`.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    /// Slope estimates, one per design column. NaN where aliased.
    pub coefficients: Col<f64>,
    /// Intercept estimate, if the model has one.
    pub intercept: Option<f64>,
    pub residuals: Col<f64>,
    pub fitted_values: Col<f64>,

    /// Numerical rank of the (centred) design matrix.
    pub rank: usize,
    /// Estimated parameters: non-aliased slopes plus the intercept.
    pub n_parameters: usize,
    pub n_observations: usize,
    pub aliased: Vec<bool>,
    pub rank_tolerance: f64,

    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// RSS / residual df.
    pub mse: f64,
    pub rmse: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,

    /// Gaussian maximum log-likelihood, `-n/2 * (ln 2π + ln(RSS/n) + 1)`.
    pub log_likelihood: f64,
    /// `2k - 2 llf` with k = `n_parameters`.
    pub aic: f64,
    pub aicc: f64,
    pub bic: f64,

    // Inference; `None` when not requested or when the residual df is zero.
    pub std_errors: Option<Col<f64>>,
    pub t_statistics: Option<Col<f64>>,
    pub p_values: Option<Col<f64>>,
    pub conf_interval_lower: Option<Col<f64>>,
    pub conf_interval_upper: Option<Col<f64>>,
    pub intercept_std_error: Option<f64>,
    pub intercept_t_statistic: Option<f64>,
    pub intercept_p_value: Option<f64>,
    pub intercept_conf_interval: Option<(f64, f64)>,
    pub confidence_level: f64,
}

impl RegressionResult {
    /// Zeroed result sized for `n_features` columns (filled in by solvers).
    pub(crate) fn empty(n_features: usize, n_observations: usize) -> Self {
        Self {
            coefficients: Col::zeros(n_features),
            intercept: None,
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            rank: 0,
            n_parameters: 0,
            n_observations,
            aliased: vec![false; n_features],
            rank_tolerance: 1e-10,
            r_squared: 0.0,
            adj_r_squared: 0.0,
            mse: 0.0,
            rmse: 0.0,
            f_statistic: f64::NAN,
            f_pvalue: f64::NAN,
            log_likelihood: 0.0,
            aic: 0.0,
            aicc: 0.0,
            bic: 0.0,
            std_errors: None,
            t_statistics: None,
            p_values: None,
            conf_interval_lower: None,
            conf_interval_upper: None,
            intercept_std_error: None,
            intercept_t_statistic: None,
            intercept_p_value: None,
            intercept_conf_interval: None,
            confidence_level: 0.95,
        }
    }

    /// Number of design columns (aliased ones included).
    pub fn n_features(&self) -> usize {
        self.coefficients.nrows()
    }

    /// n - k
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// k, less one for the intercept.
    pub fn model_df(&self) -> usize {
        if self.intercept.is_some() {
            self.n_parameters.saturating_sub(1)
        } else {
            self.n_parameters
        }
    }

    pub fn has_aliased(&self) -> bool {
        self.aliased.iter().any(|&a| a)
    }

    /// Coefficient of column `index`; `None` if out of range or aliased.
    pub fn coefficient(&self, index: usize) -> Option<f64> {
        (index < self.n_features() && !self.aliased[index]).then(|| self.coefficients[index])
    }

    /// Two-sided p-value of column `index`.
    ///
    /// `None` if out of range. NaN when inference is unavailable or the
    /// column is aliased.
    pub fn coefficient_p_value(&self, index: usize) -> Option<f64> {
        if index >= self.n_features() {
            return None;
        }
        Some(self.p_values.as_ref().map_or(f64::NAN, |p| p[index]))
    }

    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|&r| r * r).sum()
    }

    pub fn tss(&self) -> f64 {
        let n = self.n_observations as f64;
        let y_mean = self
            .fitted_values
            .iter()
            .zip(self.residuals.iter())
            .map(|(&f, &r)| f + r)
            .sum::<f64>()
            / n;

        self.fitted_values
            .iter()
            .zip(self.residuals.iter())
            .map(|(&f, &r)| (f + r - y_mean).powi(2))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = RegressionResult::empty(3, 10);
        assert_eq!(result.n_features(), 3);
        assert_eq!(result.residual_df(), 10);
        assert!(result.p_values.is_none());
    }

    #[test]
    fn test_degrees_of_freedom() {
        let mut result = RegressionResult::empty(3, 100);
        result.n_parameters = 4;
        result.intercept = Some(1.0);
        assert_eq!(result.residual_df(), 96);
        assert_eq!(result.model_df(), 3);

        result.intercept = None;
        assert_eq!(result.model_df(), 4);
    }

    #[test]
    fn test_coefficient_lookup() {
        let mut result = RegressionResult::empty(2, 10);
        result.coefficients[0] = 1.5;
        result.coefficients[1] = f64::NAN;
        result.aliased[1] = true;

        assert_eq!(result.coefficient(0), Some(1.5));
        assert_eq!(result.coefficient(1), None);
        assert_eq!(result.coefficient(2), None);
        assert!(result.has_aliased());
    }

    #[test]
    fn test_coefficient_p_value_without_inference() {
        let result = RegressionResult::empty(2, 10);
        assert!(result.coefficient_p_value(0).unwrap().is_nan());
        assert_eq!(result.coefficient_p_value(2), None);
    }

    #[test]
    fn test_coefficient_p_value_with_inference() {
        let mut result = RegressionResult::empty(2, 10);
        result.p_values = Some(Col::from_fn(2, |i| 0.1 * (i + 1) as f64));
        assert_eq!(result.coefficient_p_value(1), Some(0.2));
    }

    #[test]
    fn test_sums_of_squares() {
        let mut result = RegressionResult::empty(1, 4);
        // y = [1, 2, 3, 4]
        result.fitted_values = Col::from_fn(4, |i| [1.5, 1.5, 3.5, 3.5][i]);
        result.residuals = Col::from_fn(4, |i| [-0.5, 0.5, -0.5, 0.5][i]);

        assert!((result.rss() - 1.0).abs() < 1e-12);
        assert!((result.tss() - 5.0).abs() < 1e-12);
    }
}
