//! Coefficient inference: standard errors, t-tests, confidence intervals.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Inference statistics for the slopes and (optionally) the intercept.
#[derive(Debug, Clone)]
pub struct CoefficientInference {
    pub std_errors: Col<f64>,
    pub t_statistics: Col<f64>,
    pub p_values: Col<f64>,
    pub conf_interval_lower: Col<f64>,
    pub conf_interval_upper: Col<f64>,
    /// `(se, t, p, (lower, upper))` for the intercept.
    pub intercept: Option<(f64, f64, f64, (f64, f64))>,
}

impl CoefficientInference {
    /// Run the usual t-tests for a fitted OLS model.
    ///
    /// Standard errors come from `σ² (X'X)⁻¹`, where X holds only the
    /// non-aliased columns (plus a leading column of ones when
    /// `intercept` is given). Aliased columns get NaN throughout.
    pub fn compute(
        x: &Mat<f64>,
        coefficients: &Col<f64>,
        intercept: Option<f64>,
        aliased: &[bool],
        mse: f64,
        df: f64,
        confidence_level: f64,
    ) -> Result<Self, &'static str> {
        let (se, se_intercept) = Self::standard_errors(x, mse, aliased, intercept.is_some())?;

        let t_statistics = Self::t_statistics(coefficients, &se);
        let p_values = Self::p_values(&t_statistics, df);
        let (conf_interval_lower, conf_interval_upper) =
            Self::confidence_intervals(coefficients, &se, df, confidence_level);

        let intercept = match (intercept, se_intercept) {
            (Some(b0), Some(se0)) => {
                let t0 = if se0 > 0.0 { b0 / se0 } else { f64::NAN };
                let p0 = two_sided_p(t0, df);
                let half = t_critical(df, confidence_level) * se0;
                Some((se0, t0, p0, (b0 - half, b0 + half)))
            }
            _ => None,
        };

        Ok(Self {
            std_errors: se,
            t_statistics,
            p_values,
            conf_interval_lower,
            conf_interval_upper,
            intercept,
        })
    }

    /// SE(β_j) = sqrt(σ² · (X'X)⁻¹_jj), plus the intercept SE when requested.
    pub fn standard_errors(
        x: &Mat<f64>,
        mse: f64,
        aliased: &[bool],
        with_intercept: bool,
    ) -> Result<(Col<f64>, Option<f64>), &'static str> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        let active: Vec<usize> = (0..n_features).filter(|&j| !aliased[j]).collect();
        let offset = usize::from(with_intercept);
        let size = active.len() + offset;

        if size == 0 {
            return Ok((Col::from_fn(n_features, |_| f64::NAN), None));
        }

        // Reduced design: [1 | X_active] or X_active
        let x_red = Mat::from_fn(n_samples, size, |i, k| {
            if k < offset {
                1.0
            } else {
                x[(i, active[k - offset])]
            }
        });
        let xtx_inv = invert_gram(&x_red)?;

        let mut se = Col::from_fn(n_features, |_| f64::NAN);
        for (k, &j) in active.iter().enumerate() {
            let var = mse * xtx_inv[(k + offset, k + offset)];
            se[j] = if var >= 0.0 { var.sqrt() } else { f64::NAN };
        }

        let se_intercept = with_intercept.then(|| {
            let var = mse * xtx_inv[(0, 0)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        });

        Ok((se, se_intercept))
    }

    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// p_j = 2 · P(T > |t_j|), T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        Col::from_fn(t_statistics.nrows(), |j| two_sided_p(t_statistics[j], df))
    }

    /// β_j ± t_{1-α/2, df} · SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let t_crit = t_critical(df, confidence_level);
        let n = coefficients.nrows();
        let lower = Col::from_fn(n, |j| coefficients[j] - t_crit * std_errors[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + t_crit * std_errors[j]);
        (lower, upper)
    }
}

fn two_sided_p(t: f64, df: f64) -> f64 {
    if df <= 0.0 || !t.is_finite() {
        return f64::NAN;
    }
    StudentsT::new(0.0, 1.0, df).map_or(f64::NAN, |d| 2.0 * (1.0 - d.cdf(t.abs())))
}

fn t_critical(df: f64, confidence_level: f64) -> f64 {
    if df <= 0.0 {
        return f64::NAN;
    }
    StudentsT::new(0.0, 1.0, df).map_or(f64::NAN, |d| {
        d.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)
    })
}

/// (X'X)⁻¹ via QR of the Gram matrix, column by column.
fn invert_gram(x: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
    let size = x.ncols();
    let xtx = x.transpose() * x;

    let qr = xtx.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    for i in 0..size {
        if r[(i, i)].abs() < 1e-10 {
            return Err("X'X is singular");
        }
    }

    let qt = q.transpose();
    let mut inv = Mat::zeros(size, size);
    for col in 0..size {
        for i in (0..size).rev() {
            let mut sum = qt[(i, col)];
            for j in (i + 1)..size {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Ok(inv)
}
