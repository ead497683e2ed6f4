//! The model-fitting seam used by every strategy.

use super::SelectionError;
use crate::core::{Dataset, Formula, RegressionOptions, RegressionResult, INTERCEPT};
use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor};
use faer::Col;

/// A fitted model as seen by the selection strategies.
pub trait FittedModel {
    /// The formula this model was fit on.
    fn formula(&self) -> &Formula;

    fn aic(&self) -> f64;

    /// p-value of a predictor, or of the intercept under [`INTERCEPT`].
    ///
    /// `None` when `term` is not part of the model. NaN when the model has
    /// the term but no p-value could be computed for it.
    fn p_value(&self, term: &str) -> Option<f64>;

    /// `(predictor, p-value)` for every predictor, intercept excluded,
    /// in formula order.
    fn p_values(&self) -> Vec<(String, f64)> {
        self.formula()
            .predictors()
            .iter()
            .filter_map(|name| self.p_value(name).map(|p| (name.clone(), p)))
            .collect()
    }
}

/// Fits `formula` on `data`. Called once per candidate subset.
pub trait ModelFitter {
    type Model: FittedModel;

    fn fit(&self, data: &Dataset, formula: &Formula) -> Result<Self::Model, SelectionError>;
}

/// p-value lookup that fails when the term is missing from the model.
pub(crate) fn require_p_value<M: FittedModel>(model: &M, term: &str) -> Result<f64, SelectionError> {
    model
        .p_value(term)
        .ok_or_else(|| SelectionError::UnknownTerm {
            term: term.to_string(),
            formula: model.formula().to_string(),
        })
}

/// Default fitter: OLS with an intercept.
///
/// A design whose predictors are collinear (or constant) is reported as
/// [`RegressionError::SingularMatrix`] instead of silently dropping terms.
#[derive(Debug, Clone)]
pub struct OlsFitter {
    options: RegressionOptions,
}

impl OlsFitter {
    /// Formulas always carry an intercept, so `with_intercept` is forced on.
    pub fn new(options: RegressionOptions) -> Self {
        Self {
            options: RegressionOptions {
                with_intercept: true,
                compute_inference: true,
                ..options
            },
        }
    }
}

impl Default for OlsFitter {
    fn default() -> Self {
        Self::new(RegressionOptions::default())
    }
}

impl ModelFitter for OlsFitter {
    type Model = LinearModel;

    fn fit(&self, data: &Dataset, formula: &Formula) -> Result<LinearModel, SelectionError> {
        let x = data.design_matrix(formula.predictors())?;
        let y = data.column(formula.response())?;

        let fit_error = |source| SelectionError::Fit {
            formula: formula.to_string(),
            source,
        };

        let fitted = OlsRegressor::new(self.options.clone())
            .fit(&x, &y)
            .map_err(fit_error)?;
        if fitted.result().has_aliased() {
            return Err(fit_error(RegressionError::SingularMatrix));
        }

        log::trace!("fit `{}`: AIC = {:.4}", formula, fitted.aic());

        Ok(LinearModel {
            formula: formula.clone(),
            fitted,
        })
    }
}

/// An OLS fit labelled with the formula it came from.
#[derive(Debug, Clone)]
pub struct LinearModel {
    formula: Formula,
    fitted: FittedOls,
}

impl LinearModel {
    pub fn result(&self) -> &RegressionResult {
        self.fitted.result()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.fitted.intercept()
    }

    /// Estimated slope of `term`, `None` if it is not a predictor.
    pub fn coefficient(&self, term: &str) -> Option<f64> {
        let index = self.term_index(term)?;
        self.result().coefficient(index)
    }

    pub fn r_squared(&self) -> f64 {
        self.fitted.r_squared()
    }

    pub fn bic(&self) -> f64 {
        self.result().bic
    }

    /// Predict the response for the rows of `data`.
    ///
    /// `data` needs every predictor column of the formula; the response
    /// column is not required.
    pub fn predict(&self, data: &Dataset) -> Result<Col<f64>, SelectionError> {
        let x = data.design_matrix(self.formula.predictors())?;
        Ok(self.fitted.predict(&x))
    }

    fn term_index(&self, term: &str) -> Option<usize> {
        self.formula.predictors().iter().position(|p| p == term)
    }
}

impl FittedModel for LinearModel {
    fn formula(&self) -> &Formula {
        &self.formula
    }

    fn aic(&self) -> f64 {
        self.fitted.aic()
    }

    fn p_value(&self, term: &str) -> Option<f64> {
        let result = self.result();
        if term == INTERCEPT {
            return result
                .intercept
                .map(|_| result.intercept_p_value.unwrap_or(f64::NAN));
        }
        result.coefficient_p_value(self.term_index(term)?)
    }
}
