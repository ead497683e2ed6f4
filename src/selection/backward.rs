//! Backward elimination, by AIC and by p-value.

use super::{
    is_lower, report, sorted, FittedModel, LinearModel, ModelFitter, Selection, SelectionError,
    SelectionStep, SubsetSelector,
};
use crate::core::{Dataset, Formula, SelectionOptions, SelectionOptionsBuilder};

/// Drops predictors while doing so lowers AIC.
///
/// Starts from the full model. Each round refits the model without each
/// remaining predictor in turn and keeps the reduction with the lowest AIC,
/// committing it only if that AIC is strictly below the current one.
#[derive(Debug, Clone, Default)]
pub struct BackwardAicSelector {
    options: SelectionOptions,
}

impl BackwardAicSelector {
    pub fn new(options: SelectionOptions) -> Self {
        Self { options }
    }

    pub fn builder() -> BackwardAicSelectorBuilder {
        BackwardAicSelectorBuilder::default()
    }
}

impl SubsetSelector for BackwardAicSelector {
    fn select_with<F: ModelFitter>(
        &self,
        fitter: &F,
        data: &Dataset,
        response: &str,
    ) -> Result<Selection<F::Model>, SelectionError> {
        self.options.validate()?;
        let verbose = self.options.verbose;

        let mut remaining = data.candidates(response)?;
        let mut current_model = fitter.fit(data, &Formula::new(response, remaining.clone()))?;
        let mut current_aic = current_model.aic();
        let mut steps = Vec::new();

        loop {
            let current = Formula::new(response, remaining.clone());

            let mut best: Option<(String, F::Model)> = None;
            for var in sorted(&remaining) {
                let model = fitter.fit(data, &current.without(var))?;
                log::trace!("without {var}: AIC = {:.4}", model.aic());

                if best.as_ref().map_or(true, |(_, m)| is_lower(model.aic(), m.aic())) {
                    best = Some((var.clone(), model));
                }
            }

            let Some((variable, model)) = best else {
                break;
            };
            let aic = model.aic();
            if !is_lower(aic, current_aic) {
                report(
                    verbose,
                    format_args!("No removal lowers AIC below {current_aic:.2}"),
                );
                break;
            }

            let p_value = current_model.p_value(&variable).unwrap_or(f64::NAN);
            report(
                verbose,
                format_args!("- Drop {variable}, AIC {current_aic:.2} -> {aic:.2}"),
            );
            remaining.retain(|v| v != &variable);
            steps.push(SelectionStep::remove(&variable, p_value, aic));
            current_model = model;
            current_aic = aic;
        }

        Ok(Selection {
            model: current_model,
            selected: remaining,
            steps,
        })
    }
}

/// Builder for `BackwardAicSelector`.
#[derive(Debug, Clone, Default)]
pub struct BackwardAicSelectorBuilder {
    builder: SelectionOptionsBuilder,
}

impl BackwardAicSelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.builder = self.builder.verbose(verbose);
        self
    }

    pub fn build(self) -> BackwardAicSelector {
        BackwardAicSelector::new(self.builder.build_unchecked())
    }
}

/// Backward elimination by AIC with the default OLS fitter.
pub fn backward_selection_aic(
    data: &Dataset,
    response: &str,
) -> Result<Selection<LinearModel>, SelectionError> {
    BackwardAicSelector::builder()
        .verbose(false)
        .build()
        .select(data, response)
}

/// Drops the least significant predictor while its p-value exceeds `alpha`.
///
/// Starts from the full model and removes exactly one predictor per round,
/// the one with the largest p-value (intercept excluded), refitting after
/// each removal.
///
/// Predictors whose p-value is NaN (no residual degrees of freedom) are never
/// picked, so they survive the search. Every other surviving predictor has a
/// p-value at or below `alpha` in the returned model.
#[derive(Debug, Clone, Default)]
pub struct BackwardPValueSelector {
    options: SelectionOptions,
}

impl BackwardPValueSelector {
    pub fn new(options: SelectionOptions) -> Self {
        Self { options }
    }

    pub fn builder() -> BackwardPValueSelectorBuilder {
        BackwardPValueSelectorBuilder::default()
    }
}

impl SubsetSelector for BackwardPValueSelector {
    fn select_with<F: ModelFitter>(
        &self,
        fitter: &F,
        data: &Dataset,
        response: &str,
    ) -> Result<Selection<F::Model>, SelectionError> {
        self.options.validate()?;
        let alpha = self.options.alpha;
        let verbose = self.options.verbose;

        let mut remaining = data.candidates(response)?;
        let mut model = fitter.fit(data, &Formula::new(response, remaining.clone()))?;
        let mut steps = Vec::new();

        loop {
            let mut p_values = model.p_values();
            p_values.sort_by(|a, b| a.0.cmp(&b.0));

            // largest p-value; first name wins a tie
            let mut worst: Option<(String, f64)> = None;
            for (name, p) in p_values {
                if !p.is_nan() && worst.as_ref().map_or(true, |(_, w)| p > *w) {
                    worst = Some((name, p));
                }
            }

            let Some((variable, p_value)) = worst else {
                break;
            };
            if p_value <= alpha {
                report(verbose, format_args!("All p-values at or below {alpha}"));
                break;
            }

            report(
                verbose,
                format_args!("Removing '{variable}' (p-value = {p_value:.4})"),
            );
            remaining.retain(|v| v != &variable);
            model = fitter.fit(data, &Formula::new(response, remaining.clone()))?;
            steps.push(SelectionStep::remove(&variable, p_value, model.aic()));
        }

        Ok(Selection {
            model,
            selected: remaining,
            steps,
        })
    }
}

/// Builder for `BackwardPValueSelector`.
#[derive(Debug, Clone, Default)]
pub struct BackwardPValueSelectorBuilder {
    builder: SelectionOptionsBuilder,
}

impl BackwardPValueSelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removal threshold (default 0.05).
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.builder = self.builder.alpha(alpha);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.builder = self.builder.verbose(verbose);
        self
    }

    pub fn build(self) -> BackwardPValueSelector {
        BackwardPValueSelector::new(self.builder.build_unchecked())
    }
}

/// Backward elimination by p-value with the default OLS fitter.
pub fn backward_selection_pvalue(
    data: &Dataset,
    response: &str,
    alpha: f64,
    verbose: bool,
) -> Result<Selection<LinearModel>, SelectionError> {
    BackwardPValueSelector::builder()
        .alpha(alpha)
        .verbose(verbose)
        .build()
        .select(data, response)
}
