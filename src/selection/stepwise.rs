//! Bidirectional stepwise selection.

use super::{
    is_lower, report, require_p_value, sorted, FittedModel, LinearModel, ModelFitter, Selection,
    SelectionError, SelectionStep, SubsetSelector,
};
use crate::core::{Dataset, Formula, SelectionOptions, SelectionOptionsBuilder};
use std::collections::BTreeSet;

/// Adds and removes predictors, scored by AIC and gated by p-values.
///
/// Each round evaluates two moves against the current model:
///
/// - **inclusion**: the remaining candidate whose addition gives the lowest
///   AIC. Allowed if that AIC beats the current one and the candidate's own
///   p-value in the enlarged model is below `threshold_in`.
/// - **removal**: the selected predictor whose removal gives the lowest
///   AIC. Allowed if that AIC beats the current one and the predictor's
///   p-value *in the current model* is above `threshold_out` (0.0 when the
///   current model has no p-value for it).
///
/// When both are allowed the one with the larger AIC drop wins; an exact tie
/// goes to inclusion. A removed predictor returns to the candidate pool and
/// may be included again later. The search stops when neither move is
/// allowed; the model of the last committed move is returned.
#[derive(Debug, Clone, Default)]
pub struct StepwiseSelector {
    options: SelectionOptions,
    initial: Vec<String>,
}

impl StepwiseSelector {
    pub fn new(options: SelectionOptions, initial: Vec<String>) -> Self {
        Self { options, initial }
    }

    pub fn builder() -> StepwiseSelectorBuilder {
        StepwiseSelectorBuilder::default()
    }

    /// Predictors the search starts from.
    pub fn initial(&self) -> &[String] {
        &self.initial
    }

    fn check_initial(&self, data: &Dataset, response: &str) -> Result<(), SelectionError> {
        for (k, name) in self.initial.iter().enumerate() {
            if name == response {
                return Err(SelectionError::InvalidInitialVariable {
                    name: name.clone(),
                    reason: "is the response",
                });
            }
            if !data.contains(name) {
                return Err(SelectionError::InvalidInitialVariable {
                    name: name.clone(),
                    reason: "is not a dataset column",
                });
            }
            if self.initial[..k].contains(name) {
                return Err(SelectionError::InvalidInitialVariable {
                    name: name.clone(),
                    reason: "is listed more than once",
                });
            }
        }
        Ok(())
    }
}

struct Inclusion<M> {
    variable: String,
    aic: f64,
    p_value: f64,
    model: M,
}

struct Removal<M> {
    variable: String,
    aic: f64,
    model: M,
}

impl SubsetSelector for StepwiseSelector {
    fn select_with<F: ModelFitter>(
        &self,
        fitter: &F,
        data: &Dataset,
        response: &str,
    ) -> Result<Selection<F::Model>, SelectionError> {
        self.options.validate()?;
        let threshold_in = self.options.threshold_in;
        let threshold_out = self.options.threshold_out;
        let verbose = self.options.verbose;

        let candidates = data.candidates(response)?;
        self.check_initial(data, response)?;

        let mut selected = self.initial.clone();
        let mut remaining: BTreeSet<String> = candidates
            .into_iter()
            .filter(|c| !selected.contains(c))
            .collect();

        let mut best_model = fitter.fit(data, &Formula::new(response, selected.clone()))?;
        let mut best_aic = best_model.aic();
        let mut steps = Vec::new();

        loop {
            let current = Formula::new(response, selected.clone());

            let mut inclusion: Option<Inclusion<F::Model>> = None;
            for var in sorted(&remaining) {
                let model = fitter.fit(data, &current.with(var))?;
                let aic = model.aic();
                let p_value = require_p_value(&model, var)?;
                log::trace!("include {var}? AIC = {aic:.4}, p-value = {p_value:.6}");

                if inclusion.as_ref().map_or(true, |c| is_lower(aic, c.aic)) {
                    inclusion = Some(Inclusion {
                        variable: var.clone(),
                        aic,
                        p_value,
                        model,
                    });
                }
            }

            let mut removal: Option<Removal<F::Model>> = None;
            for var in sorted(&selected) {
                let model = fitter.fit(data, &current.without(var))?;
                let aic = model.aic();
                log::trace!("remove {var}? AIC = {aic:.4}");

                if removal.as_ref().map_or(true, |c| is_lower(aic, c.aic)) {
                    removal = Some(Removal {
                        variable: var.clone(),
                        aic,
                        model,
                    });
                }
            }

            let inclusion_aic = inclusion.as_ref().map_or(f64::INFINITY, |c| c.aic);
            let removal_aic = removal.as_ref().map_or(f64::INFINITY, |c| c.aic);

            let mut do_inclusion = inclusion
                .as_ref()
                .is_some_and(|c| c.aic < best_aic && c.p_value < threshold_in);

            // judged on the current model, not the reduced one
            let removal_p_value = removal
                .as_ref()
                .and_then(|c| best_model.p_value(&c.variable))
                .unwrap_or(0.0);
            let mut do_removal = removal_aic < best_aic && removal_p_value > threshold_out;

            if do_inclusion && do_removal {
                if (best_aic - removal_aic) > (best_aic - inclusion_aic) {
                    do_inclusion = false;
                } else {
                    do_removal = false;
                }
            }

            match (inclusion, removal) {
                (Some(c), _) if do_inclusion => {
                    report(
                        verbose,
                        format_args!(
                            " + Include {} with p-value {:.4}, AIC = {:.2}",
                            c.variable, c.p_value, c.aic
                        ),
                    );
                    remaining.remove(&c.variable);
                    steps.push(SelectionStep::include(&c.variable, c.p_value, c.aic));
                    selected.push(c.variable);
                    best_model = c.model;
                    best_aic = c.aic;
                }
                (_, Some(c)) if do_removal => {
                    report(
                        verbose,
                        format_args!(" - Remove {}, AIC = {:.2}", c.variable, c.aic),
                    );
                    selected.retain(|v| v != &c.variable);
                    steps.push(SelectionStep::remove(&c.variable, removal_p_value, c.aic));
                    remaining.insert(c.variable);
                    best_model = c.model;
                    best_aic = c.aic;
                }
                _ => {
                    report(verbose, format_args!("No further improvement."));
                    break;
                }
            }
        }

        Ok(Selection {
            model: best_model,
            selected,
            steps,
        })
    }
}

/// Builder for `StepwiseSelector`.
#[derive(Debug, Clone, Default)]
pub struct StepwiseSelectorBuilder {
    builder: SelectionOptionsBuilder,
    initial: Vec<String>,
}

impl StepwiseSelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from these predictors instead of `y ~ 1`. The list is copied.
    pub fn initial_list<S: AsRef<str>>(mut self, initial: &[S]) -> Self {
        self.initial = initial.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Inclusion needs a p-value strictly below this (default 0.01).
    pub fn threshold_in(mut self, threshold: f64) -> Self {
        self.builder = self.builder.threshold_in(threshold);
        self
    }

    /// Removal needs a p-value strictly above this (default 0.05).
    pub fn threshold_out(mut self, threshold: f64) -> Self {
        self.builder = self.builder.threshold_out(threshold);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.builder = self.builder.verbose(verbose);
        self
    }

    pub fn build(self) -> StepwiseSelector {
        StepwiseSelector::new(self.builder.build_unchecked(), self.initial)
    }
}

/// Stepwise selection in both directions with the default OLS fitter.
///
/// `initial_list` of `None` starts from the intercept-only model.
pub fn stepwise_selection_both(
    data: &Dataset,
    response: &str,
    initial_list: Option<&[&str]>,
    threshold_in: f64,
    threshold_out: f64,
    verbose: bool,
) -> Result<Selection<LinearModel>, SelectionError> {
    StepwiseSelector::builder()
        .initial_list(initial_list.unwrap_or_default())
        .threshold_in(threshold_in)
        .threshold_out(threshold_out)
        .verbose(verbose)
        .build()
        .select(data, response)
}
