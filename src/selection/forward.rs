//! Forward selection by p-value.

use super::{
    is_lower, report, require_p_value, sorted, FittedModel, LinearModel, ModelFitter, Selection,
    SelectionError, SelectionStep, SubsetSelector,
};
use crate::core::{Dataset, Formula, SelectionOptions, SelectionOptionsBuilder};
use std::collections::BTreeSet;

/// Grows the model one predictor at a time.
///
/// Starting from `y ~ 1`, each round fits `selected + candidate` for every
/// remaining column and takes the candidate with the smallest p-value of its
/// own coefficient. The candidate enters if that p-value is below
/// `significance_level`; otherwise the search stops. The returned model is
/// refit on the final selection.
#[derive(Debug, Clone, Default)]
pub struct ForwardSelector {
    options: SelectionOptions,
}

impl ForwardSelector {
    pub fn new(options: SelectionOptions) -> Self {
        Self { options }
    }

    pub fn builder() -> ForwardSelectorBuilder {
        ForwardSelectorBuilder::default()
    }

    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }
}

impl SubsetSelector for ForwardSelector {
    fn select_with<F: ModelFitter>(
        &self,
        fitter: &F,
        data: &Dataset,
        response: &str,
    ) -> Result<Selection<F::Model>, SelectionError> {
        self.options.validate()?;
        let level = self.options.significance_level;
        let verbose = self.options.verbose;

        let mut remaining: BTreeSet<String> = data.candidates(response)?.into_iter().collect();
        let mut selected: Vec<String> = Vec::new();
        let mut steps = Vec::new();

        while !remaining.is_empty() {
            let current = Formula::new(response, selected.clone());

            let mut best: Option<(String, f64, f64)> = None;
            for candidate in sorted(&remaining) {
                let model = fitter.fit(data, &current.with(candidate))?;
                let p_value = require_p_value(&model, candidate)?;
                log::trace!("candidate {candidate}: p-value = {p_value:.6}");

                if best.as_ref().map_or(true, |(_, p, _)| is_lower(p_value, *p)) {
                    best = Some((candidate.clone(), p_value, model.aic()));
                }
            }

            let Some((variable, p_value, aic)) = best else {
                break;
            };
            if p_value < level {
                report(
                    verbose,
                    format_args!("+ Add {variable} (p-value = {p_value:.4}, AIC = {aic:.2})"),
                );
                remaining.remove(&variable);
                steps.push(SelectionStep::include(&variable, p_value, aic));
                selected.push(variable);
            } else {
                report(
                    verbose,
                    format_args!(
                        "No candidate below {level} (best: {variable}, p-value = {p_value:.4})"
                    ),
                );
                break;
            }
        }

        let model = fitter.fit(data, &Formula::new(response, selected.clone()))?;

        Ok(Selection {
            model,
            selected,
            steps,
        })
    }
}

/// Builder for `ForwardSelector`.
#[derive(Debug, Clone, Default)]
pub struct ForwardSelectorBuilder {
    builder: SelectionOptionsBuilder,
}

impl ForwardSelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum p-value for a candidate to enter (default 0.05).
    pub fn significance_level(mut self, level: f64) -> Self {
        self.builder = self.builder.significance_level(level);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.builder = self.builder.verbose(verbose);
        self
    }

    /// Build the selector. Options are validated when the search runs.
    pub fn build(self) -> ForwardSelector {
        ForwardSelector::new(self.builder.build_unchecked())
    }
}

/// Forward selection with the default OLS fitter.
///
/// Returns the model refit on the selected predictors (`response ~ 1` if
/// none qualified) and the predictors in the order they entered.
pub fn forward_selection(
    data: &Dataset,
    response: &str,
    significance_level: f64,
) -> Result<Selection<LinearModel>, SelectionError> {
    ForwardSelector::builder()
        .significance_level(significance_level)
        .verbose(false)
        .build()
        .select(data, response)
}
