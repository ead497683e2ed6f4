//! Variable selection for linear regression.
//!
//! Four greedy search strategies over the predictors of a [`Dataset`]:
//!
//! - [`ForwardSelector`]: add the candidate with the smallest p-value while
//!   it is below `significance_level`.
//! - [`BackwardAicSelector`]: start from every predictor and drop the one
//!   whose removal lowers AIC the most, while AIC keeps falling.
//! - [`BackwardPValueSelector`]: start from every predictor and drop the
//!   one with the largest p-value while it exceeds `alpha`.
//! - [`StepwiseSelector`]: each round, consider the best inclusion and the
//!   best removal by AIC, each gated by a p-value threshold, and commit the
//!   one that lowers AIC more.
//!
//! Every candidate subset is fit from scratch through a [`ModelFitter`]
//! ([`OlsFitter`] by default, optionally wrapped in a [`CachedFitter`]).
//! Candidates are always evaluated in lexicographic order of their names,
//! and the first one wins a tie.
//!
//! # Example
//!
//! ```rust,ignore
//! use stepwise_rs::prelude::*;
//!
//! let selection = forward_selection(&data, "y", 0.05)?;
//! println!("{}", selection.model.formula());
//! for step in &selection.steps {
//!     println!("{step}");
//! }
//! ```

mod backward;
mod cache;
mod error;
mod fitter;
mod forward;
mod stepwise;

pub use backward::{
    backward_selection_aic, backward_selection_pvalue, BackwardAicSelector,
    BackwardAicSelectorBuilder, BackwardPValueSelector, BackwardPValueSelectorBuilder,
};
pub use cache::CachedFitter;
pub use error::SelectionError;
pub use fitter::{FittedModel, LinearModel, ModelFitter, OlsFitter};
pub use forward::{forward_selection, ForwardSelector, ForwardSelectorBuilder};
pub use stepwise::{stepwise_selection_both, StepwiseSelector, StepwiseSelectorBuilder};

pub(crate) use fitter::require_p_value;

use crate::core::Dataset;
use std::fmt;

/// A search strategy over predictor subsets.
pub trait SubsetSelector {
    /// Run the search, fitting every candidate with `fitter`.
    fn select_with<F: ModelFitter>(
        &self,
        fitter: &F,
        data: &Dataset,
        response: &str,
    ) -> Result<Selection<F::Model>, SelectionError>;

    /// Run the search with the default [`OlsFitter`].
    fn select(&self, data: &Dataset, response: &str) -> Result<Selection<LinearModel>, SelectionError> {
        self.select_with(&OlsFitter::default(), data, response)
    }
}

/// Outcome of a selection run.
#[derive(Debug, Clone)]
pub struct Selection<M> {
    /// The final fitted model.
    pub model: M,
    /// Chosen predictors. Strategies that add variables list them in the
    /// order they were added; backward strategies keep dataset order.
    pub selected: Vec<String>,
    /// Every committed inclusion or removal, in order.
    pub steps: Vec<SelectionStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Include,
    Remove,
}

/// One committed move of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionStep {
    pub action: StepAction,
    pub variable: String,
    /// For an inclusion, the variable's p-value in the enlarged model; for a
    /// removal, its p-value in the model it was removed from (NaN if unknown).
    pub p_value: f64,
    /// AIC of the model after the move.
    pub aic: f64,
}

impl SelectionStep {
    fn include(variable: &str, p_value: f64, aic: f64) -> Self {
        Self {
            action: StepAction::Include,
            variable: variable.to_string(),
            p_value,
            aic,
        }
    }

    fn remove(variable: &str, p_value: f64, aic: f64) -> Self {
        Self {
            action: StepAction::Remove,
            variable: variable.to_string(),
            p_value,
            aic,
        }
    }
}

impl fmt::Display for SelectionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.action {
            StepAction::Include => '+',
            StepAction::Remove => '-',
        };
        write!(
            f,
            "{} {} (p-value = {:.4}, AIC = {:.2})",
            sign, self.variable, self.p_value, self.aic
        )
    }
}

/// `candidate` beats `incumbent` when strictly smaller. NaN never wins, and
/// anything beats a NaN incumbent.
pub(crate) fn is_lower(candidate: f64, incumbent: f64) -> bool {
    !candidate.is_nan() && (incumbent.is_nan() || candidate < incumbent)
}

/// Names sorted lexicographically, the evaluation order of every strategy.
pub(crate) fn sorted<'a, I>(names: I) -> Vec<&'a String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut names: Vec<&String> = names.into_iter().collect();
    names.sort();
    names
}

/// Progress line: `info` when verbose, `debug` otherwise.
pub(crate) fn report(verbose: bool, args: fmt::Arguments<'_>) {
    let level = if verbose {
        log::Level::Info
    } else {
        log::Level::Debug
    };
    log::log!(level, "{}", args);
}
