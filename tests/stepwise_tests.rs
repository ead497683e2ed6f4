//! Bidirectional stepwise selection tests.

mod common;

use approx::assert_relative_eq;
use common::ScriptedFitter;
use stepwise_rs::prelude::*;

fn scripted(fitter: &ScriptedFitter, names: &[&str], initial: &[&str]) -> Selection<common::ScriptedModel> {
    let data = common::placeholder(names);
    StepwiseSelector::builder()
        .initial_list(initial)
        .verbose(false)
        .build()
        .select_with(fitter, &data, "y")
        .unwrap()
}

fn moves(selection: &Selection<common::ScriptedModel>) -> Vec<(StepAction, &str)> {
    selection
        .steps
        .iter()
        .map(|s| (s.action, s.variable.as_str()))
        .collect()
}

// ============================================================================
// OLS-backed scenarios
// ============================================================================

#[test]
fn test_from_empty_keeps_only_strong_predictor() {
    let data = common::borderline();
    let selection = stepwise_selection_both(&data, "y", None, 0.01, 0.05, false).unwrap();

    // x3 would lower AIC but its p-value (about 0.03) misses threshold_in
    assert_eq!(selection.selected, vec!["x1"]);
    assert_eq!(selection.steps.len(), 1);
    assert!(selection.steps[0].p_value < 1e-10);
}

#[test]
fn test_initial_model_keeps_borderline_predictor() {
    let data = common::borderline();
    let selection =
        stepwise_selection_both(&data, "y", Some(&["x1", "x3"][..]), 0.01, 0.05, false).unwrap();

    // removing x3 would raise AIC, so its p-value never matters
    assert_eq!(selection.selected, vec!["x1", "x3"]);
    assert!(selection.steps.is_empty());
}

#[test]
fn test_initial_noise_predictor_is_removed() {
    let data = common::signal_and_noise();
    let selection =
        stepwise_selection_both(&data, "y", Some(&["x2"][..]), 0.01, 0.05, false).unwrap();

    assert_eq!(selection.selected, vec!["x1"]);
    assert_eq!(selection.model.formula().predictors(), ["x1"]);
}

#[test]
fn test_aic_never_increases() {
    for seed in [11, 12, 13] {
        let data = common::mixed(seed);
        let start = OlsFitter::default()
            .fit(&data, &Formula::intercept_only("y"))
            .unwrap();

        let selection = stepwise_selection_both(&data, "y", None, 0.01, 0.05, false).unwrap();

        let mut previous = start.aic();
        for step in &selection.steps {
            assert!(step.aic < previous);
            previous = step.aic;
        }
        assert_relative_eq!(selection.model.aic(), previous);

        let mut names = selection.selected.clone();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), selection.selected.len());
        for name in ["x1", "x2", "x3"] {
            assert!(selection.selected.iter().any(|s| s == name));
        }
    }
}

#[test]
fn test_cached_fitter_gives_same_result() {
    let data = common::mixed(31);
    let selector = StepwiseSelector::builder().verbose(false).build();

    let plain = selector.select(&data, "y").unwrap();
    let fitter = CachedFitter::new(OlsFitter::default());
    let cached = selector.select_with(&fitter, &data, "y").unwrap();

    assert_eq!(plain.selected, cached.selected);
    assert_eq!(plain.steps, cached.steps);
    assert!(fitter.hits() > 0);
    assert_eq!(fitter.misses(), fitter.len());
}

#[test]
fn test_invalid_thresholds() {
    let data = common::signal_and_noise();
    let err = stepwise_selection_both(&data, "y", None, 0.0, 0.05, false).unwrap_err();
    assert!(matches!(
        err,
        SelectionError::Options(OptionsError::InvalidThreshold { name: "threshold_in", .. })
    ));
}

// ============================================================================
// Scripted models
// ============================================================================

#[test]
fn test_removed_variable_can_return() {
    let fitter = ScriptedFitter::new()
        .aic(&["a"], 100.0)
        .aic(&[], 90.0)
        .aic(&["b"], 80.0)
        .aic(&["a", "b"], 70.0)
        .p_value(&["a"], "a", 0.3)
        .p_value(&["a", "b"], "b", 0.2)
        .p_value(&["b"], "b", 0.001)
        .p_value(&["a", "b"], "a", 0.001);

    let selection = scripted(&fitter, &["y", "a", "b"], &["a"]);

    assert_eq!(
        moves(&selection),
        vec![
            (StepAction::Remove, "a"),
            (StepAction::Include, "b"),
            (StepAction::Include, "a"),
        ]
    );
    assert_eq!(selection.selected, vec!["b", "a"]);
    assert_relative_eq!(selection.model.aic(), 70.0);
}

#[test]
fn test_larger_aic_drop_wins() {
    let fitter = ScriptedFitter::new()
        .aic(&["a"], 100.0)
        .aic(&["a", "b"], 90.0)
        .aic(&[], 85.0)
        .aic(&["b"], 95.0)
        .p_value(&["a", "b"], "b", 0.001)
        .p_value(&["a"], "a", 0.3);

    let selection = scripted(&fitter, &["y", "a", "b"], &["a"]);

    assert_eq!(moves(&selection), vec![(StepAction::Remove, "a")]);
    assert!(selection.selected.is_empty());
    assert!(selection.model.formula().is_intercept_only());
}

#[test]
fn test_equal_aic_drop_favours_inclusion() {
    let fitter = ScriptedFitter::new()
        .aic(&["a"], 100.0)
        .aic(&["a", "b"], 90.0)
        .aic(&[], 90.0)
        .p_value(&["a", "b"], "b", 0.001)
        .p_value(&["a"], "a", 0.3);

    let selection = scripted(&fitter, &["y", "a", "b"], &["a"]);

    assert_eq!(moves(&selection), vec![(StepAction::Include, "b")]);
    assert_eq!(selection.selected, vec!["a", "b"]);
}

#[test]
fn test_inclusion_needs_p_value_below_threshold() {
    let fitter = ScriptedFitter::new()
        .aic(&[], 100.0)
        .aic(&["a"], 50.0)
        .p_value(&["a"], "a", 0.01);

    // p-value equal to threshold_in does not qualify
    let selection = scripted(&fitter, &["y", "a"], &[]);
    assert!(selection.selected.is_empty());
    assert!(selection.steps.is_empty());
}

#[test]
fn test_removal_needs_p_value_above_threshold() {
    let fitter = ScriptedFitter::new()
        .aic(&["a"], 100.0)
        .aic(&[], 50.0)
        .p_value(&["a"], "a", 0.05);

    let selection = scripted(&fitter, &["y", "a"], &["a"]);
    assert_eq!(selection.selected, vec!["a"]);
}

#[test]
fn test_missing_removal_p_value_counts_as_zero() {
    let fitter = ScriptedFitter::new()
        .aic(&["a"], 100.0)
        .aic(&[], 50.0)
        .hide_p_value(&["a"], "a");

    let selection = scripted(&fitter, &["y", "a"], &["a"]);
    assert_eq!(selection.selected, vec!["a"]);
    assert!(selection.steps.is_empty());
}

#[test]
fn test_removal_p_value_comes_from_current_model() {
    // in the reduced model the removed term is absent; the step records
    // the p-value the current model reported
    let fitter = ScriptedFitter::new()
        .aic(&["a", "b"], 100.0)
        .aic(&["b"], 80.0)
        .aic(&["a"], 95.0)
        .p_value(&["a", "b"], "a", 0.4)
        .p_value(&["a", "b"], "b", 0.001)
        .p_value(&["b"], "b", 0.001);

    let selection = scripted(&fitter, &["y", "a", "b"], &["a", "b"]);

    assert_eq!(moves(&selection), vec![(StepAction::Remove, "a")]);
    assert_relative_eq!(selection.steps[0].p_value, 0.4);
    assert_eq!(selection.selected, vec!["b"]);
}
