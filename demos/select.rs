//! # Variable Selection
//!
//! Runs the four selection strategies on the same simulated dataset and
//! prints what each one keeps.
//!
//! ## Strategies
//! - Forward selection by p-value
//! - Backward elimination by AIC
//! - Backward elimination by p-value
//! - Bidirectional stepwise selection (AIC, gated by p-values)
//!
//! Run with: `cargo run --example select`

use stepwise_rs::prelude::*;

fn main() {
    println!("=== Variable Selection ===\n");

    let data = simulate(80);
    println!(
        "Columns: {:?} ({} rows)\n",
        data.column_names(),
        data.n_rows()
    );

    forward(&data);
    backward_aic(&data);
    backward_pvalue(&data);
    stepwise(&data);
    cached_stepwise(&data);
}

/// y depends on x1, x2 and (weakly) x3; x4 and x5 are noise.
fn simulate(n: usize) -> Dataset {
    let wave = |i: usize, f: f64, phase: f64| ((i as f64) * f + phase).sin();

    let x1: Vec<f64> = (0..n).map(|i| wave(i, 0.37, 0.0) * 2.0).collect();
    let x2: Vec<f64> = (0..n).map(|i| wave(i, 1.13, 1.0)).collect();
    let x3: Vec<f64> = (0..n).map(|i| wave(i, 2.71, 0.5)).collect();
    let x4: Vec<f64> = (0..n).map(|i| wave(i, 0.91, 2.0)).collect();
    let x5: Vec<f64> = (0..n).map(|i| ((i * 37) % 17) as f64 / 17.0).collect();
    let y: Vec<f64> = (0..n)
        .map(|i| {
            let noise = wave(i, 5.3, 0.3) * 0.6;
            3.0 + 1.5 * x1[i] - 2.0 * x2[i] + 0.3 * x3[i] + noise
        })
        .collect();

    match Dataset::from_columns(vec![
        ("y", y),
        ("x1", x1),
        ("x2", x2),
        ("x3", x3),
        ("x4", x4),
        ("x5", x5),
    ]) {
        Ok(data) => data,
        Err(e) => panic!("invalid dataset: {e}"),
    }
}

fn print_selection(selection: &Selection<LinearModel>) {
    for step in &selection.steps {
        println!("  {step}");
    }
    let model = &selection.model;
    println!("  Final model: {}", model.formula());
    println!("  AIC: {:.3}  BIC: {:.3}  R²: {:.4}", model.aic(), model.bic(), model.r_squared());
    for (name, p) in model.p_values() {
        println!(
            "    {:<4} coef = {:>8.4}  p = {:.2e}",
            name,
            model.coefficient(&name).unwrap_or(f64::NAN),
            p
        );
    }
    println!();
}

fn forward(data: &Dataset) {
    println!("--- Forward Selection (level = 0.05) ---\n");
    match forward_selection(data, "y", 0.05) {
        Ok(selection) => print_selection(&selection),
        Err(e) => println!("  failed: {e}\n"),
    }
}

fn backward_aic(data: &Dataset) {
    println!("--- Backward Elimination by AIC ---\n");
    match backward_selection_aic(data, "y") {
        Ok(selection) => print_selection(&selection),
        Err(e) => println!("  failed: {e}\n"),
    }
}

fn backward_pvalue(data: &Dataset) {
    println!("--- Backward Elimination by p-value (alpha = 0.05) ---\n");
    match backward_selection_pvalue(data, "y", 0.05, false) {
        Ok(selection) => print_selection(&selection),
        Err(e) => println!("  failed: {e}\n"),
    }
}

fn stepwise(data: &Dataset) {
    println!("--- Stepwise (threshold_in = 0.01, threshold_out = 0.05) ---\n");
    match stepwise_selection_both(data, "y", Some(&["x4"][..]), 0.01, 0.05, false) {
        Ok(selection) => print_selection(&selection),
        Err(e) => println!("  failed: {e}\n"),
    }
}

fn cached_stepwise(data: &Dataset) {
    println!("--- Stepwise with a fit cache ---\n");

    let fitter = CachedFitter::new(OlsFitter::default());
    let selector = StepwiseSelector::builder().verbose(false).build();
    match selector.select_with(&fitter, data, "y") {
        Ok(selection) => {
            println!("  Selected: {:?}", selection.selected);
            println!(
                "  Fits: {} computed, {} reused\n",
                fitter.misses(),
                fitter.hits()
            );
        }
        Err(e) => println!("  failed: {e}\n"),
    }
}
