//! Common test utilities and data generators.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use stepwise_rs::core::{Dataset, Formula};
use stepwise_rs::selection::{FittedModel, ModelFitter, SelectionError};
use stepwise_rs::solvers::RegressionError;

/// Deterministic pseudo-random numbers in [-1, 1).
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f64) / (1u64 << 31) as f64 * 2.0 - 1.0
    }

    pub fn vector(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.next_f64()).collect()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Unit vector of ones / sqrt(n).
pub fn unit_constant(n: usize) -> Vec<f64> {
    vec![1.0 / (n as f64).sqrt(); n]
}

/// Remove the components along `basis` (orthonormal) and scale to unit norm.
///
/// Two passes of Gram-Schmidt keep the result orthogonal to machine precision.
pub fn orthonormalize(mut v: Vec<f64>, basis: &[&[f64]]) -> Vec<f64> {
    for _ in 0..2 {
        for b in basis {
            let c = dot(&v, b);
            for (vi, bi) in v.iter_mut().zip(b.iter()) {
                *vi -= c * bi;
            }
        }
    }
    let norm = dot(&v, &v).sqrt();
    v.into_iter().map(|x| x / norm).collect()
}

/// Predictors with prescribed roles, all mutually orthogonal and centred.
pub struct Designed {
    pub n: usize,
    /// strong predictor
    pub x1: Vec<f64>,
    /// orthogonal to the response and every other column
    pub x2: Vec<f64>,
    /// borderline predictor
    pub x3: Vec<f64>,
    /// unit-norm residual
    pub e: Vec<f64>,
}

impl Designed {
    pub fn new(n: usize, seed: u64) -> Self {
        let mut rng = Lcg::new(seed);
        let one = unit_constant(n);
        let x1 = orthonormalize(rng.vector(n), &[&one]);
        let x3 = orthonormalize(rng.vector(n), &[&one, &x1]);
        let e = orthonormalize(rng.vector(n), &[&one, &x1, &x3]);
        let x2 = orthonormalize(rng.vector(n), &[&one, &x1, &x3, &e]);
        Self { n, x1, x2, x3, e }
    }

    /// y = 2 + 3·x1 + c3·x3 + e
    pub fn response(&self, c3: f64) -> Vec<f64> {
        (0..self.n)
            .map(|i| 2.0 + 3.0 * self.x1[i] + c3 * self.x3[i] + self.e[i])
            .collect()
    }
}

/// `y` driven by `x1` (p far below 0.001) with a pure-noise `x2` (p ≈ 1).
pub fn signal_and_noise() -> Dataset {
    let d = Designed::new(50, 7);
    let y = d.response(0.0);
    Dataset::from_columns(vec![("y", y), ("x1", d.x1), ("x2", d.x2)]).unwrap()
}

/// Residual df of `y ~ x1 + x3` in [`borderline`].
pub const BORDERLINE_DF: usize = 50;

/// `y` driven by `x1`, plus `x3` whose p-value in `y ~ x1 + x3` is about 0.03
/// (t = 2.2 on 50 df).
pub fn borderline() -> Dataset {
    let n = BORDERLINE_DF + 3;
    let d = Designed::new(n, 11);
    let c3 = 2.2 / (BORDERLINE_DF as f64).sqrt();
    let y = d.response(c3);
    Dataset::from_columns(vec![("y", y), ("x1", d.x1), ("x3", d.x3)]).unwrap()
}

/// Random design with a few real effects among several predictors.
pub fn mixed(seed: u64) -> Dataset {
    let n = 60;
    let mut rng = Lcg::new(seed);
    let cols: Vec<Vec<f64>> = (0..6).map(|_| rng.vector(n)).collect();
    let y: Vec<f64> = (0..n)
        .map(|i| {
            1.0 + 2.0 * cols[0][i] - 1.5 * cols[1][i] + 0.4 * cols[2][i]
                + 0.5 * rng.next_f64()
        })
        .collect();

    let mut columns = vec![("y".to_string(), y)];
    for (j, c) in cols.into_iter().enumerate() {
        columns.push((format!("x{}", j + 1), c));
    }
    Dataset::from_columns(columns).unwrap()
}

/// A dataset whose values are irrelevant, for use with [`ScriptedFitter`].
pub fn placeholder(names: &[&str]) -> Dataset {
    Dataset::from_columns(
        names
            .iter()
            .enumerate()
            .map(|(j, name)| (*name, (0..5).map(|i| (i * (j + 1)) as f64).collect()))
            .collect(),
    )
    .unwrap()
}

type Terms = BTreeSet<String>;

fn terms(names: &[&str]) -> Terms {
    names.iter().map(|s| s.to_string()).collect()
}

/// A fitter with hand-written AIC and p-value tables.
///
/// Unlisted subsets get `default_aic`; unlisted p-values are 1.0.
pub struct ScriptedFitter {
    aic: HashMap<Terms, f64>,
    p_values: HashMap<(Terms, String), f64>,
    hidden: HashMap<Terms, String>,
    failing: Vec<Terms>,
    default_aic: f64,
}

impl ScriptedFitter {
    pub fn new() -> Self {
        Self {
            aic: HashMap::new(),
            p_values: HashMap::new(),
            hidden: HashMap::new(),
            failing: Vec::new(),
            default_aic: 1000.0,
        }
    }

    pub fn aic(mut self, subset: &[&str], aic: f64) -> Self {
        self.aic.insert(terms(subset), aic);
        self
    }

    pub fn p_value(mut self, subset: &[&str], var: &str, p: f64) -> Self {
        self.p_values.insert((terms(subset), var.to_string()), p);
        self
    }

    /// The model of `subset` reports no p-value at all for `var`.
    pub fn hide_p_value(mut self, subset: &[&str], var: &str) -> Self {
        self.hidden.insert(terms(subset), var.to_string());
        self
    }

    pub fn fail_on(mut self, subset: &[&str]) -> Self {
        self.failing.push(terms(subset));
        self
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedModel {
    formula: Formula,
    aic: f64,
    p_values: HashMap<String, f64>,
    hidden: Option<String>,
}

impl FittedModel for ScriptedModel {
    fn formula(&self) -> &Formula {
        &self.formula
    }

    fn aic(&self) -> f64 {
        self.aic
    }

    fn p_value(&self, term: &str) -> Option<f64> {
        if !self.formula.contains(term) || self.hidden.as_deref() == Some(term) {
            return None;
        }
        Some(self.p_values.get(term).copied().unwrap_or(1.0))
    }
}

impl ModelFitter for ScriptedFitter {
    type Model = ScriptedModel;

    fn fit(&self, _data: &Dataset, formula: &Formula) -> Result<ScriptedModel, SelectionError> {
        let key = formula.terms();
        if self.failing.contains(&key) {
            return Err(SelectionError::Fit {
                formula: formula.to_string(),
                source: RegressionError::SingularMatrix,
            });
        }

        let p_values = formula
            .predictors()
            .iter()
            .filter_map(|v| {
                self.p_values
                    .get(&(key.clone(), v.clone()))
                    .map(|p| (v.clone(), *p))
            })
            .collect();

        Ok(ScriptedModel {
            formula: formula.clone(),
            aic: self.aic.get(&key).copied().unwrap_or(self.default_aic),
            p_values,
            hidden: self.hidden.get(&key).cloned(),
        })
    }
}
