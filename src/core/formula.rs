//! Structured model formulas.

use std::collections::BTreeSet;
use std::fmt;

/// `response ~ predictors`, with an implicit intercept.
///
/// Predictor names are kept as a list rather than joined into a formula
/// string, so no escaping is ever needed. Order is preserved for display and
/// for the column order of the design matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    response: String,
    predictors: Vec<String>,
}

impl Formula {
    pub fn new<S: Into<String>>(response: impl Into<String>, predictors: Vec<S>) -> Self {
        Self {
            response: response.into(),
            predictors: predictors.into_iter().map(Into::into).collect(),
        }
    }

    /// `response ~ 1`
    pub fn intercept_only(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            predictors: Vec::new(),
        }
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn predictors(&self) -> &[String] {
        &self.predictors
    }

    pub fn is_intercept_only(&self) -> bool {
        self.predictors.is_empty()
    }

    pub fn contains(&self, predictor: &str) -> bool {
        self.predictors.iter().any(|p| p == predictor)
    }

    /// A copy with `predictor` appended.
    pub fn with(&self, predictor: &str) -> Self {
        let mut predictors = self.predictors.clone();
        predictors.push(predictor.to_string());
        Self {
            response: self.response.clone(),
            predictors,
        }
    }

    /// A copy with `predictor` dropped. Dropping the last one leaves `response ~ 1`.
    pub fn without(&self, predictor: &str) -> Self {
        Self {
            response: self.response.clone(),
            predictors: self
                .predictors
                .iter()
                .filter(|p| p.as_str() != predictor)
                .cloned()
                .collect(),
        }
    }

    /// Predictor names as an unordered set.
    pub fn terms(&self) -> BTreeSet<String> {
        self.predictors.iter().cloned().collect()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.predictors.is_empty() {
            write!(f, "{} ~ 1", self.response)
        } else {
            write!(f, "{} ~ {}", self.response, self.predictors.join(" + "))
        }
    }
}
