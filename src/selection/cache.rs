//! Memoizing wrapper around a [`ModelFitter`].

use super::{ModelFitter, SelectionError};
use crate::core::{Dataset, Formula};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};

type Key = (String, BTreeSet<String>);

/// Reuses fits of predictor sets that were already evaluated.
///
/// The inclusion and removal passes of stepwise selection revisit the same
/// subsets over and over; with this wrapper each distinct
/// `(response, {predictors})` is fit once. Predictor order is ignored, so
/// the cached model keeps the formula order of the first fit.
///
/// The cache does not know which dataset a model came from. Use one
/// `CachedFitter` per dataset, or [`clear`](Self::clear) it in between.
///
/// ```
/// use stepwise_rs::core::Dataset;
/// use stepwise_rs::selection::{CachedFitter, OlsFitter, StepwiseSelector, SubsetSelector};
///
/// let y: Vec<f64> = (0..20).map(|i| 1.0 + 0.5 * i as f64 + ((i * 13) % 7) as f64 * 0.1).collect();
/// let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
/// let data = Dataset::from_columns(vec![("y", y), ("x", x)]).unwrap();
///
/// let fitter = CachedFitter::new(OlsFitter::default());
/// let selection = StepwiseSelector::builder()
///     .verbose(false)
///     .build()
///     .select_with(&fitter, &data, "y")
///     .unwrap();
/// assert_eq!(selection.selected, vec!["x"]);
/// assert!(fitter.hits() > 0);
/// ```
pub struct CachedFitter<F: ModelFitter> {
    inner: F,
    cache: RefCell<HashMap<Key, F::Model>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<F: ModelFitter> CachedFitter<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    /// Lookups that had to call the wrapped fitter.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// Drop all cached models and reset the counters.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
        self.hits.set(0);
        self.misses.set(0);
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F> ModelFitter for CachedFitter<F>
where
    F: ModelFitter,
    F::Model: Clone,
{
    type Model = F::Model;

    fn fit(&self, data: &Dataset, formula: &Formula) -> Result<F::Model, SelectionError> {
        let key = (formula.response().to_string(), formula.terms());

        if let Some(model) = self.cache.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return Ok(model.clone());
        }

        // failures are not cached; they abort the search anyway
        let model = self.inner.fit(data, formula)?;
        self.misses.set(self.misses.get() + 1);
        self.cache.borrow_mut().insert(key, model.clone());
        Ok(model)
    }
}
