//! Named-column tabular data.

use faer::{Col, Mat};
use thiserror::Error;

/// Term name reserved for the intercept in fitted models.
pub const INTERCEPT: &str = "Intercept";

/// Errors raised while building or querying a [`Dataset`].
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("dataset has no columns")]
    NoColumns,

    #[error("expected {expected} column names, got {got}")]
    NameCountMismatch { expected: usize, got: usize },

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("column name '{0}' is not a valid identifier")]
    InvalidColumnName(String),

    #[error("column name '{0}' is reserved for the intercept term")]
    ReservedColumnName(String),

    #[error("column '{name}' has {got} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("column '{name}' has a non-finite value at row {row}")]
    NonFiniteValue { name: String, row: usize },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}

/// A table of observations with named numeric columns.
///
/// Rows are observations; one column is later designated as the response
/// and the rest are candidate predictors. Column names must be identifiers
/// (`[A-Za-z_][A-Za-z0-9_]*`) and may not be `Intercept`.
#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    data: Mat<f64>,
}

impl Dataset {
    /// Wrap a matrix whose columns are labelled by `names`.
    pub fn new(names: Vec<String>, data: Mat<f64>) -> Result<Self, DatasetError> {
        if names.len() != data.ncols() {
            return Err(DatasetError::NameCountMismatch {
                expected: data.ncols(),
                got: names.len(),
            });
        }
        validate_names(&names)?;

        for (j, name) in names.iter().enumerate() {
            for i in 0..data.nrows() {
                if !data[(i, j)].is_finite() {
                    return Err(DatasetError::NonFiniteValue {
                        name: name.clone(),
                        row: i,
                    });
                }
            }
        }

        Ok(Self { names, data })
    }

    /// Build a dataset from `(name, values)` pairs.
    ///
    /// ```
    /// use stepwise_rs::core::Dataset;
    ///
    /// let data = Dataset::from_columns(vec![
    ///     ("y", vec![1.0, 2.0, 3.0]),
    ///     ("x", vec![0.5, 1.0, 1.5]),
    /// ])
    /// .unwrap();
    /// assert_eq!(data.n_rows(), 3);
    /// assert_eq!(data.column_names(), ["y", "x"]);
    /// ```
    pub fn from_columns<S: Into<String>>(
        columns: Vec<(S, Vec<f64>)>,
    ) -> Result<Self, DatasetError> {
        let (names, values): (Vec<String>, Vec<Vec<f64>>) = columns
            .into_iter()
            .map(|(name, v)| (name.into(), v))
            .unzip();
        validate_names(&names)?;

        let n_rows = values[0].len();
        for (name, column) in names.iter().zip(&values) {
            if column.len() != n_rows {
                return Err(DatasetError::LengthMismatch {
                    name: name.clone(),
                    expected: n_rows,
                    got: column.len(),
                });
            }
        }

        let data = Mat::from_fn(n_rows, names.len(), |i, j| values[j][i]);
        Self::new(names, data)
    }

    /// Number of observations.
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns, response included.
    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    /// Column names in dataset order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Copy out a single column.
    pub fn column(&self, name: &str) -> Result<Col<f64>, DatasetError> {
        let j = self.require(name)?;
        Ok(Col::from_fn(self.n_rows(), |i| self.data[(i, j)]))
    }

    /// Assemble the design matrix for `predictors`, in the given order.
    ///
    /// An empty slice yields an `n × 0` matrix (intercept-only design).
    pub fn design_matrix<S: AsRef<str>>(&self, predictors: &[S]) -> Result<Mat<f64>, DatasetError> {
        let indices = predictors
            .iter()
            .map(|p| self.require(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Mat::from_fn(self.n_rows(), indices.len(), |i, j| {
            self.data[(i, indices[j])]
        }))
    }

    /// Every column except `response`, in dataset order.
    pub fn candidates(&self, response: &str) -> Result<Vec<String>, DatasetError> {
        self.require(response)?;
        Ok(self
            .names
            .iter()
            .filter(|n| n.as_str() != response)
            .cloned()
            .collect())
    }

    fn require(&self, name: &str) -> Result<usize, DatasetError> {
        self.column_index(name)
            .ok_or_else(|| DatasetError::UnknownColumn(name.to_string()))
    }
}

fn validate_names(names: &[String]) -> Result<(), DatasetError> {
    if names.is_empty() {
        return Err(DatasetError::NoColumns);
    }
    for (k, name) in names.iter().enumerate() {
        if !is_identifier(name) {
            return Err(DatasetError::InvalidColumnName(name.clone()));
        }
        if name == INTERCEPT {
            return Err(DatasetError::ReservedColumnName(name.clone()));
        }
        if names[..k].contains(name) {
            return Err(DatasetError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
