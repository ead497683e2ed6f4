//! Matrix helpers shared by the solvers.

use faer::{Col, Mat};

/// Flag columns whose values all lie within `tolerance` of the first row.
///
/// With no rows every column counts as constant.
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    (0..x.ncols())
        .map(|j| {
            x.nrows() == 0 || (1..x.nrows()).all(|i| (x[(i, j)] - x[(0, j)]).abs() < tolerance)
        })
        .collect()
}

/// Subtract each column's mean. Returns the centred matrix and the means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n = x.nrows() as f64;
    let means = Col::from_fn(x.ncols(), |j| {
        (0..x.nrows()).map(|i| x[(i, j)]).sum::<f64>() / n
    });
    let centered = Mat::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)] - means[j]);
    (centered, means)
}

/// Subtract the mean. Returns the centred vector and the mean.
pub fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let mean = y.iter().sum::<f64>() / y.nrows() as f64;
    (Col::from_fn(y.nrows(), |i| y[i] - mean), mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_constant_columns() {
        let x = Mat::from_fn(5, 3, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            _ => 1.0 + 1e-12 * i as f64,
        });

        assert_eq!(detect_constant_columns(&x, 1e-10), vec![true, false, true]);
        assert_eq!(detect_constant_columns(&x, 1e-14), vec![true, false, false]);
    }

    #[test]
    fn test_detect_constant_columns_no_rows() {
        let x = Mat::<f64>::zeros(0, 2);
        assert_eq!(detect_constant_columns(&x, 1e-10), vec![true, true]);
    }

    #[test]
    fn test_center_columns() {
        let x = Mat::from_fn(4, 2, |i, j| (i + 1) as f64 * if j == 0 { 1.0 } else { 10.0 });
        let (centered, means) = center_columns(&x);

        assert!((means[0] - 2.5).abs() < 1e-12);
        assert!((means[1] - 25.0).abs() < 1e-12);
        for j in 0..2 {
            let sum: f64 = (0..4).map(|i| centered[(i, j)]).sum();
            assert!(sum.abs() < 1e-12);
        }
    }

    #[test]
    fn test_center_vector() {
        let y = Col::from_fn(4, |i| (i + 1) as f64);
        let (centered, mean) = center_vector(&y);
        assert!((mean - 2.5).abs() < 1e-12);
        assert!((centered[0] + 1.5).abs() < 1e-12);
    }
}
