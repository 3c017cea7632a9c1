//! Least-squares solves behind both fitting paths
//!
//! Ordinary and weighted problems share one routine: scale rows by the
//! square root of the weights and solve the normal equations.

use ndarray::{Array1, Array2};
use ndarray_linalg::{Inverse, Solve};

use crate::error::{ModelError, Result};

/// Solution of a (weighted) least-squares problem
pub(crate) struct Solution {
    /// Coefficient estimates
    pub coefficients: Array1<f64>,
    /// (XᵀWX)⁻¹, the unscaled covariance of the estimates
    pub xtwx_inv: Array2<f64>,
}

/// Minimize Σ wᵢ (zᵢ - xᵢᵀβ)² through the normal equations
///
/// A rank-deficient design makes the normal-equation matrix singular; the
/// LU factorization then fails and surfaces as `SingularMatrix`.
pub(crate) fn weighted_least_squares(
    x: &Array2<f64>,
    z: &Array1<f64>,
    weights: Option<&Array1<f64>>,
) -> Result<Solution> {
    let (xtx, xtz) = match weights {
        Some(w) => {
            let sqrt_w = w.mapv(f64::sqrt);
            let mut xw = x.clone();
            for (mut row, &sw) in xw.rows_mut().into_iter().zip(sqrt_w.iter()) {
                row.mapv_inplace(|v| v * sw);
            }
            let zw = z * &sqrt_w;
            (xw.t().dot(&xw), xw.t().dot(&zw))
        }
        None => (x.t().dot(x), x.t().dot(z)),
    };

    let coefficients = xtx.solve(&xtz).map_err(|_| ModelError::SingularMatrix)?;
    let xtwx_inv = xtx.inv().map_err(|_| ModelError::SingularMatrix)?;

    Ok(Solution {
        coefficients,
        xtwx_inv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_exact_solve() {
        // y = 1 + 2x at x = 1..4
        let x = array![[1.0, 1.0], [1.0, 2.0], [1.0, 3.0], [1.0, 4.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];

        let sol = weighted_least_squares(&x, &y, None).unwrap();
        assert_abs_diff_eq!(sol.coefficients[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(sol.coefficients[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_weights_reweight_observations() {
        // two inconsistent observations at the same x; the heavier one wins
        let x = array![[1.0], [1.0]];
        let z = array![0.0, 10.0];

        let w = array![1.0, 3.0];
        let sol = weighted_least_squares(&x, &z, Some(&w)).unwrap();
        assert_abs_diff_eq!(sol.coefficients[0], 7.5, epsilon = 1e-10);
    }

    #[test]
    fn test_collinear_design_is_singular() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let y = array![1.0, 2.0, 3.0];

        let err = weighted_least_squares(&x, &y, None).unwrap_err();
        assert!(matches!(err, ModelError::SingularMatrix));
    }
}
