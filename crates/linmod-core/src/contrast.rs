//! Contrast coding for categorical variables
//!
//! A contrast scheme maps the k levels of a categorical variable into k-1
//! numeric predictor columns. Each scheme is a pure function from the level
//! count to a k × (k-1) coding matrix; row i is the numeric encoding of
//! level i. All schemes produce columns that are linearly independent of
//! the intercept column.

use ndarray::Array2;

use crate::data::Matrix;

/// Errors from contrast matrix construction
#[derive(thiserror::Error, Debug)]
pub enum ContrastError {
    #[error("Contrast coding requires at least 2 levels, got {0}")]
    TooFewLevels(usize),
}

pub type Result<T> = std::result::Result<T, ContrastError>;

/// Named contrast coding strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContrastScheme {
    /// Dummy coding against the first level as reference
    #[default]
    Treatment,
    /// Deviation coding: each level against the grand mean
    Sum,
    /// Each level against the mean of the preceding levels
    Helmert,
    /// Orthogonal polynomial trend contrasts over equally spaced levels
    Polynomial,
}

impl ContrastScheme {
    /// Build the k × (k-1) coding matrix for `k` levels
    pub fn matrix(&self, k: usize) -> Result<Matrix> {
        if k < 2 {
            return Err(ContrastError::TooFewLevels(k));
        }

        let m = match self {
            ContrastScheme::Treatment => treatment(k),
            ContrastScheme::Sum => sum(k),
            ContrastScheme::Helmert => helmert(k),
            ContrastScheme::Polynomial => polynomial(k),
        };
        Ok(m)
    }

    /// Column labels for the coded predictors, given the level names
    ///
    /// Treatment columns are named after the non-reference level they
    /// indicate; Sum and Helmert columns after the level they contrast;
    /// polynomial columns after the trend degree (L, Q, C, ^4, ...).
    pub fn column_labels(&self, levels: &[String]) -> Vec<String> {
        let k = levels.len();
        match self {
            ContrastScheme::Treatment => levels[1..].to_vec(),
            ContrastScheme::Sum => levels[..k.saturating_sub(1)].to_vec(),
            ContrastScheme::Helmert => levels[1..].to_vec(),
            ContrastScheme::Polynomial => (1..k)
                .map(|degree| match degree {
                    1 => "L".to_string(),
                    2 => "Q".to_string(),
                    3 => "C".to_string(),
                    d => format!("^{}", d),
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for ContrastScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContrastScheme::Treatment => "treatment",
            ContrastScheme::Sum => "sum",
            ContrastScheme::Helmert => "helmert",
            ContrastScheme::Polynomial => "polynomial",
        };
        write!(f, "{}", name)
    }
}

fn treatment(k: usize) -> Matrix {
    let mut m = Array2::zeros((k, k - 1));
    for j in 0..k - 1 {
        m[(j + 1, j)] = 1.0;
    }
    m
}

fn sum(k: usize) -> Matrix {
    let mut m = Array2::zeros((k, k - 1));
    for j in 0..k - 1 {
        m[(j, j)] = 1.0;
        m[(k - 1, j)] = -1.0;
    }
    m
}

fn helmert(k: usize) -> Matrix {
    let mut m = Array2::zeros((k, k - 1));
    for j in 0..k - 1 {
        for i in 0..=j {
            m[(i, j)] = -1.0;
        }
        m[(j + 1, j)] = (j + 1) as f64;
    }
    m
}

/// Orthonormal polynomial contrasts via Gram-Schmidt on the Vandermonde
/// basis of equally spaced level scores 1..=k
fn polynomial(k: usize) -> Matrix {
    let mut basis = Array2::zeros((k, k));
    for i in 0..k {
        for p in 0..k {
            basis[(i, p)] = ((i + 1) as f64).powi(p as i32);
        }
    }

    for j in 0..k {
        for l in 0..j {
            let proj: f64 = (0..k).map(|i| basis[(i, j)] * basis[(i, l)]).sum();
            for i in 0..k {
                basis[(i, j)] -= proj * basis[(i, l)];
            }
        }
        let norm: f64 = (0..k)
            .map(|i| basis[(i, j)] * basis[(i, j)])
            .sum::<f64>()
            .sqrt();
        for i in 0..k {
            basis[(i, j)] /= norm;
        }
    }

    // drop the constant column
    let mut m = Array2::zeros((k, k - 1));
    for j in 1..k {
        for i in 0..k {
            m[(i, j - 1)] = basis[(i, j)];
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SCHEMES: [ContrastScheme; 4] = [
        ContrastScheme::Treatment,
        ContrastScheme::Sum,
        ContrastScheme::Helmert,
        ContrastScheme::Polynomial,
    ];

    #[test]
    fn test_every_scheme_has_k_minus_one_columns() {
        for scheme in SCHEMES {
            for k in 2..=6 {
                let m = scheme.matrix(k).unwrap();
                assert_eq!(m.dim(), (k, k - 1), "{} with k={}", scheme, k);
            }
        }
    }

    #[test]
    fn test_too_few_levels() {
        for scheme in SCHEMES {
            assert!(matches!(
                scheme.matrix(1),
                Err(ContrastError::TooFewLevels(1))
            ));
        }
    }

    #[test]
    fn test_zero_sum_columns() {
        // Sum, Helmert, and polynomial columns sum to zero; treatment
        // columns do not
        for scheme in [
            ContrastScheme::Sum,
            ContrastScheme::Helmert,
            ContrastScheme::Polynomial,
        ] {
            let m = scheme.matrix(4).unwrap();
            for j in 0..3 {
                let col_sum: f64 = m.column(j).sum();
                assert_abs_diff_eq!(col_sum, 0.0, epsilon = 1e-12);
            }
        }

        let m = ContrastScheme::Treatment.matrix(4).unwrap();
        for j in 0..3 {
            assert_abs_diff_eq!(m.column(j).sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_treatment_reference_level() {
        let m = ContrastScheme::Treatment.matrix(3).unwrap();
        // first level encodes to all zeros
        assert_eq!(m.row(0).to_vec(), vec![0.0, 0.0]);
        assert_eq!(m.row(1).to_vec(), vec![1.0, 0.0]);
        assert_eq!(m.row(2).to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_helmert_matches_reference_values() {
        let m = ContrastScheme::Helmert.matrix(4).unwrap();
        let expected = [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [0.0, 2.0, -1.0],
            [0.0, 0.0, 3.0],
        ];
        for i in 0..4 {
            for j in 0..3 {
                assert_abs_diff_eq!(m[(i, j)], expected[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_polynomial_columns_are_orthonormal() {
        let m = ContrastScheme::Polynomial.matrix(5).unwrap();
        for a in 0..4 {
            for b in 0..4 {
                let dot: f64 = (0..5).map(|i| m[(i, a)] * m[(i, b)]).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(dot, expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_polynomial_linear_column_is_monotone() {
        let m = ContrastScheme::Polynomial.matrix(4).unwrap();
        for i in 0..3 {
            assert!(m[(i, 0)] < m[(i + 1, 0)]);
        }
    }

    #[test]
    fn test_column_labels() {
        let levels: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();

        assert_eq!(
            ContrastScheme::Treatment.column_labels(&levels),
            vec!["b", "c", "d"]
        );
        assert_eq!(
            ContrastScheme::Sum.column_labels(&levels),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            ContrastScheme::Helmert.column_labels(&levels),
            vec!["b", "c", "d"]
        );
        assert_eq!(
            ContrastScheme::Polynomial.column_labels(&levels),
            vec!["L", "Q", "C"]
        );
    }
}
