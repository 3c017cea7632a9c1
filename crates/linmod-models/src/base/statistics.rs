//! Statistical summaries attached to fitted models

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Model-level fit statistics
///
/// Optional fields cover both Gaussian least-squares fits (R², F) and
/// deviance-based GLM fits (null/residual deviance, pseudo-R²).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ModelStatistics {
    /// R-squared (Gaussian fits)
    pub r_squared: Option<f64>,
    /// Adjusted R-squared (Gaussian fits)
    pub adj_r_squared: Option<f64>,
    /// Residual standard error (Gaussian fits)
    pub residual_std_error: Option<f64>,
    /// F-statistic for the overall regression
    pub f_statistic: Option<f64>,
    /// p-value of the F-statistic
    pub f_p_value: Option<f64>,
    /// Null deviance (GLM fits)
    pub null_deviance: Option<f64>,
    /// Residual deviance (GLM fits)
    pub residual_deviance: Option<f64>,
    /// 1 - residual_deviance / null_deviance (GLM fits)
    pub pseudo_r_squared: Option<f64>,
    /// Log-likelihood at the fitted parameters
    pub log_likelihood: Option<f64>,
    /// Akaike Information Criterion
    pub aic: Option<f64>,
    /// Bayesian Information Criterion
    pub bic: Option<f64>,
    /// Residual degrees of freedom
    pub df_residual: Option<usize>,
    /// Model degrees of freedom (non-intercept columns)
    pub df_model: Option<usize>,
    /// Iterations to convergence (iterative fits)
    pub iterations: Option<usize>,
    /// Whether the fit converged
    pub converged: Option<bool>,
}

/// Five-number summary plus moments of a residual vector
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResidualSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl ResidualSummary {
    /// Summarize a residual vector
    pub fn from_residuals(residuals: &Array1<f64>) -> Self {
        let mut sorted: Vec<f64> = residuals.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        Self {
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
            mean: residuals.mean().unwrap_or(f64::NAN),
            std_dev: residuals.std(1.0),
        }
    }
}

/// Linear interpolation quantile over pre-sorted data
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let index = (sorted.len() as f64 - 1.0) * q;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_residual_summary() {
        let r = array![3.0, -1.0, 0.0, 1.0, 2.0];
        let summary = ResidualSummary::from_residuals(&r);

        assert_abs_diff_eq!(summary.min, -1.0);
        assert_abs_diff_eq!(summary.median, 1.0);
        assert_abs_diff_eq!(summary.max, 3.0);
        assert_abs_diff_eq!(summary.mean, 1.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_abs_diff_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_abs_diff_eq!(quantile_sorted(&sorted, 1.0), 4.0);
    }
}
