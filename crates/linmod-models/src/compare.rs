//! Model comparison by information criteria and error metrics
//!
//! Nested models fitted to the same data compare through their AIC
//! difference and the implied relative likelihood. Models that are not
//! nested compare through scalar error metrics instead.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::fit::FittedModel;

/// Result of comparing two nested models
///
/// Exists only transiently; it borrows nothing from the models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// AIC of the simpler model A
    pub aic_a: f64,
    /// AIC of the richer model B
    pub aic_b: f64,
    /// AIC(B) - AIC(A); negative favors the richer model
    pub delta_aic: f64,
    /// exp(-ΔAIC / 2): likelihood of B relative to A
    pub relative_likelihood: f64,
}

/// Scalar error metrics for non-nested comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Root mean squared residual
    Rmse,
    /// Median absolute residual
    MedianAbsoluteError,
    /// Akaike Information Criterion
    Aic,
}

/// Compare two nested models fitted to the same data
///
/// `model_b` must contain a superset of `model_a`'s predictors; both must
/// share the family and the exact response vector. Anything else is an
/// `IncomparableModels` error.
pub fn compare(model_a: &FittedModel, model_b: &FittedModel) -> Result<ComparisonResult> {
    if model_a.family() != model_b.family() {
        return Err(incomparable(format!(
            "families differ: {} vs {}",
            model_a.family(),
            model_b.family()
        )));
    }

    if model_a.n_obs() != model_b.n_obs()
        || model_a
            .response()
            .iter()
            .zip(model_b.response().iter())
            .any(|(a, b)| a != b)
    {
        return Err(incomparable(
            "models were fitted on different datasets".to_string(),
        ));
    }

    let b_terms = model_b.term_names();
    if let Some(missing) = model_a
        .term_names()
        .iter()
        .find(|term| !b_terms.contains(term))
    {
        return Err(incomparable(format!(
            "models are not nested: '{}' is absent from the richer model",
            missing
        )));
    }

    let aic_a = model_a.aic();
    let aic_b = model_b.aic();
    let delta_aic = aic_b - aic_a;

    Ok(ComparisonResult {
        aic_a,
        aic_b,
        delta_aic,
        relative_likelihood: (-delta_aic / 2.0).exp(),
    })
}

/// Score a single model by a residual-based metric
pub fn score(model: &FittedModel, metric: Metric) -> f64 {
    match metric {
        Metric::Rmse => {
            let n = model.n_obs() as f64;
            (model.rss() / n).sqrt()
        }
        Metric::MedianAbsoluteError => {
            let mut abs: Vec<f64> = model.residuals().iter().map(|r| r.abs()).collect();
            abs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            median_sorted(&abs)
        }
        Metric::Aic => model.aic(),
    }
}

/// Median of pre-sorted values; even-length sequences average the two
/// middle order statistics
fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn incomparable(reason: String) -> ModelError {
    ModelError::IncomparableModels { reason }
}
