//! Residual diagnostics for fitted models
//!
//! `diagnose` is a pure function of a fitted model: it computes a residual
//! summary, a normality check, a homoscedasticity test, and per-observation
//! leverage and influence, without touching any shared state.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::base::ResidualSummary;
use crate::error::Result;
use crate::family::Family;
use crate::fit::FittedModel;

/// Everything `diagnose` computes for one model
#[derive(Debug, Clone)]
pub struct DiagnosticsReport {
    /// Five-number summary of the response-scale residuals
    pub residual_summary: ResidualSummary,
    /// Jarque-Bera normality check on the residuals
    pub jarque_bera: JarqueBera,
    /// Breusch-Pagan homoscedasticity test
    pub breusch_pagan: BreuschPagan,
    /// Hat-matrix diagonal per observation
    pub leverage: Array1<f64>,
    /// Cook's distance per observation
    pub cooks_distance: Array1<f64>,
    /// Observations whose leverage exceeds 2p/n
    pub high_leverage: Vec<LeveragePoint>,
    /// Observations whose Cook's distance exceeds 4/n
    pub cooks_outliers: Vec<CookOutlier>,
    /// Pearson residuals (y - mu) / sqrt(V(mu))
    pub pearson_residuals: Array1<f64>,
    /// Deviance residuals sign(y - mu) * sqrt(d_i)
    pub deviance_residuals: Array1<f64>,
}

/// Jarque-Bera test of residual normality
///
/// Residuals with (numerically) zero variance carry no evidence against
/// normality and report a zero statistic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JarqueBera {
    pub statistic: f64,
    pub p_value: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// Breusch-Pagan test: squared scaled residuals regressed on the predictors
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BreuschPagan {
    pub statistic: f64,
    pub p_value: f64,
    pub df: usize,
}

/// A high-leverage observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LeveragePoint {
    pub index: usize,
    pub leverage: f64,
    pub threshold: f64,
}

/// An influential observation by Cook's distance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CookOutlier {
    pub index: usize,
    pub distance: f64,
    pub threshold: f64,
}

/// Compute the full diagnostics report for a fitted model
pub fn diagnose(model: &FittedModel) -> Result<DiagnosticsReport> {
    let n = model.n_obs();
    let p = model.n_params();

    let residuals = model.residuals();
    let pearson_residuals = pearson(model);
    let deviance_residuals = deviance(model);

    let leverage = hat_diagonal(model);
    let cooks_distance = cooks(model, &leverage, &pearson_residuals);

    let leverage_threshold = 2.0 * p as f64 / n as f64;
    let high_leverage = leverage
        .iter()
        .enumerate()
        .filter(|(_, h)| **h > leverage_threshold)
        .map(|(index, &h)| LeveragePoint {
            index,
            leverage: h,
            threshold: leverage_threshold,
        })
        .collect();

    let cooks_threshold = 4.0 / n as f64;
    let cooks_outliers = cooks_distance
        .iter()
        .enumerate()
        .filter(|(_, d)| **d > cooks_threshold)
        .map(|(index, &d)| CookOutlier {
            index,
            distance: d,
            threshold: cooks_threshold,
        })
        .collect();

    Ok(DiagnosticsReport {
        residual_summary: ResidualSummary::from_residuals(residuals),
        jarque_bera: jarque_bera(residuals),
        breusch_pagan: breusch_pagan(model)?,
        leverage,
        cooks_distance,
        high_leverage,
        cooks_outliers,
        pearson_residuals,
        deviance_residuals,
    })
}

fn pearson(model: &FittedModel) -> Array1<f64> {
    let variance = model.family().variance(model.fitted_values());
    model
        .residuals()
        .iter()
        .zip(variance.iter())
        .map(|(&r, &v)| r / v.sqrt())
        .collect()
}

fn deviance(model: &FittedModel) -> Array1<f64> {
    let family = model.family();
    model
        .response()
        .iter()
        .zip(model.fitted_values().iter())
        .map(|(&y, &mu)| (y - mu).signum() * family.unit_deviance(y, mu).sqrt())
        .collect()
}

/// Hat-matrix diagonal h_i = w_i · x_iᵀ (XᵀWX)⁻¹ x_i
fn hat_diagonal(model: &FittedModel) -> Array1<f64> {
    let x = &model.x;
    let cov = &model.cov_unscaled;

    (0..x.nrows())
        .map(|i| {
            let xi = x.row(i);
            model.weights[i] * xi.dot(&cov.dot(&xi))
        })
        .collect()
}

/// Cook's distance: scaled product of squared residual and leverage
fn cooks(model: &FittedModel, leverage: &Array1<f64>, pearson: &Array1<f64>) -> Array1<f64> {
    let p = model.n_params() as f64;
    let n = model.n_obs();

    // Gaussian fits standardize by the residual variance estimate;
    // Binomial/Poisson dispersion is fixed at 1
    let dispersion = match model.family() {
        Family::Gaussian => model.rss() / (n as f64 - p),
        Family::Binomial | Family::Poisson => 1.0,
    };

    // a perfect fit has no residual scale to standardize by
    if dispersion <= 1e-20 {
        return Array1::zeros(n);
    }

    pearson
        .iter()
        .zip(leverage.iter())
        .map(|(&r, &h)| {
            let denom = p * dispersion * (1.0 - h) * (1.0 - h);
            r * r * h / denom
        })
        .collect()
}

fn jarque_bera(residuals: &Array1<f64>) -> JarqueBera {
    let n = residuals.len() as f64;
    let mean = residuals.mean().unwrap_or(0.0);

    let mut m2 = 0.0;
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for &r in residuals {
        let d = r - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    // residual variance at floating-point noise level: the test degenerates
    if m2 <= 1e-20 {
        return JarqueBera {
            statistic: 0.0,
            p_value: 1.0,
            skewness: 0.0,
            kurtosis: 0.0,
        };
    }

    let skewness = m3 / m2.powf(1.5);
    let kurtosis = m4 / (m2 * m2) - 3.0;
    let statistic = n / 6.0 * (skewness * skewness + kurtosis * kurtosis / 4.0);
    let p_value = chi_squared_tail(statistic, 2.0);

    JarqueBera {
        statistic,
        p_value,
        skewness,
        kurtosis,
    }
}

/// Breusch-Pagan: regress r²/σ̂² on the model's own design matrix and take
/// n·R² as a chi-squared statistic with p-1 degrees of freedom
fn breusch_pagan(model: &FittedModel) -> Result<BreuschPagan> {
    let n = model.n_obs();
    let p = model.n_params();
    let df = p - usize::from(model.formula().has_intercept);

    let sigma2 = model.rss() / n as f64;
    if df == 0 || sigma2 <= 1e-20 {
        // nothing to regress on, or a perfect fit with no variance left
        return Ok(BreuschPagan {
            statistic: 0.0,
            p_value: 1.0,
            df,
        });
    }

    let scaled: Array1<f64> = model.residuals().mapv(|r| r * r / sigma2);
    let aux = crate::fit::auxiliary_r_squared(&model.x, &scaled)?;
    let statistic = n as f64 * aux;

    Ok(BreuschPagan {
        statistic,
        p_value: chi_squared_tail(statistic, df as f64),
        df,
    })
}

fn chi_squared_tail(statistic: f64, df: f64) -> f64 {
    ChiSquared::new(df)
        .map(|dist| (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0))
        .unwrap_or(f64::NAN)
}
