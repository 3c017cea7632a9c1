//! Model specification and fitting
//!
//! `ModelSpec` carries a formula plus all fitting configuration, passed
//! explicitly per call. Gaussian models are solved in one least-squares
//! pass; Binomial and Poisson models go through IRLS.

mod irls;
mod model;
mod solve;

pub use model::FittedModel;

use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use linmod_core::contrast::ContrastScheme;
use linmod_core::data::{DataFrame, Matrix};
use linmod_core::formula::{Design, Formula};

use crate::base::ModelStatistics;
use crate::error::{ModelError, Result};
use crate::family::Family;

/// Fitting configuration, passed explicitly per call
#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    /// Maximum IRLS iterations for non-Gaussian families
    pub max_iterations: usize,
    /// Convergence tolerance on the relative deviance change
    pub tolerance: f64,
    /// Confidence level for coefficient intervals
    pub confidence_level: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            tolerance: 1e-8,
            confidence_level: 0.95,
        }
    }
}

/// A model specification ready to be fitted to data
#[derive(Debug, Clone)]
pub struct ModelSpec {
    formula: Formula,
    family: Family,
    contrasts: ContrastScheme,
    config: FitConfig,
}

impl ModelSpec {
    /// Specify a model from a formula string
    pub fn new(formula: &str) -> Result<Self> {
        Ok(Self::from_formula(Formula::parse(formula)?))
    }

    /// Specify a model from an already built formula
    pub fn from_formula(formula: Formula) -> Self {
        Self {
            formula,
            family: Family::default(),
            contrasts: ContrastScheme::default(),
            config: FitConfig::default(),
        }
    }

    /// Set the response family
    pub fn family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    /// Set the contrast scheme for categorical terms
    pub fn contrasts(mut self, contrasts: ContrastScheme) -> Self {
        self.contrasts = contrasts;
        self
    }

    /// Set fitting configuration
    pub fn config(mut self, config: FitConfig) -> Self {
        self.config = config;
        self
    }

    /// Fit the model to a DataFrame
    pub fn fit(&self, df: &DataFrame) -> Result<FittedModel> {
        let design = self.formula.design_matrix(df, self.contrasts)?;
        let (n, p) = design.matrix.dim();

        if p == 0 {
            return Err(ModelError::InvalidConfig {
                message: "formula produces an empty design matrix".to_string(),
            });
        }
        if n <= p {
            return Err(ModelError::InsufficientData {
                n_samples: n,
                n_predictors: p,
            });
        }

        match self.family {
            Family::Gaussian => self.fit_gaussian(design),
            Family::Binomial | Family::Poisson => self.fit_glm(design),
        }
    }

    fn fit_gaussian(&self, design: Design) -> Result<FittedModel> {
        let Design {
            matrix: x,
            response: y,
            column_names,
        } = design;
        let n = y.len();
        let p = x.ncols();

        let solution = solve::weighted_least_squares(&x, &y, None)?;
        let fitted = x.dot(&solution.coefficients);
        let residuals = &y - &fitted;
        let rss = residuals.dot(&residuals);

        let tss = if self.formula.has_intercept {
            let mean = y.mean().unwrap_or(0.0);
            y.iter().map(|&v| (v - mean) * (v - mean)).sum()
        } else {
            y.dot(&y)
        };

        let df_residual = n - p;
        let df_model = p - usize::from(self.formula.has_intercept);
        let sigma2 = rss / df_residual as f64;

        let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };
        let adj_r_squared =
            1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df_residual as f64;

        let (f_statistic, f_p_value) =
            overall_f_test(rss, tss, df_model, df_residual, self.formula.has_intercept);

        let statistics = ModelStatistics {
            r_squared: Some(r_squared),
            adj_r_squared: Some(adj_r_squared),
            residual_std_error: Some(sigma2.sqrt()),
            f_statistic,
            f_p_value,
            log_likelihood: Some(Family::Gaussian.log_likelihood(&y, &fitted)),
            aic: Some(Family::Gaussian.aic(&y, &fitted, p)),
            bic: Some(Family::Gaussian.bic(&y, &fitted, p)),
            df_residual: Some(df_residual),
            df_model: Some(df_model),
            converged: Some(true),
            ..ModelStatistics::default()
        };

        Ok(FittedModel {
            formula: self.formula.clone(),
            family: Family::Gaussian,
            contrasts: self.contrasts,
            term_names: column_names,
            coefficients: solution.coefficients,
            cov_unscaled: solution.xtwx_inv,
            weights: Array1::ones(n),
            x,
            y,
            fitted,
            residuals,
            confidence_level: self.config.confidence_level,
            statistics,
        })
    }

    fn fit_glm(&self, design: Design) -> Result<FittedModel> {
        let Design {
            matrix: x,
            response: y,
            column_names,
        } = design;
        let n = y.len();
        let p = x.ncols();

        if let Some(&bad) = y.iter().find(|&&v| !self.family.valid_response(v)) {
            return Err(ModelError::InvalidResponse {
                family: self.family.name(),
                value: bad,
            });
        }

        let outcome = irls::fit_irls(&x, &y, self.family, &self.config)?;
        let residuals = &y - &outcome.fitted;

        // deviance of the intercept-only model, against the observed mean
        let mean = y.mean().unwrap_or(0.0);
        let mu_null = self.family.clamp_mu(&Array1::from_elem(n, mean));
        let null_deviance = self.family.deviance(&y, &mu_null);
        let pseudo_r_squared = if null_deviance > 0.0 {
            Some(1.0 - outcome.deviance / null_deviance)
        } else {
            None
        };

        let statistics = ModelStatistics {
            null_deviance: Some(null_deviance),
            residual_deviance: Some(outcome.deviance),
            pseudo_r_squared,
            log_likelihood: Some(self.family.log_likelihood(&y, &outcome.fitted)),
            aic: Some(self.family.aic(&y, &outcome.fitted, p)),
            bic: Some(self.family.bic(&y, &outcome.fitted, p)),
            df_residual: Some(n - p),
            df_model: Some(p - usize::from(self.formula.has_intercept)),
            iterations: Some(outcome.iterations),
            converged: Some(true),
            ..ModelStatistics::default()
        };

        Ok(FittedModel {
            formula: self.formula.clone(),
            family: self.family,
            contrasts: self.contrasts,
            term_names: column_names,
            coefficients: outcome.coefficients,
            cov_unscaled: outcome.xtwx_inv,
            weights: outcome.weights,
            x,
            y,
            fitted: outcome.fitted,
            residuals,
            confidence_level: self.config.confidence_level,
            statistics,
        })
    }
}

/// F-test for the overall regression, defined for intercept models with at
/// least one slope
fn overall_f_test(
    rss: f64,
    tss: f64,
    df_model: usize,
    df_residual: usize,
    has_intercept: bool,
) -> (Option<f64>, Option<f64>) {
    if !has_intercept || df_model == 0 || df_residual == 0 || tss <= rss {
        return (None, None);
    }
    if rss <= 0.0 {
        // perfect fit: the statistic diverges and its tail mass is zero
        return (Some(f64::INFINITY), Some(0.0));
    }

    let f = ((tss - rss) / df_model as f64) / (rss / df_residual as f64);
    let p = FisherSnedecor::new(df_model as f64, df_residual as f64)
        .ok()
        .map(|dist| (1.0 - dist.cdf(f)).clamp(0.0, 1.0));

    (Some(f), p)
}

/// R² of an auxiliary regression of `g` on `x`
///
/// Used by the Breusch-Pagan test, which regresses scaled squared
/// residuals back on the model's own design matrix.
pub(crate) fn auxiliary_r_squared(x: &Matrix, g: &Array1<f64>) -> Result<f64> {
    let solution = solve::weighted_least_squares(x, g, None)?;
    let fitted = x.dot(&solution.coefficients);
    let resid = g - &fitted;
    let rss = resid.dot(&resid);

    let mean = g.mean().unwrap_or(0.0);
    let tss: f64 = g.iter().map(|&v| (v - mean) * (v - mean)).sum();
    // an (effectively) constant response carries no signal
    if tss <= 1e-12 {
        return Ok(0.0);
    }
    Ok((1.0 - rss / tss).clamp(0.0, 1.0))
}

/// Fit an ordinary least-squares linear model
pub fn lm(formula: &str, df: &DataFrame) -> Result<FittedModel> {
    ModelSpec::new(formula)?.fit(df)
}

/// Fit a generalized linear model with the given family
pub fn glm(formula: &str, df: &DataFrame, family: Family) -> Result<FittedModel> {
    ModelSpec::new(formula)?.family(family).fit(df)
}
