//! Human-readable model summaries

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coefficient::Coefficient;
use super::statistics::{ModelStatistics, ResidualSummary};

/// Comprehensive summary of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Family name (gaussian, binomial, poisson)
    pub family: String,
    /// Model formula
    pub formula: String,
    /// Number of observations
    pub n_obs: usize,
    /// Number of coefficients (including intercept)
    pub n_params: usize,
    /// Coefficients table
    pub coefficients: Vec<Coefficient>,
    /// Model statistics
    pub statistics: ModelStatistics,
    /// Residual summary
    pub residuals: ResidualSummary,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Summary")?;
        writeln!(f, "=============")?;
        writeln!(f, "Family: {}", self.family)?;
        writeln!(f, "Formula: {}", self.formula)?;
        writeln!(f, "Observations: {}", self.n_obs)?;
        writeln!(f)?;

        writeln!(f, "Residuals:")?;
        writeln!(
            f,
            "  Min {:.4}  Q1 {:.4}  Median {:.4}  Q3 {:.4}  Max {:.4}",
            self.residuals.min,
            self.residuals.q1,
            self.residuals.median,
            self.residuals.q3,
            self.residuals.max
        )?;
        writeln!(f)?;

        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<20} {:>12} {:>12} {:>12} {:>12}",
            "Term", "Estimate", "Std Error", "Statistic", "p-value"
        )?;
        for coeff in &self.coefficients {
            writeln!(
                f,
                "{:<20} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                coeff.name,
                coeff.estimate,
                coeff.std_error.unwrap_or(f64::NAN),
                coeff.statistic.unwrap_or(f64::NAN),
                coeff.p_value.unwrap_or(f64::NAN)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Model Statistics:")?;
        if let Some(r2) = self.statistics.r_squared {
            writeln!(f, "  R-squared: {:.4}", r2)?;
        }
        if let Some(adj_r2) = self.statistics.adj_r_squared {
            writeln!(f, "  Adjusted R-squared: {:.4}", adj_r2)?;
        }
        if let Some(null_dev) = self.statistics.null_deviance {
            writeln!(f, "  Null deviance: {:.4}", null_dev)?;
        }
        if let Some(resid_dev) = self.statistics.residual_deviance {
            writeln!(f, "  Residual deviance: {:.4}", resid_dev)?;
        }
        if let Some(pseudo) = self.statistics.pseudo_r_squared {
            writeln!(f, "  Pseudo R-squared: {:.4}", pseudo)?;
        }
        if let Some(f_stat) = self.statistics.f_statistic {
            writeln!(f, "  F-statistic: {:.4}", f_stat)?;
        }
        if let Some(ll) = self.statistics.log_likelihood {
            writeln!(f, "  Log-likelihood: {:.4}", ll)?;
        }
        if let Some(aic) = self.statistics.aic {
            writeln!(f, "  AIC: {:.4}", aic)?;
        }
        if let Some(bic) = self.statistics.bic {
            writeln!(f, "  BIC: {:.4}", bic)?;
        }
        if let Some(se) = self.statistics.residual_std_error {
            writeln!(f, "  Residual Std. Error: {:.4}", se)?;
        }
        if let Some(df) = self.statistics.df_residual {
            writeln!(f, "  Residual DF: {}", df)?;
        }
        if let Some(iter) = self.statistics.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }

        Ok(())
    }
}
