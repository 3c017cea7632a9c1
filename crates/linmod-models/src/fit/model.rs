//! The fitted-model result type
//!
//! A `FittedModel` is produced by `ModelSpec::fit` and is immutable from
//! then on. It keeps the design matrix and response it was fitted to, so
//! diagnostics and model comparison can run as pure functions over it.

use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use linmod_core::contrast::ContrastScheme;
use linmod_core::data::{DataFrame, Matrix};
use linmod_core::formula::Formula;

use crate::base::{Coefficient, ModelStatistics, ModelSummary, ResidualSummary};
use crate::error::{ModelError, Result};
use crate::family::Family;

/// An immutable fitted model
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub(crate) formula: Formula,
    pub(crate) family: Family,
    pub(crate) contrasts: ContrastScheme,
    pub(crate) term_names: Vec<String>,
    pub(crate) coefficients: Array1<f64>,
    /// (XᵀWX)⁻¹ from the final solve
    pub(crate) cov_unscaled: Array2<f64>,
    /// Final working weights (all ones for Gaussian fits)
    pub(crate) weights: Array1<f64>,
    pub(crate) x: Matrix,
    pub(crate) y: Array1<f64>,
    pub(crate) fitted: Array1<f64>,
    pub(crate) residuals: Array1<f64>,
    pub(crate) confidence_level: f64,
    pub(crate) statistics: ModelStatistics,
}

impl FittedModel {
    /// The formula the model was fitted with
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// The response distribution family
    pub fn family(&self) -> Family {
        self.family
    }

    /// The contrast scheme used for categorical terms
    pub fn contrasts(&self) -> ContrastScheme {
        self.contrasts
    }

    /// Names of the design-matrix columns, in coefficient order
    pub fn term_names(&self) -> &[String] {
        &self.term_names
    }

    /// Coefficient estimates, in design-matrix column order
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    /// Fitted values on the response scale
    pub fn fitted_values(&self) -> &Array1<f64> {
        &self.fitted
    }

    /// Response-scale residuals y - mu
    pub fn residuals(&self) -> &Array1<f64> {
        &self.residuals
    }

    /// The response vector the model was fitted to
    pub fn response(&self) -> &Array1<f64> {
        &self.y
    }

    /// Number of observations
    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    /// Number of coefficients (including intercept)
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// Residual sum of squares
    pub fn rss(&self) -> f64 {
        self.residuals.dot(&self.residuals)
    }

    /// Model fit statistics
    pub fn statistics(&self) -> &ModelStatistics {
        &self.statistics
    }

    /// Akaike Information Criterion
    pub fn aic(&self) -> f64 {
        self.statistics.aic.unwrap_or(f64::NAN)
    }

    /// Bayesian Information Criterion
    pub fn bic(&self) -> f64 {
        self.statistics.bic.unwrap_or(f64::NAN)
    }

    /// Log-likelihood at the fitted parameters
    pub fn log_likelihood(&self) -> f64 {
        self.statistics.log_likelihood.unwrap_or(f64::NAN)
    }

    /// Predict on new data, on the response scale
    ///
    /// The new frame must provide every predictor variable; categorical
    /// columns must expand to the same coded columns as at fit time.
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let (x_new, names) = self.formula.predictor_matrix(df, self.contrasts)?;
        if names != self.term_names {
            return Err(ModelError::PredictionError {
                message: format!(
                    "design columns {:?} do not match fitted terms {:?}",
                    names, self.term_names
                ),
            });
        }

        let eta = x_new.dot(&self.coefficients);
        Ok(self.family.inverse_link(&eta))
    }

    /// Coefficient table with standard errors, test statistics, p-values,
    /// and confidence intervals
    ///
    /// Gaussian fits use the Student-t reference distribution with n - p
    /// degrees of freedom; GLM fits use Wald z statistics.
    pub fn coefficient_table(&self) -> Result<Vec<Coefficient>> {
        let n = self.n_obs();
        let p = self.n_params();
        let dispersion = match self.family {
            Family::Gaussian => self.rss() / (n - p) as f64,
            Family::Binomial | Family::Poisson => 1.0,
        };

        let alpha = 1.0 - self.confidence_level;
        let (cdf, critical): (Box<dyn Fn(f64) -> f64>, f64) = match self.family {
            Family::Gaussian => {
                let t = StudentsT::new(0.0, 1.0, (n - p) as f64).map_err(|e| {
                    ModelError::NumericalError {
                        message: e.to_string(),
                        operation: "coefficient_table".to_string(),
                    }
                })?;
                let critical = t.inverse_cdf(1.0 - alpha / 2.0);
                (Box::new(move |v| t.cdf(v)), critical)
            }
            Family::Binomial | Family::Poisson => {
                let norm = Normal::new(0.0, 1.0).map_err(|e| ModelError::NumericalError {
                    message: e.to_string(),
                    operation: "coefficient_table".to_string(),
                })?;
                let critical = norm.inverse_cdf(1.0 - alpha / 2.0);
                (Box::new(move |v| norm.cdf(v)), critical)
            }
        };

        let table = self
            .term_names
            .iter()
            .zip(self.coefficients.iter())
            .enumerate()
            .map(|(j, (name, &estimate))| {
                let se = (dispersion * self.cov_unscaled[(j, j)]).sqrt();
                let statistic = estimate / se;
                let p_value = (2.0 * (1.0 - cdf(statistic.abs()))).clamp(0.0, 1.0);

                let mut coeff = Coefficient::new(name.as_str(), estimate)
                    .with_inference(se, statistic, p_value)
                    .with_ci(estimate - critical * se, estimate + critical * se);
                if name == "(Intercept)" {
                    coeff = coeff.as_intercept();
                }
                coeff
            })
            .collect();

        Ok(table)
    }

    /// Full model summary
    pub fn summary(&self) -> Result<ModelSummary> {
        Ok(ModelSummary {
            family: self.family.name().to_string(),
            formula: self.formula.to_string(),
            n_obs: self.n_obs(),
            n_params: self.n_params(),
            coefficients: self.coefficient_table()?,
            statistics: self.statistics,
            residuals: ResidualSummary::from_residuals(&self.residuals),
        })
    }
}
