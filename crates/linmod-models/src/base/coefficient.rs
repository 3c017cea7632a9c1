//! Coefficient definition

use serde::{Deserialize, Serialize};

/// A named coefficient estimate with its inference statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coefficient {
    /// Design-matrix column name
    pub name: String,
    /// Point estimate
    pub estimate: f64,
    /// Standard error
    pub std_error: Option<f64>,
    /// Test statistic (t for Gaussian models, z otherwise)
    pub statistic: Option<f64>,
    /// Two-sided p-value
    pub p_value: Option<f64>,
    /// Lower bound of the confidence interval
    pub ci_lower: Option<f64>,
    /// Upper bound of the confidence interval
    pub ci_upper: Option<f64>,
    /// Is this the intercept?
    pub is_intercept: bool,
}

impl Coefficient {
    /// Create a bare coefficient with just a name and estimate
    pub fn new(name: impl Into<String>, estimate: f64) -> Self {
        Self {
            name: name.into(),
            estimate,
            std_error: None,
            statistic: None,
            p_value: None,
            ci_lower: None,
            ci_upper: None,
            is_intercept: false,
        }
    }

    /// Attach standard error, test statistic, and p-value
    pub fn with_inference(mut self, std_error: f64, statistic: f64, p_value: f64) -> Self {
        self.std_error = Some(std_error);
        self.statistic = Some(statistic);
        self.p_value = Some(p_value);
        self
    }

    /// Attach a confidence interval
    pub fn with_ci(mut self, lower: f64, upper: f64) -> Self {
        self.ci_lower = Some(lower);
        self.ci_upper = Some(upper);
        self
    }

    /// Mark as intercept
    pub fn as_intercept(mut self) -> Self {
        self.is_intercept = true;
        self
    }
}
