//! Distribution families for model fitting
//!
//! Each family pairs a response distribution with its canonical link
//! function. The family supplies everything iteratively reweighted least
//! squares needs (link, variance, working-weight ingredients) plus the
//! likelihood quantities used for information criteria.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

/// Response distribution with its canonical link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Family {
    /// Continuous response, identity link
    #[default]
    Gaussian,
    /// Binary response, logit link
    Binomial,
    /// Count response, log link
    Poisson,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Gaussian => "gaussian",
            Family::Binomial => "binomial",
            Family::Poisson => "poisson",
        }
    }

    /// Canonical link g(mu)
    pub fn link(&self, mu: &Array1<f64>) -> Array1<f64> {
        match self {
            Family::Gaussian => mu.clone(),
            Family::Binomial => mu.mapv(|m| (m / (1.0 - m)).ln()),
            Family::Poisson => mu.mapv(f64::ln),
        }
    }

    /// Inverse link g⁻¹(eta)
    pub fn inverse_link(&self, eta: &Array1<f64>) -> Array1<f64> {
        match self {
            Family::Gaussian => eta.clone(),
            Family::Binomial => eta.mapv(|e| 1.0 / (1.0 + (-e).exp())),
            Family::Poisson => eta.mapv(f64::exp),
        }
    }

    /// Link derivative g'(mu) = d eta / d mu
    pub fn link_derivative(&self, mu: &Array1<f64>) -> Array1<f64> {
        match self {
            Family::Gaussian => Array1::ones(mu.len()),
            Family::Binomial => mu.mapv(|m| 1.0 / (m * (1.0 - m))),
            Family::Poisson => mu.mapv(|m| 1.0 / m),
        }
    }

    /// Variance function V(mu)
    pub fn variance(&self, mu: &Array1<f64>) -> Array1<f64> {
        match self {
            Family::Gaussian => Array1::ones(mu.len()),
            Family::Binomial => mu.mapv(|m| m * (1.0 - m)),
            Family::Poisson => mu.clone(),
        }
    }

    /// Is `y` a valid response value for this family?
    pub fn valid_response(&self, y: f64) -> bool {
        match self {
            Family::Gaussian => y.is_finite(),
            Family::Binomial => (0.0..=1.0).contains(&y),
            Family::Poisson => y.is_finite() && y >= 0.0,
        }
    }

    /// Starting value for the mean in iterative fitting
    ///
    /// A shrunk version of the observed response that stays inside the
    /// family's domain even for boundary observations (0 counts, 0/1
    /// outcomes).
    pub fn initialize_mu(&self, y: &Array1<f64>) -> Array1<f64> {
        match self {
            Family::Gaussian => y.clone(),
            Family::Binomial => y.mapv(|yi| (yi + 0.5) / 2.0),
            Family::Poisson => {
                let mean = y.mean().unwrap_or(1.0).max(0.1);
                y.mapv(|yi| (yi + mean) / 2.0)
            }
        }
    }

    /// Clamp the mean into the family's valid domain
    pub fn clamp_mu(&self, mu: &Array1<f64>) -> Array1<f64> {
        match self {
            Family::Gaussian => mu.clone(),
            Family::Binomial => mu.mapv(|m| m.clamp(1e-10, 1.0 - 1e-10)),
            Family::Poisson => mu.mapv(|m| m.max(1e-10)),
        }
    }

    /// Deviance contribution of a single observation
    pub fn unit_deviance(&self, y: f64, mu: f64) -> f64 {
        match self {
            Family::Gaussian => (y - mu) * (y - mu),
            Family::Binomial => {
                let mut d = 0.0;
                if y > 0.0 {
                    d += y * (y / mu).ln();
                }
                if y < 1.0 {
                    d += (1.0 - y) * ((1.0 - y) / (1.0 - mu)).ln();
                }
                2.0 * d
            }
            Family::Poisson => {
                if y > 0.0 {
                    2.0 * (y * (y / mu).ln() - (y - mu))
                } else {
                    2.0 * mu
                }
            }
        }
    }

    /// Total deviance D(y, mu)
    pub fn deviance(&self, y: &Array1<f64>, mu: &Array1<f64>) -> f64 {
        y.iter()
            .zip(mu.iter())
            .map(|(&yi, &mi)| self.unit_deviance(yi, mi))
            .sum()
    }

    /// Log-likelihood of the response at the fitted means
    ///
    /// For Gaussian the scale is profiled out at its maximum-likelihood
    /// estimate RSS/n, matching the value reported by R's `logLik`.
    pub fn log_likelihood(&self, y: &Array1<f64>, mu: &Array1<f64>) -> f64 {
        let n = y.len() as f64;
        match self {
            Family::Gaussian => {
                let rss: f64 = y
                    .iter()
                    .zip(mu.iter())
                    .map(|(&yi, &mi)| (yi - mi) * (yi - mi))
                    .sum();
                let sigma2 = rss / n;
                -0.5 * n * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0)
            }
            Family::Binomial => y
                .iter()
                .zip(mu.iter())
                .map(|(&yi, &mi)| yi * mi.ln() + (1.0 - yi) * (1.0 - mi).ln())
                .sum(),
            Family::Poisson => y
                .iter()
                .zip(mu.iter())
                .map(|(&yi, &mi)| yi * mi.ln() - mi - ln_gamma(yi + 1.0))
                .sum(),
        }
    }

    /// Number of estimated parameters given `p` coefficients
    ///
    /// Gaussian models additionally estimate the residual scale, which is
    /// what R counts when computing AIC for `lm` fits.
    pub fn n_parameters(&self, p: usize) -> usize {
        match self {
            Family::Gaussian => p + 1,
            Family::Binomial | Family::Poisson => p,
        }
    }

    /// Akaike Information Criterion for `p` fitted coefficients
    pub fn aic(&self, y: &Array1<f64>, mu: &Array1<f64>, p: usize) -> f64 {
        let k = self.n_parameters(p) as f64;
        -2.0 * self.log_likelihood(y, mu) + 2.0 * k
    }

    /// Bayesian Information Criterion for `p` fitted coefficients
    pub fn bic(&self, y: &Array1<f64>, mu: &Array1<f64>, p: usize) -> f64 {
        let k = self.n_parameters(p) as f64;
        let n = y.len() as f64;
        -2.0 * self.log_likelihood(y, mu) + n.ln() * k
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
