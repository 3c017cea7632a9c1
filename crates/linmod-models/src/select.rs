//! Greedy stepwise model selection by AIC
//!
//! Forward selection grows from the intercept-only model; backward
//! elimination shrinks from the full model. A step is taken only when it
//! lowers AIC by more than the configured threshold, and candidates are
//! always scanned in the caller's order, so the search is deterministic
//! and ties go to the first-encountered candidate.

use linmod_core::contrast::ContrastScheme;
use linmod_core::data::DataFrame;
use linmod_core::formula::Formula;

use crate::error::Result;
use crate::family::Family;
use crate::fit::{FitConfig, FittedModel, ModelSpec};

/// Search direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Start from the intercept-only model, adding one term per step
    #[default]
    Forward,
    /// Start from the full model, removing one term per step
    Backward,
}

/// Configuration for a stepwise search, passed explicitly per call
#[derive(Debug, Clone, Copy)]
pub struct StepwiseConfig {
    /// Minimum AIC decrease required to take a step
    pub min_improvement: f64,
    /// Response family for every candidate fit
    pub family: Family,
    /// Contrast scheme for categorical terms
    pub contrasts: ContrastScheme,
    /// Fitting configuration for every candidate fit
    pub fit: FitConfig,
}

impl Default for StepwiseConfig {
    fn default() -> Self {
        Self {
            min_improvement: 1e-6,
            family: Family::default(),
            contrasts: ContrastScheme::default(),
            fit: FitConfig::default(),
        }
    }
}

/// A stepwise model search over a fixed candidate set
#[derive(Debug, Clone)]
pub struct StepwiseSelection {
    response: String,
    candidates: Vec<String>,
    direction: Direction,
    config: StepwiseConfig,
}

impl StepwiseSelection {
    /// Create a search for `response` over the given candidate predictors
    ///
    /// Candidate order matters: it is the tie-break order.
    pub fn new<S: Into<String>>(
        response: impl Into<String>,
        candidates: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            response: response.into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
            direction: Direction::default(),
            config: StepwiseConfig::default(),
        }
    }

    /// Set the search direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the search configuration
    pub fn config(mut self, config: StepwiseConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the search and return the selected model
    pub fn select(&self, df: &DataFrame) -> Result<FittedModel> {
        match self.direction {
            Direction::Forward => self.forward(df),
            Direction::Backward => self.backward(df),
        }
    }

    fn forward(&self, df: &DataFrame) -> Result<FittedModel> {
        let mut terms: Vec<String> = Vec::new();
        let mut current = self.fit_terms(df, &terms)?;

        loop {
            let mut best: Option<(String, FittedModel)> = None;

            for candidate in &self.candidates {
                if terms.contains(candidate) {
                    continue;
                }

                let mut trial_terms = terms.clone();
                trial_terms.push(candidate.clone());

                // a candidate that cannot be fitted (e.g. collinear with the
                // current terms) is simply never selected
                let Ok(trial) = self.fit_terms(df, &trial_terms) else {
                    continue;
                };

                if best.as_ref().map_or(true, |(_, b)| trial.aic() < b.aic()) {
                    best = Some((candidate.clone(), trial));
                }
            }

            match best {
                Some((candidate, model))
                    if model.aic() < current.aic() - self.config.min_improvement =>
                {
                    terms.push(candidate);
                    current = model;
                }
                _ => return Ok(current),
            }
        }
    }

    fn backward(&self, df: &DataFrame) -> Result<FittedModel> {
        let mut terms = self.candidates.clone();
        let mut current = self.fit_terms(df, &terms)?;

        loop {
            let mut best: Option<(usize, FittedModel)> = None;

            for idx in 0..terms.len() {
                let mut trial_terms = terms.clone();
                trial_terms.remove(idx);

                let Ok(trial) = self.fit_terms(df, &trial_terms) else {
                    continue;
                };

                if best.as_ref().map_or(true, |(_, b)| trial.aic() < b.aic()) {
                    best = Some((idx, trial));
                }
            }

            match best {
                Some((idx, model))
                    if model.aic() < current.aic() - self.config.min_improvement =>
                {
                    terms.remove(idx);
                    current = model;
                }
                _ => return Ok(current),
            }
        }
    }

    fn fit_terms(&self, df: &DataFrame, terms: &[String]) -> Result<FittedModel> {
        let formula = Formula::from_parts(&self.response, terms.iter().cloned(), true);
        ModelSpec::from_formula(formula)
            .family(self.config.family)
            .contrasts(self.config.contrasts)
            .config(self.config.fit)
            .fit(df)
    }
}
