//! Model-related error types

use thiserror::Error;

use linmod_core::data::DataError;
use linmod_core::formula::FormulaError;

/// Model-related errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Formula parsing or evaluation error
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    /// Data-related error
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Insufficient data for model fitting
    #[error("Not enough data: {n_samples} samples for {n_predictors} predictors")]
    InsufficientData {
        /// Number of samples
        n_samples: usize,
        /// Number of predictors (including intercept)
        n_predictors: usize,
    },

    /// Rank-deficient design matrix
    #[error("Singular design matrix: predictors are collinear")]
    SingularMatrix,

    /// Iterative fitting failed to converge
    #[error("Failed to converge after {max_iter} iterations")]
    NotConverged {
        /// Maximum number of iterations attempted
        max_iter: usize,
    },

    /// Response value outside the family's domain
    #[error("Response value {value} is outside the domain of the {family} family")]
    InvalidResponse {
        /// Family name
        family: &'static str,
        /// Offending value
        value: f64,
    },

    /// Models cannot be compared by likelihood ratio
    #[error("Models are not comparable: {reason}")]
    IncomparableModels {
        /// Why the comparison is invalid
        reason: String,
    },

    /// Numerical computation error
    #[error("Numerical error: {message} (operation: {operation})")]
    NumericalError {
        /// Error message
        message: String,
        /// Operation that failed
        operation: String,
    },

    /// Invalid model configuration
    #[error("Invalid model configuration: {message}")]
    InvalidConfig {
        /// Configuration error message
        message: String,
    },

    /// Prediction error
    #[error("Prediction error: {message}")]
    PredictionError {
        /// Prediction error message
        message: String,
    },
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
