//! Formula-specific error types

use thiserror::Error;

use crate::contrast::ContrastError;
use crate::data::DataError;

/// Errors that can occur during formula parsing and evaluation
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Syntax errors in the formula string
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Variable not found in the DataFrame
    #[error("Variable '{variable}' not found. Available variables: {available_vars:?}")]
    VariableNotFound {
        variable: String,
        available_vars: Vec<String>,
    },

    /// Variable type mismatch
    #[error("Variable '{variable}' has type {actual_type}, but {expected_type} was expected")]
    TypeMismatch {
        variable: String,
        expected_type: &'static str,
        actual_type: String,
    },

    /// Formula has no response variable
    #[error("Response variable is required but not provided")]
    MissingResponse,

    /// Contrast coding failed for a categorical term
    #[error("Contrast error: {0}")]
    Contrast(#[from] ContrastError),

    /// Data-related errors that bubble up from the data layer
    #[error("Data error in formula evaluation: {0}")]
    Data(#[from] DataError),
}

/// Result type alias for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

impl FormulaError {
    /// Create a syntax error
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        FormulaError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Create a variable not found error
    pub fn variable_not_found(variable: &str, available_vars: &[&str]) -> Self {
        FormulaError::VariableNotFound {
            variable: variable.to_string(),
            available_vars: available_vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}
