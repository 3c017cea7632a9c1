//! Core data structures for linmod
//!
//! This module provides the foundational data structures for statistical
//! modeling: typed one-dimensional columns and rectangular tables built
//! from them.

mod builder;
mod dataframe;
mod read;
mod series;


// Re-exports
pub use builder::DataFrameBuilder;
pub use dataframe::DataFrame;
pub use read::read_delimited;
pub use series::{Series, SeriesValue};

// Type aliases for common use cases
pub type FloatArray = ndarray::Array1<f64>;
pub type IntArray = ndarray::Array1<i64>;
pub type BoolArray = ndarray::Array1<bool>;
pub type StringArray = Vec<String>;
pub type Matrix = ndarray::Array2<f64>;

/// Error types specific to data operations
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Operation requires numeric data, got {0}")]
    NonNumericData(&'static str),

    #[error("Row {line} has {actual} fields, header has {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Input has no header row")]
    EmptyTable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;
