//! linmod-core: foundations for statistical model fitting
//!
//! This crate provides the data layer for the linmod workspace: typed
//! columnar data (`Series`, `DataFrame`), ingestion of delimited text files
//! with schema inference, contrast coding for categorical variables, and
//! R-style model formulas that compile down to numeric design matrices.

pub mod contrast;
pub mod data;
pub mod formula;

pub use contrast::{ContrastError, ContrastScheme};
pub use data::{DataError, DataFrame, DataFrameBuilder, Series};
pub use formula::{Design, Formula, FormulaError};
