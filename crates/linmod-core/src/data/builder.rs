//! Builder for constructing DataFrames

use indexmap::IndexMap;

use super::*;

/// Builder for creating DataFrames
///
/// Enforces the schema invariant up front: every column must have the same
/// length, and names must be unique.
pub struct DataFrameBuilder {
    columns: IndexMap<String, Series>,
    nrows: Option<usize>,
}

impl DataFrameBuilder {
    /// Create a new DataFrameBuilder
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
            nrows: None,
        }
    }

    /// Add a column to the DataFrame
    pub fn with_column<S: Into<String>>(mut self, name: S, series: Series) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        match self.nrows {
            Some(n) if series.len() != n => {
                return Err(DataError::DimensionMismatch {
                    expected: format!("{} rows", n),
                    actual: format!("{} rows", series.len()),
                });
            }
            None => self.nrows = Some(series.len()),
            _ => {}
        }

        self.columns.insert(name, series);
        Ok(self)
    }

    /// Build the DataFrame
    pub fn build(self) -> DataFrame {
        DataFrame {
            nrows: self.nrows.unwrap_or(0),
            columns: self.columns,
        }
    }
}

impl Default for DataFrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}
