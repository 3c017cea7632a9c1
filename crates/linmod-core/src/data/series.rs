//! Series data structure for holding homogeneous data
//!
//! A Series is a one-dimensional array holding data of a single type.
//! It is the building block of DataFrames.

use super::*;

use ndarray::Array1;

/// A Series is a typed, one-dimensional array of data
#[derive(Clone, Debug, PartialEq)]
pub enum Series {
    /// Floating point numbers (f64)
    Float(FloatArray),
    /// Integer numbers (i64)
    Int(IntArray),
    /// Boolean values
    Bool(BoolArray),
    /// String values
    String(StringArray),
    /// Categorical data, stored as level codes plus the sorted level set
    Categorical(Array1<u32>, Vec<String>),
}

impl Series {
    /// Create a new Float series
    pub fn float(data: impl Into<FloatArray>) -> Self {
        Series::Float(data.into())
    }

    /// Create a new Int series
    pub fn int(data: impl Into<IntArray>) -> Self {
        Series::Int(data.into())
    }

    /// Create a new Bool series
    pub fn bool(data: impl Into<BoolArray>) -> Self {
        Series::Bool(data.into())
    }

    /// Create a new String series
    pub fn string(data: impl Into<StringArray>) -> Self {
        Series::String(data.into())
    }

    /// Create a new Categorical series
    ///
    /// Levels are the sorted distinct values, so the encoding does not
    /// depend on the order observations arrive in.
    pub fn categorical<T: AsRef<str>>(data: &[T]) -> Self {
        let mut levels: Vec<String> = data
            .iter()
            .map(|s| s.as_ref().to_string())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        levels.sort();

        let codes: Array1<u32> = data
            .iter()
            .map(|s| {
                levels
                    .iter()
                    .position(|l| l == s.as_ref())
                    .expect("value is one of its own distinct levels") as u32
            })
            .collect();

        Series::Categorical(codes, levels)
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        match self {
            Series::Float(arr) => arr.len(),
            Series::Int(arr) => arr.len(),
            Series::Bool(arr) => arr.len(),
            Series::String(arr) => arr.len(),
            Series::Categorical(arr, _) => arr.len(),
        }
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name of the series
    pub fn dtype(&self) -> &'static str {
        match self {
            Series::Float(_) => "float64",
            Series::Int(_) => "int64",
            Series::Bool(_) => "bool",
            Series::String(_) => "string",
            Series::Categorical(_, _) => "categorical",
        }
    }

    /// Get a value at index
    pub fn get(&self, idx: usize) -> Option<SeriesValue> {
        if idx >= self.len() {
            return None;
        }

        match self {
            Series::Float(arr) => arr.get(idx).map(|&v| SeriesValue::Float(v)),
            Series::Int(arr) => arr.get(idx).map(|&v| SeriesValue::Int(v)),
            Series::Bool(arr) => arr.get(idx).map(|&v| SeriesValue::Bool(v)),
            Series::String(arr) => arr.get(idx).map(|v| SeriesValue::String(v.clone())),
            Series::Categorical(arr, levels) => arr
                .get(idx)
                .and_then(|&code| levels.get(code as usize))
                .map(|level| SeriesValue::String(level.clone())),
        }
    }

    /// Level set of a categorical series
    pub fn levels(&self) -> Option<&[String]> {
        match self {
            Series::Categorical(_, levels) => Some(levels),
            _ => None,
        }
    }

    /// Convert to a float array if the series is numeric
    ///
    /// Categorical and string data are rejected: expanding them into numeric
    /// predictors is the job of contrast coding, not a cast.
    pub fn to_float(&self) -> Result<FloatArray> {
        match self {
            Series::Float(arr) => Ok(arr.clone()),
            Series::Int(arr) => Ok(arr.mapv(|v| v as f64)),
            Series::Bool(arr) => Ok(arr.mapv(|v| if v { 1.0 } else { 0.0 })),
            Series::Categorical(_, _) => Err(DataError::NonNumericData("categorical")),
            Series::String(_) => Err(DataError::NonNumericData("string")),
        }
    }

    /// Filter the series with a boolean mask
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.len()),
                actual: format!("mask length {}", mask.len()),
            });
        }

        fn keep<'a, T: Clone + 'a>(
            values: impl Iterator<Item = &'a T>,
            mask: &[bool],
        ) -> Vec<T> {
            values
                .zip(mask.iter())
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| v.clone())
                .collect()
        }

        match self {
            Series::Float(arr) => Ok(Series::Float(Array1::from(keep(arr.iter(), mask)))),
            Series::Int(arr) => Ok(Series::Int(Array1::from(keep(arr.iter(), mask)))),
            Series::Bool(arr) => Ok(Series::Bool(Array1::from(keep(arr.iter(), mask)))),
            Series::String(arr) => Ok(Series::String(keep(arr.iter(), mask))),
            Series::Categorical(arr, levels) => Ok(Series::Categorical(
                Array1::from(keep(arr.iter(), mask)),
                levels.clone(),
            )),
        }
    }
}

/// Enum for type-safe value access
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    String(String),
}

impl std::fmt::Display for SeriesValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesValue::Float(v) => write!(f, "{}", v),
            SeriesValue::Int(v) => write!(f, "{}", v),
            SeriesValue::Bool(v) => write!(f, "{}", v),
            SeriesValue::String(v) => write!(f, "{}", v),
        }
    }
}
