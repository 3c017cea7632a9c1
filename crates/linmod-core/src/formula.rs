//! Model formulas and design matrix construction
//!
//! Formulas use the R-style additive syntax this workspace needs:
//! `y ~ x1 + x2`, with `y ~ 0 + x` suppressing the intercept and
//! `y ~ 1` denoting the intercept-only model. Categorical terms are
//! expanded into numeric columns through a [`ContrastScheme`].

use std::str::FromStr;

use ndarray::Array2;

use crate::contrast::ContrastScheme;
use crate::data::{DataFrame, FloatArray, Matrix, Series};

pub mod error;
mod parser;

#[cfg(test)]
mod tests;

pub use error::{FormulaError, FormulaResult};
pub use parser::FormulaParser;

/// A parsed formula specifying a statistical model
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// Response variable (left-hand side)
    pub response: String,
    /// Additive terms on the right-hand side
    pub terms: Vec<String>,
    /// Whether to include an intercept
    pub has_intercept: bool,
}

/// A design matrix with its response vector and column names
#[derive(Debug, Clone)]
pub struct Design {
    /// Predictor matrix, one row per observation
    pub matrix: Matrix,
    /// Response vector
    pub response: FloatArray,
    /// Names of the predictor columns, in matrix order
    pub column_names: Vec<String>,
}

impl Formula {
    /// Parse a formula from a string
    pub fn parse(formula: &str) -> FormulaResult<Self> {
        FormulaParser::parse(formula)
    }

    /// Construct a formula directly from its parts
    ///
    /// Used by programmatic callers such as stepwise selection, where
    /// formulas are assembled rather than typed.
    pub fn from_parts<S: Into<String>>(
        response: impl Into<String>,
        terms: impl IntoIterator<Item = S>,
        has_intercept: bool,
    ) -> Self {
        Self {
            response: response.into(),
            terms: terms.into_iter().map(Into::into).collect(),
            has_intercept,
        }
    }

    /// All variable names mentioned in the formula, response first
    pub fn variables(&self) -> Vec<&str> {
        let mut vars = vec![self.response.as_str()];
        vars.extend(self.terms.iter().map(String::as_str));
        vars
    }

    /// Build the design matrix and response vector from a DataFrame
    pub fn design_matrix(&self, df: &DataFrame, contrasts: ContrastScheme) -> FormulaResult<Design> {
        let series = df
            .get_column(&self.response)
            .ok_or_else(|| FormulaError::variable_not_found(&self.response, &df.column_names()))?;
        let response = series.to_float().map_err(|_| FormulaError::TypeMismatch {
            variable: self.response.clone(),
            expected_type: "numeric",
            actual_type: series.dtype().to_string(),
        })?;

        let (matrix, column_names) = self.predictor_matrix(df, contrasts)?;
        Ok(Design {
            matrix,
            response,
            column_names,
        })
    }

    /// Build only the predictor matrix, for prediction on new data
    pub fn predictor_matrix(
        &self,
        df: &DataFrame,
        contrasts: ContrastScheme,
    ) -> FormulaResult<(Matrix, Vec<String>)> {
        let n = df.nrows();
        let mut columns: Vec<(String, FloatArray)> = Vec::new();

        if self.has_intercept {
            columns.push(("(Intercept)".to_string(), FloatArray::ones(n)));
        }

        for term in &self.terms {
            let series = df
                .get_column(term)
                .ok_or_else(|| FormulaError::variable_not_found(term, &df.column_names()))?;

            match series {
                Series::Float(_) | Series::Int(_) | Series::Bool(_) => {
                    let values = series.to_float()?;
                    columns.push((term.clone(), values));
                }
                Series::Categorical(codes, levels) => {
                    let coding = contrasts.matrix(levels.len())?;
                    let labels = contrasts.column_labels(levels);
                    for (j, label) in labels.iter().enumerate() {
                        let col: FloatArray =
                            codes.mapv(|code| coding[(code as usize, j)]);
                        columns.push((format!("{}[{}]", term, label), col));
                    }
                }
                Series::String(_) => {
                    return Err(FormulaError::TypeMismatch {
                        variable: term.clone(),
                        expected_type: "numeric or categorical",
                        actual_type: "string".to_string(),
                    });
                }
            }
        }

        let mut matrix = Array2::zeros((n, columns.len()));
        let mut names = Vec::with_capacity(columns.len());
        for (j, (name, values)) in columns.into_iter().enumerate() {
            matrix.column_mut(j).assign(&values);
            names.push(name);
        }

        Ok((matrix, names))
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> FormulaResult<Self> {
        Formula::parse(s)
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ~ ", self.response)?;

        if self.terms.is_empty() {
            return write!(f, "{}", if self.has_intercept { "1" } else { "0" });
        }

        if !self.has_intercept {
            write!(f, "0 + ")?;
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}
