//! Reading rectangular datasets from delimited text files
//!
//! The first row is the header. Column types are inferred from content:
//! a column where every field parses as `i64` becomes Int, every field as
//! `f64` becomes Float, every field is `true`/`false` becomes Bool, and
//! anything else becomes Categorical.

use std::fs;
use std::path::Path;

use ndarray::Array1;

use super::*;

/// Read a delimited text file into a DataFrame
///
/// `delimiter` is usually `','` or `'\t'`. Fields are trimmed of
/// surrounding whitespace; blank lines are skipped.
pub fn read_delimited<P: AsRef<Path>>(path: P, delimiter: char) -> Result<DataFrame> {
    let contents = fs::read_to_string(path)?;
    parse_delimited(&contents, delimiter)
}

fn parse_delimited(contents: &str, delimiter: char) -> Result<DataFrame> {
    let mut lines = contents
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(DataError::EmptyTable)?;
    let header: Vec<String> = header_line
        .split(delimiter)
        .map(|f| f.trim().to_string())
        .collect();
    let ncols = header.len();

    let mut fields: Vec<Vec<String>> = vec![Vec::new(); ncols];
    for (line_idx, line) in lines {
        let row: Vec<&str> = line.split(delimiter).map(str::trim).collect();
        if row.len() != ncols {
            return Err(DataError::RaggedRow {
                line: line_idx + 1,
                expected: ncols,
                actual: row.len(),
            });
        }
        for (col, value) in fields.iter_mut().zip(row) {
            col.push(value.to_string());
        }
    }

    let mut builder = DataFrameBuilder::new();
    for (name, values) in header.into_iter().zip(fields) {
        builder = builder.with_column(name, infer_series(&values))?;
    }
    Ok(builder.build())
}

/// Infer the narrowest series type that holds every value in the column
fn infer_series(values: &[String]) -> Series {
    if let Some(ints) = values
        .iter()
        .map(|v| v.parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()
    {
        return Series::Int(Array1::from(ints));
    }
    if let Some(floats) = values
        .iter()
        .map(|v| v.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()
    {
        return Series::Float(Array1::from(floats));
    }
    if values.iter().all(|v| v == "true" || v == "false") {
        let bools: Array1<bool> = values.iter().map(|v| v == "true").collect();
        return Series::Bool(bools);
    }
    Series::categorical(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_infers_column_types() {
        let text = "id,height,alive,group\n1,1.72,true,a\n2,1.81,false,b\n3,1.65,true,a\n";
        let df = parse_delimited(text, ',').unwrap();

        assert_eq!(df.shape(), (3, 4));
        assert_eq!(df.get_column("id").unwrap().dtype(), "int64");
        assert_eq!(df.get_column("height").unwrap().dtype(), "float64");
        assert_eq!(df.get_column("alive").unwrap().dtype(), "bool");
        assert_eq!(df.get_column("group").unwrap().dtype(), "categorical");
    }

    #[test]
    fn test_parse_integer_column_stays_int() {
        // "1" and "2" parse as floats too; Int must win
        let text = "x\n1\n2\n";
        let df = parse_delimited(text, ',').unwrap();
        assert_eq!(df.get_column("x").unwrap().dtype(), "int64");
    }

    #[test]
    fn test_parse_mixed_numeric_column_is_float() {
        let text = "x\n1\n2.5\n";
        let df = parse_delimited(text, ',').unwrap();
        assert_eq!(df.get_column("x").unwrap().dtype(), "float64");
    }

    #[test]
    fn test_parse_tab_delimited() {
        let text = "a\tb\n1.0\t2.0\n3.0\t4.0\n";
        let df = parse_delimited(text, '\t').unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "x,y\n1,2\n\n3,4\n\n";
        let df = parse_delimited(text, ',').unwrap();
        assert_eq!(df.nrows(), 2);
    }

    #[test]
    fn test_parse_ragged_row() {
        let text = "x,y\n1,2\n3\n";
        let err = parse_delimited(text, ',').unwrap_err();
        assert!(matches!(
            err,
            DataError::RaggedRow {
                line: 3,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            parse_delimited("", ','),
            Err(DataError::EmptyTable)
        ));
    }

    #[test]
    fn test_read_delimited_file() {
        let path = std::env::temp_dir().join("linmod_read_delimited_test.csv");
        fs::write(&path, "x,y\n1.5,2\n2.5,4\n").unwrap();

        let df = read_delimited(&path, ',').unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.get_column("x").unwrap().dtype(), "float64");
        assert_eq!(df.get_column("y").unwrap().dtype(), "int64");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = read_delimited("/nonexistent/linmod.csv", ',').unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    #[test]
    fn test_parse_missing_value_falls_back_to_categorical() {
        let text = "x\n1.0\nNA\n3.0\n";
        let df = parse_delimited(text, ',').unwrap();
        // the NA field does not parse as a number, so the column is
        // categorical rather than silently imputed
        assert_eq!(df.get_column("x").unwrap().dtype(), "categorical");
    }
}
