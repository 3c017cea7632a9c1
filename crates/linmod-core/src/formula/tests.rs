//! Tests for formula parsing and design matrix construction

use approx::assert_abs_diff_eq;

use super::*;
use crate::data::{DataFrameBuilder, Series};

fn frame_with_group() -> DataFrame {
    DataFrameBuilder::new()
        .with_column("y", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
        .unwrap()
        .with_column("x", Series::float(vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0]))
        .unwrap()
        .with_column("group", Series::categorical(&["a", "b", "c", "a", "b", "c"]))
        .unwrap()
        .with_column("label", Series::string(vec!["p".into(), "q".into(), "r".into(), "p".into(), "q".into(), "r".into()]))
        .unwrap()
        .build()
}

// ==================== Parsing ====================

#[test]
fn test_parse_simple_formula() {
    let f = Formula::parse("y ~ x1 + x2").unwrap();
    assert_eq!(f.response, "y");
    assert_eq!(f.terms, vec!["x1", "x2"]);
    assert!(f.has_intercept);
}

#[test]
fn test_parse_no_intercept() {
    let f = Formula::parse("y ~ 0 + x").unwrap();
    assert!(!f.has_intercept);
    assert_eq!(f.terms, vec!["x"]);
}

#[test]
fn test_parse_intercept_only() {
    let f = Formula::parse("y ~ 1").unwrap();
    assert!(f.has_intercept);
    assert!(f.terms.is_empty());
}

#[test]
fn test_parse_explicit_intercept_with_terms() {
    let f = Formula::parse("y ~ 1 + x").unwrap();
    assert!(f.has_intercept);
    assert_eq!(f.terms, vec!["x"]);
}

#[test]
fn test_parse_dotted_identifiers() {
    let f = Formula::parse("resp.rate ~ body_mass + age.years").unwrap();
    assert_eq!(f.response, "resp.rate");
    assert_eq!(f.terms, vec!["body_mass", "age.years"]);
}

#[test]
fn test_parse_deduplicates_terms() {
    let f = Formula::parse("y ~ x + x").unwrap();
    assert_eq!(f.terms, vec!["x"]);
}

#[test]
fn test_parse_missing_response() {
    assert!(matches!(
        Formula::parse("~ x"),
        Err(FormulaError::MissingResponse)
    ));
}

#[test]
fn test_parse_syntax_errors() {
    assert!(matches!(
        Formula::parse(""),
        Err(FormulaError::Syntax { .. })
    ));
    assert!(matches!(
        Formula::parse("y ~"),
        Err(FormulaError::Syntax { .. })
    ));
    assert!(matches!(
        Formula::parse("y ~ x +"),
        Err(FormulaError::Syntax { .. })
    ));
    assert!(matches!(
        Formula::parse("y x"),
        Err(FormulaError::Syntax { .. })
    ));
    assert!(matches!(
        Formula::parse("y ~ x z"),
        Err(FormulaError::Syntax { .. })
    ));
    assert!(matches!(
        Formula::parse("y ~ 0 x"),
        Err(FormulaError::Syntax { .. })
    ));
}

#[test]
fn test_display_round_trip() {
    for text in ["y ~ x1 + x2", "y ~ 0 + x", "y ~ 1"] {
        let f = Formula::parse(text).unwrap();
        assert_eq!(f.to_string(), text);
        assert_eq!(Formula::parse(&f.to_string()).unwrap(), f);
    }
}

#[test]
fn test_from_parts_matches_parsed() {
    let built = Formula::from_parts("y", ["x1", "x2"], true);
    let parsed = Formula::parse("y ~ x1 + x2").unwrap();
    assert_eq!(built, parsed);
}

// ==================== Design matrices ====================

#[test]
fn test_design_matrix_numeric() {
    let df = frame_with_group();
    let design = Formula::parse("y ~ x")
        .unwrap()
        .design_matrix(&df, ContrastScheme::Treatment)
        .unwrap();

    assert_eq!(design.matrix.dim(), (6, 2));
    assert_eq!(design.column_names, vec!["(Intercept)", "x"]);
    assert_abs_diff_eq!(design.matrix[(0, 0)], 1.0);
    assert_abs_diff_eq!(design.matrix[(2, 1)], 1.5);
    assert_abs_diff_eq!(design.response[5], 6.0);
}

#[test]
fn test_design_matrix_no_intercept() {
    let df = frame_with_group();
    let design = Formula::parse("y ~ 0 + x")
        .unwrap()
        .design_matrix(&df, ContrastScheme::Treatment)
        .unwrap();

    assert_eq!(design.matrix.dim(), (6, 1));
    assert_eq!(design.column_names, vec!["x"]);
}

#[test]
fn test_design_matrix_expands_categorical() {
    let df = frame_with_group();
    let design = Formula::parse("y ~ group")
        .unwrap()
        .design_matrix(&df, ContrastScheme::Treatment)
        .unwrap();

    // 3 levels -> intercept + 2 contrast columns
    assert_eq!(design.matrix.dim(), (6, 3));
    assert_eq!(
        design.column_names,
        vec!["(Intercept)", "group[b]", "group[c]"]
    );

    // rows 0 and 3 are level "a", the reference
    assert_abs_diff_eq!(design.matrix[(0, 1)], 0.0);
    assert_abs_diff_eq!(design.matrix[(0, 2)], 0.0);
    // row 1 is level "b"
    assert_abs_diff_eq!(design.matrix[(1, 1)], 1.0);
    assert_abs_diff_eq!(design.matrix[(1, 2)], 0.0);
    // row 2 is level "c"
    assert_abs_diff_eq!(design.matrix[(2, 1)], 0.0);
    assert_abs_diff_eq!(design.matrix[(2, 2)], 1.0);
}

#[test]
fn test_design_matrix_sum_coding() {
    let df = frame_with_group();
    let design = Formula::parse("y ~ group")
        .unwrap()
        .design_matrix(&df, ContrastScheme::Sum)
        .unwrap();

    assert_eq!(
        design.column_names,
        vec!["(Intercept)", "group[a]", "group[b]"]
    );
    // level "c" (last) encodes to -1 in every contrast column
    assert_abs_diff_eq!(design.matrix[(2, 1)], -1.0);
    assert_abs_diff_eq!(design.matrix[(2, 2)], -1.0);
}

#[test]
fn test_design_matrix_unknown_variable() {
    let df = frame_with_group();
    let err = Formula::parse("y ~ nope")
        .unwrap()
        .design_matrix(&df, ContrastScheme::Treatment)
        .unwrap_err();
    assert!(matches!(
        err,
        FormulaError::VariableNotFound { variable, .. } if variable == "nope"
    ));
}

#[test]
fn test_design_matrix_string_term_rejected() {
    let df = frame_with_group();
    let err = Formula::parse("y ~ label")
        .unwrap()
        .design_matrix(&df, ContrastScheme::Treatment)
        .unwrap_err();
    assert!(matches!(err, FormulaError::TypeMismatch { .. }));
}

#[test]
fn test_design_matrix_non_numeric_response_rejected() {
    let df = frame_with_group();
    let err = Formula::parse("group ~ x")
        .unwrap()
        .design_matrix(&df, ContrastScheme::Treatment)
        .unwrap_err();
    assert!(matches!(
        err,
        FormulaError::TypeMismatch { variable, .. } if variable == "group"
    ));
}

#[test]
fn test_predictor_matrix_without_response_column() {
    // new data for prediction carries no response column
    let new_df = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![10.0, 20.0]))
        .unwrap()
        .build();

    let (matrix, names) = Formula::parse("y ~ x")
        .unwrap()
        .predictor_matrix(&new_df, ContrastScheme::Treatment)
        .unwrap();

    assert_eq!(matrix.dim(), (2, 2));
    assert_eq!(names, vec!["(Intercept)", "x"]);
}
