use marlint_core::parser::{parse_expression, parse_select, parse_statement, ParseError};

fn unexpected(sql: &str) -> ParseError {
    let err = parse_statement(sql).unwrap_err();
    assert!(
        matches!(err, ParseError::Unexpected { .. }),
        "expected a grammar error for: {sql}\nGot: {err:?}"
    );
    err
}

#[test]
fn test_missing_select_expression() {
    let err = unexpected("SELECT FROM t");
    assert_eq!(
        err.to_string(),
        "Expected an expression, found keyword FROM at 1:8"
    );
}

#[test]
fn test_trailing_tokens_rejected() {
    let err = unexpected("SELECT 1 2");
    assert!(err.to_string().contains("found integer 2"));
    assert!(parse_statement("SELECT 1;").is_ok());
    assert!(parse_statement("SELECT 1; SELECT 2").is_err());
}

#[test]
fn test_truncated_input() {
    for sql in ["SELECT 1 FROM", "SELECT 1 +", "SELECT 1 WHERE", "SELECT"] {
        let err = unexpected(sql);
        assert!(
            err.to_string().contains("end of input"),
            "for {sql}: {err}"
        );
    }
}

#[test]
fn test_error_position_reports_line_and_column() {
    let err = unexpected("SELECT id,\n FROM t");
    assert!(err.to_string().ends_with("at 2:2"), "got: {err}");
}

#[test]
fn test_unterminated_string_is_a_lex_error() {
    let err = parse_expression("'abc").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
}

#[test]
fn test_statement_dispatch() {
    let err = unexpected("EXPLAIN SELECT 1");
    assert!(err
        .to_string()
        .starts_with("Expected a SELECT, INSERT, UPDATE or DELETE statement"));
}

#[test]
fn test_outer_join_requires_a_condition() {
    assert!(parse_select("SELECT 1 FROM a LEFT JOIN b ON a.id = b.id").is_ok());
    assert!(parse_select("SELECT 1 FROM a LEFT JOIN b").is_err());
    assert!(parse_select("SELECT 1 FROM a RIGHT JOIN b").is_err());
    // plain joins can go without one
    assert!(parse_select("SELECT 1 FROM a JOIN b").is_ok());
}

#[test]
fn test_derived_table_requires_an_alias() {
    assert!(parse_select("SELECT 1 FROM (SELECT 1) t").is_ok());
    assert!(parse_select("SELECT 1 FROM (SELECT 1)").is_err());
}

#[test]
fn test_reserved_word_cannot_be_an_alias() {
    assert!(parse_select("SELECT 1 AS from").is_err());
    assert!(parse_select("SELECT 1 FROM t AS select").is_err());
}

#[test]
fn test_out_of_range_literals() {
    let err = parse_expression("0xFFFFFFFFFFFFFFFFFF").unwrap_err();
    assert!(err.to_string().contains("within the 64-bit range"));
    assert!(parse_expression("0xFF").is_ok());
}
