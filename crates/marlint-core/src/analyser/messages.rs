//! Diagnostic message templates.
//!
//! Kept in one place so the exact wording stays stable; tests assert on
//! these strings.

use crate::types::DbType;

fn format_column(column: &str, table: Option<&str>) -> String {
    match table {
        Some(table) => format!("{table}.{column}"),
        None => String::from(column),
    }
}

pub(crate) fn unknown_column(column: &str, table: Option<&str>) -> String {
    format!("Unknown column '{}'", format_column(column, table))
}

pub(crate) fn not_unique_table_alias(table: &str) -> String {
    format!("Not unique table/alias: '{table}'")
}

pub(crate) fn table_doesnt_exist(table: &str) -> String {
    format!("Table '{table}' doesn't exist")
}

pub(crate) fn ambiguous_column(column: &str, table: Option<&str>) -> String {
    format!("Ambiguous column '{}'", format_column(column, table))
}

pub(crate) fn duplicate_column_name(column: &str) -> String {
    format!("Duplicate column name '{column}'")
}

pub(crate) fn invalid_tuple_usage(tuple: &DbType) -> String {
    format!("Expected single value, got {tuple}")
}

pub(crate) fn invalid_binary_op(operator: &str, left: &DbType, right: &DbType) -> String {
    format!(
        "Operator {operator} cannot be used between {} and {}",
        left.kind_str(),
        right.kind_str()
    )
}

pub(crate) fn invalid_like_usage(
    expression: &DbType,
    pattern: &DbType,
    escape: Option<&DbType>,
) -> String {
    let suffix = escape.map_or_else(String::new, |e| format!(" ESCAPE {}", e.kind_str()));
    format!(
        "Operator LIKE cannot be used as: {} LIKE {}{suffix}",
        expression.kind_str(),
        pattern.kind_str()
    )
}

pub(crate) fn invalid_like_escape(escape: &str) -> String {
    format!("ESCAPE can only be single character. Got '{escape}'.")
}

pub(crate) fn different_number_of_columns(left: usize, right: usize) -> String {
    format!("The used SELECT statements have a different number of columns: {left} vs {right}.")
}

pub(crate) fn different_number_of_with_columns(column_list: usize, query: usize) -> String {
    format!(
        "Column list of WITH and the subquery have to have the same number of columns. \
         Got {column_list} vs {query}."
    )
}

pub(crate) fn invalid_function_argument(
    function: &str,
    position: usize,
    argument: &DbType,
) -> String {
    format!("Function {function} does not accept {argument} as argument {position}.")
}

pub(crate) fn mismatched_function_arguments(
    function: &str,
    given: usize,
    min: usize,
    max: usize,
) -> String {
    let accepted = if min == max {
        min.to_string()
    } else {
        format!("{min} - {max}")
    };
    format!("Function {function} requires {accepted} arguments, {given} given.")
}

pub(crate) fn invalid_tuple_comparison(left: &DbType, right: &DbType) -> String {
    format!("Invalid comparison between {left} and {right}")
}

pub(crate) fn mismatched_insert_column_count(expected: usize, got: usize) -> String {
    format!("Insert expected {expected} columns, but got {got} columns.")
}
