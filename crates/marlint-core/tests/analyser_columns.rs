mod common;

use common::*;
use marlint_core::types::DbType;

// ===== Result set shape =====

#[test]
fn test_columns_named_and_typed_from_schema() {
    let cols = columns("SELECT id, name FROM users");
    assert_eq!(cols.len(), 2);
    assert_eq!(cols[0].name, "id");
    assert_eq!(cols[0].db_type, DbType::Int);
    assert!(!cols[0].nullable);
    assert_eq!(cols[1].name, "name");
    assert_eq!(cols[1].db_type, DbType::Varchar);
}

#[test]
fn test_alias_names_the_column() {
    let cols = columns("SELECT id AS user_id FROM users");
    assert_eq!(cols[0].name, "user_id");
}

#[test]
fn test_unaliased_expression_is_named_verbatim() {
    let cols = columns("SELECT id + 1 FROM users");
    assert_eq!(cols[0].name, "id + 1");

    let cols = columns("SELECT COUNT(*) FROM users");
    assert_eq!(cols[0].name, "COUNT(*)");
}

#[test]
fn test_star_expansion() {
    let cols = columns("SELECT * FROM users");
    let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "name", "email", "created_at"]);
    assert!(cols[2].nullable);
    assert!(!cols[3].nullable);
}

#[test]
fn test_qualified_star() {
    let cols = columns("SELECT o.*, u.id FROM users u, orders o");
    let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "user_id", "total", "note", "id"]);
}

#[test]
fn test_star_across_join_follows_from_order() {
    let cols = columns("SELECT * FROM users u, orders o");
    assert_eq!(cols.len(), 8);
    assert_eq!(cols[0].name, "id");
    assert_eq!(cols[4].name, "id");
}

#[test]
fn test_star_without_from() {
    assert_eq!(diagnostics("SELECT *"), ["Unknown column '*'"]);
}

// ===== Column resolution =====

#[test]
fn test_unknown_column() {
    assert_eq!(diagnostics("SELECT missing FROM users"), [
        "Unknown column 'missing'"
    ]);
    assert_eq!(diagnostics("SELECT u.missing FROM users u"), [
        "Unknown column 'u.missing'"
    ]);
    assert_eq!(diagnostics("SELECT x.id FROM users u"), [
        "Unknown column 'x.id'"
    ]);
}

#[test]
fn test_alias_replaces_table_name() {
    assert_eq!(diagnostics("SELECT users.id FROM users u"), [
        "Unknown column 'users.id'"
    ]);
}

#[test]
fn test_ambiguous_column() {
    assert_eq!(diagnostics("SELECT id FROM users, orders"), [
        "Ambiguous column 'id'"
    ]);
    // a qualifier settles it
    assert!(diagnostics("SELECT users.id FROM users, orders").is_empty());
    // so does a column living in only one table
    assert!(diagnostics("SELECT email, total FROM users, orders").is_empty());
}

#[test]
fn test_table_doesnt_exist() {
    assert_eq!(diagnostics("SELECT id FROM missing"), [
        "Table 'missing' doesn't exist"
    ]);
}

#[test]
fn test_duplicate_table_alias() {
    assert_eq!(diagnostics("SELECT 1 FROM users, users"), [
        "Not unique table/alias: 'users'"
    ]);
    assert_eq!(diagnostics("SELECT 1 FROM users u, orders u"), [
        "Not unique table/alias: 'u'"
    ]);
    // distinct aliases over the same table are fine
    assert!(diagnostics("SELECT a.id, b.id FROM users a, users b").is_empty());
}

#[test]
fn test_using_condition_columns_must_resolve() {
    assert!(diagnostics("SELECT 1 FROM users u JOIN orders o USING (id)").is_empty());
    assert_eq!(
        diagnostics("SELECT 1 FROM users u JOIN orders o USING (missing)"),
        ["Unknown column 'missing'"]
    );
}

// ===== Subqueries and correlation =====

#[test]
fn test_correlated_subquery_sees_outer_scope() {
    let cols =
        columns("SELECT (SELECT o.total FROM orders o WHERE o.user_id = u.id) FROM users u");
    assert_eq!(cols[0].db_type, DbType::Decimal);
    // a scalar subquery can come back empty
    assert!(cols[0].nullable);
}

#[test]
fn test_derived_table() {
    let cols = columns("SELECT t.uid FROM (SELECT id AS uid FROM users) t");
    assert_eq!(cols[0].name, "uid");
    assert_eq!(cols[0].db_type, DbType::Int);
}

#[test]
fn test_derived_table_rejects_duplicate_columns() {
    assert_eq!(
        diagnostics("SELECT 1 FROM (SELECT id, id FROM users) t"),
        ["Duplicate column name 'id'"]
    );
}

#[test]
fn test_derived_table_columns_do_not_leak() {
    assert_eq!(
        diagnostics("SELECT name FROM (SELECT id FROM users) t"),
        ["Unknown column 'name'"]
    );
}

// ===== Select aliases in later clauses =====

#[test]
fn test_select_alias_visible_to_group_by_and_friends() {
    assert!(diagnostics(
        "SELECT id AS x FROM users GROUP BY x HAVING x > 1 ORDER BY x"
    )
    .is_empty());
}

#[test]
fn test_schema_column_wins_over_alias_in_where() {
    // WHERE runs before the select list; the alias is not visible there
    assert_eq!(diagnostics("SELECT id AS x FROM users WHERE x = 1"), [
        "Unknown column 'x'"
    ]);
}

// ===== Compound selects =====

#[test]
fn test_union_takes_names_from_the_first_select() {
    let cols = columns("SELECT id FROM users UNION SELECT user_id FROM orders");
    assert_eq!(cols.len(), 1);
    assert_eq!(cols[0].name, "id");
    assert_eq!(cols[0].db_type, DbType::Int);
    assert!(!cols[0].nullable);
}

#[test]
fn test_union_nullable_when_either_side_is() {
    let result = analyse("SELECT email FROM users UNION SELECT name FROM users");
    let cols = result.columns.unwrap();
    assert!(cols[0].nullable);
}

#[test]
fn test_union_column_count_mismatch() {
    assert_eq!(
        diagnostics("SELECT id, name FROM users UNION SELECT id FROM orders"),
        ["The used SELECT statements have a different number of columns: 2 vs 1."]
    );
}

#[test]
fn test_union_unifies_types() {
    let cols = columns("SELECT id FROM users UNION SELECT name FROM users");
    assert_eq!(cols[0].db_type, DbType::Unknown);
    let cols = columns("SELECT id FROM users UNION SELECT NULL");
    assert_eq!(cols[0].db_type, DbType::Int);
    assert!(cols[0].nullable);
}

// ===== Common table expressions =====

#[test]
fn test_cte_binds_like_a_table() {
    let cols = columns("WITH top AS (SELECT id, total FROM orders) SELECT total FROM top");
    assert_eq!(cols[0].name, "total");
    assert_eq!(cols[0].db_type, DbType::Decimal);
}

#[test]
fn test_cte_column_list_renames() {
    let cols = columns("WITH t (a, b) AS (SELECT id, total FROM orders) SELECT a, b FROM t");
    assert_eq!(cols[0].name, "a");
    assert_eq!(cols[1].name, "b");
    assert_eq!(cols[1].db_type, DbType::Decimal);
}

#[test]
fn test_cte_column_count_mismatch() {
    assert_eq!(
        diagnostics("WITH t (a) AS (SELECT id, total FROM orders) SELECT a FROM t"),
        ["Column list of WITH and the subquery have to have the same number of columns. Got 1 vs 2."]
    );
}

#[test]
fn test_later_cte_sees_earlier_one() {
    assert!(diagnostics(
        "WITH a AS (SELECT id FROM users), b AS (SELECT id FROM a) SELECT id FROM b"
    )
    .is_empty());
}

#[test]
fn test_recursive_cte_sees_itself() {
    let cols = columns(
        "WITH RECURSIVE seq (n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq) SELECT n FROM seq",
    );
    assert_eq!(cols.len(), 1);
    assert_eq!(cols[0].name, "n");
}

#[test]
fn test_cte_shadows_schema_table() {
    let cols = columns("WITH users AS (SELECT 1 AS only_col) SELECT * FROM users");
    assert_eq!(cols.len(), 1);
    assert_eq!(cols[0].name, "only_col");
}
