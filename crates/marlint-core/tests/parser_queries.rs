use marlint_core::ast::{
    InsertSource, JoinKind, LockWait, OrderDirection, SelectLock, SelectQuery, SetOpKind,
    Statement, TableRef,
};
use marlint_core::parser::{parse_select, parse_statement};

fn simple(sql: &str) -> marlint_core::ast::SimpleSelect {
    let query = parse_select(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));
    let SelectQuery::Simple(select) = query else {
        panic!("expected a simple select for: {sql}");
    };
    select
}

fn statement(sql: &str) -> Statement {
    parse_statement(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

// ===== SELECT clause chain =====

#[test]
fn test_full_clause_chain() {
    let select = simple(
        "SELECT DISTINCT u.name, COUNT(*) AS cnt \
         FROM users u JOIN orders o ON o.user_id = u.id \
         WHERE o.total > 100 \
         GROUP BY u.name WITH ROLLUP \
         HAVING cnt > 1 \
         ORDER BY cnt DESC \
         LIMIT 10 OFFSET 5",
    );
    assert!(select.distinct);
    assert_eq!(select.columns.len(), 2);
    assert!(select.where_clause.is_some());
    assert_eq!(select.group_by.len(), 1);
    assert!(select.with_rollup);
    assert!(select.having.is_some());
    assert_eq!(select.order_by[0].direction, OrderDirection::Desc);
    let limit = select.limit.unwrap();
    assert!(limit.offset.is_some());
}

#[test]
fn test_limit_comma_form() {
    // LIMIT offset, count
    let select = simple("SELECT id FROM t LIMIT 5, 10");
    let limit = select.limit.unwrap();
    assert!(limit.offset.is_some());
}

#[test]
fn test_order_by_defaults_to_asc() {
    let select = simple("SELECT id FROM t ORDER BY id, name DESC");
    assert_eq!(select.order_by[0].direction, OrderDirection::Asc);
    assert_eq!(select.order_by[1].direction, OrderDirection::Desc);
}

// ===== Locking clauses =====

#[test]
fn test_lock_clauses() {
    let select = simple("SELECT id FROM t FOR UPDATE");
    assert_eq!(select.lock, Some(SelectLock::ForUpdate(LockWait::Default)));

    let select = simple("SELECT id FROM t FOR UPDATE NOWAIT");
    assert_eq!(select.lock, Some(SelectLock::ForUpdate(LockWait::Nowait)));

    let select = simple("SELECT id FROM t FOR UPDATE SKIP LOCKED");
    assert_eq!(
        select.lock,
        Some(SelectLock::ForUpdate(LockWait::SkipLocked))
    );

    let select = simple("SELECT id FROM t FOR UPDATE WAIT 5");
    assert_eq!(select.lock, Some(SelectLock::ForUpdate(LockWait::Wait(5.0))));

    let select = simple("SELECT id FROM t LOCK IN SHARE MODE");
    assert_eq!(select.lock, Some(SelectLock::InShareMode));
}

#[test]
fn test_lock_wait_timeout_bounds() {
    let select = simple("SELECT id FROM t FOR UPDATE WAIT 0.5");
    assert_eq!(select.lock, Some(SelectLock::ForUpdate(LockWait::Wait(0.5))));
    // timeouts outside the 32-bit range are rejected, not rounded
    assert!(parse_select("SELECT id FROM t FOR UPDATE WAIT 4294967296").is_err());
}

// ===== Joins =====

#[test]
fn test_join_kinds() {
    let expect_kind = |sql: &str, expected: JoinKind| {
        let select = simple(sql);
        let Some(TableRef::Join { kind, .. }) = select.from else {
            panic!("expected a join for: {sql}");
        };
        assert_eq!(kind, expected, "for: {sql}");
    };

    expect_kind("SELECT 1 FROM a, b", JoinKind::Cross);
    expect_kind("SELECT 1 FROM a CROSS JOIN b", JoinKind::Cross);
    expect_kind("SELECT 1 FROM a JOIN b ON a.x = b.x", JoinKind::Inner);
    expect_kind("SELECT 1 FROM a STRAIGHT_JOIN b", JoinKind::Inner);
    expect_kind(
        "SELECT 1 FROM a LEFT OUTER JOIN b USING (x)",
        JoinKind::LeftOuter,
    );
    expect_kind("SELECT 1 FROM a RIGHT JOIN b ON a.x = b.x", JoinKind::RightOuter);
}

#[test]
fn test_joins_are_left_associative() {
    let select = simple("SELECT 1 FROM a JOIN b ON a.x = b.x JOIN c ON b.x = c.x");
    let Some(TableRef::Join { left, right, .. }) = select.from else {
        panic!("expected a join");
    };
    assert!(matches!(*left, TableRef::Join { .. }));
    assert!(matches!(*right, TableRef::Named { ref name, .. } if name == "c"));
}

// ===== Compound selects =====

#[test]
fn test_compound_kinds_and_associativity() {
    let query =
        parse_select("SELECT 1 UNION SELECT 2 UNION ALL SELECT 3").unwrap();
    let SelectQuery::Compound(outer) = query else {
        panic!("expected a compound");
    };
    assert_eq!(outer.kind, SetOpKind::UnionAll);
    let SelectQuery::Compound(inner) = *outer.left else {
        panic!("expected the left side to be the earlier compound");
    };
    assert_eq!(inner.kind, SetOpKind::Union);

    for (sql, kind) in [
        ("SELECT 1 INTERSECT SELECT 2", SetOpKind::Intersect),
        ("SELECT 1 EXCEPT SELECT 2", SetOpKind::Except),
        ("SELECT 1 UNION DISTINCT SELECT 2", SetOpKind::Union),
    ] {
        let SelectQuery::Compound(compound) = parse_select(sql).unwrap() else {
            panic!("expected a compound for: {sql}");
        };
        assert_eq!(compound.kind, kind, "for: {sql}");
    }
}

#[test]
fn test_trailing_order_by_belongs_to_the_compound() {
    let query = parse_select("SELECT 1 AS n UNION SELECT 2 ORDER BY n LIMIT 1").unwrap();
    let SelectQuery::Compound(compound) = query else {
        panic!("expected a compound");
    };
    assert_eq!(compound.order_by.len(), 1);
    assert!(compound.limit.is_some());
    let SelectQuery::Simple(right) = *compound.right else {
        panic!("expected a simple right side");
    };
    assert!(right.order_by.is_empty());
}

// ===== WITH =====

#[test]
fn test_with_clause() {
    let query = parse_select(
        "WITH RECURSIVE seq (n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq) SELECT n FROM seq",
    )
    .unwrap();
    let SelectQuery::With(with) = query else {
        panic!("expected a WITH query");
    };
    assert!(with.recursive);
    assert_eq!(with.ctes[0].name, "seq");
    assert_eq!(with.ctes[0].column_names.as_deref(), Some(&["n".to_string()][..]));
}

// ===== DML =====

#[test]
fn test_insert_forms() {
    let Statement::Insert(insert) = statement("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)")
    else {
        panic!("expected INSERT");
    };
    assert_eq!(insert.columns.as_ref().map(Vec::len), Some(2));
    let InsertSource::Values(rows) = insert.source else {
        panic!("expected VALUES");
    };
    assert_eq!(rows.len(), 2);
    assert!(!insert.ignore);

    let Statement::Insert(insert) = statement("INSERT IGNORE t SELECT id FROM u") else {
        panic!("expected INSERT");
    };
    assert!(insert.ignore);
    assert!(insert.columns.is_none());
    assert!(matches!(insert.source, InsertSource::Select(_)));
}

#[test]
fn test_update_statement() {
    let Statement::Update(update) =
        statement("UPDATE t SET a = 1, t.b = b + 1 WHERE id = 3")
    else {
        panic!("expected UPDATE");
    };
    assert_eq!(update.assignments.len(), 2);
    assert_eq!(update.assignments[1].table.as_deref(), Some("t"));
    assert!(update.where_clause.is_some());
}

#[test]
fn test_delete_statement() {
    let Statement::Delete(delete) = statement("DELETE FROM t WHERE id = 3") else {
        panic!("expected DELETE");
    };
    assert!(delete.where_clause.is_some());
}
