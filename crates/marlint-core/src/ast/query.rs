//! Query and statement AST types.

use crate::lexer::Span;

use super::expression::Expr;

/// Direction of an ORDER BY entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// One entry of an ORDER BY list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: OrderDirection,
}

/// A LIMIT clause, with its optional offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub count: Expr,
    pub offset: Option<Expr>,
}

/// One item of a select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectExpr {
    /// `*` or `alias.*`.
    Star { table: Option<String>, span: Span },
    /// An expression, optionally aliased.
    Expr {
        expr: Expr,
        alias: Option<String>,
        span: Span,
    },
}

/// The flavour of a JOIN node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Cross,
    LeftOuter,
    RightOuter,
}

impl JoinKind {
    /// Returns the SQL form of the join keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Cross => "CROSS JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
        }
    }
}

/// The join condition, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    On(Expr),
    Using(Vec<String>),
    None,
}

/// A table reference in a FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A base table or CTE by name, optionally aliased.
    Named {
        name: String,
        alias: Option<String>,
        span: Span,
    },
    /// A derived table. MariaDB requires the alias.
    Subquery {
        query: Box<SelectQuery>,
        alias: String,
        span: Span,
    },
    /// A join of two table references.
    Join {
        kind: JoinKind,
        left: Box<TableRef>,
        right: Box<TableRef>,
        condition: JoinCondition,
        span: Span,
    },
}

impl TableRef {
    /// The source span this reference covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Named { span, .. } | Self::Subquery { span, .. } | Self::Join { span, .. } => {
                *span
            }
        }
    }
}

/// How long to wait for row locks under FOR UPDATE.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LockWait {
    Default,
    Nowait,
    SkipLocked,
    Wait(f64),
}

/// A locking clause at the end of a SELECT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectLock {
    ForUpdate(LockWait),
    InShareMode,
}

/// A plain (non-compound) SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleSelect {
    pub distinct: bool,
    pub columns: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub with_rollup: bool,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<Limit>,
    pub lock: Option<SelectLock>,
    pub span: Span,
}

/// The set operator joining two selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOpKind {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOpKind {
    /// Returns the SQL form of the set operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// Two selects combined with a set operator. Left-associative, so
/// `a UNION b UNION c` parses as `(a UNION b) UNION c`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelect {
    pub kind: SetOpKind,
    pub left: Box<SelectQuery>,
    pub right: Box<SelectQuery>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<Limit>,
    pub span: Span,
}

/// One common table expression of a WITH clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpr {
    pub name: String,
    /// Explicit column name list, when given.
    pub column_names: Option<Vec<String>>,
    pub query: Box<SelectQuery>,
    pub span: Span,
}

/// A WITH clause and the query it feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct WithSelect {
    pub recursive: bool,
    pub ctes: Vec<CommonTableExpr>,
    pub body: Box<SelectQuery>,
    pub span: Span,
}

/// Any SELECT shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectQuery {
    Simple(SimpleSelect),
    Compound(CompoundSelect),
    With(WithSelect),
}

impl SelectQuery {
    /// The source span this query covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Simple(s) => s.span,
            Self::Compound(c) => c.span,
            Self::With(w) => w.span,
        }
    }
}

/// The row source of an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// `VALUES (..), (..)` row tuples.
    Values(Vec<Vec<Expr>>),
    /// `INSERT ... SELECT`.
    Select(Box<SelectQuery>),
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    /// Explicit target column list, when given.
    pub columns: Option<Vec<String>>,
    pub source: InsertSource,
    pub ignore: bool,
    pub span: Span,
}

/// One `col = expr` assignment of an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub table: Option<String>,
    pub column: String,
    pub value: Expr,
    pub span: Span,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: TableRef,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
    pub span: Span,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: TableRef,
    pub where_clause: Option<Expr>,
    pub span: Span,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectQuery),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Statement {
    /// The source span this statement covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Select(s) => s.span(),
            Self::Insert(i) => i.span,
            Self::Update(u) => u.span,
            Self::Delete(d) => d.span,
        }
    }
}
