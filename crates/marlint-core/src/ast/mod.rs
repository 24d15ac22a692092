//! Abstract syntax tree for the supported MariaDB statement subset.

mod expression;
mod query;

pub use expression::{
    BinaryOp, CastType, CountArg, Expr, ExprKind, FunctionCall, IntervalUnit, UnaryOp,
};
pub use query::{
    Assignment, CommonTableExpr, CompoundSelect, DeleteStatement, InsertSource, InsertStatement,
    JoinCondition, JoinKind, Limit, LockWait, OrderByExpr, OrderDirection, SelectExpr, SelectLock,
    SelectQuery, SetOpKind, SimpleSelect, Statement, TableRef, UpdateStatement, WithSelect,
};
