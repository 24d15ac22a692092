//! Expression AST types.
//!
//! A closed set of immutable node variants. Every node carries its source
//! span and reports its discriminant via [`Expr::kind`]; consumers match
//! exhaustively so adding a variant is a compile-time event everywhere.

use crate::lexer::Span;

use super::query::{Limit, OrderByExpr, SelectQuery};

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Logical
    Or,
    Xor,
    And,

    // Comparison
    Eq,
    NullSafeEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    NotEq,
    Regexp,

    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    IntDiv,
    Mod,

    // Bitwise
    BitOr,
    BitAnd,
    BitXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::And => "AND",
            Self::Eq => "=",
            Self::NullSafeEq => "<=>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::NotEq => "!=",
            Self::Regexp => "REGEXP",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IntDiv => "DIV",
            Self::Mod => "MOD",
            Self::BitOr => "|",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
        }
    }

    /// True for the comparison family (`= <=> < <= > >= != REGEXP`).
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::NullSafeEq
                | Self::Lt
                | Self::LtEq
                | Self::Gt
                | Self::GtEq
                | Self::NotEq
                | Self::Regexp
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Unary plus
    Plus,
    /// Negation (-)
    Minus,
    /// Bitwise NOT (~)
    BitNot,
    /// High-binding logical NOT (!)
    Bang,
    /// Low-binding logical NOT
    Not,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitNot => "~",
            Self::Bang => "!",
            Self::Not => "NOT",
        }
    }
}

/// Target type of a CAST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Signed,
    Unsigned,
    Char,
    Binary,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    Datetime,
}

/// Temporal unit of an INTERVAL expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Microsecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl IntervalUnit {
    /// Attempts to parse a unit name (case-insensitive).
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MICROSECOND" => Some(Self::Microsecond),
            "SECOND" => Some(Self::Second),
            "MINUTE" => Some(Self::Minute),
            "HOUR" => Some(Self::Hour),
            "DAY" => Some(Self::Day),
            "WEEK" => Some(Self::Week),
            "MONTH" => Some(Self::Month),
            "QUARTER" => Some(Self::Quarter),
            "YEAR" => Some(Self::Year),
            _ => None,
        }
    }
}

/// The COUNT argument: `COUNT(*)` or `COUNT(expr)`.
#[derive(Debug, Clone, PartialEq)]
pub enum CountArg {
    Star,
    Expr(Box<Expr>),
}

/// A function call, with specialised forms for the constructs whose
/// argument lists do not follow the standard shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionCall {
    /// An ordinary `name(args...)` call.
    Standard {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
        span: Span,
    },
    /// COUNT with its star/DISTINCT forms.
    Count {
        arg: CountArg,
        distinct: bool,
        span: Span,
    },
    /// CAST(expr AS type).
    Cast {
        expr: Box<Expr>,
        target: CastType,
        span: Span,
    },
    /// GROUP_CONCAT with its own argument list, ORDER BY, SEPARATOR and
    /// LIMIT.
    GroupConcat {
        exprs: Vec<Expr>,
        order_by: Vec<OrderByExpr>,
        separator: String,
        limit: Option<Box<Limit>>,
        distinct: bool,
        span: Span,
    },
    /// An aggregate used as a window function: `name(args) OVER (...)`.
    Window {
        name: String,
        args: Vec<Expr>,
        partition_by: Vec<Expr>,
        order_by: Vec<OrderByExpr>,
        span: Span,
    },
}

impl FunctionCall {
    /// The upper-case function name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Standard { name, .. } | Self::Window { name, .. } => name,
            Self::Count { .. } => "COUNT",
            Self::Cast { .. } => "CAST",
            Self::GroupConcat { .. } => "GROUP_CONCAT",
        }
    }

    /// The span of the whole call.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Standard { span, .. }
            | Self::Count { span, .. }
            | Self::Cast { span, .. }
            | Self::GroupConcat { span, .. }
            | Self::Window { span, .. } => *span,
        }
    }

    /// All argument sub-expressions, flattened, so the analyser can
    /// recurse uniformly.
    #[must_use]
    pub fn arguments(&self) -> Vec<&Expr> {
        match self {
            Self::Standard { args, .. } => args.iter().collect(),
            Self::Count { arg, .. } => match arg {
                CountArg::Star => vec![],
                CountArg::Expr(e) => vec![e.as_ref()],
            },
            Self::Cast { expr, .. } => vec![expr.as_ref()],
            Self::GroupConcat {
                exprs,
                order_by,
                limit,
                ..
            } => {
                let mut out: Vec<&Expr> = exprs.iter().collect();
                out.extend(order_by.iter().map(|o| &o.expr));
                if let Some(limit) = limit {
                    out.push(&limit.count);
                    if let Some(offset) = &limit.offset {
                        out.push(offset);
                    }
                }
                out
            }
            Self::Window {
                args,
                partition_by,
                order_by,
                ..
            } => {
                let mut out: Vec<&Expr> = args.iter().collect();
                out.extend(partition_by.iter());
                out.extend(order_by.iter().map(|o| &o.expr));
                out
            }
        }
    }
}

/// Discriminant of an [`Expr`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Column,
    Placeholder,
    LiteralInt,
    LiteralFloat,
    LiteralString,
    LiteralNull,
    UnaryOp,
    BinaryOp,
    FunctionCall,
    Tuple,
    Subquery,
    Between,
    Is,
    In,
    Like,
    Interval,
    Collate,
    Case,
}

/// An SQL expression. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference, optionally qualified with a table alias.
    Column {
        table: Option<String>,
        name: String,
        span: Span,
    },

    /// A `?` parameter placeholder.
    Placeholder { span: Span },

    /// Integer literal.
    LiteralInt { value: i64, span: Span },

    /// Float literal.
    LiteralFloat { value: f64, span: Span },

    /// String literal.
    LiteralString { value: String, span: Span },

    /// NULL literal.
    LiteralNull { span: Span },

    /// A unary expression.
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        span: Span,
    },

    /// A binary expression.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    /// A function call.
    FunctionCall(FunctionCall),

    /// A parenthesized expression list `(a, b, ...)`.
    ///
    /// A one-element tuple is just a parenthesized expression; the
    /// analyser treats arity >= 2 as the TUPLE type.
    Tuple { exprs: Vec<Expr>, span: Span },

    /// A scalar subquery.
    Subquery {
        query: Box<SelectQuery>,
        span: Span,
    },

    /// `expr [NOT] BETWEEN min AND max`.
    Between {
        expr: Box<Expr>,
        min: Box<Expr>,
        max: Box<Expr>,
        negated: bool,
        span: Span,
    },

    /// `expr IS [NOT] TRUE|FALSE|NULL`, the tri-state test. `test` is
    /// `None` for the NULL (and UNKNOWN) form.
    Is {
        expr: Box<Expr>,
        test: Option<bool>,
        negated: bool,
        span: Span,
    },

    /// `left [NOT] IN right` where `right` is a tuple or subquery.
    In {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
        span: Span,
    },

    /// `expr [NOT] LIKE pattern [ESCAPE esc]`.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
        span: Span,
    },

    /// `INTERVAL value unit`.
    Interval {
        value: Box<Expr>,
        unit: IntervalUnit,
        span: Span,
    },

    /// `expr COLLATE collation`.
    Collate {
        expr: Box<Expr>,
        collation: String,
        span: Span,
    },

    /// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
    Case {
        operand: Option<Box<Expr>>,
        when_then: Vec<(Expr, Expr)>,
        else_expr: Option<Box<Expr>>,
        span: Span,
    },
}

impl Expr {
    /// Reports the variant tag of this node.
    #[must_use]
    pub const fn kind(&self) -> ExprKind {
        match self {
            Self::Column { .. } => ExprKind::Column,
            Self::Placeholder { .. } => ExprKind::Placeholder,
            Self::LiteralInt { .. } => ExprKind::LiteralInt,
            Self::LiteralFloat { .. } => ExprKind::LiteralFloat,
            Self::LiteralString { .. } => ExprKind::LiteralString,
            Self::LiteralNull { .. } => ExprKind::LiteralNull,
            Self::Unary { .. } => ExprKind::UnaryOp,
            Self::Binary { .. } => ExprKind::BinaryOp,
            Self::FunctionCall(_) => ExprKind::FunctionCall,
            Self::Tuple { .. } => ExprKind::Tuple,
            Self::Subquery { .. } => ExprKind::Subquery,
            Self::Between { .. } => ExprKind::Between,
            Self::Is { .. } => ExprKind::Is,
            Self::In { .. } => ExprKind::In,
            Self::Like { .. } => ExprKind::Like,
            Self::Interval { .. } => ExprKind::Interval,
            Self::Collate { .. } => ExprKind::Collate,
            Self::Case { .. } => ExprKind::Case,
        }
    }

    /// The source span this node covers.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Column { span, .. }
            | Self::Placeholder { span }
            | Self::LiteralInt { span, .. }
            | Self::LiteralFloat { span, .. }
            | Self::LiteralString { span, .. }
            | Self::LiteralNull { span }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Tuple { span, .. }
            | Self::Subquery { span, .. }
            | Self::Between { span, .. }
            | Self::Is { span, .. }
            | Self::In { span, .. }
            | Self::Like { span, .. }
            | Self::Interval { span, .. }
            | Self::Collate { span, .. }
            | Self::Case { span, .. } => *span,
            Self::FunctionCall(call) => call.span(),
        }
    }

    /// Direct sub-expressions of this node, so consumers can recurse
    /// uniformly.
    #[must_use]
    pub fn child_exprs(&self) -> Vec<&Expr> {
        match self {
            Self::Column { .. }
            | Self::Placeholder { .. }
            | Self::LiteralInt { .. }
            | Self::LiteralFloat { .. }
            | Self::LiteralString { .. }
            | Self::LiteralNull { .. }
            | Self::Subquery { .. } => vec![],
            Self::Unary { expr, .. } | Self::Collate { expr, .. } => vec![expr.as_ref()],
            Self::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Self::FunctionCall(call) => call.arguments(),
            Self::Tuple { exprs, .. } => exprs.iter().collect(),
            Self::Between {
                expr, min, max, ..
            } => vec![expr.as_ref(), min.as_ref(), max.as_ref()],
            Self::Is { expr, .. } => vec![expr.as_ref()],
            Self::In { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Self::Like {
                expr,
                pattern,
                escape,
                ..
            } => {
                let mut out = vec![expr.as_ref(), pattern.as_ref()];
                if let Some(escape) = escape {
                    out.push(escape.as_ref());
                }
                out
            }
            Self::Interval { value, .. } => vec![value.as_ref()],
            Self::Case {
                operand,
                when_then,
                else_expr,
                ..
            } => {
                let mut out: Vec<&Expr> = Vec::new();
                if let Some(operand) = operand {
                    out.push(operand.as_ref());
                }
                for (when, then) in when_then {
                    out.push(when);
                    out.push(then);
                }
                if let Some(else_expr) = else_expr {
                    out.push(else_expr.as_ref());
                }
                out
            }
        }
    }
}
