//! The column type algebra used by the analyser.

mod functions;

pub use functions::{signature, ArgCount, ArgKind, FunctionSignature};

/// The database-level type of an expression or column.
///
/// `Tuple` is the arity-carrying type of parenthesized lists and
/// multi-column subqueries; everything else is scalar. `Null` is the
/// type of the NULL literal and is compatible with every other type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    Int,
    Float,
    Decimal,
    Varchar,
    DateTime,
    Null,
    Unknown,
    Tuple(usize),
}

impl DbType {
    /// The kind name without arity, as used in operator diagnostics.
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Decimal => "DECIMAL",
            Self::Varchar => "VARCHAR",
            Self::DateTime => "DATETIME",
            Self::Null => "NULL",
            Self::Unknown => "UNKNOWN",
            Self::Tuple(_) => "TUPLE",
        }
    }

    /// True for any non-tuple type.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Tuple(_))
    }

    /// True for the types arithmetic coerces without complaint. NULL
    /// and UNKNOWN are included since they can hold anything.
    #[must_use]
    pub const fn is_numeric_coercible(&self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float | Self::Decimal | Self::Varchar | Self::Null | Self::Unknown
        )
    }

    /// The tuple arity; scalars have arity 1.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Tuple(n) => *n,
            _ => 1,
        }
    }

    /// Whether two types denote the same kind, ignoring tuple arity.
    #[must_use]
    pub const fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Int, Self::Int)
                | (Self::Float, Self::Float)
                | (Self::Decimal, Self::Decimal)
                | (Self::Varchar, Self::Varchar)
                | (Self::DateTime, Self::DateTime)
                | (Self::Null, Self::Null)
                | (Self::Unknown, Self::Unknown)
                | (Self::Tuple(_), Self::Tuple(_))
        )
    }

    /// Combines the branch types of CASE and set operations: equal
    /// kinds keep the kind, NULL yields to the other side, anything
    /// else degrades to UNKNOWN.
    #[must_use]
    pub const fn unify(self, other: Self) -> Self {
        match (self, other) {
            (Self::Null, t) | (t, Self::Null) => t,
            (a, b) if a.same_kind(&b) => a,
            _ => Self::Unknown,
        }
    }
}

impl core::fmt::Display for DbType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Tuple(n) => write!(f, "TUPLE<{n}>"),
            other => f.write_str(other.kind_str()),
        }
    }
}

/// The inferred type of an expression: a [`DbType`] plus nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprType {
    pub db_type: DbType,
    pub nullable: bool,
}

impl ExprType {
    /// Creates an expression type.
    #[must_use]
    pub const fn new(db_type: DbType, nullable: bool) -> Self {
        Self { db_type, nullable }
    }

    /// A non-nullable value of the given type.
    #[must_use]
    pub const fn not_null(db_type: DbType) -> Self {
        Self::new(db_type, false)
    }

    /// A nullable value of the given type.
    #[must_use]
    pub const fn nullable(db_type: DbType) -> Self {
        Self::new(db_type, true)
    }

    /// The UNKNOWN, nullable type used when inference cannot proceed.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::nullable(DbType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DbType::Int.to_string(), "INT");
        assert_eq!(DbType::DateTime.to_string(), "DATETIME");
        assert_eq!(DbType::Tuple(3).to_string(), "TUPLE<3>");
        assert_eq!(DbType::Tuple(3).kind_str(), "TUPLE");
    }

    #[test]
    fn test_arity() {
        assert_eq!(DbType::Int.arity(), 1);
        assert_eq!(DbType::Tuple(2).arity(), 2);
        assert!(DbType::Varchar.is_scalar());
        assert!(!DbType::Tuple(2).is_scalar());
    }

    #[test]
    fn test_unify() {
        assert_eq!(DbType::Int.unify(DbType::Int), DbType::Int);
        assert_eq!(DbType::Null.unify(DbType::Varchar), DbType::Varchar);
        assert_eq!(DbType::Int.unify(DbType::Varchar), DbType::Unknown);
    }
}
