//! Declared signatures for the built-in functions the analyser knows.
//!
//! Unknown functions are accepted without checks; known ones get their
//! argument count and per-position kinds verified, and a result type.

use super::{DbType, ExprType};

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgCount {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl ArgCount {
    /// Whether `given` satisfies this count.
    #[must_use]
    pub const fn accepts(&self, given: usize) -> bool {
        match self {
            Self::Exact(n) => given == *n,
            Self::Range(min, max) => given >= *min && given <= *max,
            Self::AtLeast(min) => given >= *min,
        }
    }

    /// The `(min, max)` bounds used in the arity diagnostic; open
    /// ranges report `max = usize::MAX`.
    #[must_use]
    pub const fn bounds(&self) -> (usize, usize) {
        match self {
            Self::Exact(n) => (*n, *n),
            Self::Range(min, max) => (*min, *max),
            Self::AtLeast(min) => (*min, usize::MAX),
        }
    }
}

/// The kind a single argument position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Anything, tuples included.
    Any,
    /// Any scalar; rejects tuples.
    Scalar,
    /// Numeric-coercible scalars; rejects tuples.
    Numeric,
}

impl ArgKind {
    /// Whether an argument of the given type satisfies this kind.
    #[must_use]
    pub const fn accepts(&self, db_type: &DbType) -> bool {
        match self {
            Self::Any => true,
            Self::Scalar => db_type.is_scalar(),
            Self::Numeric => db_type.is_numeric_coercible() || matches!(db_type, DbType::DateTime),
        }
    }
}

/// How a function's result type derives from its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultRule {
    /// A fixed type; the bool is nullability.
    Fixed(DbType, bool),
    /// A fixed type, nullable when any argument is nullable.
    Propagate(DbType),
    /// The first argument's type; nullable only when every argument is
    /// (COALESCE).
    FirstArgAllNullable,
    /// The first argument's type and nullability.
    FirstArg,
    /// The first argument's type, always nullable (NULLIF).
    FirstArgNullable,
    /// An aggregate over the first argument's type: nullable because
    /// the group can be empty.
    AggregateFirstArg,
}

/// A declared function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub count: ArgCount,
    /// Kind per position; the last entry repeats for variadics.
    pub arg_kinds: &'static [ArgKind],
    result: ResultRule,
}

impl FunctionSignature {
    /// The kind expected at a zero-based argument position.
    #[must_use]
    pub fn kind_at(&self, position: usize) -> ArgKind {
        self.arg_kinds
            .get(position)
            .or_else(|| self.arg_kinds.last())
            .copied()
            .unwrap_or(ArgKind::Any)
    }

    /// Computes the result type from the checked argument types.
    #[must_use]
    pub fn result_type(&self, args: &[ExprType]) -> ExprType {
        let any_nullable = args.iter().any(|a| a.nullable);
        let first = args.first().copied().unwrap_or_else(ExprType::unknown);
        match self.result {
            ResultRule::Fixed(db_type, nullable) => ExprType::new(db_type, nullable),
            ResultRule::Propagate(db_type) => ExprType::new(db_type, any_nullable),
            ResultRule::FirstArgAllNullable => {
                ExprType::new(first.db_type, args.iter().all(|a| a.nullable))
            }
            ResultRule::FirstArg => first,
            ResultRule::FirstArgNullable => ExprType::nullable(first.db_type),
            ResultRule::AggregateFirstArg => ExprType::nullable(first.db_type),
        }
    }
}

const fn sig(
    count: ArgCount,
    arg_kinds: &'static [ArgKind],
    result: ResultRule,
) -> FunctionSignature {
    FunctionSignature {
        count,
        arg_kinds,
        result,
    }
}

const NUMERIC: &[ArgKind] = &[ArgKind::Numeric];
const SCALAR: &[ArgKind] = &[ArgKind::Scalar];
const ANY: &[ArgKind] = &[ArgKind::Any];

/// Looks up the declared signature of a built-in, by upper-case name.
/// Returns `None` for functions the analyser does not model.
#[must_use]
pub fn signature(name: &str) -> Option<FunctionSignature> {
    use ArgCount::{AtLeast, Exact, Range};
    use ResultRule::{
        AggregateFirstArg, Fixed, FirstArg, FirstArgAllNullable, FirstArgNullable, Propagate,
    };

    let signature = match name {
        // aggregates
        "AVG" => sig(Exact(1), NUMERIC, Fixed(DbType::Decimal, true)),
        "SUM" => sig(Exact(1), NUMERIC, Fixed(DbType::Decimal, true)),
        "MIN" | "MAX" => sig(Exact(1), SCALAR, AggregateFirstArg),

        // numeric
        "ABS" => sig(Exact(1), NUMERIC, FirstArg),
        "CEIL" | "CEILING" | "FLOOR" => sig(Exact(1), NUMERIC, Propagate(DbType::Int)),
        "ROUND" => sig(Range(1, 2), NUMERIC, FirstArg),
        "TRUNCATE" => sig(Exact(2), NUMERIC, FirstArg),
        "POW" | "POWER" => sig(Exact(2), NUMERIC, Propagate(DbType::Float)),
        "SQRT" => sig(Exact(1), NUMERIC, Propagate(DbType::Float)),
        "RAND" => sig(Range(0, 1), NUMERIC, Fixed(DbType::Float, false)),

        // strings
        "CONCAT" => sig(AtLeast(1), SCALAR, Propagate(DbType::Varchar)),
        "CONCAT_WS" => sig(AtLeast(2), SCALAR, Propagate(DbType::Varchar)),
        "LOWER" | "UPPER" | "LCASE" | "UCASE" | "TRIM" | "LTRIM" | "RTRIM" | "REVERSE" => {
            sig(Exact(1), SCALAR, Propagate(DbType::Varchar))
        }
        "LENGTH" | "CHAR_LENGTH" | "CHARACTER_LENGTH" | "OCTET_LENGTH" => {
            sig(Exact(1), SCALAR, Propagate(DbType::Int))
        }
        "SUBSTRING" | "SUBSTR" => sig(Range(2, 3), SCALAR, Propagate(DbType::Varchar)),
        "LEFT" | "RIGHT" => sig(Exact(2), SCALAR, Propagate(DbType::Varchar)),
        "LPAD" | "RPAD" => sig(Exact(3), SCALAR, Propagate(DbType::Varchar)),
        "REPLACE" => sig(Exact(3), SCALAR, Propagate(DbType::Varchar)),
        "INSTR" | "LOCATE" => sig(Range(2, 3), SCALAR, Propagate(DbType::Int)),

        // control flow
        "COALESCE" => sig(AtLeast(1), SCALAR, FirstArgAllNullable),
        "IFNULL" => sig(Exact(2), SCALAR, FirstArgAllNullable),
        "NULLIF" => sig(Exact(2), SCALAR, FirstArgNullable),
        "IF" => sig(Exact(3), SCALAR, FirstArg),

        // temporal
        "NOW" | "CURRENT_TIMESTAMP" | "SYSDATE" => {
            sig(Exact(0), ANY, Fixed(DbType::DateTime, false))
        }
        "CURDATE" | "CURRENT_DATE" | "CURTIME" | "CURRENT_TIME" => {
            sig(Exact(0), ANY, Fixed(DbType::DateTime, false))
        }
        "DATE" | "DATE_ADD" | "DATE_SUB" => sig(Range(1, 2), SCALAR, Propagate(DbType::DateTime)),
        "DATEDIFF" => sig(Exact(2), SCALAR, Propagate(DbType::Int)),
        "DATE_FORMAT" => sig(Exact(2), SCALAR, Propagate(DbType::Varchar)),
        "YEAR" | "MONTH" | "DAY" | "HOUR" | "MINUTE" | "SECOND" | "DAYOFWEEK" | "DAYOFYEAR" => {
            sig(Exact(1), SCALAR, Propagate(DbType::Int))
        }
        "UNIX_TIMESTAMP" => sig(Range(0, 1), SCALAR, Propagate(DbType::Int)),
        "FROM_UNIXTIME" => sig(Range(1, 2), NUMERIC, Propagate(DbType::DateTime)),

        // misc
        "EXISTS" => sig(Exact(1), ANY, Fixed(DbType::Int, false)),
        "DATABASE" | "SCHEMA" => sig(Exact(0), ANY, Fixed(DbType::Varchar, true)),
        "LAST_INSERT_ID" => sig(Range(0, 1), NUMERIC, Fixed(DbType::Int, false)),
        "VALUES" => sig(Exact(1), SCALAR, FirstArg),

        _ => return None,
    };
    Some(signature)
}
