#![allow(dead_code)]

use marlint_core::analyser::{Analyser, AnalyserResult, ResultColumn};
use marlint_core::ast::{BinaryOp, CountArg, Expr, FunctionCall, UnaryOp};
use marlint_core::parser::parse_expression;
use marlint_core::reflection::FixtureReflection;
use marlint_core::types::DbType;

// ===================================================================
// Analyser helpers
// ===================================================================

/// The schema most analyser tests run against.
pub fn fixture_schema() -> FixtureReflection {
    FixtureReflection::new()
        .with_table(
            "users",
            &[
                ("id", DbType::Int, false),
                ("name", DbType::Varchar, false),
                ("email", DbType::Varchar, true),
                ("created_at", DbType::DateTime, false),
            ],
        )
        .with_table(
            "orders",
            &[
                ("id", DbType::Int, false),
                ("user_id", DbType::Int, false),
                ("total", DbType::Decimal, false),
                ("note", DbType::Varchar, true),
            ],
        )
}

pub fn analyse(sql: &str) -> AnalyserResult {
    let schema = fixture_schema();
    Analyser::new(&schema)
        .analyse(sql)
        .unwrap_or_else(|e| panic!("Failed to analyse: {sql}\nError: {e:?}"))
}

pub fn columns(sql: &str) -> Vec<ResultColumn> {
    let result = analyse(sql);
    assert_eq!(
        result.diagnostics,
        vec![],
        "unexpected diagnostics for: {sql}"
    );
    result.columns.expect("expected a result set")
}

pub fn diagnostics(sql: &str) -> Vec<String> {
    analyse(sql)
        .diagnostics
        .into_iter()
        .map(|d| d.message)
        .collect()
}

// ===================================================================
// Expression evaluation oracle
// ===================================================================

/// A runtime value, used to check that parse trees group the way
/// MariaDB evaluates them.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl SqlValue {
    fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// MariaDB truthiness: NULL is unknown, zero is false.
    fn truthy(&self) -> Option<bool> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(*v != 0),
            Self::Float(v) => Some(*v != 0.0),
            Self::Str(s) => Some(s.parse::<f64>().unwrap_or(0.0) != 0.0),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Str(s) => Some(s.parse::<f64>().unwrap_or(0.0)),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(*v),
            Self::Float(v) => Some(*v as i64),
            Self::Str(s) => Some(s.parse::<f64>().unwrap_or(0.0) as i64),
        }
    }

    fn from_bool(b: Option<bool>) -> Self {
        b.map_or(Self::Null, |b| Self::Int(i64::from(b)))
    }
}

/// Three-valued equality; strings compare case-insensitively like the
/// default collation.
fn eq(left: &SqlValue, right: &SqlValue) -> Option<bool> {
    if left.is_null() || right.is_null() {
        return None;
    }
    if let (SqlValue::Str(a), SqlValue::Str(b)) = (left, right) {
        return Some(a.eq_ignore_ascii_case(b));
    }
    Some(left.as_f64() == right.as_f64())
}

fn cmp(left: &SqlValue, right: &SqlValue) -> Option<std::cmp::Ordering> {
    if left.is_null() || right.is_null() {
        return None;
    }
    if let (SqlValue::Str(a), SqlValue::Str(b)) = (left, right) {
        return Some(a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()));
    }
    left.as_f64()?.partial_cmp(&right.as_f64()?)
}

fn and3(left: Option<bool>, right: Option<bool>) -> Option<bool> {
    match (left, right) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

fn or3(left: Option<bool>, right: Option<bool>) -> Option<bool> {
    match (left, right) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

fn like_match(text: &str, pattern: &str, escape: char) -> bool {
    fn rec(t: &[char], p: &[char], escape: char) -> bool {
        match p.split_first() {
            None => t.is_empty(),
            Some((&c, rest)) if c == escape && !rest.is_empty() => match t.split_first() {
                Some((&tc, t_rest)) => tc == rest[0] && rec(t_rest, &rest[1..], escape),
                None => false,
            },
            Some((&'%', rest)) => (0..=t.len()).any(|i| rec(&t[i..], rest, escape)),
            Some((&'_', rest)) => match t.split_first() {
                Some((_, t_rest)) => rec(t_rest, rest, escape),
                None => false,
            },
            Some((&c, rest)) => match t.split_first() {
                Some((&tc, t_rest)) => tc == c && rec(t_rest, rest, escape),
                None => false,
            },
        }
    }
    let text: Vec<char> = text.to_ascii_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_ascii_lowercase().chars().collect();
    rec(&text, &pattern, escape.to_ascii_lowercase())
}

fn numeric_binary(op: BinaryOp, left: &SqlValue, right: &SqlValue) -> SqlValue {
    let both_int = matches!((left, right), (SqlValue::Int(_), SqlValue::Int(_)));
    let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) else {
        return SqlValue::Null;
    };

    match op {
        BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Mul => {
            let v = match op {
                BinaryOp::Plus => l + r,
                BinaryOp::Minus => l - r,
                _ => l * r,
            };
            if both_int {
                SqlValue::Int(v as i64)
            } else {
                SqlValue::Float(v)
            }
        }
        BinaryOp::Div => {
            if r == 0.0 {
                SqlValue::Null
            } else {
                SqlValue::Float(l / r)
            }
        }
        BinaryOp::IntDiv => {
            if r == 0.0 {
                SqlValue::Null
            } else {
                SqlValue::Int((l / r).trunc() as i64)
            }
        }
        BinaryOp::Mod => {
            if r == 0.0 {
                SqlValue::Null
            } else if both_int {
                SqlValue::Int((l as i64) % (r as i64))
            } else {
                SqlValue::Float(l % r)
            }
        }
        _ => unreachable!("not a numeric operator: {op:?}"),
    }
}

/// Evaluates a constant expression with MariaDB semantics.
pub fn eval(expr: &Expr) -> SqlValue {
    match expr {
        Expr::LiteralInt { value, .. } => SqlValue::Int(*value),
        Expr::LiteralFloat { value, .. } => SqlValue::Float(*value),
        Expr::LiteralString { value, .. } => SqlValue::Str(value.clone()),
        Expr::LiteralNull { .. } => SqlValue::Null,

        Expr::Unary { op, expr, .. } => {
            let v = eval(expr);
            match op {
                UnaryOp::Plus => v,
                UnaryOp::Minus => match v {
                    SqlValue::Int(i) => SqlValue::Int(-i),
                    SqlValue::Float(f) => SqlValue::Float(-f),
                    SqlValue::Str(_) => v.as_f64().map_or(SqlValue::Null, |f| SqlValue::Float(-f)),
                    SqlValue::Null => SqlValue::Null,
                },
                UnaryOp::BitNot => v.as_i64().map_or(SqlValue::Null, |i| SqlValue::Int(!i)),
                UnaryOp::Bang | UnaryOp::Not => {
                    SqlValue::from_bool(v.truthy().map(|b| !b))
                }
            }
        }

        Expr::Binary {
            op, left, right, ..
        } => {
            let l = eval(left);
            let r = eval(right);
            match op {
                BinaryOp::Or => SqlValue::from_bool(or3(l.truthy(), r.truthy())),
                BinaryOp::And => SqlValue::from_bool(and3(l.truthy(), r.truthy())),
                BinaryOp::Xor => match (l.truthy(), r.truthy()) {
                    (Some(a), Some(b)) => SqlValue::Int(i64::from(a != b)),
                    _ => SqlValue::Null,
                },
                BinaryOp::Eq => SqlValue::from_bool(eq(&l, &r)),
                BinaryOp::NotEq => SqlValue::from_bool(eq(&l, &r).map(|b| !b)),
                BinaryOp::NullSafeEq => SqlValue::Int(i64::from(match (l.is_null(), r.is_null()) {
                    (true, true) => true,
                    (false, false) => eq(&l, &r) == Some(true),
                    _ => false,
                })),
                BinaryOp::Lt => SqlValue::from_bool(cmp(&l, &r).map(std::cmp::Ordering::is_lt)),
                BinaryOp::LtEq => SqlValue::from_bool(cmp(&l, &r).map(std::cmp::Ordering::is_le)),
                BinaryOp::Gt => SqlValue::from_bool(cmp(&l, &r).map(std::cmp::Ordering::is_gt)),
                BinaryOp::GtEq => SqlValue::from_bool(cmp(&l, &r).map(std::cmp::Ordering::is_ge)),
                BinaryOp::BitOr => match (l.as_i64(), r.as_i64()) {
                    (Some(a), Some(b)) => SqlValue::Int(a | b),
                    _ => SqlValue::Null,
                },
                BinaryOp::BitAnd => match (l.as_i64(), r.as_i64()) {
                    (Some(a), Some(b)) => SqlValue::Int(a & b),
                    _ => SqlValue::Null,
                },
                BinaryOp::BitXor => match (l.as_i64(), r.as_i64()) {
                    (Some(a), Some(b)) => SqlValue::Int(a ^ b),
                    _ => SqlValue::Null,
                },
                BinaryOp::ShiftLeft => match (l.as_i64(), r.as_i64()) {
                    (Some(a), Some(b)) => SqlValue::Int(a.wrapping_shl(b as u32)),
                    _ => SqlValue::Null,
                },
                BinaryOp::ShiftRight => match (l.as_i64(), r.as_i64()) {
                    (Some(a), Some(b)) => SqlValue::Int(a.wrapping_shr(b as u32)),
                    _ => SqlValue::Null,
                },
                BinaryOp::Regexp => SqlValue::Null,
                _ => numeric_binary(*op, &l, &r),
            }
        }

        Expr::Between {
            expr,
            min,
            max,
            negated,
            ..
        } => {
            let v = eval(expr);
            let lo = eval(min);
            let hi = eval(max);
            let result = and3(
                cmp(&v, &lo).map(std::cmp::Ordering::is_ge),
                cmp(&v, &hi).map(std::cmp::Ordering::is_le),
            );
            SqlValue::from_bool(if *negated { result.map(|b| !b) } else { result })
        }

        Expr::Is {
            expr,
            test,
            negated,
            ..
        } => {
            let v = eval(expr);
            let holds = match test {
                None => v.is_null(),
                Some(expected) => v.truthy() == Some(*expected),
            };
            SqlValue::Int(i64::from(holds != *negated))
        }

        Expr::In {
            left,
            right,
            negated,
            ..
        } => {
            let needle = eval(left);
            let Expr::Tuple { exprs, .. } = right.as_ref() else {
                panic!("oracle only evaluates IN lists");
            };
            let mut result = Some(false);
            for element in exprs {
                result = or3(result, eq(&needle, &eval(element)));
            }
            SqlValue::from_bool(if *negated { result.map(|b| !b) } else { result })
        }

        Expr::Like {
            expr,
            pattern,
            escape,
            negated,
            ..
        } => {
            let (text, pat) = (eval(expr), eval(pattern));
            if text.is_null() || pat.is_null() {
                return SqlValue::Null;
            }
            let escape_char = match escape.as_deref().map(eval) {
                None => '\\',
                Some(SqlValue::Str(s)) => s.chars().next().unwrap_or('\\'),
                Some(_) => '\\',
            };
            let (SqlValue::Str(text), SqlValue::Str(pat)) = (&text, &pat) else {
                return SqlValue::Null;
            };
            let matched = like_match(text, pat, escape_char);
            SqlValue::Int(i64::from(matched != *negated))
        }

        Expr::Case {
            operand,
            when_then,
            else_expr,
            ..
        } => {
            let scrutinee = operand.as_deref().map(eval);
            for (when, then) in when_then {
                let hit = match &scrutinee {
                    Some(value) => eq(value, &eval(when)) == Some(true),
                    None => eval(when).truthy() == Some(true),
                };
                if hit {
                    return eval(then);
                }
            }
            else_expr.as_deref().map_or(SqlValue::Null, eval)
        }

        Expr::FunctionCall(FunctionCall::Count { arg, .. }) => match arg {
            CountArg::Star => SqlValue::Int(1),
            CountArg::Expr(e) => SqlValue::Int(i64::from(!eval(e).is_null())),
        },

        Expr::Tuple { .. } => panic!("oracle cannot evaluate a bare tuple"),
        other => panic!("oracle does not evaluate {other:?}"),
    }
}

pub fn eval_sql(sql: &str) -> SqlValue {
    let expr = parse_expression(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));
    eval(&expr)
}

pub fn assert_int(sql: &str, expected: i64) {
    assert_eq!(
        eval_sql(sql),
        SqlValue::Int(expected),
        "wrong value for: {sql}"
    );
}

pub fn assert_null(sql: &str) {
    assert_eq!(eval_sql(sql), SqlValue::Null, "expected NULL for: {sql}");
}
