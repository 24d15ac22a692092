//! SQL Parser
//!
//! Turns token streams into the AST in [`crate::ast`]. Expressions use
//! precedence climbing; everything else is plain recursive descent.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod precedence;

pub use error::ParseError;
pub use parser::{parse_expression, parse_select, parse_statement, Parser};
