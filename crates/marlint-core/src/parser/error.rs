//! Parser error types.

use crate::lexer::{LexError, Position};

/// An error that can occur during parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The tokenizer rejected the input.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The token stream did not match the grammar.
    #[error("Expected {expected}, found {found} at {position}")]
    Unexpected {
        /// What the grammar required at this point.
        expected: String,
        /// Description of the offending token.
        found: String,
        /// Where the offending token starts.
        position: Position,
    },
}
