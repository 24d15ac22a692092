//! SQL Lexer/Tokenizer
//!
//! A hand-written lexer for the MariaDB dialect that produces positioned
//! tokens, ending with an end-of-input sentinel.

mod span;
mod token;
mod tokenizer;

pub use span::{Position, Span};
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{LexError, Lexer};
