//! # marlint-core
//!
//! A static analyser for MariaDB SQL: it parses a query without
//! executing it and reports what the database would complain about,
//! plus the shape of the result set.
//!
//! This crate provides:
//! - A hand-written tokenizer and recursive descent parser for the
//!   MariaDB dialect, with precedence-climbing expression parsing
//! - An analyser that resolves names against a schema, infers a type
//!   and nullability for every result column, and collects diagnostics
//! - Schema reflection from versioned JSON snapshots
//!
//! ## Analysing a query
//!
//! ```rust
//! use marlint_core::analyser::Analyser;
//! use marlint_core::reflection::FixtureReflection;
//! use marlint_core::types::DbType;
//!
//! let schema = FixtureReflection::new().with_table(
//!     "users",
//!     &[
//!         ("id", DbType::Int, false),
//!         ("email", DbType::Varchar, false),
//!     ],
//! );
//!
//! let analyser = Analyser::new(&schema);
//! let result = analyser
//!     .analyse("SELECT id, email FROM users WHERE id = ?")
//!     .unwrap();
//!
//! assert!(result.diagnostics.is_empty());
//! let columns = result.columns.unwrap();
//! assert_eq!(columns[0].name, "id");
//! assert_eq!(columns[0].db_type, DbType::Int);
//!
//! // a typo becomes a diagnostic, not a runtime surprise
//! let result = analyser.analyse("SELECT emial FROM users").unwrap();
//! assert_eq!(result.diagnostics[0].message, "Unknown column 'emial'");
//! ```

pub mod analyser;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod reflection;
pub mod types;

pub use analyser::{Analyser, AnalyserError, AnalyserResult, Diagnostic, DiagnosticKind, ResultColumn};
pub use ast::{Expr, SelectQuery, Statement};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_expression, parse_select, parse_statement, ParseError, Parser};
pub use reflection::{DbReflection, FixtureReflection, ReflectionError, SnapshotReflection};
pub use types::DbType;
