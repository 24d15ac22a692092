//! Name resolution scopes.
//!
//! Each SELECT pushes a scope holding the tables its FROM clause
//! binds. Subqueries see outer scopes (correlation); unqualified
//! columns resolve innermost-first and must match exactly one binding
//! within the scope that first yields any match.

use std::sync::Arc;

use tracing::trace;

use crate::reflection::Table;
use crate::types::DbType;

/// A table visible in a scope, under the alias it was bound with.
#[derive(Debug, Clone)]
pub(crate) struct TableBinding {
    pub alias: String,
    pub table: Arc<Table>,
    /// Set for the inner side of an outer join; forces every column
    /// of this binding nullable.
    pub forced_nullable: bool,
}

/// Outcome of resolving a column reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnResolution {
    Found { db_type: DbType, nullable: bool },
    NotFound,
    Ambiguous,
}

#[derive(Debug, Default)]
pub(crate) struct Scope {
    tables: Vec<TableBinding>,
}

impl Scope {
    fn binding(&self, alias: &str) -> Option<&TableBinding> {
        self.tables
            .iter()
            .find(|b| b.alias.eq_ignore_ascii_case(alias))
    }
}

#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self) {
        trace!(depth = self.scopes.len() + 1, "push scope");
        self.scopes.push(Scope::default());
    }

    pub(crate) fn pop(&mut self) {
        trace!(depth = self.scopes.len(), "pop scope");
        self.scopes.pop();
    }

    /// Binds a table in the innermost scope. Fails when the alias is
    /// already taken there.
    pub(crate) fn add_table(&mut self, binding: TableBinding) -> Result<(), ()> {
        let Some(scope) = self.scopes.last_mut() else {
            return Err(());
        };
        if scope.binding(&binding.alias).is_some() {
            return Err(());
        }
        scope.tables.push(binding);
        Ok(())
    }

    /// The bindings of the innermost scope, in FROM order. Used for
    /// `*` expansion.
    pub(crate) fn current_bindings(&self) -> &[TableBinding] {
        self.scopes.last().map_or(&[], |s| &s.tables)
    }

    /// Finds the binding for a table alias, innermost scope first.
    pub(crate) fn find_binding(&self, alias: &str) -> Option<&TableBinding> {
        self.scopes.iter().rev().find_map(|s| s.binding(alias))
    }

    /// Resolves a column reference.
    ///
    /// A qualifier is looked up innermost-first; the nearest scope
    /// holding the alias decides. Unqualified names resolve in the
    /// nearest scope where any table has the column, and must be
    /// unambiguous within that scope.
    pub(crate) fn resolve(&self, table: Option<&str>, column: &str) -> ColumnResolution {
        if let Some(alias) = table {
            return match self.find_binding(alias) {
                Some(binding) => match binding.table.column(column) {
                    Some(col) => ColumnResolution::Found {
                        db_type: col.db_type,
                        nullable: col.nullable || binding.forced_nullable,
                    },
                    None => ColumnResolution::NotFound,
                },
                None => ColumnResolution::NotFound,
            };
        }

        for scope in self.scopes.iter().rev() {
            let mut found = None;
            for binding in &scope.tables {
                if let Some(col) = binding.table.column(column) {
                    if found.is_some() {
                        return ColumnResolution::Ambiguous;
                    }
                    found = Some(ColumnResolution::Found {
                        db_type: col.db_type,
                        nullable: col.nullable || binding.forced_nullable,
                    });
                }
            }
            if let Some(resolution) = found {
                return resolution;
            }
        }
        ColumnResolution::NotFound
    }
}
