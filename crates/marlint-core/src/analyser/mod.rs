//! Static analysis of parsed statements.
//!
//! The analyser resolves names against schema reflection, infers a
//! type and nullability for every expression, and accumulates
//! diagnostics instead of failing on the first finding. Only broken
//! reflection (an unreadable or invalid schema source) aborts; a
//! missing table is itself a diagnostic.

mod messages;
mod scope;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::ast::{
    BinaryOp, CastType, CommonTableExpr, CountArg, DeleteStatement, Expr, FunctionCall,
    InsertSource, InsertStatement, JoinCondition, JoinKind, Limit, OrderByExpr, SelectExpr,
    SelectQuery, SimpleSelect, Statement, TableRef, UnaryOp, UpdateStatement, WithSelect,
};
use crate::lexer::Span;
use crate::parser::{parse_statement, ParseError};
use crate::reflection::{Column, DbReflection, ReflectionError, Table};
use crate::types::{signature, ArgCount, DbType, ExprType};

use scope::{ColumnResolution, ScopeStack, TableBinding};

/// What kind of finding a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnknownColumn,
    AmbiguousColumn,
    NotUniqueTableAlias,
    TableDoesntExist,
    DuplicateColumnName,
    InvalidTupleUsage,
    InvalidTupleComparison,
    InvalidBinaryOp,
    InvalidLikeUsage,
    InvalidLikeEscape,
    ColumnCountMismatch,
    WithColumnCountMismatch,
    InvalidFunctionArgument,
    MismatchedFunctionArguments,
    InsertColumnCountMismatch,
}

/// A single analyser finding with its formatted message and source
/// location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

/// One column of a SELECT result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumn {
    pub name: String,
    pub db_type: DbType,
    pub nullable: bool,
}

/// The outcome of analysing a statement.
///
/// `columns` is `Some` for SELECT statements and `None` for DML, which
/// produces no result set.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyserResult {
    pub columns: Option<Vec<ResultColumn>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Errors that abort analysis entirely.
#[derive(Debug, thiserror::Error)]
pub enum AnalyserError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reflection(#[from] ReflectionError),
}

/// The analyser entry point, borrowing a schema reflection.
pub struct Analyser<'a> {
    reflection: &'a dyn DbReflection,
}

impl<'a> Analyser<'a> {
    /// Creates an analyser over the given reflection.
    #[must_use]
    pub fn new(reflection: &'a dyn DbReflection) -> Self {
        Self { reflection }
    }

    /// Parses and analyses a single statement.
    ///
    /// # Errors
    ///
    /// Parse failures and hard reflection failures. Semantic findings
    /// never error; they land in [`AnalyserResult::diagnostics`].
    pub fn analyse(&self, source: &str) -> Result<AnalyserResult, AnalyserError> {
        let statement = parse_statement(source)?;
        self.analyse_statement(source, &statement)
    }

    /// Analyses an already parsed statement. `source` must be the text
    /// the statement was parsed from; it names unaliased result
    /// columns.
    ///
    /// # Errors
    ///
    /// Hard reflection failures only.
    pub fn analyse_statement(
        &self,
        source: &str,
        statement: &Statement,
    ) -> Result<AnalyserResult, AnalyserError> {
        let mut ctx = Ctx {
            source,
            reflection: self.reflection,
            scopes: ScopeStack::new(),
            cte_layers: Vec::new(),
            alias_frames: Vec::new(),
            diagnostics: Vec::new(),
        };

        let columns = match statement {
            Statement::Select(query) => Some(ctx.analyse_select(query)?),
            Statement::Insert(insert) => {
                ctx.analyse_insert(insert)?;
                None
            }
            Statement::Update(update) => {
                ctx.analyse_update(update)?;
                None
            }
            Statement::Delete(delete) => {
                ctx.analyse_delete(delete)?;
                None
            }
        };

        Ok(AnalyserResult {
            columns,
            diagnostics: ctx.diagnostics,
        })
    }
}

struct Ctx<'a> {
    source: &'a str,
    reflection: &'a dyn DbReflection,
    scopes: ScopeStack,
    /// CTE tables visible per WITH level, innermost last.
    cte_layers: Vec<HashMap<String, Arc<Table>>>,
    /// Select-list aliases visible to GROUP BY, HAVING and ORDER BY.
    alias_frames: Vec<HashMap<String, ExprType>>,
    diagnostics: Vec<Diagnostic>,
}

impl Ctx<'_> {
    fn diag(&mut self, kind: DiagnosticKind, message: String, span: Span) {
        debug!(kind = ?kind, message = %message, "diagnostic");
        self.diagnostics.push(Diagnostic {
            kind,
            message,
            span,
        });
    }

    // ---- queries ----

    fn analyse_select(
        &mut self,
        query: &SelectQuery,
    ) -> Result<Vec<ResultColumn>, ReflectionError> {
        match query {
            SelectQuery::Simple(select) => self.analyse_simple(select),
            SelectQuery::Compound(compound) => {
                let left = self.analyse_select(&compound.left)?;
                let right = self.analyse_select(&compound.right)?;
                if left.len() != right.len() {
                    self.diag(
                        DiagnosticKind::ColumnCountMismatch,
                        messages::different_number_of_columns(left.len(), right.len()),
                        compound.span,
                    );
                    return Ok(left);
                }
                // names come from the first select, types unify
                Ok(left
                    .into_iter()
                    .zip(right)
                    .map(|(l, r)| ResultColumn {
                        name: l.name,
                        db_type: l.db_type.unify(r.db_type),
                        nullable: l.nullable || r.nullable,
                    })
                    .collect())
            }
            SelectQuery::With(with) => self.analyse_with(with),
        }
    }

    fn analyse_with(&mut self, with: &WithSelect) -> Result<Vec<ResultColumn>, ReflectionError> {
        self.cte_layers.push(HashMap::new());

        for cte in &with.ctes {
            // a recursive CTE must be visible inside its own body; the
            // placeholder carries the declared column names untyped
            if with.recursive {
                if let Some(names) = &cte.column_names {
                    let placeholder = synthesize_table(
                        &cte.name,
                        &names
                            .iter()
                            .map(|n| ResultColumn {
                                name: n.clone(),
                                db_type: DbType::Unknown,
                                nullable: true,
                            })
                            .collect::<Vec<_>>(),
                    );
                    self.register_cte(&cte.name, placeholder);
                }
            }
            let table = self.analyse_cte(cte)?;
            self.register_cte(&cte.name, table);
        }

        let columns = self.analyse_select(&with.body)?;
        self.cte_layers.pop();
        Ok(columns)
    }

    fn analyse_cte(&mut self, cte: &CommonTableExpr) -> Result<Arc<Table>, ReflectionError> {
        let mut columns = self.analyse_select(&cte.query)?;

        if let Some(names) = &cte.column_names {
            if names.len() != columns.len() {
                self.diag(
                    DiagnosticKind::WithColumnCountMismatch,
                    messages::different_number_of_with_columns(names.len(), columns.len()),
                    cte.span,
                );
            }
            for (column, name) in columns.iter_mut().zip(names) {
                column.name = name.clone();
            }
        }

        self.report_duplicate_columns(&columns, cte.span);
        Ok(synthesize_table(&cte.name, &columns))
    }

    fn register_cte(&mut self, name: &str, table: Arc<Table>) {
        if let Some(layer) = self.cte_layers.last_mut() {
            layer.insert(name.to_ascii_lowercase(), table);
        }
    }

    fn find_cte(&self, name: &str) -> Option<Arc<Table>> {
        let key = name.to_ascii_lowercase();
        self.cte_layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(&key).map(Arc::clone))
    }

    fn analyse_simple(
        &mut self,
        select: &SimpleSelect,
    ) -> Result<Vec<ResultColumn>, ReflectionError> {
        self.scopes.push();

        if let Some(from) = &select.from {
            self.bind_table_ref(from, false)?;
        }

        if let Some(where_clause) = &select.where_clause {
            self.infer(where_clause)?;
        }

        let mut columns = Vec::new();
        for item in &select.columns {
            match item {
                SelectExpr::Star { table, span } => self.expand_star(table.as_deref(), *span, &mut columns),
                SelectExpr::Expr { expr, alias, span: _ } => {
                    let inferred = self.infer(expr)?;
                    let name = alias.clone().unwrap_or_else(|| match expr {
                        Expr::Column { name, .. } => name.clone(),
                        other => String::from(other.span().slice(self.source)),
                    });
                    columns.push(ResultColumn {
                        name,
                        db_type: inferred.db_type,
                        nullable: inferred.nullable,
                    });
                }
            }
        }

        // select aliases are visible to the remaining clauses
        let mut aliases = HashMap::new();
        for column in &columns {
            aliases.insert(
                column.name.to_ascii_lowercase(),
                ExprType::new(column.db_type, column.nullable),
            );
        }
        self.alias_frames.push(aliases);

        for expr in &select.group_by {
            self.infer(expr)?;
        }
        if let Some(having) = &select.having {
            self.infer(having)?;
        }
        for entry in &select.order_by {
            self.infer(&entry.expr)?;
        }
        if let Some(limit) = &select.limit {
            self.infer_limit(limit)?;
        }

        self.alias_frames.pop();
        self.scopes.pop();
        Ok(columns)
    }

    fn expand_star(
        &mut self,
        table: Option<&str>,
        span: Span,
        columns: &mut Vec<ResultColumn>,
    ) {
        let bindings = self.scopes.current_bindings();

        let expanded: Option<Vec<ResultColumn>> = match table {
            Some(alias) => bindings
                .iter()
                .find(|b| b.alias.eq_ignore_ascii_case(alias))
                .map(star_columns),
            None => {
                if bindings.is_empty() {
                    None
                } else {
                    Some(bindings.iter().flat_map(star_columns).collect())
                }
            }
        };

        match expanded {
            Some(mut cols) => columns.append(&mut cols),
            None => {
                let message = messages::unknown_column("*", table);
                self.diag(DiagnosticKind::UnknownColumn, message, span);
            }
        }
    }

    fn infer_limit(&mut self, limit: &Limit) -> Result<(), ReflectionError> {
        self.infer(&limit.count)?;
        if let Some(offset) = &limit.offset {
            self.infer(offset)?;
        }
        Ok(())
    }

    fn report_duplicate_columns(&mut self, columns: &[ResultColumn], span: Span) {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&column.name))
            {
                self.diag(
                    DiagnosticKind::DuplicateColumnName,
                    messages::duplicate_column_name(&column.name),
                    span,
                );
            }
        }
    }

    // ---- FROM binding ----

    fn bind_table_ref(
        &mut self,
        table_ref: &TableRef,
        forced_nullable: bool,
    ) -> Result<(), ReflectionError> {
        match table_ref {
            TableRef::Named { name, alias, span } => {
                self.bind_named(name, alias.as_deref(), *span, forced_nullable)
            }
            TableRef::Subquery { query, alias, span } => {
                let columns = self.analyse_select(query)?;
                self.report_duplicate_columns(&columns, *span);
                let table = synthesize_table(alias, &columns);
                self.bind(alias, table, forced_nullable, *span);
                Ok(())
            }
            TableRef::Join {
                kind,
                left,
                right,
                condition,
                span: _,
            } => {
                self.bind_table_ref(
                    left,
                    forced_nullable || matches!(kind, JoinKind::RightOuter),
                )?;
                self.bind_table_ref(
                    right,
                    forced_nullable || matches!(kind, JoinKind::LeftOuter),
                )?;
                match condition {
                    JoinCondition::On(expr) => {
                        self.infer(expr)?;
                    }
                    JoinCondition::Using(names) => {
                        for name in names {
                            if matches!(
                                self.scopes.resolve(None, name),
                                ColumnResolution::NotFound
                            ) {
                                let message = messages::unknown_column(name, None);
                                self.diag(
                                    DiagnosticKind::UnknownColumn,
                                    message,
                                    table_ref.span(),
                                );
                            }
                        }
                    }
                    JoinCondition::None => {}
                }
                Ok(())
            }
        }
    }

    fn bind_named(
        &mut self,
        name: &str,
        alias: Option<&str>,
        span: Span,
        forced_nullable: bool,
    ) -> Result<(), ReflectionError> {
        let table = if let Some(cte) = self.find_cte(name) {
            cte
        } else {
            match self.reflection.find_table_schema(name) {
                Ok(table) => table,
                Err(ReflectionError::TableNotFound(missing)) => {
                    let message = messages::table_doesnt_exist(&missing);
                    self.diag(DiagnosticKind::TableDoesntExist, message, span);
                    return Ok(());
                }
                Err(other) => return Err(other),
            }
        };
        self.bind(alias.unwrap_or(name), table, forced_nullable, span);
        Ok(())
    }

    fn bind(&mut self, alias: &str, table: Arc<Table>, forced_nullable: bool, span: Span) {
        let binding = TableBinding {
            alias: String::from(alias),
            table,
            forced_nullable,
        };
        if self.scopes.add_table(binding).is_err() {
            let message = messages::not_unique_table_alias(alias);
            self.diag(DiagnosticKind::NotUniqueTableAlias, message, span);
        }
    }

    // ---- DML ----

    fn analyse_insert(&mut self, insert: &InsertStatement) -> Result<(), ReflectionError> {
        let table = match self.reflection.find_table_schema(&insert.table) {
            Ok(table) => table,
            Err(ReflectionError::TableNotFound(missing)) => {
                let message = messages::table_doesnt_exist(&missing);
                self.diag(DiagnosticKind::TableDoesntExist, message, insert.span);
                return Ok(());
            }
            Err(other) => return Err(other),
        };

        let expected = match &insert.columns {
            Some(names) => {
                for name in names {
                    if table.column(name).is_none() {
                        let message = messages::unknown_column(name, Some(&insert.table));
                        self.diag(DiagnosticKind::UnknownColumn, message, insert.span);
                    }
                }
                names.len()
            }
            None => table.columns.len(),
        };

        self.scopes.push();
        match &insert.source {
            InsertSource::Values(rows) => {
                for row in rows {
                    if row.len() != expected {
                        self.diag(
                            DiagnosticKind::InsertColumnCountMismatch,
                            messages::mismatched_insert_column_count(expected, row.len()),
                            insert.span,
                        );
                    }
                    for expr in row {
                        self.infer(expr)?;
                    }
                }
            }
            InsertSource::Select(query) => {
                let columns = self.analyse_select(query)?;
                if columns.len() != expected {
                    self.diag(
                        DiagnosticKind::InsertColumnCountMismatch,
                        messages::mismatched_insert_column_count(expected, columns.len()),
                        insert.span,
                    );
                }
            }
        }
        self.scopes.pop();
        Ok(())
    }

    fn analyse_update(&mut self, update: &UpdateStatement) -> Result<(), ReflectionError> {
        self.scopes.push();
        self.bind_table_ref(&update.table, false)?;

        for assignment in &update.assignments {
            let resolution = self
                .scopes
                .resolve(assignment.table.as_deref(), &assignment.column);
            match resolution {
                ColumnResolution::NotFound => {
                    let message =
                        messages::unknown_column(&assignment.column, assignment.table.as_deref());
                    self.diag(DiagnosticKind::UnknownColumn, message, assignment.span);
                }
                ColumnResolution::Ambiguous => {
                    let message = messages::ambiguous_column(
                        &assignment.column,
                        assignment.table.as_deref(),
                    );
                    self.diag(DiagnosticKind::AmbiguousColumn, message, assignment.span);
                }
                ColumnResolution::Found { .. } => {}
            }
            self.infer(&assignment.value)?;
        }

        if let Some(where_clause) = &update.where_clause {
            self.infer(where_clause)?;
        }
        self.scopes.pop();
        Ok(())
    }

    fn analyse_delete(&mut self, delete: &DeleteStatement) -> Result<(), ReflectionError> {
        self.scopes.push();
        self.bind_table_ref(&delete.table, false)?;
        if let Some(where_clause) = &delete.where_clause {
            self.infer(where_clause)?;
        }
        self.scopes.pop();
        Ok(())
    }

    // ---- expression inference ----

    fn infer(&mut self, expr: &Expr) -> Result<ExprType, ReflectionError> {
        match expr {
            Expr::Column { table, name, span } => {
                Ok(self.infer_column(table.as_deref(), name, *span))
            }
            Expr::Placeholder { .. } => Ok(ExprType::unknown()),
            Expr::LiteralInt { .. } => Ok(ExprType::not_null(DbType::Int)),
            Expr::LiteralFloat { .. } => Ok(ExprType::not_null(DbType::Float)),
            Expr::LiteralString { .. } => Ok(ExprType::not_null(DbType::Varchar)),
            Expr::LiteralNull { .. } => Ok(ExprType::nullable(DbType::Null)),

            Expr::Unary { op, expr, .. } => {
                let operand = self.infer(expr)?;
                self.require_scalar(&operand, expr.span());
                let db_type = match op {
                    UnaryOp::Bang | UnaryOp::Not | UnaryOp::BitNot => DbType::Int,
                    UnaryOp::Minus | UnaryOp::Plus => match operand.db_type {
                        DbType::Int | DbType::Float | DbType::Decimal => operand.db_type,
                        DbType::Varchar => DbType::Float,
                        DbType::Null => DbType::Null,
                        _ => DbType::Unknown,
                    },
                };
                Ok(ExprType::new(db_type, operand.nullable))
            }

            Expr::Binary {
                op,
                left,
                right,
                span,
            } => self.infer_binary(*op, left, right, *span),

            Expr::FunctionCall(call) => self.infer_call(call),

            Expr::Tuple { exprs, .. } => {
                let mut nullable = false;
                for expr in exprs {
                    nullable |= self.infer(expr)?.nullable;
                }
                Ok(ExprType::new(DbType::Tuple(exprs.len()), nullable))
            }

            Expr::Subquery { query, .. } => {
                let columns = self.analyse_select(query)?;
                if columns.len() == 1 {
                    // an empty result set reads as NULL in scalar position
                    Ok(ExprType::nullable(columns[0].db_type))
                } else {
                    Ok(ExprType::nullable(DbType::Tuple(columns.len())))
                }
            }

            Expr::Between {
                expr, min, max, ..
            } => {
                let mut nullable = false;
                for operand in [expr, min, max] {
                    let inferred = self.infer(operand)?;
                    self.require_scalar(&inferred, operand.span());
                    nullable |= inferred.nullable;
                }
                Ok(ExprType::new(DbType::Int, nullable))
            }

            Expr::Is { expr, .. } => {
                let operand = self.infer(expr)?;
                self.require_scalar(&operand, expr.span());
                Ok(ExprType::not_null(DbType::Int))
            }

            Expr::In {
                left, right, span, ..
            } => self.infer_in(left, right, *span),

            Expr::Like {
                expr,
                pattern,
                escape,
                span,
                ..
            } => self.infer_like(expr, pattern, escape.as_deref(), *span),

            Expr::Interval { value, .. } => {
                let operand = self.infer(value)?;
                self.require_scalar(&operand, value.span());
                Ok(ExprType::new(DbType::Unknown, operand.nullable))
            }

            Expr::Collate { expr, .. } => {
                let operand = self.infer(expr)?;
                self.require_scalar(&operand, expr.span());
                Ok(ExprType::new(DbType::Varchar, operand.nullable))
            }

            Expr::Case {
                operand,
                when_then,
                else_expr,
                ..
            } => {
                if let Some(operand) = operand {
                    let inferred = self.infer(operand)?;
                    self.require_scalar(&inferred, operand.span());
                }
                let mut db_type = DbType::Null;
                let mut nullable = else_expr.is_none();
                for (when, then) in when_then {
                    self.infer(when)?;
                    let branch = self.infer(then)?;
                    self.require_scalar(&branch, then.span());
                    db_type = db_type.unify(branch.db_type);
                    nullable |= branch.nullable;
                }
                if let Some(else_expr) = else_expr {
                    let branch = self.infer(else_expr)?;
                    self.require_scalar(&branch, else_expr.span());
                    db_type = db_type.unify(branch.db_type);
                    nullable |= branch.nullable;
                }
                Ok(ExprType::new(db_type, nullable))
            }
        }
    }

    fn infer_column(&mut self, table: Option<&str>, name: &str, span: Span) -> ExprType {
        match self.scopes.resolve(table, name) {
            ColumnResolution::Found { db_type, nullable } => ExprType::new(db_type, nullable),
            ColumnResolution::Ambiguous => {
                let message = messages::ambiguous_column(name, table);
                self.diag(DiagnosticKind::AmbiguousColumn, message, span);
                ExprType::unknown()
            }
            ColumnResolution::NotFound => {
                if table.is_none() {
                    let key = name.to_ascii_lowercase();
                    if let Some(aliased) = self
                        .alias_frames
                        .last()
                        .and_then(|frame| frame.get(&key))
                    {
                        return *aliased;
                    }
                }
                let message = messages::unknown_column(name, table);
                self.diag(DiagnosticKind::UnknownColumn, message, span);
                ExprType::unknown()
            }
        }
    }

    fn infer_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> Result<ExprType, ReflectionError> {
        let lt = self.infer(left)?;
        let rt = self.infer(right)?;

        if op.is_comparison() {
            if lt.db_type.arity() != rt.db_type.arity() {
                self.diag(
                    DiagnosticKind::InvalidTupleComparison,
                    messages::invalid_tuple_comparison(&lt.db_type, &rt.db_type),
                    span,
                );
            }
            // <=> never yields NULL
            let nullable = op != BinaryOp::NullSafeEq && (lt.nullable || rt.nullable);
            return Ok(ExprType::new(DbType::Int, nullable));
        }

        self.require_scalar(&lt, left.span());
        self.require_scalar(&rt, right.span());

        let bitwise = matches!(
            op,
            BinaryOp::BitOr
                | BinaryOp::BitAnd
                | BinaryOp::BitXor
                | BinaryOp::ShiftLeft
                | BinaryOp::ShiftRight
        );
        if bitwise && (lt.db_type == DbType::DateTime || rt.db_type == DbType::DateTime) {
            self.diag(
                DiagnosticKind::InvalidBinaryOp,
                messages::invalid_binary_op(op.as_str(), &lt.db_type, &rt.db_type),
                span,
            );
        }

        let db_type = match op {
            BinaryOp::Or | BinaryOp::Xor | BinaryOp::And | BinaryOp::IntDiv => DbType::Int,
            _ if bitwise => DbType::Int,
            BinaryOp::Div => {
                if lt.db_type == DbType::Float || rt.db_type == DbType::Float {
                    DbType::Float
                } else {
                    DbType::Decimal
                }
            }
            _ => numeric_result(lt.db_type, rt.db_type),
        };

        // division and modulo can produce NULL (zero divisor)
        let nullable = lt.nullable
            || rt.nullable
            || matches!(op, BinaryOp::Div | BinaryOp::IntDiv | BinaryOp::Mod);
        Ok(ExprType::new(db_type, nullable))
    }

    fn infer_in(
        &mut self,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> Result<ExprType, ReflectionError> {
        let lt = self.infer(left)?;
        let mut nullable = lt.nullable;

        match right {
            // the list is compared element-wise against the left side
            Expr::Tuple { exprs, .. } => {
                for element in exprs {
                    let et = self.infer(element)?;
                    nullable |= et.nullable;
                    if et.db_type.arity() != lt.db_type.arity() {
                        self.diag(
                            DiagnosticKind::InvalidTupleComparison,
                            messages::invalid_tuple_comparison(&lt.db_type, &et.db_type),
                            element.span(),
                        );
                    }
                }
            }
            other => {
                let rt = self.infer(other)?;
                nullable |= rt.nullable;
                if rt.db_type.arity() != lt.db_type.arity() {
                    self.diag(
                        DiagnosticKind::InvalidTupleComparison,
                        messages::invalid_tuple_comparison(&lt.db_type, &rt.db_type),
                        span,
                    );
                }
            }
        }
        Ok(ExprType::new(DbType::Int, nullable))
    }

    fn infer_like(
        &mut self,
        expr: &Expr,
        pattern: &Expr,
        escape: Option<&Expr>,
        span: Span,
    ) -> Result<ExprType, ReflectionError> {
        let et = self.infer(expr)?;
        let pt = self.infer(pattern)?;
        let esc = escape.map(|e| self.infer(e)).transpose()?;

        let escape_tuple = esc.is_some_and(|t| !t.db_type.is_scalar());
        if !et.db_type.is_scalar() || !pt.db_type.is_scalar() || escape_tuple {
            self.diag(
                DiagnosticKind::InvalidLikeUsage,
                messages::invalid_like_usage(
                    &et.db_type,
                    &pt.db_type,
                    esc.as_ref().map(|t| &t.db_type),
                ),
                span,
            );
        }

        if let Some(Expr::LiteralString { value, span }) = escape {
            if value.chars().count() != 1 {
                self.diag(
                    DiagnosticKind::InvalidLikeEscape,
                    messages::invalid_like_escape(value),
                    *span,
                );
            }
        }

        let nullable = et.nullable || pt.nullable || esc.is_some_and(|t| t.nullable);
        Ok(ExprType::new(DbType::Int, nullable))
    }

    fn infer_call(&mut self, call: &FunctionCall) -> Result<ExprType, ReflectionError> {
        match call {
            FunctionCall::Count { arg, .. } => {
                if let CountArg::Expr(expr) = arg {
                    let inferred = self.infer(expr)?;
                    self.require_scalar(&inferred, expr.span());
                }
                Ok(ExprType::not_null(DbType::Int))
            }

            FunctionCall::Cast { expr, target, .. } => {
                let operand = self.infer(expr)?;
                self.require_scalar(&operand, expr.span());
                let db_type = match target {
                    CastType::Signed | CastType::Unsigned => DbType::Int,
                    CastType::Char | CastType::Binary => DbType::Varchar,
                    CastType::Float | CastType::Double => DbType::Float,
                    CastType::Decimal => DbType::Decimal,
                    CastType::Date | CastType::Time | CastType::Datetime => DbType::DateTime,
                };
                Ok(ExprType::new(db_type, operand.nullable))
            }

            FunctionCall::GroupConcat {
                exprs,
                order_by,
                limit,
                ..
            } => {
                for expr in exprs {
                    let inferred = self.infer(expr)?;
                    self.require_scalar(&inferred, expr.span());
                }
                self.infer_order_by(order_by)?;
                if let Some(limit) = limit {
                    self.infer_limit(limit)?;
                }
                Ok(ExprType::nullable(DbType::Varchar))
            }

            FunctionCall::Window {
                name,
                args,
                partition_by,
                order_by,
                span,
            } => {
                let types = self.infer_args(name, args, *span)?;
                for expr in partition_by {
                    self.infer(expr)?;
                }
                self.infer_order_by(order_by)?;
                Ok(signature(name).map_or_else(ExprType::unknown, |sig| sig.result_type(&types)))
            }

            FunctionCall::Standard {
                name, args, span, ..
            } => {
                let types = self.infer_args(name, args, *span)?;
                Ok(signature(name).map_or_else(ExprType::unknown, |sig| sig.result_type(&types)))
            }
        }
    }

    /// Infers all arguments and checks them against the declared
    /// signature, when there is one.
    fn infer_args(
        &mut self,
        name: &str,
        args: &[Expr],
        span: Span,
    ) -> Result<Vec<ExprType>, ReflectionError> {
        let mut types = Vec::with_capacity(args.len());
        for arg in args {
            types.push(self.infer(arg)?);
        }

        let Some(sig) = signature(name) else {
            return Ok(types);
        };

        if sig.count.accepts(args.len()) {
            for (position, (arg, inferred)) in args.iter().zip(&types).enumerate() {
                if !sig.kind_at(position).accepts(&inferred.db_type) {
                    self.diag(
                        DiagnosticKind::InvalidFunctionArgument,
                        messages::invalid_function_argument(
                            name,
                            position + 1,
                            &inferred.db_type,
                        ),
                        arg.span(),
                    );
                }
            }
        } else {
            let (min, max) = sig.count.bounds();
            let max = if matches!(sig.count, ArgCount::AtLeast(_)) {
                min
            } else {
                max
            };
            self.diag(
                DiagnosticKind::MismatchedFunctionArguments,
                messages::mismatched_function_arguments(name, args.len(), min, max),
                span,
            );
        }
        Ok(types)
    }

    fn infer_order_by(&mut self, entries: &[OrderByExpr]) -> Result<(), ReflectionError> {
        for entry in entries {
            self.infer(&entry.expr)?;
        }
        Ok(())
    }

    fn require_scalar(&mut self, inferred: &ExprType, span: Span) {
        if !inferred.db_type.is_scalar() {
            let message = messages::invalid_tuple_usage(&inferred.db_type);
            self.diag(DiagnosticKind::InvalidTupleUsage, message, span);
        }
    }
}

fn star_columns(binding: &TableBinding) -> Vec<ResultColumn> {
    binding
        .table
        .columns
        .iter()
        .map(|c| ResultColumn {
            name: c.name.clone(),
            db_type: c.db_type,
            nullable: c.nullable || binding.forced_nullable,
        })
        .collect()
}

fn synthesize_table(name: &str, columns: &[ResultColumn]) -> Arc<Table> {
    Arc::new(Table {
        name: String::from(name),
        columns: columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                db_type: c.db_type,
                nullable: c.nullable,
            })
            .collect(),
    })
}

/// Result kind of `+ - * MOD` over two scalar operand kinds.
fn numeric_result(left: DbType, right: DbType) -> DbType {
    match (left, right) {
        (DbType::Unknown, _) | (_, DbType::Unknown) => DbType::Unknown,
        (DbType::Float, _) | (_, DbType::Float) | (DbType::Varchar, _) | (_, DbType::Varchar) => {
            DbType::Float
        }
        (DbType::Decimal, _) | (_, DbType::Decimal) => DbType::Decimal,
        _ => DbType::Int,
    }
}
