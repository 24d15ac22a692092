//! Recursive-descent parser for the supported MariaDB statement subset.
//!
//! Clause structure is handled by straightforward descent; expressions
//! use precedence climbing over the binding powers in
//! [`super::precedence`]. The parser is fail-fast: the first violation
//! aborts with a positioned [`ParseError`].

use crate::ast::{
    Assignment, BinaryOp, CastType, CommonTableExpr, CompoundSelect, CountArg, DeleteStatement,
    Expr, FunctionCall, InsertSource, InsertStatement, IntervalUnit, JoinCondition, JoinKind,
    Limit, LockWait, OrderByExpr, OrderDirection, SelectExpr, SelectLock, SelectQuery, SetOpKind,
    SimpleSelect, Statement, TableRef, UnaryOp, UpdateStatement, WithSelect,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

use super::error::ParseError;
use super::precedence::{
    infix_binding_power, BETWEEN_OPERAND_BP, COMPARISON_BP, NOT_BP, UNARY_BP,
};

/// Parses a full statement (SELECT, INSERT, UPDATE or DELETE).
///
/// # Errors
///
/// Returns a [`ParseError`] on malformed input.
pub fn parse_statement(source: &str) -> Result<Statement, ParseError> {
    Parser::new(source)?.parse_statement()
}

/// Parses a SELECT query, including WITH and compound forms.
///
/// # Errors
///
/// Returns a [`ParseError`] on malformed input.
pub fn parse_select(source: &str) -> Result<SelectQuery, ParseError> {
    Parser::new(source)?.parse_select()
}

/// Parses a standalone expression.
///
/// # Errors
///
/// Returns a [`ParseError`] on malformed input.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    Parser::new(source)?.parse_expression()
}

/// The parser state over an eagerly tokenized source.
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    idx: usize,
}

impl<'a> Parser<'a> {
    /// Tokenizes the source and prepares a parser over it.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError::Lex`] when the tokenizer rejects the
    /// input.
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            source,
            tokens,
            idx: 0,
        })
    }

    /// Parses a single statement and requires the input to end there.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed input.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let statement = self.statement()?;
        self.finish()?;
        Ok(statement)
    }

    /// Parses a single SELECT query and requires the input to end
    /// there.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed input.
    pub fn parse_select(&mut self) -> Result<SelectQuery, ParseError> {
        let query = self.select_query()?;
        self.finish()?;
        Ok(query)
    }

    /// Parses a standalone expression and requires the input to end
    /// there.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed input.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.expr(0)?;
        self.finish()?;
        Ok(expr)
    }

    // ---- token stream helpers ----

    fn current(&self) -> &Token {
        &self.tokens[self.idx]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.idx.saturating_sub(1)]
    }

    fn peek_kind(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.idx + n)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    /// Consumes and returns the current token, never moving past EOF.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.idx].clone();
        if !token.is_eof() {
            self.idx += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current().kind == *kind
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        self.current().as_keyword() == Some(kw)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<Token, ParseError> {
        if self.check_keyword(kw) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("keyword {}", kw.as_str())))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::Unexpected {
            expected: String::from(expected),
            found: self.current().kind.describe(),
            position: self.current().span.start,
        }
    }

    fn lexeme(&self, span: Span) -> String {
        String::from(span.slice(self.source))
    }

    /// Consumes an identifier, accepting the keywords MariaDB allows in
    /// identifier position. Keyword text is kept as written.
    fn expect_identifier(&mut self, what: &str) -> Result<(String, Span), ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok((name, token.span))
            }
            TokenKind::Keyword(kw) if kw.is_allowed_as_identifier() => {
                self.advance();
                Ok((self.lexeme(token.span), token.span))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.eat(&TokenKind::Semicolon);
        if self.current().is_eof() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn at_query_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::Select | Keyword::With)
        )
    }

    // ---- statements ----

    fn statement(&mut self) -> Result<Statement, ParseError> {
        match &self.current().kind {
            TokenKind::Keyword(Keyword::Select | Keyword::With) | TokenKind::LeftParen => {
                self.select_query().map(Statement::Select)
            }
            TokenKind::Keyword(Keyword::Insert) => self.insert_statement().map(Statement::Insert),
            TokenKind::Keyword(Keyword::Update) => self.update_statement().map(Statement::Update),
            TokenKind::Keyword(Keyword::Delete) => self.delete_statement().map(Statement::Delete),
            _ => Err(self.unexpected("a SELECT, INSERT, UPDATE or DELETE statement")),
        }
    }

    fn select_query(&mut self) -> Result<SelectQuery, ParseError> {
        if self.check_keyword(Keyword::With) {
            self.with_select()
        } else {
            self.compound_select()
        }
    }

    fn with_select(&mut self) -> Result<SelectQuery, ParseError> {
        let start = self.expect_keyword(Keyword::With)?.span;
        let recursive = self.eat_keyword(Keyword::Recursive);

        let mut ctes = Vec::new();
        loop {
            let cte_start = self.current().span;
            let (name, _) = self.expect_identifier("a CTE name")?;
            let column_names = if self.eat(&TokenKind::LeftParen) {
                let mut names = vec![self.expect_identifier("a column name")?.0];
                while self.eat(&TokenKind::Comma) {
                    names.push(self.expect_identifier("a column name")?.0);
                }
                self.expect(&TokenKind::RightParen, ")")?;
                Some(names)
            } else {
                None
            };
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen, "(")?;
            let query = self.select_query()?;
            self.expect(&TokenKind::RightParen, ")")?;
            ctes.push(CommonTableExpr {
                name,
                column_names,
                query: Box::new(query),
                span: cte_start.merge(self.previous().span),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let body = self.compound_select()?;
        Ok(SelectQuery::With(WithSelect {
            recursive,
            ctes,
            body: Box::new(body),
            span: start.merge(self.previous().span),
        }))
    }

    /// Parses a select and folds trailing set operators left to right.
    fn compound_select(&mut self) -> Result<SelectQuery, ParseError> {
        let start = self.current().span;
        let (mut left, mut parenthesized) = self.select_core()?;
        let mut compound = false;

        loop {
            let kind = if self.eat_keyword(Keyword::Union) {
                if self.eat_keyword(Keyword::All) {
                    SetOpKind::UnionAll
                } else {
                    self.eat_keyword(Keyword::Distinct);
                    SetOpKind::Union
                }
            } else if self.eat_keyword(Keyword::Intersect) {
                self.eat_keyword(Keyword::Distinct);
                SetOpKind::Intersect
            } else if self.eat_keyword(Keyword::Except) {
                self.eat_keyword(Keyword::Distinct);
                SetOpKind::Except
            } else {
                break;
            };
            compound = true;
            let (right, paren) = self.select_core()?;
            parenthesized = paren;
            left = SelectQuery::Compound(CompoundSelect {
                kind,
                left: Box::new(left),
                right: Box::new(right),
                order_by: Vec::new(),
                limit: None,
                span: start.merge(self.previous().span),
            });
        }

        // a trailing ORDER BY / LIMIT lands in the last member's parse
        // but orders the whole compound; parentheses keep it local
        if compound {
            if let SelectQuery::Compound(c) = &mut left {
                if !parenthesized {
                    if let SelectQuery::Simple(last) = c.right.as_mut() {
                        c.order_by = std::mem::take(&mut last.order_by);
                        c.limit = last.limit.take();
                    }
                }
                let order_by = self.order_by_clause()?;
                let limit = self.limit_clause()?;
                if !order_by.is_empty() {
                    c.order_by = order_by;
                }
                if limit.is_some() {
                    c.limit = limit;
                }
                c.span = start.merge(self.previous().span);
            }
        }
        Ok(left)
    }

    /// Parses one member of a (possibly compound) select. The flag says
    /// whether the member was parenthesized.
    fn select_core(&mut self) -> Result<(SelectQuery, bool), ParseError> {
        if self.eat(&TokenKind::LeftParen) {
            let query = self.select_query()?;
            self.expect(&TokenKind::RightParen, ")")?;
            Ok((query, true))
        } else {
            Ok((self.simple_select().map(SelectQuery::Simple)?, false))
        }
    }

    fn simple_select(&mut self) -> Result<SimpleSelect, ParseError> {
        let start = self.expect_keyword(Keyword::Select)?.span;

        let distinct = if self.eat_keyword(Keyword::Distinct) || self.eat_keyword(Keyword::Distinctrow)
        {
            true
        } else {
            self.eat_keyword(Keyword::All);
            false
        };

        let mut columns = vec![self.select_item()?];
        while self.eat(&TokenKind::Comma) {
            columns.push(self.select_item()?);
        }

        let from = if self.eat_keyword(Keyword::From) {
            Some(self.table_refs()?)
        } else {
            None
        };

        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.expr(0)?)
        } else {
            None
        };

        let (group_by, with_rollup) = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            let mut exprs = vec![self.expr(0)?];
            while self.eat(&TokenKind::Comma) {
                exprs.push(self.expr(0)?);
            }
            let rollup = if self.eat_keyword(Keyword::With) {
                self.expect_keyword(Keyword::Rollup)?;
                true
            } else {
                false
            };
            (exprs, rollup)
        } else {
            (Vec::new(), false)
        };

        let having = if self.eat_keyword(Keyword::Having) {
            Some(self.expr(0)?)
        } else {
            None
        };

        let order_by = self.order_by_clause()?;
        let limit = self.limit_clause()?;
        let lock = self.lock_clause()?;

        Ok(SimpleSelect {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            with_rollup,
            having,
            order_by,
            limit,
            lock,
            span: start.merge(self.previous().span),
        })
    }

    fn select_item(&mut self) -> Result<SelectExpr, ParseError> {
        let start = self.current().span;

        if self.eat(&TokenKind::Star) {
            return Ok(SelectExpr::Star {
                table: None,
                span: start,
            });
        }

        // alias.*
        if let TokenKind::Identifier(name) = &self.current().kind {
            if *self.peek_kind(1) == TokenKind::Dot && *self.peek_kind(2) == TokenKind::Star {
                let table = name.clone();
                self.advance();
                self.advance();
                self.advance();
                return Ok(SelectExpr::Star {
                    table: Some(table),
                    span: start.merge(self.previous().span),
                });
            }
        }

        let expr = self.expr(0)?;
        let alias = self.select_alias()?;
        Ok(SelectExpr::Expr {
            expr,
            alias,
            span: start.merge(self.previous().span),
        })
    }

    /// Optional select-item alias: `AS x`, a bare identifier, an
    /// allowed keyword, or a string literal.
    fn select_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_keyword(Keyword::As) {
            return self.implicit_alias(true)?.map_or_else(
                || Err(self.unexpected("an alias")),
                |alias| Ok(Some(alias)),
            );
        }
        self.implicit_alias(true)
    }

    fn implicit_alias(&mut self, allow_string: bool) -> Result<Option<String>, ParseError> {
        let token = self.current().clone();
        let alias = match token.kind {
            TokenKind::Identifier(name) => name,
            TokenKind::StringLit(value) if allow_string => value,
            TokenKind::Keyword(kw) if kw.is_allowed_as_identifier() => self.lexeme(token.span),
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(alias))
    }

    // ---- FROM clause ----

    fn table_refs(&mut self) -> Result<TableRef, ParseError> {
        let start = self.current().span;
        let mut left = self.table_factor()?;

        loop {
            let kind = if self.eat(&TokenKind::Comma) {
                JoinKind::Cross
            } else if self.eat_keyword(Keyword::Join) || self.eat_keyword(Keyword::StraightJoin) {
                JoinKind::Inner
            } else if self.eat_keyword(Keyword::Inner) {
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Inner
            } else if self.eat_keyword(Keyword::Cross) {
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Cross
            } else if self.eat_keyword(Keyword::Left) {
                self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::LeftOuter
            } else if self.eat_keyword(Keyword::Right) {
                self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::RightOuter
            } else {
                break;
            };

            let right = self.table_factor()?;
            let condition = self.join_condition(kind)?;
            left = TableRef::Join {
                kind,
                left: Box::new(left),
                right: Box::new(right),
                condition,
                span: start.merge(self.previous().span),
            };
        }
        Ok(left)
    }

    fn join_condition(&mut self, kind: JoinKind) -> Result<JoinCondition, ParseError> {
        if self.eat_keyword(Keyword::On) {
            Ok(JoinCondition::On(self.expr(0)?))
        } else if self.eat_keyword(Keyword::Using) {
            self.expect(&TokenKind::LeftParen, "(")?;
            let mut names = vec![self.expect_identifier("a column name")?.0];
            while self.eat(&TokenKind::Comma) {
                names.push(self.expect_identifier("a column name")?.0);
            }
            self.expect(&TokenKind::RightParen, ")")?;
            Ok(JoinCondition::Using(names))
        } else if matches!(kind, JoinKind::LeftOuter | JoinKind::RightOuter) {
            // outer joins require a condition
            Err(self.unexpected("ON or USING"))
        } else {
            Ok(JoinCondition::None)
        }
    }

    fn table_factor(&mut self) -> Result<TableRef, ParseError> {
        let start = self.current().span;

        if self.eat(&TokenKind::LeftParen) {
            if self.at_query_start() {
                let query = self.select_query()?;
                self.expect(&TokenKind::RightParen, ")")?;
                self.eat_keyword(Keyword::As);
                let (alias, _) = self.expect_identifier("a derived table alias")?;
                return Ok(TableRef::Subquery {
                    query: Box::new(query),
                    alias,
                    span: start.merge(self.previous().span),
                });
            }
            let table = self.table_refs()?;
            self.expect(&TokenKind::RightParen, ")")?;
            return Ok(table);
        }

        let (name, _) = self.expect_identifier("a table name")?;
        let alias = if self.eat_keyword(Keyword::As) {
            let (alias, _) = self.expect_identifier("an alias")?;
            Some(alias)
        } else {
            self.implicit_alias(false)?
        };
        Ok(TableRef::Named {
            name,
            alias,
            span: start.merge(self.previous().span),
        })
    }

    // ---- trailing clauses ----

    fn order_by_clause(&mut self) -> Result<Vec<OrderByExpr>, ParseError> {
        if !self.eat_keyword(Keyword::Order) {
            return Ok(Vec::new());
        }
        self.expect_keyword(Keyword::By)?;

        let mut entries = Vec::new();
        loop {
            let expr = self.expr(0)?;
            let direction = if self.eat_keyword(Keyword::Desc) {
                OrderDirection::Desc
            } else {
                self.eat_keyword(Keyword::Asc);
                OrderDirection::Asc
            };
            entries.push(OrderByExpr { expr, direction });
            if !self.eat(&TokenKind::Comma) {
                return Ok(entries);
            }
        }
    }

    fn limit_clause(&mut self) -> Result<Option<Limit>, ParseError> {
        if !self.eat_keyword(Keyword::Limit) {
            return Ok(None);
        }
        let first = self.expr(0)?;
        if self.eat(&TokenKind::Comma) {
            let count = self.expr(0)?;
            Ok(Some(Limit {
                count,
                offset: Some(first),
            }))
        } else if self.eat_keyword(Keyword::Offset) {
            let offset = self.expr(0)?;
            Ok(Some(Limit {
                count: first,
                offset: Some(offset),
            }))
        } else {
            Ok(Some(Limit {
                count: first,
                offset: None,
            }))
        }
    }

    fn lock_clause(&mut self) -> Result<Option<SelectLock>, ParseError> {
        if self.eat_keyword(Keyword::For) {
            self.expect_keyword(Keyword::Update)?;
            let wait = if self.eat_keyword(Keyword::Nowait) {
                LockWait::Nowait
            } else if self.eat_keyword(Keyword::Wait) {
                let token = self.current().clone();
                let seconds = match token.kind {
                    TokenKind::Int(v) => match u32::try_from(v) {
                        Ok(v) => f64::from(v),
                        Err(_) => return Err(self.unexpected("a wait timeout")),
                    },
                    TokenKind::Float(v) => v,
                    _ => return Err(self.unexpected("a wait timeout")),
                };
                self.advance();
                LockWait::Wait(seconds)
            } else if self.eat_keyword(Keyword::Skip) {
                self.expect_keyword(Keyword::Locked)?;
                LockWait::SkipLocked
            } else {
                LockWait::Default
            };
            return Ok(Some(SelectLock::ForUpdate(wait)));
        }
        if self.eat_keyword(Keyword::Lock) {
            self.expect_keyword(Keyword::In)?;
            self.expect_keyword(Keyword::Share)?;
            self.expect_keyword(Keyword::Mode)?;
            return Ok(Some(SelectLock::InShareMode));
        }
        Ok(None)
    }

    // ---- DML statements ----

    fn insert_statement(&mut self) -> Result<InsertStatement, ParseError> {
        let start = self.expect_keyword(Keyword::Insert)?.span;
        let ignore = self.eat_keyword(Keyword::Ignore);
        self.eat_keyword(Keyword::Into);
        let (table, _) = self.expect_identifier("a table name")?;

        // A parenthesis opens either the target column list or an
        // INSERT ... (SELECT ...) source.
        let columns = if self.check(&TokenKind::LeftParen)
            && !matches!(
                self.peek_kind(1),
                TokenKind::Keyword(Keyword::Select | Keyword::With)
            ) {
            self.advance();
            let mut names = vec![self.expect_identifier("a column name")?.0];
            while self.eat(&TokenKind::Comma) {
                names.push(self.expect_identifier("a column name")?.0);
            }
            self.expect(&TokenKind::RightParen, ")")?;
            Some(names)
        } else {
            None
        };

        let source = if self.eat_keyword(Keyword::Values) || self.eat_keyword(Keyword::Value) {
            let mut rows = Vec::new();
            loop {
                self.expect(&TokenKind::LeftParen, "(")?;
                let mut row = vec![self.expr(0)?];
                while self.eat(&TokenKind::Comma) {
                    row.push(self.expr(0)?);
                }
                self.expect(&TokenKind::RightParen, ")")?;
                rows.push(row);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            InsertSource::Values(rows)
        } else if self.at_query_start() || self.check(&TokenKind::LeftParen) {
            InsertSource::Select(Box::new(self.select_query()?))
        } else {
            return Err(self.unexpected("VALUES or a SELECT source"));
        };

        Ok(InsertStatement {
            table,
            columns,
            source,
            ignore,
            span: start.merge(self.previous().span),
        })
    }

    fn update_statement(&mut self) -> Result<UpdateStatement, ParseError> {
        let start = self.expect_keyword(Keyword::Update)?.span;
        let table = self.table_refs()?;
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = Vec::new();
        loop {
            let a_start = self.current().span;
            let (first, _) = self.expect_identifier("a column name")?;
            let (table_qualifier, column) = if self.eat(&TokenKind::Dot) {
                (Some(first), self.expect_identifier("a column name")?.0)
            } else {
                (None, first)
            };
            self.expect(&TokenKind::Eq, "=")?;
            let value = self.expr(0)?;
            assignments.push(Assignment {
                table: table_qualifier,
                column,
                value,
                span: a_start.merge(self.previous().span),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.expr(0)?)
        } else {
            None
        };

        Ok(UpdateStatement {
            table,
            assignments,
            where_clause,
            span: start.merge(self.previous().span),
        })
    }

    fn delete_statement(&mut self) -> Result<DeleteStatement, ParseError> {
        let start = self.expect_keyword(Keyword::Delete)?.span;
        self.expect_keyword(Keyword::From)?;
        let table = self.table_factor()?;
        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.expr(0)?)
        } else {
            None
        };
        Ok(DeleteStatement {
            table,
            where_clause,
            span: start.merge(self.previous().span),
        })
    }

    // ---- expressions ----

    /// Precedence climbing: parses prefixes, then folds infix
    /// operators whose left binding power reaches `min_bp`.
    fn expr(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.prefix()?;

        loop {
            // `NOT IN`, `NOT LIKE`, `NOT BETWEEN`, `NOT REGEXP` read as
            // one negated comparison operator.
            let (op_kind, negated) = match &self.current().kind {
                TokenKind::Keyword(Keyword::Not) => match self.peek_kind(1) {
                    TokenKind::Keyword(
                        kw @ (Keyword::In
                        | Keyword::Like
                        | Keyword::Between
                        | Keyword::Regexp
                        | Keyword::Rlike),
                    ) => (TokenKind::Keyword(*kw), true),
                    _ => break,
                },
                other => (other.clone(), false),
            };

            let Some((l_bp, r_bp)) = infix_binding_power(&op_kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            if negated {
                self.advance(); // NOT
            }

            left = self.infix(left, &op_kind, r_bp, negated)?;
        }
        Ok(left)
    }

    fn infix(
        &mut self,
        left: Expr,
        op_kind: &TokenKind,
        r_bp: u8,
        negated: bool,
    ) -> Result<Expr, ParseError> {
        let start = left.span();
        match op_kind {
            TokenKind::Keyword(Keyword::Is) => {
                self.advance();
                let is_negated = self.eat_keyword(Keyword::Not);
                let test = if self.eat_keyword(Keyword::True) {
                    Some(true)
                } else if self.eat_keyword(Keyword::False) {
                    Some(false)
                } else if self.eat_keyword(Keyword::Null) || self.eat_keyword(Keyword::Unknown) {
                    None
                } else {
                    return Err(self.unexpected("TRUE, FALSE or NULL"));
                };
                Ok(Expr::Is {
                    expr: Box::new(left),
                    test,
                    negated: is_negated,
                    span: start.merge(self.previous().span),
                })
            }

            TokenKind::Keyword(Keyword::Between) => {
                self.advance();
                // The low bound stops at the separating AND; the high
                // bound re-enters the comparison tier, making BETWEEN
                // right-recursive.
                let min = self.expr(BETWEEN_OPERAND_BP)?;
                self.expect_keyword(Keyword::And)?;
                let max = self.expr(COMPARISON_BP.0)?;
                Ok(Expr::Between {
                    expr: Box::new(left),
                    min: Box::new(min),
                    max: Box::new(max),
                    negated,
                    span: start.merge(self.previous().span),
                })
            }

            TokenKind::Keyword(Keyword::In) => {
                self.advance();
                let right = self.in_rhs()?;
                Ok(Expr::In {
                    left: Box::new(left),
                    right: Box::new(right),
                    negated,
                    span: start.merge(self.previous().span),
                })
            }

            TokenKind::Keyword(Keyword::Like) => {
                self.advance();
                let pattern = self.expr(r_bp)?;
                let escape = if self.eat_keyword(Keyword::Escape) {
                    Some(Box::new(self.expr(r_bp)?))
                } else {
                    None
                };
                Ok(Expr::Like {
                    expr: Box::new(left),
                    pattern: Box::new(pattern),
                    escape,
                    negated,
                    span: start.merge(self.previous().span),
                })
            }

            TokenKind::Keyword(Keyword::Regexp | Keyword::Rlike) => {
                self.advance();
                let right = self.expr(r_bp)?;
                let span = start.merge(self.previous().span);
                let binary = Expr::Binary {
                    op: BinaryOp::Regexp,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                };
                Ok(if negated {
                    Expr::Unary {
                        op: UnaryOp::Not,
                        expr: Box::new(binary),
                        span,
                    }
                } else {
                    binary
                })
            }

            TokenKind::Keyword(Keyword::Collate) => {
                self.advance();
                let collation = if self.eat_keyword(Keyword::Binary) {
                    String::from("binary")
                } else {
                    self.expect_identifier("a collation name")?.0
                };
                Ok(Expr::Collate {
                    expr: Box::new(left),
                    collation,
                    span: start.merge(self.previous().span),
                })
            }

            _ => {
                self.advance();
                let op = binary_op(op_kind);
                let right = self.expr(r_bp)?;
                Ok(Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                    span: start.merge(self.previous().span),
                })
            }
        }
    }

    /// The right side of IN: a subquery or an expression list, both
    /// parenthesized.
    fn in_rhs(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::LeftParen, "(")?.span;
        if self.at_query_start() {
            let query = self.select_query()?;
            self.expect(&TokenKind::RightParen, ")")?;
            return Ok(Expr::Subquery {
                query: Box::new(query),
                span: start.merge(self.previous().span),
            });
        }
        let mut exprs = vec![self.expr(0)?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.expr(0)?);
        }
        self.expect(&TokenKind::RightParen, ")")?;
        Ok(Expr::Tuple {
            exprs,
            span: start.merge(self.previous().span),
        })
    }

    fn prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        let start = token.span;

        match token.kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(Expr::LiteralInt { value, span: start })
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(Expr::LiteralFloat { value, span: start })
            }
            TokenKind::StringLit(value) => {
                self.advance();
                Ok(Expr::LiteralString { value, span: start })
            }
            TokenKind::HexLit(digits) => {
                self.advance();
                let value = i64::from_str_radix(&digits, 16).map_err(|_| {
                    ParseError::Unexpected {
                        expected: String::from("a hex literal within the 64-bit range"),
                        found: format!("0x{digits}"),
                        position: start.start,
                    }
                })?;
                Ok(Expr::LiteralInt { value, span: start })
            }
            TokenKind::BinLit(digits) => {
                self.advance();
                let value = i64::from_str_radix(&digits, 2).map_err(|_| {
                    ParseError::Unexpected {
                        expected: String::from("a binary literal within the 64-bit range"),
                        found: format!("0b{digits}"),
                        position: start.start,
                    }
                })?;
                Ok(Expr::LiteralInt { value, span: start })
            }
            TokenKind::Question => {
                self.advance();
                Ok(Expr::Placeholder { span: start })
            }

            TokenKind::Minus => self.unary(UnaryOp::Minus, UNARY_BP),
            TokenKind::Plus => self.unary(UnaryOp::Plus, UNARY_BP),
            TokenKind::Tilde => self.unary(UnaryOp::BitNot, UNARY_BP),
            TokenKind::Bang => self.unary(UnaryOp::Bang, UNARY_BP),
            TokenKind::Keyword(Keyword::Not) => self.unary(UnaryOp::Not, NOT_BP),

            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::LiteralNull { span: start })
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::LiteralInt {
                    value: 1,
                    span: start,
                })
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::LiteralInt {
                    value: 0,
                    span: start,
                })
            }

            TokenKind::Keyword(Keyword::Interval) => {
                self.advance();
                let value = self.expr(UNARY_BP)?;
                let (unit_text, unit_span) = self.interval_unit_word()?;
                let unit = IntervalUnit::from_str(&unit_text).ok_or_else(|| {
                    ParseError::Unexpected {
                        expected: String::from("an interval unit"),
                        found: format!("identifier '{unit_text}'"),
                        position: unit_span.start,
                    }
                })?;
                Ok(Expr::Interval {
                    value: Box::new(value),
                    unit,
                    span: start.merge(self.previous().span),
                })
            }

            TokenKind::Keyword(Keyword::Case) => self.case_expr(),

            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                self.expect(&TokenKind::LeftParen, "(")?;
                let sub_start = self.current().span;
                let query = self.select_query()?;
                let subquery = Expr::Subquery {
                    query: Box::new(query),
                    span: sub_start.merge(self.previous().span),
                };
                self.expect(&TokenKind::RightParen, ")")?;
                Ok(Expr::FunctionCall(FunctionCall::Standard {
                    name: String::from("EXISTS"),
                    args: vec![subquery],
                    distinct: false,
                    span: start.merge(self.previous().span),
                }))
            }

            // Reserved keywords that double as function names when
            // directly followed by a parenthesis.
            TokenKind::Keyword(
                kw @ (Keyword::If
                | Keyword::Replace
                | Keyword::Left
                | Keyword::Right
                | Keyword::Mod
                | Keyword::Values
                | Keyword::Char
                | Keyword::Database
                | Keyword::Schema
                | Keyword::Default
                | Keyword::Insert),
            ) if *self.peek_kind(1) == TokenKind::LeftParen => {
                self.advance();
                self.finish_call(String::from(kw.as_str()), start)
            }

            TokenKind::Keyword(kw) if kw.is_allowed_as_identifier() => {
                self.advance();
                let name = self.lexeme(start);
                self.column_or_call(name, start)
            }

            TokenKind::Identifier(name) => {
                self.advance();
                self.column_or_call(name, start)
            }

            TokenKind::LeftParen => {
                self.advance();
                if self.at_query_start() {
                    let query = self.select_query()?;
                    self.expect(&TokenKind::RightParen, ")")?;
                    return Ok(Expr::Subquery {
                        query: Box::new(query),
                        span: start.merge(self.previous().span),
                    });
                }
                let mut exprs = vec![self.expr(0)?];
                while self.eat(&TokenKind::Comma) {
                    exprs.push(self.expr(0)?);
                }
                self.expect(&TokenKind::RightParen, ")")?;
                if exprs.len() == 1 {
                    // plain grouping, not a tuple
                    Ok(exprs.swap_remove(0))
                } else {
                    Ok(Expr::Tuple {
                        exprs,
                        span: start.merge(self.previous().span),
                    })
                }
            }

            _ => Err(self.unexpected("an expression")),
        }
    }

    fn unary(&mut self, op: UnaryOp, bp: u8) -> Result<Expr, ParseError> {
        let start = self.advance().span;
        let operand = self.expr(bp)?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(operand),
            span: start.merge(self.previous().span),
        })
    }

    /// An identifier in expression position: a function call when
    /// followed by a parenthesis, otherwise a column reference.
    fn column_or_call(&mut self, name: String, start: Span) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            let upper = name.to_ascii_uppercase();
            return match upper.as_str() {
                "COUNT" => self.count_call(start),
                "CAST" => self.cast_call(start),
                "GROUP_CONCAT" => self.group_concat_call(start),
                _ => self.finish_call(upper, start),
            };
        }

        if self.eat(&TokenKind::Dot) {
            let (column, _) = self.expect_identifier("a column name")?;
            return Ok(Expr::Column {
                table: Some(name),
                name: column,
                span: start.merge(self.previous().span),
            });
        }

        Ok(Expr::Column {
            table: None,
            name,
            span: start,
        })
    }

    fn count_call(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen, "(")?;
        let (arg, distinct) = if self.eat(&TokenKind::Star) {
            (CountArg::Star, false)
        } else {
            let distinct = self.eat_keyword(Keyword::Distinct);
            (CountArg::Expr(Box::new(self.expr(0)?)), distinct)
        };
        self.expect(&TokenKind::RightParen, ")")?;

        if self.check_keyword(Keyword::Over) {
            let args = match arg {
                CountArg::Star => Vec::new(),
                CountArg::Expr(e) => vec![*e],
            };
            return self.finish_window(String::from("COUNT"), args, start);
        }

        Ok(Expr::FunctionCall(FunctionCall::Count {
            arg,
            distinct,
            span: start.merge(self.previous().span),
        }))
    }

    fn cast_call(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen, "(")?;
        let expr = self.expr(0)?;
        self.expect_keyword(Keyword::As)?;
        let target = self.cast_type()?;
        self.expect(&TokenKind::RightParen, ")")?;
        Ok(Expr::FunctionCall(FunctionCall::Cast {
            expr: Box::new(expr),
            target,
            span: start.merge(self.previous().span),
        }))
    }

    fn cast_type(&mut self) -> Result<CastType, ParseError> {
        let token = self.current().clone();
        let text = match &token.kind {
            TokenKind::Identifier(name) => name.to_ascii_uppercase(),
            TokenKind::Keyword(kw) => String::from(kw.as_str()),
            _ => return Err(self.unexpected("a cast target type")),
        };
        self.advance();

        let target = match text.as_str() {
            "SIGNED" => {
                self.eat_keyword(Keyword::Integer);
                CastType::Signed
            }
            "UNSIGNED" => {
                self.eat_keyword(Keyword::Integer);
                CastType::Unsigned
            }
            "CHAR" => {
                self.skip_type_args()?;
                CastType::Char
            }
            "BINARY" => {
                self.skip_type_args()?;
                CastType::Binary
            }
            "FLOAT" => CastType::Float,
            "DOUBLE" => CastType::Double,
            "DECIMAL" => {
                self.skip_type_args()?;
                CastType::Decimal
            }
            "DATE" => CastType::Date,
            "TIME" => CastType::Time,
            "DATETIME" => CastType::Datetime,
            _ => {
                return Err(ParseError::Unexpected {
                    expected: String::from("a cast target type"),
                    found: format!("identifier '{text}'"),
                    position: token.span.start,
                })
            }
        };
        Ok(target)
    }

    /// Consumes an optional `(n)` or `(p, s)` after a cast type name.
    fn skip_type_args(&mut self) -> Result<(), ParseError> {
        if self.eat(&TokenKind::LeftParen) {
            loop {
                let token = self.current().clone();
                match token.kind {
                    TokenKind::Int(_) => {
                        self.advance();
                    }
                    _ => return Err(self.unexpected("a precision")),
                }
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen, ")")?;
        }
        Ok(())
    }

    fn group_concat_call(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen, "(")?;
        let distinct = self.eat_keyword(Keyword::Distinct);

        let mut exprs = vec![self.expr(0)?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.expr(0)?);
        }

        let order_by = self.order_by_clause()?;
        let separator = if self.eat_keyword(Keyword::Separator) {
            let token = self.current().clone();
            match token.kind {
                TokenKind::StringLit(value) => {
                    self.advance();
                    value
                }
                _ => return Err(self.unexpected("a separator string")),
            }
        } else {
            String::from(",")
        };
        let limit = self.limit_clause()?;
        self.expect(&TokenKind::RightParen, ")")?;

        Ok(Expr::FunctionCall(FunctionCall::GroupConcat {
            exprs,
            order_by,
            separator,
            limit: limit.map(Box::new),
            distinct,
            span: start.merge(self.previous().span),
        }))
    }

    fn finish_call(&mut self, name: String, start: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen, "(")?;
        let distinct = self.eat_keyword(Keyword::Distinct);
        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            args.push(self.expr(0)?);
            while self.eat(&TokenKind::Comma) {
                args.push(self.expr(0)?);
            }
        }
        self.expect(&TokenKind::RightParen, ")")?;

        if self.check_keyword(Keyword::Over) {
            return self.finish_window(name, args, start);
        }

        Ok(Expr::FunctionCall(FunctionCall::Standard {
            name,
            args,
            distinct,
            span: start.merge(self.previous().span),
        }))
    }

    fn finish_window(
        &mut self,
        name: String,
        args: Vec<Expr>,
        start: Span,
    ) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Over)?;
        self.expect(&TokenKind::LeftParen, "(")?;
        let partition_by = if self.eat_keyword(Keyword::Partition) {
            self.expect_keyword(Keyword::By)?;
            let mut exprs = vec![self.expr(0)?];
            while self.eat(&TokenKind::Comma) {
                exprs.push(self.expr(0)?);
            }
            exprs
        } else {
            Vec::new()
        };
        let order_by = self.order_by_clause()?;
        self.expect(&TokenKind::RightParen, ")")?;

        Ok(Expr::FunctionCall(FunctionCall::Window {
            name,
            args,
            partition_by,
            order_by,
            span: start.merge(self.previous().span),
        }))
    }

    fn case_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect_keyword(Keyword::Case)?.span;
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.expr(0)?))
        };

        let mut when_then = Vec::new();
        while self.eat_keyword(Keyword::When) {
            let when = self.expr(0)?;
            self.expect_keyword(Keyword::Then)?;
            let then = self.expr(0)?;
            when_then.push((when, then));
        }
        if when_then.is_empty() {
            return Err(self.unexpected("keyword WHEN"));
        }

        let else_expr = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.expr(0)?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_then,
            else_expr,
            span: start.merge(self.previous().span),
        })
    }

    fn interval_unit_word(&mut self) -> Result<(String, Span), ParseError> {
        let token = self.current().clone();
        let text = match &token.kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Keyword(kw) => String::from(kw.as_str()),
            _ => return Err(self.unexpected("an interval unit")),
        };
        self.advance();
        Ok((text, token.span))
    }
}

/// Maps a plain infix operator token to its [`BinaryOp`].
///
/// Only reached for tokens [`infix_binding_power`] accepted and the
/// keyword operators `infix` handles separately.
fn binary_op(kind: &TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Keyword(Keyword::Or) | TokenKind::OrOr => BinaryOp::Or,
        TokenKind::Keyword(Keyword::Xor) => BinaryOp::Xor,
        TokenKind::Keyword(Keyword::And) | TokenKind::AndAnd => BinaryOp::And,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NullSafeEq => BinaryOp::NullSafeEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::ShiftLeft => BinaryOp::ShiftLeft,
        TokenKind::ShiftRight => BinaryOp::ShiftRight,
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Minus => BinaryOp::Minus,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Keyword(Keyword::Div) => BinaryOp::IntDiv,
        TokenKind::Keyword(Keyword::Mod) | TokenKind::Percent => BinaryOp::Mod,
        other => unreachable!("token {other:?} is not a plain binary operator"),
    }
}
