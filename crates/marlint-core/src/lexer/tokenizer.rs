//! SQL tokenizer implementation.

use super::{Keyword, Position, Span, Token, TokenKind};

/// A lexical error with the position it occurred at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {position}")]
pub struct LexError {
    /// Where the offending character sequence starts.
    pub position: Position,
    /// What went wrong.
    pub message: String,
}

impl LexError {
    fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// A lexer that tokenizes SQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current position.
    pos: Position,
    /// The position of the start of the current token.
    start: Position,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: Position::start(),
            start: Position::start(),
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos.offset..].chars().next()
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos.offset..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.offset += c.len_utf8();
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    /// Consumes the current character if it matches.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips whitespace and comments, keeping positions accurate.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // -- and # line comments
            let line_comment = (self.peek() == Some('-') && self.peek_next() == Some('-'))
                || self.peek() == Some('#');
            if line_comment {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // /* ... */ block comments
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError::new(self.start, message)
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let text = &self.input[self.start.offset..self.pos.offset];

        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(String::from(text)))
        }
    }

    /// Scans a backtick-quoted identifier with doubled-backtick escaping.
    fn scan_quoted_identifier(&mut self) -> Result<Token, LexError> {
        self.advance(); // opening backtick
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('`') => {
                    if self.peek() == Some('`') {
                        self.advance();
                        value.push('`');
                    } else {
                        return Ok(self.make_token(TokenKind::Identifier(value)));
                    }
                }
                Some(c) => value.push(c),
                None => return Err(self.error("Unterminated quoted identifier")),
            }
        }
    }

    /// Scans a string literal, handling backslash escapes and doubled
    /// quotes.
    fn scan_string(&mut self, quote: char) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                        value.push(quote);
                    } else {
                        return Ok(self.make_token(TokenKind::StringLit(value)));
                    }
                }
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('0') => value.push('\0'),
                    Some(c) => value.push(c),
                    None => return Err(self.error("Unterminated string literal")),
                },
                Some(c) => value.push(c),
                None => return Err(self.error("Unterminated string literal")),
            }
        }
    }

    /// Scans `x'1F'` / `b'01'` quoted hex/bin literals. The leading
    /// x/b has already been consumed.
    fn scan_quoted_radix(&mut self, hex: bool) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let digits_start = self.pos.offset;
        let valid = |c: char| if hex { c.is_ascii_hexdigit() } else { c == '0' || c == '1' };

        while self.peek().is_some_and(valid) {
            self.advance();
        }
        let digits = String::from(&self.input[digits_start..self.pos.offset]);

        if !self.eat('\'') {
            let what = if hex { "hex" } else { "binary" };
            return Err(self.error(format!("Malformed {what} literal")));
        }

        Ok(self.make_token(if hex {
            TokenKind::HexLit(digits)
        } else {
            TokenKind::BinLit(digits)
        }))
    }

    /// Scans a number: INT, FLOAT, or the `0x`/`0b` radix forms.
    fn scan_number(&mut self) -> Result<Token, LexError> {
        // 0x1F / 0b01
        if self.peek() == Some('0') {
            if self.peek_next() == Some('x') {
                self.advance();
                self.advance();
                let digits_start = self.pos.offset;
                while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.advance();
                }
                if self.pos.offset == digits_start {
                    return Err(self.error("Malformed hex literal"));
                }
                let digits = String::from(&self.input[digits_start..self.pos.offset]);
                return Ok(self.make_token(TokenKind::HexLit(digits)));
            }
            if self.peek_next() == Some('b') {
                self.advance();
                self.advance();
                let digits_start = self.pos.offset;
                while self.peek().is_some_and(|c| c == '0' || c == '1') {
                    self.advance();
                }
                if self.pos.offset == digits_start {
                    return Err(self.error("Malformed binary literal"));
                }
                let digits = String::from(&self.input[digits_start..self.pos.offset]);
                return Ok(self.make_token(TokenKind::BinLit(digits)));
            }
        }

        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let after_sign = match self.peek_next() {
                Some('+' | '-') => {
                    let mut chars = self.input[self.pos.offset..].chars();
                    chars.next();
                    chars.next();
                    chars.next()
                }
                other => other,
            };
            if after_sign.is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.advance(); // e/E
                if self.peek().is_some_and(|c| c == '+' || c == '-') {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let text = &self.input[self.start.offset..self.pos.offset];

        if is_float {
            let value = text
                .parse::<f64>()
                .map_err(|e| self.error(format!("Invalid float literal: {e}")))?;
            Ok(self.make_token(TokenKind::Float(value)))
        } else {
            let value = text
                .parse::<i64>()
                .map_err(|e| self.error(format!("Invalid integer literal: {e}")))?;
            Ok(self.make_token(TokenKind::Int(value)))
        }
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] on malformed input.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        match c {
            '\'' | '"' => return self.scan_string(c),
            '`' => return self.scan_quoted_identifier(),
            'x' | 'X' if self.peek_next() == Some('\'') => {
                self.advance();
                return self.scan_quoted_radix(true);
            }
            'b' | 'B' if self.peek_next() == Some('\'') => {
                self.advance();
                return self.scan_quoted_radix(false);
            }
            c if c.is_ascii_digit() => return self.scan_number(),
            c if c.is_alphabetic() || c == '_' || c == '$' => return Ok(self.scan_identifier()),
            _ => {}
        }

        self.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            '@' => TokenKind::At,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '~' => TokenKind::Tilde,
            '^' => TokenKind::Caret,
            '=' => TokenKind::Eq,

            // Maximal munch: longest operator first.
            '<' => {
                if self.eat('=') {
                    if self.eat('>') {
                        TokenKind::NullSafeEq
                    } else {
                        TokenKind::LtEq
                    }
                } else if self.eat('>') {
                    TokenKind::NotEq
                } else if self.eat('<') {
                    TokenKind::ShiftLeft
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else if self.eat('>') {
                    TokenKind::ShiftRight
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::AndAnd
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::OrOr
                } else {
                    TokenKind::Pipe
                }
            }
            ':' => {
                if self.eat('=') {
                    TokenKind::ColonAssign
                } else {
                    return Err(self.error("Unexpected character: :"));
                }
            }
            other => return Err(self.error(format!("Unexpected character: {other}"))),
        };

        Ok(self.make_token(kind))
    }

    /// Tokenizes the entire input, ending with the [`TokenKind::Eof`]
    /// sentinel.
    ///
    /// # Errors
    ///
    /// Fails fast with a [`LexError`] on the first malformed sequence.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            token_kinds("SELECT -- comment\n# another\n/* block */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers_and_backticks() {
        assert_eq!(
            token_kinds("foo `select` `with``tick`"),
            vec![
                TokenKind::Identifier(String::from("foo")),
                TokenKind::Identifier(String::from("select")),
                TokenKind::Identifier(String::from("with`tick")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(
            token_kinds("42 3.14 1e10 2.5e-3 0x1F x'2a' 0b01 b'10'"),
            vec![
                TokenKind::Int(42),
                TokenKind::Float(3.14),
                TokenKind::Float(1e10),
                TokenKind::Float(2.5e-3),
                TokenKind::HexLit(String::from("1F")),
                TokenKind::HexLit(String::from("2a")),
                TokenKind::BinLit(String::from("01")),
                TokenKind::BinLit(String::from("10")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            token_kinds(r#"'it''s' "a\"b" 'x\ny'"#),
            vec![
                TokenKind::StringLit(String::from("it's")),
                TokenKind::StringLit(String::from("a\"b")),
                TokenKind::StringLit(String::from("x\ny")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_maximal_munch_operators() {
        assert_eq!(
            token_kinds("<= >= <> != <=> := << >> && || < > ="),
            vec![
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::NullSafeEq,
                TokenKind::ColonAssign,
                TokenKind::ShiftLeft,
                TokenKind::ShiftRight,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_column_tracking() {
        let tokens = tokenize("SELECT\n  id");
        assert_eq!(tokens[0].span.start, Position::new(0, 1, 1));
        assert_eq!(tokens[1].span.start, Position::new(9, 2, 3));
    }

    #[test]
    fn test_spans_reconstruct_the_source() {
        // spans must tile the input: slicing every lexeme back out by
        // position, with the skipped bytes in between, is the original
        // text byte-for-byte
        let sources = [
            "SELECT `a` + 1.5 FROM t -- x",
            "SELECT 'it''s', \"a\\\"b\" FROM t -- trailing\nWHERE a <=> b AND c != 2.5e-3",
            "select 0x1F + 0b01 + x'2a' /* block\ncomment */ , `quoted id` := 1 << 2",
            "INSERT INTO t (a) VALUES (1), (NULL)",
        ];
        for source in sources {
            let mut rebuilt = String::new();
            let mut cursor = 0;
            for token in tokenize(source) {
                let span = token.span;
                assert!(
                    span.start.offset >= cursor,
                    "token spans overlap in: {source}"
                );
                if !token.is_eof() {
                    assert!(!span.slice(source).is_empty());
                }
                rebuilt.push_str(&source[cursor..span.start.offset]);
                rebuilt.push_str(span.slice(source));
                cursor = span.end.offset;
            }
            rebuilt.push_str(&source[cursor..]);
            assert_eq!(rebuilt, source, "lost bytes tokenizing: {source}");
        }
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("SELECT 'oops").tokenize().unwrap_err();
        assert_eq!(err.position.offset, 7);
        assert!(err.message.contains("Unterminated"));
    }

    #[test]
    fn test_stray_character() {
        let err = Lexer::new("SELECT \\").tokenize().unwrap_err();
        assert!(err.message.contains("Unexpected character"));
    }
}
