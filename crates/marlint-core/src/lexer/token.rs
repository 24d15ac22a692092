//! Token types for the SQL lexer.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::Span;

macro_rules! keywords {
    ($($variant:ident => $text:literal),+ $(,)?) => {
        /// MariaDB reserved words.
        ///
        /// The list mirrors the server's grammar table; recognition is
        /// case-insensitive via [`Keyword::from_str`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant),+
        }

        impl Keyword {
            /// Every reserved word, in grammar-table order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the keyword as its upper-case SQL spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }
    };
}

keywords! {
    Accessible => "ACCESSIBLE",
    Action => "ACTION",
    Add => "ADD",
    All => "ALL",
    Alter => "ALTER",
    Analyze => "ANALYZE",
    And => "AND",
    As => "AS",
    Asc => "ASC",
    Asensitive => "ASENSITIVE",
    Before => "BEFORE",
    Between => "BETWEEN",
    Bigint => "BIGINT",
    Binary => "BINARY",
    Bit => "BIT",
    Blob => "BLOB",
    Both => "BOTH",
    By => "BY",
    Call => "CALL",
    Cascade => "CASCADE",
    Case => "CASE",
    Change => "CHANGE",
    Char => "CHAR",
    Character => "CHARACTER",
    Check => "CHECK",
    Collate => "COLLATE",
    Column => "COLUMN",
    Condition => "CONDITION",
    Constraint => "CONSTRAINT",
    Continue => "CONTINUE",
    Convert => "CONVERT",
    Create => "CREATE",
    Cross => "CROSS",
    Current => "CURRENT",
    CurrentDate => "CURRENT_DATE",
    CurrentRole => "CURRENT_ROLE",
    CurrentTime => "CURRENT_TIME",
    CurrentTimestamp => "CURRENT_TIMESTAMP",
    CurrentUser => "CURRENT_USER",
    Cursor => "CURSOR",
    Cycle => "CYCLE",
    Database => "DATABASE",
    Databases => "DATABASES",
    Date => "DATE",
    Datetime => "DATETIME",
    DayHour => "DAY_HOUR",
    DayMicrosecond => "DAY_MICROSECOND",
    DayMinute => "DAY_MINUTE",
    DaySecond => "DAY_SECOND",
    Dec => "DEC",
    Decimal => "DECIMAL",
    Declare => "DECLARE",
    Default => "DEFAULT",
    Delayed => "DELAYED",
    Delete => "DELETE",
    DeleteDomainId => "DELETE_DOMAIN_ID",
    Desc => "DESC",
    Describe => "DESCRIBE",
    Deterministic => "DETERMINISTIC",
    Distinct => "DISTINCT",
    Distinctrow => "DISTINCTROW",
    Div => "DIV",
    DoDomainIds => "DO_DOMAIN_IDS",
    Double => "DOUBLE",
    Drop => "DROP",
    Dual => "DUAL",
    Duplicate => "DUPLICATE",
    Each => "EACH",
    Else => "ELSE",
    Elseif => "ELSEIF",
    Enclosed => "ENCLOSED",
    End => "END",
    Enum => "ENUM",
    Escape => "ESCAPE",
    Escaped => "ESCAPED",
    Except => "EXCEPT",
    Exists => "EXISTS",
    Exit => "EXIT",
    Explain => "EXPLAIN",
    False => "FALSE",
    Fetch => "FETCH",
    Float => "FLOAT",
    Float4 => "FLOAT4",
    Float8 => "FLOAT8",
    Following => "FOLLOWING",
    For => "FOR",
    Force => "FORCE",
    Foreign => "FOREIGN",
    From => "FROM",
    Fulltext => "FULLTEXT",
    General => "GENERAL",
    Grant => "GRANT",
    Group => "GROUP",
    Having => "HAVING",
    HighPriority => "HIGH_PRIORITY",
    HourMicrosecond => "HOUR_MICROSECOND",
    HourMinute => "HOUR_MINUTE",
    HourSecond => "HOUR_SECOND",
    If => "IF",
    Ignore => "IGNORE",
    IgnoreDomainIds => "IGNORE_DOMAIN_IDS",
    IgnoreServerIds => "IGNORE_SERVER_IDS",
    In => "IN",
    Index => "INDEX",
    Infile => "INFILE",
    Inner => "INNER",
    Inout => "INOUT",
    Insensitive => "INSENSITIVE",
    Insert => "INSERT",
    Int => "INT",
    Int1 => "INT1",
    Int2 => "INT2",
    Int3 => "INT3",
    Int4 => "INT4",
    Int8 => "INT8",
    Integer => "INTEGER",
    Intersect => "INTERSECT",
    Interval => "INTERVAL",
    Into => "INTO",
    Is => "IS",
    Iterate => "ITERATE",
    Join => "JOIN",
    Key => "KEY",
    Keys => "KEYS",
    Kill => "KILL",
    Leading => "LEADING",
    Leave => "LEAVE",
    Left => "LEFT",
    Like => "LIKE",
    Limit => "LIMIT",
    Linear => "LINEAR",
    Lines => "LINES",
    Load => "LOAD",
    Localtime => "LOCALTIME",
    Localtimestamp => "LOCALTIMESTAMP",
    Lock => "LOCK",
    Locked => "LOCKED",
    Long => "LONG",
    Longblob => "LONGBLOB",
    Longtext => "LONGTEXT",
    Loop => "LOOP",
    LowPriority => "LOW_PRIORITY",
    MasterHeartbeatPeriod => "MASTER_HEARTBEAT_PERIOD",
    MasterSslVerifyServerCert => "MASTER_SSL_VERIFY_SERVER_CERT",
    Match => "MATCH",
    Maxvalue => "MAXVALUE",
    Mediumblob => "MEDIUMBLOB",
    Mediumint => "MEDIUMINT",
    Mediumtext => "MEDIUMTEXT",
    Middleint => "MIDDLEINT",
    MinuteMicrosecond => "MINUTE_MICROSECOND",
    MinuteSecond => "MINUTE_SECOND",
    Mod => "MOD",
    Mode => "MODE",
    Modifies => "MODIFIES",
    Natural => "NATURAL",
    No => "NO",
    Not => "NOT",
    Nowait => "NOWAIT",
    NoWriteToBinlog => "NO_WRITE_TO_BINLOG",
    Null => "NULL",
    Numeric => "NUMERIC",
    Offset => "OFFSET",
    On => "ON",
    Optimize => "OPTIMIZE",
    Option => "OPTION",
    Optionally => "OPTIONALLY",
    Or => "OR",
    Order => "ORDER",
    Out => "OUT",
    Outer => "OUTER",
    Outfile => "OUTFILE",
    Over => "OVER",
    PageChecksum => "PAGE_CHECKSUM",
    ParseVcolExpr => "PARSE_VCOL_EXPR",
    Partition => "PARTITION",
    Position => "POSITION",
    Preceding => "PRECEDING",
    Precision => "PRECISION",
    Primary => "PRIMARY",
    Procedure => "PROCEDURE",
    Purge => "PURGE",
    Range => "RANGE",
    Read => "READ",
    Reads => "READS",
    ReadWrite => "READ_WRITE",
    Real => "REAL",
    Recursive => "RECURSIVE",
    RefSystemId => "REF_SYSTEM_ID",
    References => "REFERENCES",
    Regexp => "REGEXP",
    Release => "RELEASE",
    Rename => "RENAME",
    Repeat => "REPEAT",
    Replace => "REPLACE",
    Require => "REQUIRE",
    Resignal => "RESIGNAL",
    Restrict => "RESTRICT",
    Return => "RETURN",
    Returning => "RETURNING",
    Revoke => "REVOKE",
    Right => "RIGHT",
    Rlike => "RLIKE",
    Rollup => "ROLLUP",
    Row => "ROW",
    Rows => "ROWS",
    Schema => "SCHEMA",
    Schemas => "SCHEMAS",
    SecondMicrosecond => "SECOND_MICROSECOND",
    Select => "SELECT",
    Sensitive => "SENSITIVE",
    Separator => "SEPARATOR",
    Set => "SET",
    Share => "SHARE",
    Show => "SHOW",
    Signal => "SIGNAL",
    Signed => "SIGNED",
    Skip => "SKIP",
    Slow => "SLOW",
    Smallint => "SMALLINT",
    Spatial => "SPATIAL",
    Specific => "SPECIFIC",
    Sql => "SQL",
    Sqlexception => "SQLEXCEPTION",
    Sqlstate => "SQLSTATE",
    Sqlwarning => "SQLWARNING",
    SqlBigResult => "SQL_BIG_RESULT",
    SqlCalcFoundRows => "SQL_CALC_FOUND_ROWS",
    SqlSmallResult => "SQL_SMALL_RESULT",
    Ssl => "SSL",
    Starting => "STARTING",
    StatsAutoRecalc => "STATS_AUTO_RECALC",
    StatsPersistent => "STATS_PERSISTENT",
    StatsSamplePages => "STATS_SAMPLE_PAGES",
    StraightJoin => "STRAIGHT_JOIN",
    Table => "TABLE",
    Terminated => "TERMINATED",
    Text => "TEXT",
    Then => "THEN",
    Time => "TIME",
    Timestamp => "TIMESTAMP",
    Tinyblob => "TINYBLOB",
    Tinyint => "TINYINT",
    Tinytext => "TINYTEXT",
    To => "TO",
    Trailing => "TRAILING",
    Trigger => "TRIGGER",
    True => "TRUE",
    Truncate => "TRUNCATE",
    Unbounded => "UNBOUNDED",
    Undo => "UNDO",
    Union => "UNION",
    Unique => "UNIQUE",
    Unknown => "UNKNOWN",
    Unlock => "UNLOCK",
    Unsigned => "UNSIGNED",
    Update => "UPDATE",
    Usage => "USAGE",
    Use => "USE",
    Using => "USING",
    UtcDate => "UTC_DATE",
    UtcTime => "UTC_TIME",
    UtcTimestamp => "UTC_TIMESTAMP",
    Value => "VALUE",
    Values => "VALUES",
    Varbinary => "VARBINARY",
    Varchar => "VARCHAR",
    Varcharacter => "VARCHARACTER",
    Varying => "VARYING",
    Wait => "WAIT",
    When => "WHEN",
    Where => "WHERE",
    While => "WHILE",
    Window => "WINDOW",
    With => "WITH",
    Write => "WRITE",
    Xor => "XOR",
    YearMonth => "YEAR_MONTH",
    Zerofill => "ZEROFILL",
}

/// Process-wide keyword lookup table, built once and never mutated.
fn keyword_map() -> &'static HashMap<&'static str, Keyword> {
    static MAP: OnceLock<HashMap<&'static str, Keyword>> = OnceLock::new();
    MAP.get_or_init(|| Keyword::ALL.iter().map(|kw| (kw.as_str(), *kw)).collect())
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        keyword_map().get(s.to_ascii_uppercase().as_str()).copied()
    }

    /// Whether the server permits this reserved word as an unquoted
    /// identifier or implicit column alias.
    ///
    /// The set is an enumerable exception table taken from the grammar,
    /// not a derivable rule.
    #[must_use]
    pub const fn is_allowed_as_identifier(&self) -> bool {
        matches!(
            self,
            Self::Action
                | Self::Bit
                | Self::Current
                | Self::Cycle
                | Self::Date
                | Self::Datetime
                | Self::Duplicate
                | Self::Enum
                | Self::Following
                | Self::General
                | Self::IgnoreDomainIds
                | Self::IgnoreServerIds
                | Self::Locked
                | Self::MasterHeartbeatPeriod
                | Self::Mode
                | Self::No
                | Self::Nowait
                | Self::Position
                | Self::Preceding
                | Self::Rollup
                | Self::Separator
                | Self::Share
                | Self::Skip
                | Self::Slow
                | Self::Text
                | Self::Time
                | Self::Timestamp
                | Self::Unbounded
                | Self::Unknown
                | Self::Value
                | Self::Wait
                | Self::Window
        )
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42)
    Int(i64),
    /// Float literal (e.g., 3.14, 1e10)
    Float(f64),
    /// String literal (e.g., 'hello', "world")
    StringLit(String),
    /// Hexadecimal literal (0x1F or x'1F'), digits kept as written.
    HexLit(String),
    /// Binary literal (0b01 or b'01'), digits kept as written.
    BinLit(String),

    // Identifiers and keywords
    /// Identifier (plain or backtick-quoted)
    Identifier(String),
    /// Reserved keyword
    Keyword(Keyword),

    // Multi-character operators (maximal munch)
    /// :=
    ColonAssign,
    /// << and >>
    ShiftLeft,
    /// >>
    ShiftRight,
    /// != or <>
    NotEq,
    /// <=
    LtEq,
    /// >=
    GtEq,
    /// <=>
    NullSafeEq,
    /// &&
    AndAnd,
    /// ||
    OrOr,

    // Single-character operators and punctuation
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// <
    Lt,
    /// >
    Gt,
    /// &
    Amp,
    /// |
    Pipe,
    /// ^
    Caret,
    /// ~
    Tilde,
    /// !
    Bang,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// ? placeholder
    Question,
    /// @ (user variables)
    At,

    /// End-of-input sentinel; the parser never has to special-case
    /// exhaustion.
    Eof,
}

impl TokenKind {
    /// Short human description used in parse errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Int(v) => format!("integer {v}"),
            Self::Float(v) => format!("float {v}"),
            Self::StringLit(s) => format!("string '{s}'"),
            Self::HexLit(s) => format!("hex literal 0x{s}"),
            Self::BinLit(s) => format!("binary literal 0b{s}"),
            Self::Identifier(name) => format!("identifier '{name}'"),
            Self::Keyword(kw) => format!("keyword {}", kw.as_str()),
            Self::Eof => String::from("end of input"),
            other => format!("{other:?}"),
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is the end-of-input sentinel.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}
