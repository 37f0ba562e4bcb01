//! Token definitions for K# macro expressions

use serde::Serialize;
use std::fmt;

/// The closed set of token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Integer,
    Double,
    Boolean,
    String,
    Operator,
    Semicolon,
    Dot,
    Comma,
    /// `(`
    LeftBracket,
    /// `)`
    RightBracket,
    /// `[`
    LeftIndexer,
    /// `]`
    RightIndexer,
    /// `{`
    BlockStart,
    /// `}`
    BlockEnd,
    /// `|(name)` macro directive
    Parameter,
    /// Verbatim text following a parameter
    ParameterValue,
}

impl TokenKind {
    /// Kind of a single-character punctuation token, if `c` is one.
    pub fn punctuation(c: char) -> Option<TokenKind> {
        match c {
            '(' => Some(TokenKind::LeftBracket),
            ')' => Some(TokenKind::RightBracket),
            '[' => Some(TokenKind::LeftIndexer),
            ']' => Some(TokenKind::RightIndexer),
            '{' => Some(TokenKind::BlockStart),
            '}' => Some(TokenKind::BlockEnd),
            '.' => Some(TokenKind::Dot),
            ',' => Some(TokenKind::Comma),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Interpreted payload of a token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Text(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Text(s) => write!(f, "{}", s),
            TokenValue::Integer(n) => write!(f, "{}", n),
            TokenValue::Double(d) => write!(f, "{}", d),
            TokenValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A classified, positioned unit of a macro expression.
///
/// `raw` is the exact source text the token was read from (quotes and
/// escapes included for strings), `value` is its interpreted payload.
/// `offset` counts characters from the start of the expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    kind: TokenKind,
    raw: String,
    value: TokenValue,
    offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, raw: impl Into<String>, value: TokenValue, offset: usize) -> Self {
        Self {
            kind,
            raw: raw.into(),
            value,
            offset,
        }
    }

    /// Token whose value is its own source text (punctuation, operators).
    pub fn symbol(kind: TokenKind, raw: impl Into<String>, offset: usize) -> Self {
        let raw = raw.into();
        let value = TokenValue::Text(raw.clone());
        Self::new(kind, raw, value, offset)
    }

    /// Empty parameter value used to pair a trailing parameter.
    pub fn empty_parameter_value(offset: usize) -> Self {
        Self::new(
            TokenKind::ParameterValue,
            String::new(),
            TokenValue::Text(String::new()),
            offset,
        )
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Character offset one past the last source character of the token.
    pub fn end(&self) -> usize {
        self.offset + self.raw.chars().count()
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            TokenValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.value {
            TokenValue::Double(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            TokenValue::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String | TokenKind::ParameterValue => {
                write!(f, "{}(\"{}\")", self.kind, self.value)
            }
            TokenKind::Integer | TokenKind::Double | TokenKind::Boolean => {
                write!(f, "{}({})", self.kind, self.value)
            }
            _ => write!(f, "{}({})", self.kind, self.raw),
        }
    }
}
