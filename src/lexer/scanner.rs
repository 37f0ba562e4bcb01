//! Character-level state machine that reads one token at a time.
//!
//! The scanner never owns a cursor. Each call receives the position to
//! start from and reports where the next call should continue, which keeps
//! every state testable in isolation.

use super::escape::{unescape_with, unescape_verbatim};
use super::tables::LookupTables;
use super::token::{Token, TokenKind, TokenValue};
use super::tokenizer::Mode;
use crate::error::LexErrorKind;

/// Outcome of a single scan.
#[derive(Debug, Clone, PartialEq)]
pub enum Scan {
    /// A token, and the position right after what it consumed.
    Token { token: Token, next: usize },
    /// Nothing but whitespace or comments remained.
    EndOfInput,
    /// Lexical error at the given character offset.
    Error { kind: LexErrorKind, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Identifier,
    Integer,
    Dot,
    Double,
    Exponent,
    StringRead,
    StringSlash,
    StringReadMultiline,
    Operator,
    Comment,
    CommentMultiline,
}

pub struct Scanner<'a> {
    chars: &'a [char],
    tables: &'a LookupTables,
    mode: Mode,
}

impl<'a> Scanner<'a> {
    pub fn new(chars: &'a [char], tables: &'a LookupTables, mode: Mode) -> Self {
        Self { chars, tables, mode }
    }

    fn peek(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    /// Read the next token starting at `pos`.
    pub fn scan(&self, pos: usize) -> Scan {
        let mut state = State::Start;
        let mut start = pos;
        let mut i = pos;

        loop {
            let current = self.peek(i);
            match state {
                State::Start => {
                    let Some(c) = current else {
                        return Scan::EndOfInput;
                    };
                    if c.is_whitespace() {
                        i += 1;
                        start = i;
                    } else if is_identifier_start(c) {
                        state = State::Identifier;
                        i += 1;
                    } else if c.is_ascii_digit() {
                        state = State::Integer;
                        i += 1;
                    } else if c == '@' && self.peek(i + 1) == Some('"') {
                        state = State::StringReadMultiline;
                        i += 2;
                    } else if c == '"' {
                        state = State::StringRead;
                        i += 1;
                    } else if self.tables.is_operator_char(c) {
                        state = State::Operator;
                        i += 1;
                    } else if let Some(kind) = TokenKind::punctuation(c) {
                        return Scan::Token {
                            token: Token::symbol(kind, c, i),
                            next: i + 1,
                        };
                    } else {
                        return error(LexErrorKind::UnexpectedCharacter(c), i);
                    }
                }

                State::Identifier => match current {
                    Some(c) if is_identifier_char(c) => i += 1,
                    _ => return self.finish_identifier(start, i),
                },

                State::Integer => match current {
                    Some(c) if c.is_ascii_digit() => i += 1,
                    Some('.') => {
                        state = State::Dot;
                        i += 1;
                    }
                    Some('e' | 'E') => match self.exponent_length(i) {
                        Some(len) => {
                            state = State::Exponent;
                            i += len;
                        }
                        None => {
                            return self.malformed_number(start, i + 1);
                        }
                    },
                    // Digits followed by letters: let identifier validation reject it.
                    Some(c) if is_identifier_char(c) => {
                        state = State::Identifier;
                        i += 1;
                    }
                    _ => return self.finish_integer(start, i),
                },

                State::Dot => match current {
                    Some(c) if c.is_ascii_digit() => {
                        state = State::Double;
                        i += 1;
                    }
                    // Member access on an integer: leave the dot for the next scan.
                    Some(c) if is_identifier_start(c) => return self.finish_integer(start, i - 1),
                    _ => return self.finish_double(start, i),
                },

                State::Double => match current {
                    Some(c) if c.is_ascii_digit() => i += 1,
                    Some('e' | 'E') => match self.exponent_length(i) {
                        Some(len) => {
                            state = State::Exponent;
                            i += len;
                        }
                        None => return self.malformed_number(start, i + 1),
                    },
                    _ => return self.finish_double(start, i),
                },

                State::Exponent => match current {
                    Some(c) if c.is_ascii_digit() => i += 1,
                    _ => return self.finish_double(start, i),
                },

                State::StringRead => match current {
                    Some('\\') => {
                        state = State::StringSlash;
                        i += 1;
                    }
                    Some('"') => return self.finish_string(start, i + 1),
                    Some(_) => i += 1,
                    None => return self.unterminated_string(start),
                },

                State::StringSlash => match current {
                    Some(_) => {
                        state = State::StringRead;
                        i += 1;
                    }
                    None => return self.unterminated_string(start),
                },

                State::StringReadMultiline => match current {
                    Some('"') if self.peek(i + 1) == Some('"') => i += 2,
                    Some('"') => return self.finish_verbatim_string(start, i + 1),
                    Some(_) => i += 1,
                    None => return error(LexErrorKind::UnterminatedString, start),
                },

                State::Operator => {
                    let single = i - start == 1;
                    let previous = self.chars[i - 1];
                    match current {
                        Some('/') if single && previous == '/' => {
                            state = State::Comment;
                            i += 1;
                        }
                        Some('*') if single && previous == '/' => {
                            state = State::CommentMultiline;
                            i += 1;
                        }
                        Some('(') if single && previous == '|' => {
                            return match self.parameter_close(i) {
                                Some(close) => self.finish_parameter(start, close + 1),
                                None => self.finish_operator(start, i),
                            };
                        }
                        Some(c)
                            if self.tables.is_operator_char(c)
                                && self.tables.extends_operator(&self.text(start, i), c) =>
                        {
                            i += 1
                        }
                        _ => return self.finish_operator(start, i),
                    }
                }

                State::Comment => match current {
                    Some('\n' | '\r') => {
                        state = State::Start;
                        start = i;
                    }
                    Some(_) => i += 1,
                    None => return Scan::EndOfInput,
                },

                State::CommentMultiline => match current {
                    Some('*') if self.peek(i + 1) == Some('/') => {
                        i += 2;
                        state = State::Start;
                        start = i;
                    }
                    Some(_) => i += 1,
                    None => return Scan::EndOfInput,
                },
            }
        }
    }

    /// Read the verbatim value that follows a parameter token.
    ///
    /// A single leading `|` separator is skipped. The value ends at the
    /// next unescaped `|`, which is consumed unless it opens another
    /// parameter, or at the end of input.
    ///
    /// An empty value directly followed by another parameter is anchored on
    /// the skipped separator, or on the previous parameter's `)`, so it never
    /// shares an offset with the parameter after it.
    pub fn scan_parameter_value(&self, pos: usize) -> Scan {
        let mut i = pos;
        let skipped = self.peek(i) == Some('|') && !self.starts_parameter(i);
        if skipped {
            i += 1;
        }
        if i >= self.chars.len() {
            return Scan::EndOfInput;
        }

        let start = i;
        let mut value = String::new();
        let (end, next) = loop {
            match self.peek(i) {
                None => break (i, i),
                Some('\\') if self.peek(i + 1) == Some('|') => {
                    value.push('|');
                    i += 2;
                }
                Some('|') if self.starts_parameter(i) => break (i, i),
                Some('|') => break (i, i + 1),
                Some(c) => {
                    value.push(c);
                    i += 1;
                }
            }
        };

        let offset = match (end == start && next == end, skipped) {
            (true, true) => pos,
            (true, false) => pos.saturating_sub(1),
            (false, _) => start,
        };

        Scan::Token {
            token: Token::new(
                TokenKind::ParameterValue,
                self.text(start, end),
                TokenValue::Text(value),
                offset,
            ),
            next,
        }
    }

    /// Exponent marker at `pos` plus its optional sign, if one follows.
    fn exponent_length(&self, pos: usize) -> Option<usize> {
        match self.peek(pos + 1) {
            Some('+' | '-') => Some(2),
            Some(c) if c.is_ascii_digit() => Some(1),
            _ => None,
        }
    }

    /// Position of the `)` closing a `(letters)` parameter name opened at
    /// `open`. The lookahead stops at the first character that is neither a
    /// letter nor `)`.
    fn parameter_close(&self, open: usize) -> Option<usize> {
        let mut i = open + 1;
        while let Some(c) = self.peek(i) {
            if c == ')' {
                return (i > open + 1).then_some(i);
            }
            if !c.is_alphabetic() {
                return None;
            }
            i += 1;
        }
        None
    }

    fn starts_parameter(&self, pos: usize) -> bool {
        self.peek(pos) == Some('|')
            && self.peek(pos + 1) == Some('(')
            && self.parameter_close(pos + 1).is_some()
    }

    fn finish_identifier(&self, start: usize, end: usize) -> Scan {
        let text = self.text(start, end);

        let token = if self.tables.is_word_operator(&text) {
            let word = text.to_lowercase();
            Token::new(TokenKind::Operator, text, TokenValue::Text(word), start)
        } else if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
            let value = text.eq_ignore_ascii_case("true");
            Token::new(TokenKind::Boolean, text, TokenValue::Boolean(value), start)
        } else if is_valid_identifier(&text) {
            Token::new(TokenKind::Identifier, text.clone(), TokenValue::Text(text), start)
        } else {
            return error(LexErrorKind::InvalidIdentifier(text), start);
        };

        Scan::Token { token, next: end }
    }

    fn finish_integer(&self, start: usize, end: usize) -> Scan {
        let text = self.text(start, end);
        match text.parse::<i64>() {
            Ok(value) => Scan::Token {
                token: Token::new(TokenKind::Integer, text, TokenValue::Integer(value), start),
                next: end,
            },
            Err(_) => error(LexErrorKind::MalformedNumber(text), start),
        }
    }

    fn finish_double(&self, start: usize, end: usize) -> Scan {
        let text = self.text(start, end);
        match text.parse::<f64>() {
            Ok(value) => Scan::Token {
                token: Token::new(TokenKind::Double, text, TokenValue::Double(value), start),
                next: end,
            },
            Err(_) => error(LexErrorKind::MalformedNumber(text), start),
        }
    }

    fn malformed_number(&self, start: usize, end: usize) -> Scan {
        error(LexErrorKind::MalformedNumber(self.text(start, end)), start)
    }

    /// `end` is one past the closing quote.
    fn finish_string(&self, start: usize, end: usize) -> Scan {
        let body = self.text(start + 1, end - 1);
        Scan::Token {
            token: Token::new(
                TokenKind::String,
                self.text(start, end),
                TokenValue::Text(unescape_with(self.tables, &body)),
                start,
            ),
            next: end,
        }
    }

    fn finish_verbatim_string(&self, start: usize, end: usize) -> Scan {
        let body = self.text(start + 2, end - 1);
        Scan::Token {
            token: Token::new(
                TokenKind::String,
                self.text(start, end),
                TokenValue::Text(unescape_verbatim(&body)),
                start,
            ),
            next: end,
        }
    }

    /// Input ran out inside a `"..."` literal.
    fn unterminated_string(&self, start: usize) -> Scan {
        if self.mode == Mode::Strict {
            return error(LexErrorKind::UnterminatedString, start);
        }

        let end = self.chars.len();
        let body = self.text(start + 1, end);
        log::debug!("recovering unterminated string at offset {}", start);
        Scan::Token {
            token: Token::new(
                TokenKind::String,
                self.text(start, end),
                TokenValue::Text(unescape_with(self.tables, &body)),
                start,
            ),
            next: end,
        }
    }

    /// Operator runs only grow through table prefixes, and every prefix is
    /// itself an operator, so the accumulated text is always valid here.
    fn finish_operator(&self, start: usize, end: usize) -> Scan {
        let text = self.text(start, end);
        let kind = if text == ";" {
            TokenKind::Semicolon
        } else {
            TokenKind::Operator
        };
        Scan::Token {
            token: Token::symbol(kind, text, start),
            next: end,
        }
    }

    /// `end` is one past the closing `)`.
    fn finish_parameter(&self, start: usize, end: usize) -> Scan {
        let name = self.text(start + 2, end - 1);
        Scan::Token {
            token: Token::new(
                TokenKind::Parameter,
                self.text(start, end),
                TokenValue::Text(name),
                start,
            ),
            next: end,
        }
    }
}

fn error(kind: LexErrorKind, offset: usize) -> Scan {
    Scan::Error { kind, offset }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c == '_'
}

/// Letters, digits and underscores, not starting with a digit.
pub fn is_valid_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_char),
        _ => false,
    }
}
