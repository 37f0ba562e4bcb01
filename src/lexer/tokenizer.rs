//! Tokenizer driver: runs the scanner across a whole expression

use super::scanner::{Scan, Scanner};
use super::tables::LookupTables;
use super::token::{Token, TokenKind};
use crate::error::LexerError;

/// How lexical errors are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Abort on the first lexical error
    #[default]
    Strict,
    /// Stop silently at the first error and keep what was read so far.
    /// An unterminated `"..."` string is still emitted.
    Lenient,
}

impl Mode {
    pub fn from_suppress_errors(suppress_errors: bool) -> Self {
        if suppress_errors {
            Mode::Lenient
        } else {
            Mode::Strict
        }
    }
}

/// Streaming lexer over a macro expression.
///
/// Yields tokens in source order. In strict mode a lexical error is yielded
/// once and the iterator is exhausted afterwards. Every `Parameter` token is
/// followed by a `ParameterValue`, synthesized empty at the end of input
/// when the source has none.
pub struct Lexer<'a> {
    expression: &'a str,
    chars: Vec<char>,
    tables: &'a LookupTables,
    mode: Mode,
    cursor: usize,
    expect_value: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(expression: &'a str, mode: Mode) -> Self {
        Self::with_tables(expression, mode, LookupTables::shared())
    }

    pub fn with_tables(expression: &'a str, mode: Mode, tables: &'a LookupTables) -> Self {
        Self {
            expression,
            chars: expression.chars().collect(),
            tables,
            mode,
            cursor: 0,
            expect_value: false,
            finished: false,
        }
    }

    /// Close the stream, pairing a dangling parameter if needed.
    fn finish(&mut self) -> Option<Token> {
        self.finished = true;
        if self.expect_value {
            self.expect_value = false;
            let offset = self.chars.len().saturating_sub(1);
            return Some(Token::empty_parameter_value(offset));
        }
        None
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let scanner = Scanner::new(&self.chars, self.tables, self.mode);
        let scan = if self.expect_value {
            scanner.scan_parameter_value(self.cursor)
        } else {
            scanner.scan(self.cursor)
        };

        match scan {
            Scan::Token { token, next } => {
                log::trace!("{} @ {}", token, token.offset());
                self.cursor = next;
                self.expect_value = token.kind() == TokenKind::Parameter;
                Some(Ok(token))
            }
            Scan::EndOfInput => self.finish().map(Ok),
            Scan::Error { kind, offset } => match self.mode {
                Mode::Strict => {
                    self.finished = true;
                    Some(Err(LexerError::new(kind, offset, self.expression)))
                }
                Mode::Lenient => {
                    log::debug!("lenient tokenization stopped at offset {}: {}", offset, kind);
                    self.finish().map(Ok)
                }
            },
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenize a macro expression.
///
/// With `suppress_errors` set the call never fails and instead returns the
/// tokens read before the first lexical error.
pub fn tokenize(expression: &str, suppress_errors: bool) -> Result<Vec<Token>, LexerError> {
    tokenize_with(expression, Mode::from_suppress_errors(suppress_errors))
}

pub fn tokenize_with(expression: &str, mode: Mode) -> Result<Vec<Token>, LexerError> {
    Lexer::new(expression, mode).collect()
}

/// Debug dump: one token per line.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{} @ {}", t, t.offset()))
        .collect::<Vec<_>>()
        .join("\n")
}
