//! K# Macro Expression Lexer
//!
//! This library converts macro expressions used for dynamic text
//! substitution into typed token streams.

pub mod error;
pub mod lexer;
pub mod source;

// Re-export commonly used types
pub use error::{DiagnosticError, ErrorCollector, LexErrorKind, LexerError, MacroError, MacroResult};
pub use lexer::{
    escape, format_tokens, tokenize, tokenize_with, unescape, Lexer, LookupTables, Mode, Token,
    TokenKind, TokenValue,
};
pub use source::{CheckReport, SourceState};
