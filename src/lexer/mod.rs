//! Lexical analysis for K# macro expressions.
//!
//! Turns an expression body (already stripped of its `{% ... %}` delimiters)
//! into an ordered list of tokens for the macro parser. Scanning is a hand
//! written state machine over characters, see [`scanner`].

pub mod escape;
pub mod scanner;
pub mod tables;
pub mod token;
pub mod tokenizer;

pub use escape::{escape, unescape, unescape_verbatim};
pub use scanner::{Scan, Scanner};
pub use tables::LookupTables;
pub use token::{Token, TokenKind, TokenValue};
pub use tokenizer::{format_tokens, tokenize, tokenize_with, Lexer, Mode};
