//! Lookup tables shared by every tokenization.
//!
//! The tables are built once per process and only read afterwards. The
//! scanner receives them by reference, so tests can also build a private
//! instance with [`LookupTables::new`].

use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Escaped sequence and the literal text it stands for.
const ESCAPES: &[(&str, &str)] = &[
    ("\\'", "'"),
    ("\\\"", "\""),
    ("\\v", "\u{0B}"),
    ("\\0", "\0"),
    ("\\a", "\u{07}"),
    ("\\b", "\u{08}"),
    ("\\f", "\u{0C}"),
    ("\\n", "\n"),
    ("\\r", "\r"),
    ("\\t", "\t"),
    // Macros can be embedded in markup that is itself closed by `%}`.
    ("\\%}", "%}"),
];

const OPERATORS: &[&str] = &[
    // Assignment
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "??=",
    // Comparison
    "==", "!=", "<", ">", "<=", ">=",
    // Arithmetic
    "+", "-", "*", "/", "%", "++", "--",
    // Logical
    "!", "&&", "||",
    // Bitwise
    "&", "|", "^", "~", "<<", ">>",
    // Conditional, lambda and statement separator
    "??", "?", ":", "=>", ";",
    // Word forms
    "mod", "and", "or", "of", "in",
];

const OPERATOR_CHARS: &str = "-+*/%><!=&|~^:?;";

const WORD_OPERATORS: &[&str] = &["mod", "and", "or", "of", "in"];

/// Immutable tables consulted by the scanner and the escape helpers.
#[derive(Debug)]
pub struct LookupTables {
    escapes: IndexMap<&'static str, &'static str>,
    operators: IndexSet<&'static str>,
    operator_prefixes: HashSet<String>,
    operator_chars: HashSet<char>,
    word_operators: IndexSet<&'static str>,
}

impl LookupTables {
    pub fn new() -> Self {
        let escapes: IndexMap<_, _> = ESCAPES.iter().copied().collect();
        let operators: IndexSet<_> = OPERATORS.iter().copied().collect();
        let operator_chars: HashSet<char> = OPERATOR_CHARS.chars().collect();

        // Every non-empty prefix of a symbol operator. Word forms are lexed
        // as identifiers and never extend an operator run.
        let mut operator_prefixes = HashSet::new();
        for op in operators.iter().filter(|op| op.chars().all(|c| operator_chars.contains(&c))) {
            for (idx, c) in op.char_indices() {
                operator_prefixes.insert(op[..idx + c.len_utf8()].to_string());
            }
        }

        let word_operators = WORD_OPERATORS.iter().copied().collect();

        log::debug!(
            "built lexer tables: {} escapes, {} operators",
            escapes.len(),
            operators.len()
        );

        Self {
            escapes,
            operators,
            operator_prefixes,
            operator_chars,
            word_operators,
        }
    }

    /// Process-wide instance, built on first use.
    pub fn shared() -> &'static LookupTables {
        static TABLES: OnceLock<LookupTables> = OnceLock::new();
        TABLES.get_or_init(LookupTables::new)
    }

    /// Escaped sequence/literal pairs in table order.
    pub fn escapes(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.escapes.iter().map(|(escaped, literal)| (*escaped, *literal))
    }

    /// Case-insensitive operator membership.
    pub fn is_operator(&self, text: &str) -> bool {
        self.operators.contains(text) || self.operators.contains(text.to_lowercase().as_str())
    }

    /// Can `c` begin or extend an operator token?
    pub fn is_operator_char(&self, c: char) -> bool {
        self.operator_chars.contains(&c)
    }

    /// Would appending `next` to `current` still spell an operator, or the
    /// beginning of one? `;` and `==` are never extended and `=` only grows
    /// into `==` or `=>`, because no longer operator starts with them.
    pub fn extends_operator(&self, current: &str, next: char) -> bool {
        let mut candidate = String::with_capacity(current.len() + next.len_utf8());
        candidate.push_str(current);
        candidate.push(next);
        self.operator_prefixes.contains(&candidate)
    }

    pub fn is_word_operator(&self, text: &str) -> bool {
        self.word_operators.contains(text.to_lowercase().as_str())
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::new()
    }
}
