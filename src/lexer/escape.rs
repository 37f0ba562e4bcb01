//! String literal escaping.
//!
//! Literal backslashes are swapped for a private-use placeholder before the
//! escape table is applied and swapped back afterwards, so `\\n` decodes to
//! a backslash followed by `n` rather than to a newline.

use super::tables::LookupTables;

/// Stands in for a literal backslash while the table is applied.
const BACKSLASH_PLACEHOLDER: char = '\u{E000}';

/// Decode the escape sequences of a single-line string literal body.
pub fn unescape(text: &str) -> String {
    unescape_with(LookupTables::shared(), text)
}

/// Encode `text` so that [`unescape`] restores it.
pub fn escape(text: &str) -> String {
    escape_with(LookupTables::shared(), text)
}

pub(crate) fn unescape_with(tables: &LookupTables, text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let mut result = text.replace("\\\\", &BACKSLASH_PLACEHOLDER.to_string());
    for (escaped, literal) in tables.escapes() {
        result = result.replace(escaped, literal);
    }
    result.replace(BACKSLASH_PLACEHOLDER, "\\")
}

pub(crate) fn escape_with(tables: &LookupTables, text: &str) -> String {
    let mut result = text.replace('\\', &BACKSLASH_PLACEHOLDER.to_string());
    for (escaped, literal) in tables.escapes() {
        result = result.replace(literal, escaped);
    }
    result.replace(BACKSLASH_PLACEHOLDER, "\\\\")
}

/// Body of a verbatim `@"..."` literal: only doubled quotes are special.
pub fn unescape_verbatim(text: &str) -> String {
    text.replace("\"\"", "\"")
}
