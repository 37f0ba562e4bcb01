//! レキサーテスト
//!
//! K#マクロ式の字句解析器の包括的なテストスイート。
//! トークン分類、数値、文字列、演算子、パラメータを網羅する。

#[cfg(test)]
mod tests {
    use kmacro::{tokenize, Token, TokenKind, TokenValue};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    /// トークンの種類と値のみを比較するヘルパー関数
    fn extract(source: &str) -> Vec<(TokenKind, TokenValue)> {
        tokenize(source, false)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind(), t.value().clone()))
            .collect()
    }

    fn extract_tokens(source: &str) -> Vec<Token> {
        tokenize(source, false).unwrap()
    }

    fn text(s: &str) -> TokenValue {
        TokenValue::Text(s.to_string())
    }

    #[test]
    fn test_identifiers() {
        let tokens = extract("CurrentUser _private x123 Ümlaut");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, text("CurrentUser")),
                (TokenKind::Identifier, text("_private")),
                (TokenKind::Identifier, text("x123")),
                (TokenKind::Identifier, text("Ümlaut")),
            ]
        );
    }

    #[test]
    fn test_whitespace_only_changes_offsets() {
        let spaced = extract_tokens("  a");
        let plain = extract_tokens("a");
        assert_eq!(extract("  a"), extract("a"));
        assert_eq!(spaced[0].offset(), 2);
        assert_eq!(plain[0].offset(), 0);
    }

    #[test]
    fn test_integer() {
        let tokens = extract_tokens("123");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Integer);
        assert_eq!(tokens[0].as_integer(), Some(123));
        assert_eq!(tokens[0].raw(), "123");
    }

    #[test]
    fn test_double() {
        let tokens = extract_tokens("12.5");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Double);
        assert_eq!(tokens[0].as_double(), Some(12.5));
    }

    #[test]
    fn test_integer_member_access() {
        let tokens = extract_tokens("12.foo");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind(), TokenKind::Integer);
        assert_eq!(tokens[0].as_integer(), Some(12));
        assert_eq!(tokens[0].offset(), 0);
        assert_eq!(tokens[1].kind(), TokenKind::Dot);
        assert_eq!(tokens[1].offset(), 2);
        assert_eq!(tokens[2].kind(), TokenKind::Identifier);
        assert_eq!(tokens[2].as_str(), Some("foo"));
    }

    #[test_case("1e10", 1e10 ; "lowercase exponent")]
    #[test_case("1E+5", 1e5 ; "uppercase exponent with sign")]
    #[test_case("2.5e-3", 2.5e-3 ; "fraction with negative exponent")]
    #[test_case("0.125", 0.125 ; "plain fraction")]
    fn test_exponent(source: &str, expected: f64) {
        let tokens = extract_tokens(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Double);
        assert_eq!(tokens[0].as_double(), Some(expected));
        assert_eq!(tokens[0].raw(), source);
    }

    #[test]
    fn test_string_escapes() {
        let source = "\"a\\nb\"";
        let tokens = extract_tokens(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::String);
        assert_eq!(tokens[0].as_str(), Some("a\nb"));
        assert_eq!(tokens[0].raw(), source);
    }

    #[test]
    fn test_string_keeps_literal_backslash() {
        let tokens = extract_tokens(r#""C:\\new""#);
        assert_eq!(tokens[0].as_str(), Some("C:\\new"));
    }

    #[test]
    fn test_multiline_string() {
        let source = r#"@"He said ""hi""""#;
        let tokens = extract_tokens(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::String);
        assert_eq!(tokens[0].as_str(), Some("He said \"hi\""));
        assert_eq!(tokens[0].raw(), source);
    }

    #[test]
    fn test_multiline_string_spans_lines() {
        let tokens = extract_tokens("@\"line one\nline \\two\"");
        assert_eq!(tokens[0].as_str(), Some("line one\nline \\two"));
    }

    #[test_case("<=" ; "less or equal")]
    #[test_case("==" ; "equality")]
    #[test_case("=>" ; "lambda arrow")]
    #[test_case("??" ; "null coalescing")]
    #[test_case("<<=" ; "shift assign")]
    #[test_case("&&" ; "logical and")]
    #[test_case("!=" ; "not equal")]
    #[test_case("++" ; "increment")]
    fn test_operator_is_single_token(source: &str) {
        let tokens = extract_tokens(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Operator);
        assert_eq!(tokens[0].raw(), source);
        assert_eq!(tokens[0].as_str(), Some(source));
    }

    #[test]
    fn test_semicolon() {
        let tokens = extract_tokens(";");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Semicolon);
    }

    #[test]
    fn test_operator_runs_split_on_longest_match() {
        assert_eq!(
            extract("1+-2"),
            vec![
                (TokenKind::Integer, TokenValue::Integer(1)),
                (TokenKind::Operator, text("+")),
                (TokenKind::Operator, text("-")),
                (TokenKind::Integer, TokenValue::Integer(2)),
            ]
        );
        assert_eq!(
            extract("a===b"),
            vec![
                (TokenKind::Identifier, text("a")),
                (TokenKind::Operator, text("==")),
                (TokenKind::Operator, text("=")),
                (TokenKind::Identifier, text("b")),
            ]
        );
    }

    #[test]
    fn test_ternary_and_statements() {
        assert_eq!(
            extract("x ? 1 : 2; y"),
            vec![
                (TokenKind::Identifier, text("x")),
                (TokenKind::Operator, text("?")),
                (TokenKind::Integer, TokenValue::Integer(1)),
                (TokenKind::Operator, text(":")),
                (TokenKind::Integer, TokenValue::Integer(2)),
                (TokenKind::Semicolon, text(";")),
                (TokenKind::Identifier, text("y")),
            ]
        );
    }

    #[test_case("AND" ; "upper")]
    #[test_case("And" ; "capitalized")]
    #[test_case("and" ; "lower")]
    fn test_word_operator_case(source: &str) {
        let tokens = extract_tokens(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Operator);
        assert_eq!(tokens[0].raw(), source);
        assert_eq!(tokens[0].as_str(), Some("and"));
    }

    #[test]
    fn test_all_word_operators() {
        let kinds: Vec<_> = extract_tokens("mod and or of in")
            .iter()
            .map(|t| t.kind())
            .collect();
        assert_eq!(kinds, vec![TokenKind::Operator; 5]);
    }

    #[test]
    fn test_booleans() {
        assert_eq!(
            extract("True FALSE true"),
            vec![
                (TokenKind::Boolean, TokenValue::Boolean(true)),
                (TokenKind::Boolean, TokenValue::Boolean(false)),
                (TokenKind::Boolean, TokenValue::Boolean(true)),
            ]
        );
        let tokens = extract_tokens("True false");
        assert_eq!(tokens[0].raw(), "True");
        assert_eq!(tokens[0].as_bool(), Some(true));
        assert_eq!(tokens[1].as_bool(), Some(false));
        assert_eq!(tokens[0].as_str(), None);
    }

    #[test]
    fn test_punctuation() {
        let kinds: Vec<_> = extract_tokens("( ) [ ] { } . ,")
            .iter()
            .map(|t| t.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::LeftIndexer,
                TokenKind::RightIndexer,
                TokenKind::BlockStart,
                TokenKind::BlockEnd,
                TokenKind::Dot,
                TokenKind::Comma,
            ]
        );
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(extract("1 // comment\n+2"), extract("1\n+2"));
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(extract("1 /* c */ + 2"), extract("1 + 2"));
    }

    #[test]
    fn test_parameter_pairing() {
        let tokens = extract_tokens("|(bold)|");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind(), TokenKind::Parameter);
        assert_eq!(tokens[0].as_str(), Some("bold"));
        assert_eq!(tokens[1].kind(), TokenKind::ParameterValue);
        assert_eq!(tokens[1].as_str(), Some(""));
        assert_eq!(tokens[1].offset(), 7);
    }

    #[test]
    fn test_chained_parameters() {
        assert_eq!(
            extract("Name|(encode)true|(default)N/A"),
            vec![
                (TokenKind::Identifier, text("Name")),
                (TokenKind::Parameter, text("encode")),
                (TokenKind::ParameterValue, text("true")),
                (TokenKind::Parameter, text("default")),
                (TokenKind::ParameterValue, text("N/A")),
            ]
        );
    }

    #[test_case("|(a)|(b)", &[0, 3, 4, 7] ; "adjacent parameters")]
    #[test_case("|(a)||(b)x", &[0, 4, 5, 9] ; "separator before next parameter")]
    fn test_empty_value_offsets_stay_distinct(source: &str, offsets: &[usize]) {
        let tokens = extract_tokens(source);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Parameter,
                TokenKind::ParameterValue,
                TokenKind::Parameter,
                TokenKind::ParameterValue,
            ]
        );
        assert_eq!(tokens[1].as_str(), Some(""));

        let actual: Vec<_> = tokens.iter().map(|t| t.offset()).collect();
        assert_eq!(actual, offsets);
        for pair in tokens.windows(2) {
            assert!(pair[0].offset() < pair[1].offset(), "{source}: {actual:?}");
        }
    }

    #[test]
    fn test_long_unclosed_parameter_run() {
        let source = "|(".repeat(2000);
        let tokens = extract_tokens(&source);
        assert_eq!(tokens.len(), 4000);
        assert_eq!(tokens[0].kind(), TokenKind::Operator);
        assert_eq!(tokens[1].kind(), TokenKind::LeftBracket);
    }

    #[test]
    fn test_parameter_value_escaped_pipe() {
        let tokens = extract_tokens("x|(default)a\\|b");
        assert_eq!(tokens[2].kind(), TokenKind::ParameterValue);
        assert_eq!(tokens[2].raw(), "a\\|b");
        assert_eq!(tokens[2].as_str(), Some("a|b"));
    }

    #[test]
    fn test_parameter_value_is_verbatim() {
        assert_eq!(
            extract("x|(default)\"not a string\" 1.5"),
            vec![
                (TokenKind::Identifier, text("x")),
                (TokenKind::Parameter, text("default")),
                (TokenKind::ParameterValue, text("\"not a string\" 1.5")),
            ]
        );
    }

    #[test]
    fn test_pipe_without_parameter() {
        assert_eq!(
            extract("a | (b1)"),
            vec![
                (TokenKind::Identifier, text("a")),
                (TokenKind::Operator, text("|")),
                (TokenKind::LeftBracket, text("(")),
                (TokenKind::Identifier, text("b1")),
                (TokenKind::RightBracket, text(")")),
            ]
        );
    }

    #[test]
    fn test_end_to_end() {
        assert_eq!(
            extract("a + 1.5e2 and |(bold)|text|"),
            vec![
                (TokenKind::Identifier, text("a")),
                (TokenKind::Operator, text("+")),
                (TokenKind::Double, TokenValue::Double(150.0)),
                (TokenKind::Operator, text("and")),
                (TokenKind::Parameter, text("bold")),
                (TokenKind::ParameterValue, text("text")),
            ]
        );
    }

    #[test]
    fn test_complete_macro() {
        let source = r#"foreach (item in Documents.Where("Published == true")) { item.Name + "\n" }"#;
        let tokens = extract_tokens(source);

        for pair in tokens.windows(2) {
            assert!(pair[0].end() <= pair[1].offset());
        }
        assert_eq!(tokens[0].as_str(), Some("foreach"));
        assert_eq!(tokens[3].kind(), TokenKind::Operator);
        assert_eq!(tokens[3].as_str(), Some("in"));
        assert!(tokens
            .iter()
            .any(|t| t.kind() == TokenKind::String && t.as_str() == Some("\n")));
        assert_eq!(tokens.last().map(|t| t.kind()), Some(TokenKind::BlockEnd));
    }
}
