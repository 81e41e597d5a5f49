use dynjson::lexer::{Lexer, Token, TokenType};
use dynjson::{ErrorCategory, JsonError};

/// Helper: collect all tokens (including EOF) or panic on the first error.
fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input)
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| panic!("lexing {input:?} failed: {e}"))
}

fn types(input: &str) -> Vec<TokenType> {
    tokens(input).into_iter().map(|t| t.token_type).collect()
}

/// Helper: lex until the first error and return it.
fn lex_error(input: &str) -> JsonError {
    Lexer::new(input)
        .find_map(|r| r.err())
        .unwrap_or_else(|| panic!("expected a lexical error for {input:?}"))
}

// ============================================================================
// Punctuation, constants and positions
// ============================================================================

#[test]
fn lex_punctuation() {
    assert_eq!(
        types("{}[],:"),
        vec![
            TokenType::LBrace,
            TokenType::RBrace,
            TokenType::LBracket,
            TokenType::RBracket,
            TokenType::Comma,
            TokenType::Colon,
            TokenType::Eof,
        ]
    );
}

#[test]
fn lex_constants() {
    let toks = tokens("true false null");
    assert_eq!(toks[0], Token::new(1, 1, "true", TokenType::True));
    assert_eq!(toks[1], Token::new(1, 6, "false", TokenType::False));
    assert_eq!(toks[2], Token::new(1, 12, "null", TokenType::Null));
    assert_eq!(toks[3].token_type, TokenType::Eof);
}

#[test]
fn lex_positions_across_lines() {
    let toks = tokens("{ }\n[ ]");
    let positions: Vec<(usize, usize)> = toks.iter().map(|t| (t.line, t.column)).collect();
    assert_eq!(positions, vec![(1, 1), (1, 3), (2, 1), (2, 3), (2, 4)]);
}

#[test]
fn lex_columns_count_characters_not_bytes() {
    let toks = tokens("\"é\" 1");
    assert_eq!(toks[1].token_type, TokenType::Number);
    assert_eq!((toks[1].line, toks[1].column), (1, 5));
}

#[test]
fn lex_skips_all_json_whitespace() {
    assert_eq!(types(" \t\r\n 1 \r\n"), vec![TokenType::Number, TokenType::Eof]);
}

#[test]
fn lex_empty_input_is_eof() {
    let toks = tokens("");
    assert_eq!(toks, vec![Token::new(1, 1, "<EOF>", TokenType::Eof)]);
}

#[test]
fn lex_current_token_is_tracked() {
    let mut lexer = Lexer::new("[1]");
    assert_eq!(lexer.token().token_type, TokenType::Eof);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().token_type, TokenType::LBracket);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().text, "1");
    assert_eq!((lexer.line(), lexer.column()), (1, 3));
}

#[test]
fn lex_load_resets_position() {
    let mut lexer = Lexer::new("\n\n  true");
    lexer.next_token().unwrap();
    assert_eq!((lexer.token().line, lexer.token().column), (3, 3));

    lexer.load("null");
    assert_eq!((lexer.line(), lexer.column()), (1, 1));
    let token = lexer.next_token().unwrap();
    assert_eq!(token, &Token::new(1, 1, "null", TokenType::Null));
}

#[test]
fn sentinel_tokens_are_stamped_with_position() {
    let brace = Token::sentinel(TokenType::LBrace).unwrap();
    assert_eq!((brace.line, brace.column), (0, 0));
    assert_eq!(brace.text, "{");

    let stamped = brace.at(4, 7);
    assert_eq!(stamped, Token::new(4, 7, "{", TokenType::LBrace));

    assert!(Token::sentinel(TokenType::String).is_none());
    assert!(Token::sentinel(TokenType::Number).is_none());
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn lex_number_forms_keep_raw_text() {
    for text in ["0", "-0", "7", "-12", "3.14", "0.5", "1e10", "1E-3", "-12.5e+3", "10"] {
        let toks = tokens(text);
        assert_eq!(toks[0], Token::new(1, 1, text, TokenType::Number), "input {text}");
    }
}

#[test]
fn lex_leading_zero_is_rejected() {
    let err = lex_error("01");
    assert_eq!(err.category(), ErrorCategory::Lexical);
    assert!(matches!(
        err,
        JsonError::MalformedNumber {
            found: Some('1'),
            line: 1,
            column: 2,
            ..
        }
    ));
}

#[test]
fn lex_negative_leading_zero_is_rejected() {
    assert!(matches!(lex_error("-007"), JsonError::MalformedNumber { .. }));
}

#[test]
fn lex_trailing_dot_is_rejected() {
    assert!(matches!(
        lex_error("1."),
        JsonError::MalformedNumber {
            found: None,
            line: 1,
            column: 3,
            ..
        }
    ));
}

#[test]
fn lex_dot_without_digits_is_rejected() {
    assert!(matches!(
        lex_error("1.e5"),
        JsonError::MalformedNumber { found: Some('e'), .. }
    ));
}

#[test]
fn lex_malformed_exponent_is_rejected() {
    let err = lex_error("1e");
    assert!(matches!(err, JsonError::MalformedNumber { found: None, .. }));
    assert!(err.to_string().contains("'+', '-', or a digit"));

    assert!(matches!(
        lex_error("2E+x"),
        JsonError::MalformedNumber { found: Some('x'), .. }
    ));
}

#[test]
fn lex_lone_minus_is_rejected() {
    assert!(matches!(
        lex_error("-"),
        JsonError::MalformedNumber { found: None, .. }
    ));
    assert!(matches!(
        lex_error("-a"),
        JsonError::MalformedNumber { found: Some('a'), .. }
    ));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn lex_string_decodes_simple_escapes() {
    let toks = tokens(r#""a\"b\\c\/d\n\t\r\b\f""#);
    assert_eq!(toks[0].text, "a\"b\\c/d\n\t\r\u{8}\u{c}");
    assert_eq!(toks[0].token_type, TokenType::String);
}

#[test]
fn lex_string_unicode_escape() {
    assert_eq!(tokens(r#""\u0041\u00e9""#)[0].text, "Aé");
    assert_eq!(tokens(r#""\u00E9""#)[0].text, "é");
}

#[test]
fn lex_string_surrogate_pair_combines() {
    assert_eq!(tokens(r#""\ud83d\ude00""#)[0].text, "😀");
}

#[test]
fn lex_string_lone_surrogate_is_replaced() {
    assert_eq!(tokens(r#""\ud800x""#)[0].text, "\u{FFFD}x");
    assert_eq!(tokens(r#""\udc00""#)[0].text, "\u{FFFD}");
    // High surrogate followed by a non-surrogate escape: both decoded separately.
    assert_eq!(tokens(r#""\ud800\u0041""#)[0].text, "\u{FFFD}A");
}

#[test]
fn lex_string_keeps_raw_control_characters() {
    assert_eq!(tokens("\"line1\nline2\ttab\"")[0].text, "line1\nline2\ttab");
}

#[test]
fn lex_invalid_hex_digit_in_unicode_escape() {
    let err = lex_error(r#""\u00g1""#);
    assert!(matches!(
        err,
        JsonError::InvalidUnicodeEscape {
            found: Some('g'),
            line: 1,
            column: 6,
        }
    ));
    assert_eq!(err.category(), ErrorCategory::Lexical);
}

#[test]
fn lex_truncated_unicode_escape() {
    assert!(matches!(
        lex_error(r#""\u12"#),
        JsonError::InvalidUnicodeEscape { found: None, .. }
    ));
}

#[test]
fn lex_unknown_escape_is_rejected() {
    assert!(matches!(
        lex_error(r#""\q""#),
        JsonError::InvalidEscape {
            found: 'q',
            line: 1,
            column: 3,
        }
    ));
}

#[test]
fn lex_unterminated_string_reports_opening_quote() {
    assert!(matches!(
        lex_error("\"abc"),
        JsonError::UnterminatedString { line: 1, column: 1 }
    ));
    assert!(matches!(
        lex_error("[\n  \"abc"),
        JsonError::UnterminatedString { line: 2, column: 3 }
    ));
}

#[test]
fn lex_backslash_at_end_of_input_is_unterminated() {
    assert!(matches!(
        lex_error("\"abc\\"),
        JsonError::UnterminatedString { line: 1, column: 1 }
    ));
}

// ============================================================================
// Constants and stray characters
// ============================================================================

#[test]
fn lex_unknown_constant_is_rejected() {
    let err = lex_error("nul");
    assert!(matches!(
        err,
        JsonError::UnexpectedConstant { ref constant, line: 1, column: 1 } if constant == "nul"
    ));
    assert!(matches!(
        lex_error("True"),
        JsonError::UnexpectedConstant { ref constant, .. } if constant == "True"
    ));
}

#[test]
fn lex_constant_stops_at_non_letter() {
    assert_eq!(
        types("true,false"),
        vec![TokenType::True, TokenType::Comma, TokenType::False, TokenType::Eof]
    );
}

#[test]
fn lex_unexpected_character() {
    let err = lex_error("[1, @]");
    assert!(matches!(
        err,
        JsonError::UnexpectedCharacter {
            found: '@',
            line: 1,
            column: 5,
        }
    ));
    assert_eq!(err.position(), Some((1, 5)));
}

#[test]
fn lex_iterator_stops_after_eof() {
    let mut lexer = Lexer::new("1");
    assert!(matches!(lexer.next(), Some(Ok(Token { token_type: TokenType::Number, .. }))));
    assert!(matches!(lexer.next(), Some(Ok(Token { token_type: TokenType::Eof, .. }))));
    assert!(lexer.next().is_none());
}

#[test]
fn lex_iterator_stops_after_error() {
    let mut lexer = Lexer::new("1 # 2");
    assert!(matches!(lexer.next(), Some(Ok(_))));
    assert!(matches!(lexer.next(), Some(Err(_))));
    assert!(lexer.next().is_none());
}
