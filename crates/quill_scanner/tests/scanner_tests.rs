//! Tests for the quill scanner.

use pretty_assertions::assert_eq;
use quill_core::text::{SourceText, TextSpan};
use quill_core::value::Value;
use quill_scanner::{lex, LexResult, Token};
use quill_syntax::SyntaxKind;

fn scan(text: &str) -> LexResult {
    lex(&SourceText::shared("test.qs", text))
}

/// Kinds of all tokens except the trailing end-of-file token.
fn kinds(text: &str) -> Vec<SyntaxKind> {
    let result = scan(text);
    let mut kinds: Vec<SyntaxKind> = result.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds.pop(), Some(SyntaxKind::EndOfFileToken));
    kinds
}

fn messages(text: &str) -> Vec<String> {
    scan(text).diagnostics.iter().map(|d| d.message_text.clone()).collect()
}

fn single_token(text: &str) -> Token {
    let mut result = scan(text);
    assert_eq!(result.tokens.len(), 2, "expected one token in {text:?}");
    result.tokens.remove(0)
}

fn fixed_kinds() -> Vec<SyntaxKind> {
    SyntaxKind::ALL.iter().copied().filter(|k| k.fixed_text().is_some()).collect()
}

// ============================================================================
// Single tokens
// ============================================================================

#[test]
fn test_every_fixed_token_scans_alone() {
    for kind in fixed_kinds() {
        let text = kind.fixed_text().unwrap();
        let token = single_token(text);
        assert_eq!(token.kind, kind, "{text}");
        assert_eq!(token.span, TextSpan::new(0, text.len() as u32));
    }
}

#[test]
fn test_identifiers_and_keywords() {
    assert_eq!(single_token("abc").kind, SyntaxKind::IdentifierToken);
    assert_eq!(single_token("_a1").kind, SyntaxKind::IdentifierToken);
    assert_eq!(single_token("größe").kind, SyntaxKind::IdentifierToken);
    assert_eq!(single_token("while").kind, SyntaxKind::WhileKeyword);
    assert_eq!(single_token("whilex").kind, SyntaxKind::IdentifierToken);
}

#[test]
fn test_literal_values() {
    assert_eq!(single_token("123").value, Some(Value::Integer(123)));
    assert_eq!(single_token("true").value, Some(Value::Boolean(true)));
    assert_eq!(single_token("false").value, Some(Value::Boolean(false)));
    assert_eq!(single_token("\"hi\"").value, Some(Value::String("hi".into())));
}

#[test]
fn test_string_escapes() {
    let token = single_token(r#""a\n\t\"\\\0b""#);
    assert_eq!(token.value, Some(Value::String("a\n\t\"\\\0b".into())));
}

// ============================================================================
// Maximal munch
// ============================================================================

#[test]
fn test_longest_operator_wins() {
    assert_eq!(kinds("&&"), vec![SyntaxKind::AmpersandAmpersandToken]);
    assert_eq!(kinds("& &"), vec![SyntaxKind::AmpersandToken, SyntaxKind::AmpersandToken]);
    assert_eq!(kinds("+++"), vec![SyntaxKind::PlusPlusToken, SyntaxKind::PlusToken]);
    assert_eq!(kinds("<=="), vec![SyntaxKind::LessOrEqualsToken, SyntaxKind::EqualsToken]);
    assert_eq!(kinds("a-=1"), vec![SyntaxKind::IdentifierToken, SyntaxKind::MinusEqualsToken, SyntaxKind::NumberToken]);
}

/// Two tokens written back to back must come out as the same two tokens,
/// unless they would merge into a longer token.
#[test]
fn test_token_pairs_without_separator() {
    let samples: Vec<(SyntaxKind, &str)> = fixed_kinds()
        .into_iter()
        .map(|k| (k, k.fixed_text().unwrap()))
        .chain([
            (SyntaxKind::IdentifierToken, "a"),
            (SyntaxKind::IdentifierToken, "abc"),
            (SyntaxKind::NumberToken, "1"),
            (SyntaxKind::NumberToken, "123"),
            (SyntaxKind::StringToken, "\"x\""),
        ])
        .collect();

    for (first_kind, first_text) in &samples {
        for (second_kind, second_text) in &samples {
            let text = format!("{first_text}{second_text}");
            let merged = scan(&text);
            if merged.tokens.len() != 3 || !merged.diagnostics.is_empty() {
                continue;
            }
            let scanned: Vec<SyntaxKind> = merged.tokens.iter().map(|t| t.kind).collect();
            if scanned[0] == *first_kind && merged.tokens[0].span.length as usize == first_text.len() {
                assert_eq!(scanned[1], *second_kind, "{text}");
            }
        }
    }
}

// ============================================================================
// Trivia
// ============================================================================

#[test]
fn test_trailing_trivia_stops_before_line_break() {
    let result = scan("a  // note\n  b");
    let a = &result.tokens[0];
    let trailing: Vec<SyntaxKind> = a.trailing_trivia.iter().map(|t| t.kind).collect();
    assert_eq!(trailing, vec![SyntaxKind::WhitespaceTrivia, SyntaxKind::SingleLineCommentTrivia]);

    let b = &result.tokens[1];
    let leading: Vec<SyntaxKind> = b.leading_trivia.iter().map(|t| t.kind).collect();
    assert_eq!(leading, vec![SyntaxKind::LineBreakTrivia, SyntaxKind::WhitespaceTrivia]);
    assert!(b.has_preceding_line_break());
    assert!(!a.has_preceding_line_break());
}

#[test]
fn test_crlf_is_one_line_break() {
    let result = scan("a\r\n\rb");
    let leading: Vec<TextSpan> = result.tokens[1].leading_trivia.iter().map(|t| t.span).collect();
    assert_eq!(leading, vec![TextSpan::new(1, 2), TextSpan::new(3, 1)]);
}

#[test]
fn test_tokens_cover_text_contiguously() {
    let text = "function f(a: int) { /* c */ return a + 1 } // end\n\t@ f(2)";
    let result = scan(text);
    let mut expected_start = 0;
    for token in &result.tokens {
        let full = token.full_span();
        assert_eq!(full.start, expected_start, "{:?}", token.kind);
        expected_start = full.end();
    }
    assert_eq!(expected_start as usize, text.len());
}

#[test]
fn test_multi_line_comment_sets_line_break_flag() {
    let result = scan("a /*\n*/ b");
    assert!(result.tokens[1].has_preceding_line_break());
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_bad_character_becomes_skipped_trivia() {
    let result = scan("a @ b");
    let kinds: Vec<SyntaxKind> = result.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![SyntaxKind::IdentifierToken, SyntaxKind::IdentifierToken, SyntaxKind::EndOfFileToken]);
    let skipped: Vec<SyntaxKind> = result.tokens[1].leading_trivia.iter().map(|t| t.kind).collect();
    assert_eq!(skipped, vec![SyntaxKind::SkippedTextTrivia, SyntaxKind::WhitespaceTrivia]);
    assert_eq!(messages("a @ b"), vec!["Bad character input: '@'"]);
}

#[test]
fn test_bad_multibyte_character_is_one_piece() {
    let result = scan("€");
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].leading_trivia[0].span, TextSpan::new(0, 3));
    assert_eq!(messages("€"), vec!["Bad character input: '€'"]);
}

#[test]
fn test_unterminated_string() {
    assert_eq!(messages("\"abc"), vec!["String literal not terminated"]);
    let result = scan("\"abc\nx");
    assert_eq!(result.tokens[0].kind, SyntaxKind::StringToken);
    assert_eq!(result.tokens[0].span, TextSpan::new(0, 4));
    assert_eq!(result.tokens[1].kind, SyntaxKind::IdentifierToken);
}

#[test]
fn test_invalid_escape_sequence() {
    assert_eq!(messages(r#""a\qb""#), vec!["Invalid escape sequence"]);
    let result = scan(r#""a\qb""#);
    assert_eq!(result.diagnostics.iter().next().unwrap().span(), Some(TextSpan::new(2, 2)));
    assert_eq!(result.tokens[0].value, Some(Value::String("ab".into())));
}

#[test]
fn test_unterminated_multiline_comment() {
    assert_eq!(messages("a /* never closed"), vec!["Unterminated multiline comment"]);
    assert_eq!(kinds("a /* never closed"), vec![SyntaxKind::IdentifierToken]);
}

#[test]
fn test_number_overflow() {
    assert_eq!(messages("2147483648"), vec!["The number 2147483648 isn't a valid int"]);
    assert!(messages("2147483647").is_empty());
}

#[test]
fn test_empty_input_is_just_end_of_file() {
    let result = scan("");
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, SyntaxKind::EndOfFileToken);
    assert_eq!(result.tokens[0].span, TextSpan::empty(0));
}
