//! The quill scanner/lexer.
//!
//! Tokens are recognized by their leading character: identifiers and
//! keywords, numbers, strings and operators (maximal munch). Everything in
//! between is trivia. Bytes that cannot start a token become skipped-text
//! trivia of the following token, with a diagnostic, so scanning always
//! advances.

use crate::char_codes::*;
use crate::token::{ScannedTrivia, Token};
use quill_core::text::{SourceText, TextLocation, TextSpan};
use quill_core::value::Value;
use quill_diagnostics::{messages, DiagnosticBag, DiagnosticMessage};
use quill_syntax::node::TokenFlags;
use quill_syntax::SyntaxKind;
use std::sync::Arc;

/// The tokens of one file, always terminated by an end-of-file token.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: DiagnosticBag,
}

/// Scan a whole source text.
pub fn lex(source: &Arc<SourceText>) -> LexResult {
    let span = tracing::debug_span!("lex", file = source.file_name());
    let _enter = span.enter();

    let mut scanner = Scanner::new(source.clone());
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token();
        let is_eof = token.kind == SyntaxKind::EndOfFileToken;
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    let diagnostics = scanner.take_diagnostics();
    tracing::debug!(tokens = tokens.len(), diagnostics = diagnostics.len(), "scanned");
    LexResult { tokens, diagnostics }
}

/// The scanner converts source text into tokens.
pub struct Scanner {
    /// The source text being scanned.
    source: Arc<SourceText>,
    /// Current byte offset in the text.
    pos: usize,
    /// Accumulated diagnostics.
    diagnostics: DiagnosticBag,
}

impl Scanner {
    /// Create a new scanner for the given source text.
    pub fn new(source: Arc<SourceText>) -> Self {
        Self {
            source,
            pos: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Get the accumulated diagnostics.
    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    /// Scan the next token together with its trivia. Once the end of the
    /// text is reached, every call returns an end-of-file token.
    pub fn next_token(&mut self) -> Token {
        let mut leading_trivia = Vec::new();
        loop {
            self.scan_trivia(&mut leading_trivia, true);
            let start = self.pos;
            let (kind, value) = self.scan_token_kind();
            let span = TextSpan::from_bounds(start as u32, self.pos as u32);

            if kind == SyntaxKind::BadToken {
                leading_trivia.push(ScannedTrivia {
                    kind: SyntaxKind::SkippedTextTrivia,
                    span,
                });
                continue;
            }

            let mut flags = TokenFlags::NONE;
            if leading_trivia.iter().any(|t| self.is_line_break_trivia(t)) {
                flags |= TokenFlags::PRECEDING_LINE_BREAK;
            }

            let mut trailing_trivia = Vec::new();
            self.scan_trivia(&mut trailing_trivia, false);

            return Token {
                kind,
                span,
                value,
                flags,
                leading_trivia,
                trailing_trivia,
            };
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn text(&self) -> &str {
        self.source.text()
    }

    /// Look at the character at the current position without advancing.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text()[self.pos..].chars().next()
    }

    /// Look at the byte at position pos + offset.
    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text().as_bytes().get(self.pos + offset).copied()
    }

    fn report(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        let location = TextLocation::new(self.source.clone(), span);
        self.diagnostics.report(location, message, args);
    }

    fn is_line_break_trivia(&self, trivia: &ScannedTrivia) -> bool {
        match trivia.kind {
            SyntaxKind::LineBreakTrivia => true,
            SyntaxKind::MultiLineCommentTrivia => {
                memchr::memchr2(b'\r', b'\n', self.source.slice(trivia.span).as_bytes()).is_some()
            }
            _ => false,
        }
    }

    /// Scan whitespace and comments. Leading trivia includes line breaks;
    /// trailing trivia stops in front of the first one.
    fn scan_trivia(&mut self, out: &mut Vec<ScannedTrivia>, leading: bool) {
        loop {
            let start = self.pos;
            let Some(ch) = self.current_char() else {
                return;
            };
            let kind = match ch {
                '\r' | '\n' => {
                    if !leading {
                        return;
                    }
                    self.scan_line_break();
                    SyntaxKind::LineBreakTrivia
                }
                '/' if self.byte_at(1) == Some(b'/') => {
                    self.scan_single_line_comment();
                    SyntaxKind::SingleLineCommentTrivia
                }
                '/' if self.byte_at(1) == Some(b'*') => {
                    self.scan_multi_line_comment();
                    SyntaxKind::MultiLineCommentTrivia
                }
                c if is_white_space_single_line(c) => {
                    while let Some(c) = self.current_char().filter(|c| is_white_space_single_line(*c)) {
                        self.pos += c.len_utf8();
                    }
                    SyntaxKind::WhitespaceTrivia
                }
                _ => return,
            };
            out.push(ScannedTrivia {
                kind,
                span: TextSpan::from_bounds(start as u32, self.pos as u32),
            });
        }
    }

    /// `\r\n`, `\r` and `\n` are each one line break.
    fn scan_line_break(&mut self) {
        if self.byte_at(0) == Some(b'\r') && self.byte_at(1) == Some(b'\n') {
            self.pos += 2;
        } else {
            self.pos += 1;
        }
    }

    fn scan_single_line_comment(&mut self) {
        self.pos += 2;
        let rest = &self.text().as_bytes()[self.pos..];
        self.pos += memchr::memchr2(b'\r', b'\n', rest).unwrap_or(rest.len());
    }

    fn scan_multi_line_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let rest = &self.text().as_bytes()[self.pos..];
        match memchr::memmem::find(rest, b"*/") {
            Some(index) => self.pos += index + 2,
            None => {
                self.pos = self.text().len();
                self.report(TextSpan::new(start as u32, 2), &messages::UNTERMINATED_MULTILINE_COMMENT, &[]);
            }
        }
    }

    /// Scan one token starting at the current position.
    fn scan_token_kind(&mut self) -> (SyntaxKind, Option<Value>) {
        let Some(ch) = self.current_char() else {
            return (SyntaxKind::EndOfFileToken, None);
        };

        let kind = match ch {
            '+' => self.scan_operator(
                SyntaxKind::PlusToken,
                &[(b'+', SyntaxKind::PlusPlusToken), (b'=', SyntaxKind::PlusEqualsToken)],
            ),
            '-' => self.scan_operator(
                SyntaxKind::MinusToken,
                &[(b'-', SyntaxKind::MinusMinusToken), (b'=', SyntaxKind::MinusEqualsToken)],
            ),
            '*' => self.scan_operator(SyntaxKind::StarToken, &[(b'=', SyntaxKind::StarEqualsToken)]),
            '/' => self.scan_operator(SyntaxKind::SlashToken, &[(b'=', SyntaxKind::SlashEqualsToken)]),
            '%' => self.scan_operator(SyntaxKind::PercentToken, &[(b'=', SyntaxKind::PercentEqualsToken)]),
            '!' => self.scan_operator(SyntaxKind::BangToken, &[(b'=', SyntaxKind::BangEqualsToken)]),
            '&' => self.scan_operator(
                SyntaxKind::AmpersandToken,
                &[(b'&', SyntaxKind::AmpersandAmpersandToken), (b'=', SyntaxKind::AmpersandEqualsToken)],
            ),
            '|' => self.scan_operator(
                SyntaxKind::PipeToken,
                &[(b'|', SyntaxKind::PipePipeToken), (b'=', SyntaxKind::PipeEqualsToken)],
            ),
            '^' => self.scan_operator(SyntaxKind::HatToken, &[(b'=', SyntaxKind::HatEqualsToken)]),
            '=' => self.scan_operator(SyntaxKind::EqualsToken, &[(b'=', SyntaxKind::EqualsEqualsToken)]),
            '<' => self.scan_operator(SyntaxKind::LessToken, &[(b'=', SyntaxKind::LessOrEqualsToken)]),
            '>' => self.scan_operator(SyntaxKind::GreaterToken, &[(b'=', SyntaxKind::GreaterOrEqualsToken)]),
            '~' => self.scan_operator(SyntaxKind::TildeToken, &[]),
            '(' => self.scan_operator(SyntaxKind::OpenParenthesisToken, &[]),
            ')' => self.scan_operator(SyntaxKind::CloseParenthesisToken, &[]),
            '{' => self.scan_operator(SyntaxKind::OpenBraceToken, &[]),
            '}' => self.scan_operator(SyntaxKind::CloseBraceToken, &[]),
            ':' => self.scan_operator(SyntaxKind::ColonToken, &[]),
            ',' => self.scan_operator(SyntaxKind::CommaToken, &[]),

            '"' => return self.scan_string(),
            '0'..='9' => return self.scan_number(),
            _ if is_identifier_start(ch) => return self.scan_identifier_or_keyword(),

            _ => {
                let start = self.pos;
                self.pos += ch.len_utf8();
                let span = TextSpan::from_bounds(start as u32, self.pos as u32);
                let text = ch.to_string();
                self.report(span, &messages::BAD_CHARACTER_INPUT, &[&text]);
                SyntaxKind::BadToken
            }
        };
        (kind, None)
    }

    /// Maximal munch over one- and two-character operators.
    fn scan_operator(&mut self, single: SyntaxKind, doubles: &[(u8, SyntaxKind)]) -> SyntaxKind {
        if let Some(next) = self.byte_at(1) {
            if let Some((_, kind)) = doubles.iter().find(|(byte, _)| *byte == next) {
                self.pos += 2;
                return *kind;
            }
        }
        self.pos += 1;
        single
    }

    fn scan_number(&mut self) -> (SyntaxKind, Option<Value>) {
        let start = self.pos;
        while self.byte_at(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let span = TextSpan::from_bounds(start as u32, self.pos as u32);
        let value = match self.text()[start..self.pos].parse::<i32>() {
            Ok(value) => value,
            Err(_) => {
                let text = self.text()[start..self.pos].to_string();
                self.report(span, &messages::INVALID_NUMBER, &[&text]);
                0
            }
        };
        (SyntaxKind::NumberToken, Some(Value::Integer(value)))
    }

    fn scan_string(&mut self) -> (SyntaxKind, Option<Value>) {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();

        loop {
            match self.current_char() {
                None | Some('\r') | Some('\n') => {
                    self.report(TextSpan::new(start as u32, 1), &messages::STRING_LITERAL_NOT_TERMINATED, &[]);
                    break;
                }
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => self.scan_escape_sequence(&mut value),
                Some(c) => {
                    value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }

        (SyntaxKind::StringToken, Some(Value::String(value)))
    }

    fn scan_escape_sequence(&mut self, value: &mut String) {
        let start = self.pos;
        self.pos += 1;
        let escaped = match self.current_char() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('v') => '\u{000B}',
            Some('0') => '\0',
            Some('\\') => '\\',
            Some('"') => '"',
            Some(c) if !is_line_break(c) => {
                self.pos += c.len_utf8();
                let span = TextSpan::from_bounds(start as u32, self.pos as u32);
                self.report(span, &messages::INVALID_ESCAPE_SEQUENCE, &[]);
                return;
            }
            _ => {
                // A backslash right before the end of the line; the string
                // is reported as unterminated by the caller.
                self.report(TextSpan::new(start as u32, 1), &messages::INVALID_ESCAPE_SEQUENCE, &[]);
                return;
            }
        };
        self.pos += 1;
        value.push(escaped);
    }

    fn scan_identifier_or_keyword(&mut self) -> (SyntaxKind, Option<Value>) {
        let start = self.pos;
        while let Some(c) = self.current_char().filter(|c| is_identifier_part(*c)) {
            self.pos += c.len_utf8();
        }
        match SyntaxKind::from_keyword(&self.text()[start..self.pos]) {
            Some(SyntaxKind::TrueKeyword) => (SyntaxKind::TrueKeyword, Some(Value::Boolean(true))),
            Some(SyntaxKind::FalseKeyword) => (SyntaxKind::FalseKeyword, Some(Value::Boolean(false))),
            Some(keyword) => (keyword, None),
            None => (SyntaxKind::IdentifierToken, None),
        }
    }
}
