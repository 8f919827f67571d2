//! Tokens produced by the scanner.

use quill_core::text::TextSpan;
use quill_core::value::Value;
use quill_syntax::node::TokenFlags;
use quill_syntax::SyntaxKind;

/// A piece of trivia. Its text is the source slice covered by `span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedTrivia {
    pub kind: SyntaxKind,
    pub span: TextSpan,
}

/// A scanned token.
///
/// Tokens own their data so that independent files can be scanned on
/// different threads; the parser copies them into the syntax arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: SyntaxKind,
    /// Span of the token itself, excluding trivia.
    pub span: TextSpan,
    /// The literal value of number, string, `true` and `false` tokens.
    pub value: Option<Value>,
    pub flags: TokenFlags,
    pub leading_trivia: Vec<ScannedTrivia>,
    /// Trivia after the token up to, but not including, the next line break.
    pub trailing_trivia: Vec<ScannedTrivia>,
}

impl Token {
    /// Whether there was a line break before this token.
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Span of the token including its trivia.
    pub fn full_span(&self) -> TextSpan {
        let start = self.leading_trivia.first().map_or(self.span.start, |t| t.span.start);
        let end = self.trailing_trivia.last().map_or(self.span.end(), |t| t.span.end());
        TextSpan::from_bounds(start, end)
    }
}
