//! Source text, line tables, spans and locations.
//!
//! These types are used throughout the compiler to track where tokens, syntax
//! nodes, bound statements and diagnostics originate in the source code.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    /// Create a new text span.
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// Create an empty span at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self {
            start: pos,
            length: 0,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    /// Whether this span is empty (zero-length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether this span contains the given position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Whether this span overlaps with another span.
    #[inline]
    pub fn overlaps(&self, other: &TextSpan) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// Return a new span covering both this span and the other.
    pub fn union(&self, other: &TextSpan) -> TextSpan {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        TextSpan::from_bounds(start, end)
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Line and column information derived from source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    /// 0-based line number.
    pub line: u32,
    /// 0-based column, in bytes from the start of the line.
    pub character: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// One line of a [`SourceText`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextLine {
    /// Byte offset of the first character on the line.
    pub start: TextPos,
    /// Length of the line, excluding its line break.
    pub length: TextPos,
    /// Length of the line including its line break (`\r`, `\n` or `\r\n`).
    pub length_including_line_break: TextPos,
}

impl TextLine {
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.start, self.length)
    }
}

/// An immutable source buffer tagged with its file name, plus its line table.
///
/// `\r`, `\n` and `\r\n` each count as a single line break.
pub struct SourceText {
    file_name: String,
    text: String,
    lines: Vec<TextLine>,
}

impl SourceText {
    /// Build a source text and its line table.
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = parse_lines(&text);
        Self {
            file_name: file_name.into(),
            text,
            lines,
        }
    }

    /// Convenience constructor returning a shareable handle.
    pub fn shared(file_name: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(file_name, text))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Get the text covered by a span.
    pub fn slice(&self, span: TextSpan) -> &str {
        &self.text[span.to_range()]
    }

    /// Get the line index (0-based) containing a byte offset.
    pub fn line_index(&self, pos: TextPos) -> usize {
        match self.lines.binary_search_by(|line| line.start.cmp(&pos)) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }

    /// Get the line and column for a byte offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_index(pos);
        let start = self.lines[line].start;
        LineAndColumn::new(line as u32, pos.saturating_sub(start))
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText")
            .field("file_name", &self.file_name)
            .field("len", &self.text.len())
            .field("lines", &self.lines.len())
            .finish()
    }
}

fn parse_lines(text: &str) -> Vec<TextLine> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut line_start = 0usize;
    let mut pos = 0usize;

    while pos < bytes.len() {
        let break_width = match (bytes[pos], bytes.get(pos + 1)) {
            (b'\r', Some(b'\n')) => 2,
            (b'\r', _) | (b'\n', _) => 1,
            _ => 0,
        };
        if break_width == 0 {
            pos += 1;
            continue;
        }
        lines.push(TextLine {
            start: line_start as TextPos,
            length: (pos - line_start) as TextPos,
            length_including_line_break: (pos + break_width - line_start) as TextPos,
        });
        pos += break_width;
        line_start = pos;
    }

    lines.push(TextLine {
        start: line_start as TextPos,
        length: (bytes.len() - line_start) as TextPos,
        length_including_line_break: (bytes.len() - line_start) as TextPos,
    });
    lines
}

/// A span inside a particular source text.
#[derive(Clone)]
pub struct TextLocation {
    pub text: Arc<SourceText>,
    pub span: TextSpan,
}

impl TextLocation {
    pub fn new(text: Arc<SourceText>, span: TextSpan) -> Self {
        Self { text, span }
    }

    pub fn file_name(&self) -> &str {
        self.text.file_name()
    }

    /// 0-based position of the span start.
    pub fn start(&self) -> LineAndColumn {
        self.text.line_and_column_of(self.span.start)
    }

    /// 0-based position of the span end.
    pub fn end(&self) -> LineAndColumn {
        self.text.line_and_column_of(self.span.end())
    }

    /// The source text covered by this location.
    pub fn source(&self) -> &str {
        self.text.slice(self.span)
    }
}

impl PartialEq for TextLocation {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.text, &other.text) && self.span == other.span
    }
}

impl Eq for TextLocation {}

impl fmt::Debug for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.text.file_name(), self.span)
    }
}

impl fmt::Display for TextLocation {
    /// `file(line,column)` with 1-based line and column.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start();
        write!(
            f,
            "{}({},{})",
            self.text.file_name(),
            start.line + 1,
            start.character + 1
        )
    }
}
