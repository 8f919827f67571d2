//! Token classification for editors and terminal highlighting.

use crate::node::{CompilationUnit, SyntaxToken, Trivia};
use crate::syntax_kind::SyntaxKind;
use crate::visitor::SyntaxVisitor;
use quill_core::text::TextSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Text,
    Keyword,
    Identifier,
    Number,
    String,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedSpan {
    pub span: TextSpan,
    pub classification: Classification,
}

/// Classify every token and comment of a tree that overlaps `span`, in
/// source order. Missing tokens are skipped.
pub fn classify<'a>(root: &'a CompilationUnit<'a>, span: TextSpan) -> Vec<ClassifiedSpan> {
    let mut classifier = Classifier { span, result: Vec::new() };
    classifier.visit_compilation_unit(root);
    classifier.result
}

struct Classifier {
    span: TextSpan,
    result: Vec<ClassifiedSpan>,
}

impl Classifier {
    fn add(&mut self, span: TextSpan, classification: Classification) {
        if span.is_empty() || !span.overlaps(&self.span) {
            return;
        }
        self.result.push(ClassifiedSpan { span, classification });
    }

    fn add_comments(&mut self, trivia: &[Trivia<'_>]) {
        for piece in trivia.iter().filter(|t| t.kind.is_comment()) {
            self.add(piece.span, Classification::Comment);
        }
    }
}

impl<'a> SyntaxVisitor<'a> for Classifier {
    fn visit_token(&mut self, token: &'a SyntaxToken<'a>) {
        self.add_comments(token.leading_trivia);
        let classification = match token.kind {
            kind if kind.is_keyword() => Classification::Keyword,
            SyntaxKind::IdentifierToken => Classification::Identifier,
            SyntaxKind::NumberToken => Classification::Number,
            SyntaxKind::StringToken => Classification::String,
            _ => Classification::Text,
        };
        self.add(token.span, classification);
        self.add_comments(token.trailing_trivia);
    }
}
