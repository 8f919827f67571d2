//! The syntax tree of one source file or submission.

use crate::node::{CompilationUnit, SyntaxNode};
use quill_core::text::{SourceText, TextLocation, TextSpan};
use quill_diagnostics::DiagnosticBag;
use std::sync::Arc;

/// A parsed file: its text, its root node and the diagnostics produced while
/// lexing and parsing it.
///
/// The nodes live in the arena the tree was parsed into; the text is shared
/// so bound nodes and diagnostics can keep locations after the arena is gone.
pub struct SyntaxTree<'a> {
    text: Arc<SourceText>,
    root: &'a CompilationUnit<'a>,
    diagnostics: DiagnosticBag,
}

impl<'a> SyntaxTree<'a> {
    pub fn new(text: Arc<SourceText>, root: &'a CompilationUnit<'a>, diagnostics: DiagnosticBag) -> Self {
        Self {
            text,
            root,
            diagnostics,
        }
    }

    pub fn text(&self) -> &Arc<SourceText> {
        &self.text
    }

    pub fn file_name(&self) -> &str {
        self.text.file_name()
    }

    pub fn root(&self) -> &'a CompilationUnit<'a> {
        self.root
    }

    pub fn root_node(&self) -> SyntaxNode<'a> {
        SyntaxNode::CompilationUnit(self.root)
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    /// A location inside this tree's text.
    pub fn location(&self, span: TextSpan) -> TextLocation {
        TextLocation::new(self.text.clone(), span)
    }
}

impl std::fmt::Debug for SyntaxTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("file_name", &self.file_name())
            .field("members", &self.root.members.len())
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}
