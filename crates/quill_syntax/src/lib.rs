//! quill_syntax: Syntax tree definitions for the quill compiler.
//!
//! This crate defines the token and node kinds, trivia, the arena-allocated
//! syntax nodes, the `SyntaxTree` container, and the generic visitor and
//! rewriter used to traverse them.

pub mod classifier;
pub mod node;
pub mod printer;
pub mod rewriter;
pub mod syntax_kind;
pub mod tree;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use rewriter::SyntaxRewriter;
pub use syntax_kind::SyntaxKind;
pub use tree::SyntaxTree;
pub use visitor::SyntaxVisitor;
