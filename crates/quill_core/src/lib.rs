//! quill_core: Core utilities for the quill compiler.
//!
//! Provides source text and line tables, text spans and locations, the syntax
//! arena, and the literal/runtime value type shared by every later stage.

pub mod arena;
pub mod text;
pub mod value;

// Re-export commonly used types
pub use arena::CompilerArena;
pub use text::{LineAndColumn, SourceText, TextLine, TextLocation, TextSpan};
pub use value::Value;
