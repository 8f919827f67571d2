//! quill_parser: Recursive descent parser for quill.
//!
//! Parses scanned tokens into an arena-allocated syntax tree. Parsing never
//! fails: malformed input produces diagnostics and missing tokens.

mod parser;
pub mod precedence;

pub use parser::{parse, parse_text, parse_tokens, Parser};
