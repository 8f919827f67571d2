//! quill_scanner: Lexer for quill source code.
//!
//! Converts source text into a flat token stream in one left-to-right pass.
//! Whitespace, line breaks, comments and unrecognized characters are attached
//! to the nearest token as trivia, so the token stream covers every byte of
//! the input exactly once.

mod char_codes;
mod scanner;
mod token;

pub use scanner::{lex, LexResult, Scanner};
pub use token::{ScannedTrivia, Token};
