//! quill_evaluator: Runs lowered programs.
//!
//! Walks the flat statement lists produced by lowering with an instruction
//! pointer per call. Built-in functions go through a [`Host`], so tests can
//! script input and capture output.

pub mod evaluator;
pub mod host;

pub use evaluator::{evaluate, EvaluationError, Globals, MAX_CALL_DEPTH};
pub use host::{Host, StdHost};
