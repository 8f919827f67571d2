//! quill_binder: Semantic analysis for quill.
//!
//! Turns syntax trees into a typed bound tree: names are resolved to
//! symbols through an explicit scope stack, expressions get types and
//! implicit conversions, and constant values are computed bottom-up. Also
//! provides the operator tables and evaluation rules shared with lowering
//! and evaluation, plus a visitor, a rewriter and a printer for bound trees.

pub mod binder;
pub mod bound_tree;
pub mod conversion;
pub mod operators;
pub mod printer;
pub mod program;
pub mod rewriter;
pub mod scope;
pub mod symbol;
pub mod visitor;

pub use binder::bind_global_scope;
pub use bound_tree::*;
pub use conversion::{convert_value, Conversion};
pub use operators::{BoundBinaryOperator, BoundBinaryOperatorKind, BoundUnaryOperator, BoundUnaryOperatorKind};
pub use program::{BoundGlobalScope, BoundProgram};
pub use rewriter::BoundTreeRewriter;
pub use symbol::{BuiltinFunction, FunctionSymbol, Symbol, SymbolId, TypeSymbol, VariableKind, VariableSymbol};
pub use visitor::BoundTreeVisitor;
