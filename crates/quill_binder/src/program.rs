//! Results of binding and lowering a compilation.

use crate::bound_tree::BoundBlockStatement;
use crate::symbol::{FunctionSymbol, VariableSymbol};
use indexmap::IndexMap;
use quill_diagnostics::DiagnosticBag;
use std::rc::Rc;

/// Everything the binder produced for one compilation: declared symbols,
/// bound (not yet lowered) bodies and diagnostics.
///
/// A global scope is immutable once built. Later submissions hold it through
/// `previous` and seed their scopes from it.
#[derive(Debug)]
pub struct BoundGlobalScope {
    pub previous: Option<Rc<BoundGlobalScope>>,
    /// Syntax diagnostics of the bound trees followed by binder diagnostics.
    pub diagnostics: DiagnosticBag,
    /// The user's `main`, or the synthesized one wrapping global statements.
    pub main_function: Option<Rc<FunctionSymbol>>,
    /// `$eval`, holding the global statements of a script submission.
    pub script_function: Option<Rc<FunctionSymbol>>,
    /// Functions declared by this compilation, in declaration order.
    pub functions: Vec<Rc<FunctionSymbol>>,
    /// Global variables declared by this compilation, in declaration order.
    pub variables: Vec<Rc<VariableSymbol>>,
    pub function_bodies: IndexMap<Rc<FunctionSymbol>, Rc<BoundBlockStatement>>,
}

impl BoundGlobalScope {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// The function evaluation starts in.
    pub fn entry_point(&self) -> Option<&Rc<FunctionSymbol>> {
        self.script_function.as_ref().or(self.main_function.as_ref())
    }
}

/// The lowered program handed to an evaluator or code generator.
///
/// Each body is a flat list of declarations, expression statements, labels,
/// gotos, conditional gotos and returns.
#[derive(Debug)]
pub struct BoundProgram {
    pub previous: Option<Rc<BoundProgram>>,
    /// Global scope diagnostics followed by lowering diagnostics.
    pub diagnostics: DiagnosticBag,
    pub main_function: Option<Rc<FunctionSymbol>>,
    pub script_function: Option<Rc<FunctionSymbol>>,
    /// Lowered bodies of this compilation's functions. Empty when binding
    /// reported errors.
    pub functions: IndexMap<Rc<FunctionSymbol>, Rc<BoundBlockStatement>>,
    pub global_variables: Vec<Rc<VariableSymbol>>,
}

impl BoundProgram {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn entry_point(&self) -> Option<&Rc<FunctionSymbol>> {
        self.script_function.as_ref().or(self.main_function.as_ref())
    }

    /// Find a body in this program or, for functions declared by earlier
    /// submissions, in the programs before it.
    pub fn lookup_body(&self, function: &FunctionSymbol) -> Option<&Rc<BoundBlockStatement>> {
        let mut program = Some(self);
        while let Some(current) = program {
            if let Some(body) = current.functions.get(function) {
                return Some(body);
            }
            program = current.previous.as_deref();
        }
        None
    }

    /// Globals of earlier submissions, oldest first. An evaluator seeds them
    /// from the previous run's results.
    pub fn seeded_variables(&self) -> Vec<Rc<VariableSymbol>> {
        let mut chain = Vec::new();
        let mut program = self.previous.as_deref();
        while let Some(current) = program {
            chain.push(current);
            program = current.previous.as_deref();
        }
        chain.iter().rev().flat_map(|p| p.global_variables.iter().cloned()).collect()
    }
}
