//! Scope management for the binder.
//!
//! Scopes form an explicit stack. Only the binder holds it, and it is
//! dropped after binding; bound nodes reference symbols directly.

use crate::symbol::Symbol;
use rustc_hash::FxHashMap;

/// What a scope frame was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The built-in functions.
    Builtins,
    /// Functions and globals carried over from an earlier submission.
    Submission,
    /// Top-level functions and global variables of the current compilation.
    Global,
    /// A function's parameters.
    Function,
    /// A block, or the loop variable of a `for`.
    Block,
}

#[derive(Debug)]
struct Frame {
    kind: ScopeKind,
    symbols: FxHashMap<String, Symbol>,
}

/// The outcome of declaring a name in the innermost scope.
#[derive(Debug)]
pub enum Declaration {
    /// Declared. `hidden` is the symbol of the same name in an outer scope.
    Declared { hidden: Option<(Symbol, ScopeKind)> },
    /// The innermost scope already has a symbol with this name; the new one
    /// was not registered.
    AlreadyDeclared(Symbol),
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.frames.push(Frame {
            kind,
            symbols: FxHashMap::default(),
        });
    }

    pub fn pop(&mut self) {
        let popped = self.frames.pop();
        debug_assert!(popped.is_some(), "scope stack underflow");
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current_kind(&self) -> Option<ScopeKind> {
        self.frames.last().map(|f| f.kind)
    }

    /// Declare `symbol` in the innermost scope.
    pub fn declare(&mut self, symbol: Symbol) -> Declaration {
        let Some((current, outer)) = self.frames.split_last_mut() else {
            panic!("declaration outside of any scope");
        };
        if let Some(existing) = current.symbols.get(symbol.name()) {
            return Declaration::AlreadyDeclared(existing.clone());
        }
        let hidden = outer
            .iter()
            .rev()
            .find_map(|frame| frame.symbols.get(symbol.name()).map(|s| (s.clone(), frame.kind)));
        current.symbols.insert(symbol.name().to_string(), symbol);
        Declaration::Declared { hidden }
    }

    /// Innermost symbol with this name.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.frames.iter().rev().find_map(|frame| frame.symbols.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{TypeSymbol, VariableKind, VariableSymbol};

    fn local(name: &str) -> Symbol {
        Symbol::Variable(VariableSymbol::new(name, VariableKind::Local, TypeSymbol::Int, false, None, None))
    }

    #[test]
    fn test_innermost_wins() {
        let mut scopes = ScopeStack::new();
        scopes.push(ScopeKind::Global);
        let outer = local("x");
        scopes.declare(outer.clone());
        scopes.push(ScopeKind::Block);
        let inner = local("x");
        match scopes.declare(inner.clone()) {
            Declaration::Declared { hidden: Some((hidden, ScopeKind::Global)) } => {
                assert_eq!(hidden.name(), "x");
            }
            other => panic!("unexpected {other:?}"),
        }
        let Some(Symbol::Variable(found)) = scopes.lookup("x") else {
            panic!("x not found");
        };
        let Symbol::Variable(inner) = inner else { unreachable!() };
        assert_eq!(*found, inner);

        scopes.pop();
        let Some(Symbol::Variable(found)) = scopes.lookup("x") else {
            panic!("x not found");
        };
        let Symbol::Variable(outer) = outer else { unreachable!() };
        assert_eq!(*found, outer);
    }

    #[test]
    fn test_same_scope_redeclaration_is_rejected() {
        let mut scopes = ScopeStack::new();
        scopes.push(ScopeKind::Block);
        assert!(matches!(scopes.declare(local("x")), Declaration::Declared { hidden: None }));
        assert!(matches!(scopes.declare(local("x")), Declaration::AlreadyDeclared(_)));
        assert_eq!(scopes.depth(), 1);
    }
}
