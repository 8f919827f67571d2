//! quill_lowering: From bound trees to flat, checked function bodies.
//!
//! Each body goes through constant folding, desugaring into labels and
//! jumps, jump simplification and control flow analysis. The analysis
//! reports functions that can end without returning a value and removes
//! code no path reaches.

pub mod cfg;
pub mod folder;
pub mod lowerer;

pub use cfg::ControlFlowGraph;
pub use folder::{fold_constants, simplify_jumps};
pub use lowerer::{flatten, lower};

use indexmap::IndexMap;
use quill_binder::{BoundBlockStatement, BoundGlobalScope, BoundProgram, BoundStatement, FunctionSymbol, TypeSymbol};
use quill_diagnostics::messages;
use quill_diagnostics::DiagnosticBag;
use std::rc::Rc;

/// Lower every body of `global_scope`.
///
/// Bodies are only lowered when binding succeeded; otherwise the program
/// carries the binder's diagnostics and no functions.
pub fn lower_program(global_scope: &BoundGlobalScope, previous: Option<Rc<BoundProgram>>) -> BoundProgram {
    let mut diagnostics = global_scope.diagnostics.clone();
    let mut functions = IndexMap::with_capacity(global_scope.function_bodies.len());
    if !global_scope.has_errors() {
        for (function, body) in &global_scope.function_bodies {
            let lowered = lower_body(function, body, &mut diagnostics);
            functions.insert(function.clone(), lowered);
        }
    }
    BoundProgram {
        previous,
        diagnostics,
        main_function: global_scope.main_function.clone(),
        script_function: global_scope.script_function.clone(),
        functions,
        global_variables: global_scope.variables.clone(),
    }
}

/// Lower one function body, reporting missing returns and unreachable code.
pub fn lower_body(function: &FunctionSymbol, body: &Rc<BoundBlockStatement>, diagnostics: &mut DiagnosticBag) -> Rc<BoundBlockStatement> {
    let _span = tracing::debug_span!("lower", function = %function.name).entered();

    let folded = fold_constants(&BoundStatement::Block(body.clone()));
    let statements = simplify_jumps(lower(function, &folded));

    let reachable = {
        let graph = ControlFlowGraph::create(&statements);
        if function.ty != TypeSymbol::Void && !graph.all_paths_return() {
            if let Some(declaration) = &function.declaration {
                diagnostics.report(declaration.clone(), &messages::NOT_ALL_CODE_PATHS_RETURN, &[&function.name, function.ty.name()]);
            }
        }
        graph.reachable_statements()
    };
    let before = statements.len();
    let statements = remove_dead_code(statements, &reachable, diagnostics);
    tracing::debug!(statements = statements.len(), removed = before - statements.len(), "lowered");

    Rc::new(BoundBlockStatement {
        location: body.location.clone(),
        statements,
    })
}

/// Drop statements no path reaches. Each run of dropped statements gets one
/// warning, at its first statement that came from source.
fn remove_dead_code(statements: Vec<BoundStatement>, reachable: &[bool], diagnostics: &mut DiagnosticBag) -> Vec<BoundStatement> {
    let mut kept = Vec::with_capacity(statements.len());
    let mut reported = false;
    for (statement, &is_reachable) in statements.into_iter().zip(reachable) {
        if is_reachable {
            reported = false;
            kept.push(statement);
            continue;
        }
        if !reported && statement.is_from_source() {
            diagnostics.report(statement.location().clone(), &messages::UNREACHABLE_CODE, &[]);
            reported = true;
        }
    }
    kept
}
