//! quill_compiler: Compiler orchestration.
//!
//! A [`Compilation`] binds and lowers a set of syntax trees, optionally on
//! top of an earlier compilation, and exposes the diagnostics, the lowered
//! program, tree dumps and evaluation.

use quill_binder::printer::write_function;
use quill_binder::{bind_global_scope, BoundGlobalScope, BoundProgram};
use quill_core::text::SourceText;
use quill_core::{CompilerArena, Value};
use quill_diagnostics::{messages, DiagnosticBag};
use quill_evaluator::{EvaluationError, Globals, Host};
use quill_lowering::{lower_program, ControlFlowGraph};
use quill_scanner::LexResult;
use quill_syntax::printer::write_tree;
use quill_syntax::SyntaxTree;
use rayon::prelude::*;
use std::fmt::{self, Write};
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Global statements form a `$eval` submission whose last expression is
    /// the result, as in a REPL.
    pub is_script: bool,
}

#[derive(Debug, Error)]
pub enum CompilationError {
    #[error("Cannot continue from a compilation that has errors")]
    PreviousHasErrors,
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Outcome of [`Compilation::evaluate`]. `value` is `None` when the
/// diagnostics contain errors or the entry point produced no value.
#[derive(Debug)]
pub struct EvaluationResult {
    pub diagnostics: DiagnosticBag,
    pub value: Option<Value>,
}

/// Lex `files` in parallel, then parse them into `arena` in order.
pub fn parse_files<'a>(arena: &'a CompilerArena, files: Vec<Arc<SourceText>>) -> Vec<SyntaxTree<'a>> {
    let lexed: Vec<LexResult> = files.par_iter().map(quill_scanner::lex).collect();
    files
        .into_iter()
        .zip(lexed)
        .map(|(source, lexed)| quill_parser::parse_tokens(arena, source, lexed))
        .collect()
}

pub struct Compilation<'a> {
    options: CompilationOptions,
    syntax_trees: Vec<SyntaxTree<'a>>,
    global_scope: Rc<BoundGlobalScope>,
    program: Rc<BoundProgram>,
}

impl<'a> Compilation<'a> {
    /// Bind and lower `syntax_trees` as one program.
    pub fn new(options: CompilationOptions, syntax_trees: Vec<SyntaxTree<'a>>) -> Self {
        Self::create(options, None, syntax_trees)
    }

    /// Compile `syntax_trees` as the next submission after this one. Its
    /// functions and globals stay visible.
    pub fn continue_with<'b>(&self, syntax_trees: Vec<SyntaxTree<'b>>) -> Result<Compilation<'b>, CompilationError> {
        if self.program.has_errors() {
            return Err(CompilationError::PreviousHasErrors);
        }
        Ok(Compilation::create(self.options, Some(self), syntax_trees))
    }

    fn create(options: CompilationOptions, previous: Option<&Compilation<'_>>, syntax_trees: Vec<SyntaxTree<'a>>) -> Self {
        let _span = tracing::debug_span!("compile", trees = syntax_trees.len(), script = options.is_script).entered();
        let global_scope = Rc::new(bind_global_scope(
            options.is_script,
            previous.map(|p| p.global_scope.clone()),
            &syntax_trees,
        ));
        let program = Rc::new(lower_program(&global_scope, previous.map(|p| p.program.clone())));
        tracing::debug!(
            functions = program.functions.len(),
            diagnostics = program.diagnostics.len(),
            "compiled"
        );
        Self {
            options,
            syntax_trees,
            global_scope,
            program,
        }
    }

    pub fn options(&self) -> CompilationOptions {
        self.options
    }

    pub fn syntax_trees(&self) -> &[SyntaxTree<'a>] {
        &self.syntax_trees
    }

    pub fn global_scope(&self) -> &Rc<BoundGlobalScope> {
        &self.global_scope
    }

    pub fn program(&self) -> &Rc<BoundProgram> {
        &self.program
    }

    /// All syntax, binding and lowering diagnostics, sorted by position.
    pub fn diagnostics(&self) -> DiagnosticBag {
        let mut diagnostics = self.program.diagnostics.clone();
        diagnostics.sort();
        diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.program.has_errors()
    }

    /// Run the program unless it has errors.
    ///
    /// A program that is not a script needs a `main` or global statements;
    /// without either, evaluation reports a missing entry point.
    pub fn evaluate(&self, globals: &mut Globals, host: &mut dyn Host) -> Result<EvaluationResult, CompilationError> {
        let mut diagnostics = self.diagnostics();
        if !diagnostics.has_errors() && !self.options.is_script && self.program.entry_point().is_none() {
            diagnostics.report_global(&messages::MISSING_ENTRY_POINT, &[]);
        }
        if diagnostics.has_errors() {
            return Ok(EvaluationResult { diagnostics, value: None });
        }
        let value = quill_evaluator::evaluate(&self.program, globals, host)?;
        Ok(EvaluationResult { diagnostics, value })
    }

    /// Dump each syntax tree.
    pub fn emit_syntax(&self, out: &mut impl Write) -> fmt::Result {
        for tree in &self.syntax_trees {
            writeln!(out, "// {}", tree.file_name())?;
            write_tree(out, tree.root_node(), false)?;
        }
        Ok(())
    }

    /// Print the bound bodies, before lowering.
    pub fn emit_bound(&self, out: &mut impl Write) -> fmt::Result {
        for (function, body) in &self.global_scope.function_bodies {
            write_function(out, function, body)?;
        }
        Ok(())
    }

    /// Print the lowered bodies. Nothing is printed when binding failed.
    pub fn emit_lowered(&self, out: &mut impl Write) -> fmt::Result {
        for (function, body) in &self.program.functions {
            write_function(out, function, body)?;
        }
        Ok(())
    }

    /// Print the control flow graph of each lowered body as Graphviz `dot`.
    pub fn emit_cfg(&self, out: &mut impl Write) -> fmt::Result {
        for (function, body) in &self.program.functions {
            writeln!(out, "// {}", function.name)?;
            ControlFlowGraph::create(&body.statements).write_dot(out)?;
        }
        Ok(())
    }
}
