//! Compiler integration tests.
//!
//! End-to-end tests for the compilation pipeline: parse -> bind -> lower ->
//! evaluate, across files and submissions.

use pretty_assertions::assert_eq;
use quill_compiler::{parse_files, Compilation, CompilationError, CompilationOptions};
use quill_core::text::SourceText;
use quill_core::{CompilerArena, Value};
use quill_evaluator::{Globals, Host};

#[derive(Default)]
struct RecordingHost {
    output: Vec<String>,
}

impl Host for RecordingHost {
    fn print(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn input(&mut self) -> String {
        String::new()
    }

    fn random(&mut self, _maximum: i32) -> i32 {
        4
    }
}

fn sources(files: &[(&str, &str)]) -> Vec<std::sync::Arc<SourceText>> {
    files.iter().map(|(name, text)| SourceText::shared(*name, *text)).collect()
}

fn messages(compilation: &Compilation<'_>) -> Vec<String> {
    compilation.diagnostics().iter().map(|d| d.message_text.clone()).collect()
}

// ============================================================================
// Multi-file compilation
// ============================================================================

#[test]
fn test_functions_visible_across_files() {
    let arena = CompilerArena::new();
    let trees = parse_files(
        &arena,
        sources(&[
            ("lib.qs", "function square(n: int): int { return n * n }"),
            ("main.qs", "print(string(square(7)))"),
        ]),
    );
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    assert!(compilation.diagnostics().is_empty());

    let mut host = RecordingHost::default();
    let result = compilation.evaluate(&mut Globals::default(), &mut host).unwrap();
    assert!(result.diagnostics.is_empty());
    assert_eq!(host.output, ["49"]);
}

#[test]
fn test_only_one_file_can_have_global_statements() {
    let arena = CompilerArena::new();
    let trees = parse_files(&arena, sources(&[("a.qs", "print(\"a\")"), ("b.qs", "print(\"b\")")]));
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    let diagnostics = compilation.diagnostics();
    assert_eq!(
        messages(&compilation),
        ["At most one file can have global statements", "At most one file can have global statements"]
    );
    let files: Vec<Option<&str>> = diagnostics.iter().map(|d| d.file_name()).collect();
    assert_eq!(files, [Some("a.qs"), Some("b.qs")]);
}

#[test]
fn test_main_and_global_statements_conflict() {
    let arena = CompilerArena::new();
    let trees = parse_files(
        &arena,
        sources(&[("a.qs", "function main() { }"), ("b.qs", "print(\"b\")")]),
    );
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    assert_eq!(
        messages(&compilation),
        [
            "Cannot declare main function when global statements are used",
            "Cannot declare main function when global statements are used",
        ]
    );
}

#[test]
fn test_diagnostics_sorted_by_file_then_position() {
    let arena = CompilerArena::new();
    let trees = parse_files(
        &arena,
        sources(&[
            ("b.qs", "function g() { var z = y }"),
            ("a.qs", "function f() { var q = x }\nfunction main() { }"),
        ]),
    );
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    let diagnostics = compilation.diagnostics();
    let positions: Vec<(Option<&str>, Option<u32>)> = diagnostics
        .iter()
        .map(|d| (d.file_name(), d.span().map(|s| s.start as u32)))
        .collect();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].0, Some("a.qs"));
    assert_eq!(positions[1].0, Some("b.qs"));
}

// ============================================================================
// Entry points
// ============================================================================

#[test]
fn test_user_main_runs() {
    let arena = CompilerArena::new();
    let trees = parse_files(&arena, sources(&[("main.qs", "function main() { print(\"from main\") }")]));
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    let mut host = RecordingHost::default();
    compilation.evaluate(&mut Globals::default(), &mut host).unwrap();
    assert_eq!(host.output, ["from main"]);
}

#[test]
fn test_missing_entry_point() {
    let arena = CompilerArena::new();
    let trees = parse_files(&arena, sources(&[("lib.qs", "function helper() { }")]));
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    assert!(!compilation.has_errors());

    let result = compilation.evaluate(&mut Globals::default(), &mut RecordingHost::default()).unwrap();
    assert_eq!(result.value, None);
    let messages: Vec<&str> = result.diagnostics.iter().map(|d| d.message_text.as_str()).collect();
    assert_eq!(
        messages,
        ["The program has no entry point; declare a 'main' function or write global statements"]
    );
    assert!(result.diagnostics.diagnostics()[0].location.is_none());
}

#[test]
fn test_errors_block_evaluation() {
    let arena = CompilerArena::new();
    let trees = parse_files(&arena, sources(&[("main.qs", "print(\"side effect\") var x: int = \"text\"")]));
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    let mut host = RecordingHost::default();
    let result = compilation.evaluate(&mut Globals::default(), &mut host).unwrap();
    assert!(result.diagnostics.has_errors());
    assert!(host.output.is_empty());
}

#[test]
fn test_runtime_errors_propagate() {
    let arena = CompilerArena::new();
    let trees = parse_files(&arena, sources(&[("main.qs", "var zero = 0 print(string(1 / zero))")]));
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    let error = compilation
        .evaluate(&mut Globals::default(), &mut RecordingHost::default())
        .unwrap_err();
    assert!(matches!(error, CompilationError::Evaluation(_)));
    assert_eq!(error.to_string(), "Division by zero");
}

// ============================================================================
// Submissions
// ============================================================================

fn submit<'a>(
    arena: &'a CompilerArena,
    previous: Option<&Compilation<'_>>,
    text: &str,
) -> Result<Compilation<'a>, CompilationError> {
    let trees = parse_files(arena, sources(&[("submission.qs", text)]));
    match previous {
        Some(previous) => previous.continue_with(trees),
        None => Ok(Compilation::new(CompilationOptions { is_script: true }, trees)),
    }
}

#[test]
fn test_submissions_chain() {
    let mut globals = Globals::default();
    let mut host = RecordingHost::default();

    let first_arena = CompilerArena::new();
    let first = submit(&first_arena, None, "var x = 20 function double(n: int): int { return n * 2 }").unwrap();
    let value = first.evaluate(&mut globals, &mut host).unwrap().value;
    assert_eq!(value, Some(Value::Integer(20)));

    let second_arena = CompilerArena::new();
    let second = submit(&second_arena, Some(&first), "double(x) + 2").unwrap();
    assert!(second.options().is_script);
    let seeded: Vec<String> = second.program().seeded_variables().iter().map(|v| v.name.clone()).collect();
    assert_eq!(seeded, ["x"]);
    let value = second.evaluate(&mut globals, &mut host).unwrap().value;
    assert_eq!(value, Some(Value::Integer(42)));
}

#[test]
fn test_submission_redeclares_silently() {
    let first_arena = CompilerArena::new();
    let first = submit(&first_arena, None, "var x = 1").unwrap();
    let second_arena = CompilerArena::new();
    let second = submit(&second_arena, Some(&first), "var x = \"now a string\" x").unwrap();
    assert!(second.diagnostics().is_empty());

    let mut globals = Globals::default();
    let mut host = RecordingHost::default();
    first.evaluate(&mut globals, &mut host).unwrap();
    let value = second.evaluate(&mut globals, &mut host).unwrap().value;
    assert_eq!(value, Some(Value::String("now a string".to_string())));
}

#[test]
fn test_submission_locals_still_shadow_earlier_globals() {
    let first_arena = CompilerArena::new();
    let first = submit(&first_arena, None, "var x = 1").unwrap();
    let second_arena = CompilerArena::new();
    let second = submit(&second_arena, Some(&first), "function f(x: int) {} { var x = 2 }").unwrap();
    assert_eq!(
        messages(&second),
        ["Parameter 'x' hides global variable 'x'", "Local variable 'x' hides global variable 'x'"]
    );
    assert!(!second.has_errors());
}

#[test]
fn test_cannot_continue_after_errors() {
    let first_arena = CompilerArena::new();
    let first = submit(&first_arena, None, "undefined_name").unwrap();
    assert!(first.has_errors());

    let second_arena = CompilerArena::new();
    let error = submit(&second_arena, Some(&first), "1").err().expect("chaining should fail");
    assert!(matches!(error, CompilationError::PreviousHasErrors));
    assert_eq!(error.to_string(), "Cannot continue from a compilation that has errors");
}

#[test]
fn test_script_without_statements_has_no_value() {
    let arena = CompilerArena::new();
    let compilation = submit(&arena, None, "function f() { }").unwrap();
    let result = compilation
        .evaluate(&mut Globals::default(), &mut RecordingHost::default())
        .unwrap();
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.value, None);
}

// ============================================================================
// Emit
// ============================================================================

#[test]
fn test_emit_bound_and_lowered() {
    let arena = CompilerArena::new();
    let trees = parse_files(
        &arena,
        sources(&[("main.qs", "function f(a: int): int { if a > 0 return a return 0 }")]),
    );
    let compilation = Compilation::new(CompilationOptions::default(), trees);
    assert!(compilation.diagnostics().is_empty());

    let mut bound = String::new();
    compilation.emit_bound(&mut bound).unwrap();
    assert_eq!(bound, "function f(a: int): int\n{\n    if a > 0\n        return a\n    return 0\n}\n");

    let mut lowered = String::new();
    compilation.emit_lowered(&mut lowered).unwrap();
    assert_eq!(
        lowered,
        "function f(a: int): int\n{\n    goto Label1 unless a > 0\n    return a\n    Label1:\n    return 0\n}\n"
    );

    let mut cfg = String::new();
    compilation.emit_cfg(&mut cfg).unwrap();
    assert!(cfg.starts_with("// f\ndigraph G {\n"));
}

#[test]
fn test_emit_syntax() {
    let arena = CompilerArena::new();
    let trees = parse_files(&arena, sources(&[("main.qs", "1")]));
    let compilation = Compilation::new(CompilationOptions { is_script: true }, trees);
    let mut syntax = String::new();
    compilation.emit_syntax(&mut syntax).unwrap();
    assert!(syntax.starts_with("// main.qs\n"));
    assert!(syntax.contains("NumberToken 1"));
}
