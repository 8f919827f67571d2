//! Tests for lowering, control flow analysis and dead code removal.

use pretty_assertions::assert_eq;
use quill_binder::printer::write_function;
use quill_binder::{bind_global_scope, BoundProgram, BoundStatement, FunctionSymbol};
use quill_core::text::TextSpan;
use quill_core::CompilerArena;
use quill_diagnostics::DiagnosticBag;
use quill_lowering::{lower_body, lower_program, ControlFlowGraph};
use quill_parser::parse_text;
use quill_syntax::SyntaxTree;
use std::rc::Rc;

// ============================================================================
// Helpers
// ============================================================================

fn compile(text: &str) -> BoundProgram {
    let arena = CompilerArena::new();
    let trees: Vec<SyntaxTree<'_>> = vec![parse_text(&arena, "test.qs", text)];
    let scope = bind_global_scope(false, None, &trees);
    lower_program(&scope, None)
}

fn messages(program: &BoundProgram) -> Vec<String> {
    program.diagnostics.iter().map(|d| d.message_text.clone()).collect()
}

fn find_function<'p>(program: &'p BoundProgram, name: &str) -> (&'p Rc<FunctionSymbol>, &'p Rc<quill_binder::BoundBlockStatement>) {
    program
        .functions
        .iter()
        .find(|(function, _)| function.name == name)
        .unwrap_or_else(|| panic!("no function {name}"))
}

fn lowered(text: &str, name: &str) -> String {
    let program = compile(text);
    assert_eq!(messages(&program), Vec::<String>::new(), "{text}");
    let (function, body) = find_function(&program, name);
    let mut out = String::new();
    write_function(&mut out, function, body).unwrap();
    out
}

// ============================================================================
// Desugaring
// ============================================================================

#[test]
fn test_lower_if_else() {
    let text = "function g(x: int) { if x > 0 print(\"pos\") else print(\"neg\") }";
    assert_eq!(
        lowered(text, "g"),
        "function g(x: int)\n{\n    goto Label1 unless x > 0\n    print(\"pos\")\n    goto Label2\n    Label1:\n    print(\"neg\")\n    Label2:\n    return\n}\n"
    );
}

#[test]
fn test_lower_for_with_compound_assignment() {
    let text = "function f(n: int): int { var sum = 0 for i = 1 to n { sum += i } return sum }";
    assert_eq!(
        lowered(text, "f"),
        "function f(n: int): int\n{\n    var sum = 0\n    let i = 1\n    let upperBound = n\n    Label1:\n    goto break1 unless i <= upperBound\n    sum = sum + i\n    i = i + 1\n    goto Label1\n    break1:\n    return sum\n}\n"
    );
}

#[test]
fn test_lower_do_while() {
    let text = "function h() { var i = 0 do i++ while i < 3 }";
    assert_eq!(
        lowered(text, "h"),
        "function h()\n{\n    var i = 0\n    Label1:\n    i++\n    goto Label1 if i < 3\n    return\n}\n"
    );
}

#[test]
fn test_break_out_of_infinite_loop() {
    let text = "function f() { while true { break } print(\"after\") }";
    assert_eq!(
        lowered(text, "f"),
        "function f()\n{\n    continue1:\n    goto break1\n    break1:\n    print(\"after\")\n    return\n}\n"
    );
}

#[test]
fn test_constant_condition_drops_branch() {
    let text = "function f(): int { if true return 47 }";
    assert_eq!(lowered(text, "f"), "function f(): int\n{\n    return 47\n}\n");
}

#[test]
fn test_constants_fold_before_lowering() {
    let text = "function f(): string { let greeting = \"hello\" + \" \" + \"world\" return greeting }";
    assert_eq!(
        lowered(text, "f"),
        "function f(): string\n{\n    let greeting = \"hello world\"\n    return \"hello world\"\n}\n"
    );
}

#[test]
fn test_lowering_is_idempotent() {
    let text = "function f(n: int): int { var r = 0 while n > 0 { if n % 2 == 0 r += n n -= 1 } return r }";
    let program = compile(text);
    assert!(program.diagnostics.is_empty());
    let (function, body) = find_function(&program, "f");

    let mut diagnostics = DiagnosticBag::new();
    let again = lower_body(function, body, &mut diagnostics);
    assert!(diagnostics.is_empty());

    let mut first = String::new();
    write_function(&mut first, function, body).unwrap();
    let mut second = String::new();
    write_function(&mut second, function, &again).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_lowered_bodies_are_flat() {
    let text = "function f(n: int) { for i = 0 to n { while i < n { { do print(string(i)) while false } } } }";
    let program = compile(text);
    assert!(program.diagnostics.is_empty());
    let (_, body) = find_function(&program, "f");
    assert!(body.statements.iter().all(|statement| matches!(
        statement,
        BoundStatement::VariableDeclaration(_)
            | BoundStatement::Expression(_)
            | BoundStatement::Label(_)
            | BoundStatement::Goto(_)
            | BoundStatement::ConditionalGoto(_)
            | BoundStatement::Return(_)
    )));
}

// ============================================================================
// Control flow diagnostics
// ============================================================================

#[test]
fn test_not_all_code_paths_return() {
    let program = compile("function test(): int { if false return 0 }");
    assert_eq!(
        messages(&program),
        [
            "Not all code paths of function 'test' return a value of type 'int'",
            "Unreachable code detected",
        ]
    );
    assert!(program.has_errors());
    let location = program.diagnostics.diagnostics()[0].location.as_ref().unwrap();
    assert_eq!(location.span, TextSpan::new(9, 4));
}

#[test]
fn test_empty_non_void_function_does_not_return() {
    let program = compile("function test(): int {}");
    assert_eq!(messages(&program), ["Not all code paths of function 'test' return a value of type 'int'"]);
}

#[test]
fn test_infinite_loop_with_return() {
    let program = compile("function test(): int { while true { return 42 } }");
    assert!(program.diagnostics.is_empty());
}

#[test]
fn test_both_branches_return() {
    let program = compile("function test(a: bool): int { if a return 1 else return 2 }");
    assert!(program.diagnostics.is_empty());
}

#[test]
fn test_one_warning_per_unreachable_run() {
    let text = "function f()\n{\n    return\n    print(\"a\")\n    print(\"b\")\n}";
    let program = compile(text);
    assert_eq!(messages(&program), ["Unreachable code detected"]);
    assert_eq!(program.diagnostics.diagnostics()[0].span(), Some(TextSpan::new(30, 10)));
    assert!(!program.has_errors());

    let (_, body) = find_function(&program, "f");
    assert_eq!(body.statements.len(), 1);
}

#[test]
fn test_unreachable_break_is_reported() {
    let text = "function f()\n{\n    while true\n    {\n        return\n        break\n    }\n}";
    let program = compile(text);
    assert_eq!(messages(&program), ["Unreachable code detected"]);
    assert_eq!(program.diagnostics.diagnostics()[0].span(), Some(TextSpan::new(59, 5)));
}

#[test]
fn test_unreachable_goto_is_reported() {
    let text = "function f()\n{\n    return\n    goto done\n    done:\n}";
    let program = compile(text);
    assert_eq!(messages(&program), ["Unreachable code detected"]);
    assert_eq!(program.diagnostics.diagnostics()[0].span(), Some(TextSpan::new(30, 9)));
}

#[test]
fn test_separate_unreachable_runs() {
    let text = "var a = 0\nif false { a = 1 }\nif false { a = 2 }\nprint(string(a))";
    let program = compile(text);
    assert_eq!(messages(&program), ["Unreachable code detected", "Unreachable code detected"]);
}

#[test]
fn test_binding_errors_skip_lowering() {
    let program = compile("function f(): int { return x }");
    assert_eq!(messages(&program), ["Variable 'x' doesn't exist"]);
    assert!(program.functions.is_empty());
}

#[test]
fn test_program_keeps_entry_points() {
    let program = compile("print(\"hi\")");
    let main = program.main_function.as_ref().expect("main");
    assert!(main.is_synthesized);
    assert!(program.lookup_body(main).is_some());
    assert!(program.script_function.is_none());
}

// ============================================================================
// Graph rendering
// ============================================================================

#[test]
fn test_graph_of_lowered_body() {
    let program = compile("function f(a: bool): int { if a return 1 return 2 }");
    assert!(program.diagnostics.is_empty());
    let (_, body) = find_function(&program, "f");
    let graph = ControlFlowGraph::create(&body.statements);
    assert!(graph.all_paths_return());

    let mut dot = String::new();
    graph.write_dot(&mut dot).unwrap();
    assert_eq!(
        dot,
        "digraph G {\n    N0 [label = \"<Start>\", shape = box]\n    N1 [label = \"<End>\", shape = box]\n    N2 [label = \"goto Label1 unless a\\l\", shape = box]\n    N3 [label = \"return 1\\l\", shape = box]\n    N4 [label = \"Label1:\\lreturn 2\\l\", shape = box]\n    N0 -> N2\n    N2 -> N4 [label = \"!a\"]\n    N2 -> N3 [label = \"a\"]\n    N3 -> N1\n    N4 -> N1\n}\n"
    );
}
