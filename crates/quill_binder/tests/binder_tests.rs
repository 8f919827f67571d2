//! Tests for the quill binder.

use pretty_assertions::assert_eq;
use quill_binder::printer::write_function;
use quill_binder::{bind_global_scope, BoundExpression, BoundGlobalScope, BoundStatement, TypeSymbol, VariableKind};
use quill_core::text::TextSpan;
use quill_core::CompilerArena;
use quill_core::Value;
use quill_parser::parse_text;
use quill_syntax::SyntaxTree;
use std::rc::Rc;

// ============================================================================
// Helpers
// ============================================================================

fn bind_files(is_script: bool, previous: Option<Rc<BoundGlobalScope>>, texts: &[&str]) -> BoundGlobalScope {
    let arena = CompilerArena::new();
    let trees: Vec<SyntaxTree<'_>> = texts
        .iter()
        .enumerate()
        .map(|(index, text)| parse_text(&arena, &format!("file{index}.qs"), text))
        .collect();
    bind_global_scope(is_script, previous, &trees)
}

fn bind(text: &str) -> BoundGlobalScope {
    bind_files(false, None, &[text])
}

fn bind_script(text: &str) -> BoundGlobalScope {
    bind_files(true, None, &[text])
}

fn messages(scope: &BoundGlobalScope) -> Vec<String> {
    scope.diagnostics.iter().map(|d| d.message_text.clone()).collect()
}

fn assert_messages(text: &str, expected: &[&str]) {
    let scope = bind(text);
    assert_eq!(messages(&scope), expected, "{text}");
}

fn entry_statements(scope: &BoundGlobalScope) -> Vec<BoundStatement> {
    let entry = scope.entry_point().expect("entry point");
    scope.function_bodies[entry].statements.clone()
}

// ============================================================================
// Scopes
// ============================================================================

#[test]
fn test_inner_declaration_shadows_outer() {
    let scope = bind("function test() {} var a = 0 { var a = 1 }");
    assert_eq!(messages(&scope), ["Local variable 'a' hides global variable 'a'"]);
    assert!(!scope.has_errors());

    let statements = entry_statements(&scope);
    let BoundStatement::VariableDeclaration(outer) = &statements[0] else {
        panic!("expected a declaration");
    };
    let BoundStatement::Block(block) = &statements[1] else {
        panic!("expected a block");
    };
    let BoundStatement::VariableDeclaration(inner) = &block.statements[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(outer.variable.kind, VariableKind::Global);
    assert_eq!(inner.variable.kind, VariableKind::Local);
    assert_ne!(outer.variable, inner.variable);
    assert_eq!(scope.variables.len(), 1);
}

#[test]
fn test_redeclaration_in_same_scope() {
    let scope = bind("{ var x = 1 var x = 2 }");
    assert_eq!(messages(&scope), ["Symbol 'x' is already declared"]);
    assert_eq!(scope.diagnostics.diagnostics()[0].span(), Some(TextSpan::new(16, 1)));
}

#[test]
fn test_shadowing_message_for_each_kind() {
    assert_messages("var x = 1 function f(x: int) {}", &["Parameter 'x' hides global variable 'x'"]);
    assert_messages("function print(text: string) {}", &["Function 'print' hides existing function 'print'"]);
    assert_messages("function f() { var f = 1 }", &["Local variable 'f' hides existing function 'f'"]);
    assert_messages("function f(p: int) { var p = 2 }", &["Local variable 'p' hides parameter 'p'"]);
    assert_messages("function f() { var a = 1 { var a = 2 } }", &["Local variable 'a' hides local variable 'a'"]);
    assert_messages("var print = 1", &["Global variable 'print' hides existing function 'print'"]);
    assert_messages("function f(print: int) {}", &["Parameter 'print' hides existing function 'print'"]);
}

#[test]
fn test_nested_declarations_shadow_earlier_submissions() {
    let first = Rc::new(bind_script("var x = 1"));
    let second = bind_files(true, Some(first), &["function f(x: int) {} { var x = 2 }"]);
    let mut messages = messages(&second);
    messages.sort();
    assert_eq!(
        messages,
        ["Local variable 'x' hides global variable 'x'", "Parameter 'x' hides global variable 'x'"]
    );
}

#[test]
fn test_function_and_global_share_a_scope() {
    assert_messages("function a() {} var a = 1", &["Symbol 'a' is already declared"]);
}

#[test]
fn test_duplicate_parameter() {
    assert_messages("function f(a: int, a: int) {}", &["Symbol 'a' is already declared"]);
}

#[test]
fn test_forward_call() {
    assert_messages("f() function f() {}", &[]);
}

#[test]
fn test_for_variable_is_scoped_to_the_loop() {
    assert_messages("for i = 1 to 3 { print(string(i)) } i = 1", &["Variable 'i' doesn't exist"]);
}

// ============================================================================
// Names and types
// ============================================================================

#[test]
fn test_undefined_names() {
    assert_messages("x = 1", &["Variable 'x' doesn't exist"]);
    assert_messages("foo()", &["Function 'foo' doesn't exist"]);
    assert_messages("var x: number = 1", &["Type 'number' doesn't exist"]);
    assert_messages("var p = print", &["Variable 'print' doesn't exist"]);
}

#[test]
fn test_calling_a_variable() {
    assert_messages("var a = 1 a()", &["Unexpected symbol kind 'global variable', expected 'a' to be a function"]);
}

#[test]
fn test_conversions() {
    assert_messages(
        "var x: int = \"a\"",
        &["Cannot convert 'string' to 'int'. An explicit conversion exists (are you missing a cast?)"],
    );
    assert_messages("var b: bool = 1", &["Cannot convert 'int' to 'bool'"]);
    assert_messages("var s = string(1) var n = int(\"2\") var t = bool(\"true\")", &[]);
}

#[test]
fn test_explicit_conversion_of_constant() {
    let scope = bind("let s = string(12)");
    assert_eq!(messages(&scope), Vec::<String>::new());
    assert_eq!(scope.variables[0].ty, TypeSymbol::String);
    assert_eq!(scope.variables[0].constant, Some(Value::from("12")));
}

#[test]
fn test_operator_errors() {
    assert_messages("var x = 1 + true", &["Binary operator '+' cannot be applied to types 'int' and 'bool'"]);
    assert_messages("var y = -true", &["Unary operator '-' cannot be applied to type 'bool'"]);
    // The error type stops the cascade.
    assert_messages("var z = (1 + true) * 2", &["Binary operator '+' cannot be applied to types 'int' and 'bool'"]);
    assert_messages("var b = true b += 1", &["Binary operator '+=' cannot be applied to types 'bool' and 'int'"]);
    assert_messages("var s = \"a\" s++", &["Unary operator '++' cannot be applied to type 'string'"]);
}

#[test]
fn test_argument_count() {
    assert_messages("print()", &["Function 'print' requires 1 arguments but was given 0"]);

    let scope = bind("print(\"a\", \"b\")");
    assert_eq!(messages(&scope), ["Function 'print' requires 1 arguments but was given 2"]);
    assert_eq!(scope.diagnostics.diagnostics()[0].span(), Some(TextSpan::new(11, 3)));
}

#[test]
fn test_argument_types() {
    assert_messages(
        "random(\"x\")",
        &["Cannot convert 'string' to 'int'. An explicit conversion exists (are you missing a cast?)"],
    );
}

#[test]
fn test_void_has_no_value() {
    assert_messages("var x = print(\"a\")", &["Expression must have a value"]);
}

#[test]
fn test_read_only_assignment() {
    assert_messages("let x = 1 x = 2", &["Variable 'x' is read-only and cannot be assigned to"]);
    assert_messages("let x = 1 x++", &["Variable 'x' is read-only and cannot be assigned to"]);
}

#[test]
fn test_expression_statements() {
    assert_messages("1 + 2", &["Only assignment and call expressions can be used as a statement"]);
    assert_messages("function f() { var a = 1 a }", &["Only assignment and call expressions can be used as a statement"]);
    assert_messages("var a = 1 a += 2 a++ --a print(\"x\")", &[]);

    let scope = bind_script("1 + 2");
    assert_eq!(messages(&scope), Vec::<String>::new());
}

// ============================================================================
// Constants
// ============================================================================

#[test]
fn test_constants_flow_through_read_only_variables() {
    let scope = bind("let a = 2 let b = a * 21 var m = 2 let c = m * 2");
    assert_eq!(messages(&scope), Vec::<String>::new());
    let constants: Vec<Option<Value>> = scope.variables.iter().map(|v| v.constant.clone()).collect();
    assert_eq!(constants, [Some(Value::Integer(2)), Some(Value::Integer(42)), None, None]);
}

#[test]
fn test_string_concatenation_is_constant() {
    let scope = bind_script("\"hello\" + \" \" + \"world\"");
    let statements = entry_statements(&scope);
    let BoundStatement::Expression(statement) = &statements[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(statement.expression.constant(), Some(&Value::from("hello world")));
}

#[test]
fn test_short_circuit_operand_is_not_folded() {
    let scope = bind_script("function f(): bool { return true } f() && false");
    let statements = entry_statements(&scope);
    let BoundStatement::Expression(statement) = &statements[0] else {
        panic!("expected an expression statement");
    };
    assert!(matches!(statement.expression, BoundExpression::Binary(_)));
    assert_eq!(statement.expression.constant(), None);
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_labels() {
    assert_messages("goto missing", &["Label 'missing' doesn't exist"]);
    assert_messages("a: a:", &["Label 'a' is already declared"]);
    assert_messages("goto end print(\"x\") end:", &[]);
}

#[test]
fn test_break_and_continue_outside_loops() {
    assert_messages("break", &["The keyword 'break' can only be used inside of loops"]);
    assert_messages("continue", &["The keyword 'continue' can only be used inside of loops"]);
    assert_messages("while true { break } do { continue } while false", &[]);
}

#[test]
fn test_returns() {
    assert_messages("return 1", &["The 'return' keyword cannot be followed by an expression in global statements"]);
    assert_messages("return", &[]);
    assert_messages(
        "function f() { return 1 }",
        &["'f' does not have a return type and cannot return a value of type 'int'"],
    );
    assert_messages("function f(): int { return }", &["An expression of type 'int' is expected"]);
    assert_messages(
        "function f(): int { return \"a\" }",
        &["Cannot convert 'string' to 'int'. An explicit conversion exists (are you missing a cast?)"],
    );
    assert_eq!(messages(&bind_script("return 1")), Vec::<String>::new());
}

// ============================================================================
// Global statements and main
// ============================================================================

#[test]
fn test_only_one_file_can_have_global_statements() {
    let scope = bind_files(false, None, &["print(\"a\")", "print(\"b\")", "function f() {}"]);
    assert_eq!(
        messages(&scope),
        ["At most one file can have global statements", "At most one file can have global statements"]
    );
    let files: Vec<&str> = scope.diagnostics.iter().filter_map(|d| d.file_name()).collect();
    assert_eq!(files, ["file0.qs", "file1.qs"]);
}

#[test]
fn test_main_and_global_statements_do_not_mix() {
    let scope = bind_files(false, None, &["function main() {}", "print(\"x\")"]);
    assert_eq!(
        messages(&scope),
        [
            "Cannot declare main function when global statements are used",
            "Cannot declare main function when global statements are used",
        ]
    );
}

#[test]
fn test_main_signature() {
    assert_messages("function main(): int { return 1 }", &["main must not take arguments and not return anything"]);
    assert_messages("function main(a: int) {}", &["main must not take arguments and not return anything"]);

    let scope = bind("function main() { print(\"hi\") }");
    assert!(scope.diagnostics.is_empty());
    let main = scope.main_function.clone().expect("main");
    assert!(!main.is_synthesized);
    assert!(scope.script_function.is_none());
}

#[test]
fn test_entry_points() {
    let program = bind("print(\"x\")");
    assert!(program.main_function.as_ref().is_some_and(|f| f.is_synthesized));

    let script = bind_script("function main(): int { return 1 } 1 + 2");
    assert_eq!(messages(&script), Vec::<String>::new());
    assert_eq!(script.script_function.as_ref().map(|f| f.name.as_str()), Some("$eval"));

    let empty = bind("function f() {}");
    assert!(empty.entry_point().is_none());
}

// ============================================================================
// Submissions
// ============================================================================

#[test]
fn test_submissions_see_earlier_declarations() {
    let first = Rc::new(bind_script("var x = 1 function twice(n: int): int { return n * 2 }"));
    assert!(first.diagnostics.is_empty());

    let second = bind_files(true, Some(first.clone()), &["twice(x)"]);
    assert_eq!(messages(&second), Vec::<String>::new());

    // Redeclaring replaces the older symbol without a shadowing warning.
    let third = bind_files(true, Some(first.clone()), &["var x = \"text\" x"]);
    assert_eq!(messages(&third), Vec::<String>::new());
    assert_eq!(third.variables[0].ty, TypeSymbol::String);
    assert_ne!(third.variables[0], first.variables[0]);
}

// ============================================================================
// Printer
// ============================================================================

#[test]
fn test_printer() {
    let scope = bind("function f(a: int): int\n{\n    if a > 0\n        return a\n    else\n        return -a\n}");
    assert!(scope.diagnostics.is_empty());
    let (function, body) = scope.function_bodies.first().expect("one function");
    let mut out = String::new();
    write_function(&mut out, function, body).unwrap();
    assert_eq!(
        out,
        "function f(a: int): int\n{\n    if a > 0\n        return a\n    else\n        return -a\n}\n"
    );
}
