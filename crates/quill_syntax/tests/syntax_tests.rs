//! Tests for the syntax tree utilities: printing, classification, visiting
//! and rewriting.

use pretty_assertions::assert_eq;
use quill_core::text::TextSpan;
use quill_core::CompilerArena;
use quill_parser::parse_text;
use quill_syntax::classifier::{classify, Classification};
use quill_syntax::printer::tree_to_string;
use quill_syntax::{
    Expression, LiteralExpression, LiteralValue, Member, NameExpression, Statement, SyntaxKind, SyntaxNode,
    SyntaxRewriter, SyntaxToken, SyntaxVisitor, TokenFlags,
};

// ============================================================================
// Printer
// ============================================================================

#[test]
fn test_print_binary_expression() {
    let arena = CompilerArena::new();
    let tree = parse_text(&arena, "test.qs", "1 + 2");
    let expected = "\
└──CompilationUnit
    ├──GlobalStatement
    │   └──ExpressionStatement
    │       └──BinaryExpression
    │           ├──LiteralExpression
    │           │   └──NumberToken 1
    │           ├──PlusToken
    │           └──LiteralExpression
    │               └──NumberToken 2
    └──EndOfFileToken
";
    assert_eq!(tree_to_string(tree.root_node(), false), expected);
}

#[test]
fn test_print_trivia_and_missing_tokens() {
    let arena = CompilerArena::new();
    let tree = parse_text(&arena, "test.qs", "x = // c\n");
    let expected = "\
└──CompilationUnit
    ├──GlobalStatement
    │   └──ExpressionStatement
    │       └──AssignmentExpression
    │           ├──IdentifierToken x
    │           T: WhitespaceTrivia \" \"
    │           ├──EqualsToken
    │           T: WhitespaceTrivia \" \"
    │           T: SingleLineCommentTrivia \"// c\"
    │           └──NameExpression
    │               └──IdentifierToken (missing)
    L: LineBreakTrivia \"\\n\"
    └──EndOfFileToken
";
    assert_eq!(tree_to_string(tree.root_node(), true), expected);
}

// ============================================================================
// Classifier
// ============================================================================

#[test]
fn test_classify_tokens_and_comments() {
    let arena = CompilerArena::new();
    let text = "var a = 1 // one\nprint(\"s\")";
    let tree = parse_text(&arena, "test.qs", text);
    let classes: Vec<(String, Classification)> = classify(tree.root(), TextSpan::new(0, text.len() as u32))
        .into_iter()
        .map(|c| (text[c.span.to_range()].to_string(), c.classification))
        .collect();
    let expected: Vec<(String, Classification)> = [
        ("var", Classification::Keyword),
        ("a", Classification::Identifier),
        ("=", Classification::Text),
        ("1", Classification::Number),
        ("// one", Classification::Comment),
        ("print", Classification::Identifier),
        ("(", Classification::Text),
        ("\"s\"", Classification::String),
        (")", Classification::Text),
    ]
    .into_iter()
    .map(|(s, c)| (s.to_string(), c))
    .collect();
    assert_eq!(classes, expected);
}

#[test]
fn test_classify_restricts_to_span() {
    let arena = CompilerArena::new();
    let tree = parse_text(&arena, "test.qs", "a + b + c");
    let classes = classify(tree.root(), TextSpan::new(4, 1));
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].span, TextSpan::new(4, 1));
    assert_eq!(classes[0].classification, Classification::Identifier);
}

// ============================================================================
// Visitor
// ============================================================================

#[derive(Default)]
struct NameCollector {
    names: Vec<String>,
    tokens: usize,
}

impl<'a> SyntaxVisitor<'a> for NameCollector {
    fn visit_name_expression(&mut self, node: &'a NameExpression<'a>) {
        self.names.push(node.identifier.text.to_string());
        self.visit_token(node.identifier);
    }

    fn visit_token(&mut self, _token: &'a SyntaxToken<'a>) {
        self.tokens += 1;
    }
}

#[test]
fn test_visitor_walks_in_source_order() {
    let arena = CompilerArena::new();
    let tree = parse_text(
        &arena,
        "test.qs",
        "function f(p: int): int { return p + q }\nwhile a < b { c = d }",
    );
    let mut collector = NameCollector::default();
    collector.visit_compilation_unit(tree.root());
    assert_eq!(collector.names, vec!["p", "q", "a", "b", "d"]);

    fn count_tokens(node: SyntaxNode<'_>) -> usize {
        match node {
            SyntaxNode::Token(_) => 1,
            _ => node.children().into_iter().map(count_tokens).sum(),
        }
    }
    assert_eq!(collector.tokens, count_tokens(tree.root_node()));
}

// ============================================================================
// Rewriter
// ============================================================================

/// Replaces every `0` literal with `42`.
struct ZeroReplacer<'a> {
    arena: &'a CompilerArena,
}

impl<'a> SyntaxRewriter<'a> for ZeroReplacer<'a> {
    fn arena(&self) -> &'a CompilerArena {
        self.arena
    }

    fn rewrite_literal_expression(&mut self, node: &'a LiteralExpression<'a>) -> Expression<'a> {
        if node.value != LiteralValue::Integer(0) {
            return Expression::Literal(node);
        }
        let literal_token = self.arena.alloc(SyntaxToken {
            kind: SyntaxKind::NumberToken,
            span: node.literal_token.span,
            text: "42",
            value: Some(LiteralValue::Integer(42)),
            flags: TokenFlags::NONE,
            leading_trivia: node.literal_token.leading_trivia,
            trailing_trivia: node.literal_token.trailing_trivia,
        });
        Expression::Literal(self.arena.alloc(LiteralExpression {
            literal_token,
            value: LiteralValue::Integer(42),
        }))
    }
}

fn global_statements<'a>(members: &[Member<'a>]) -> Vec<Statement<'a>> {
    members
        .iter()
        .filter_map(|m| match m {
            Member::GlobalStatement(g) => Some(g.statement),
            Member::Function(_) => None,
        })
        .collect()
}

#[test]
fn test_rewriter_reuses_untouched_nodes() {
    let arena = CompilerArena::new();
    let tree = parse_text(&arena, "test.qs", "var a = 1 + 2\nprint(\"x\")");
    let mut rewriter = ZeroReplacer { arena: &arena };
    let rewritten = rewriter.rewrite_compilation_unit(tree.root());
    assert!(std::ptr::eq(rewritten, tree.root()));
}

#[test]
fn test_rewriter_replaces_only_the_changed_path() {
    let arena = CompilerArena::new();
    let tree = parse_text(&arena, "test.qs", "var a = 1\nvar b = 0 * 3");
    let mut rewriter = ZeroReplacer { arena: &arena };
    let rewritten = rewriter.rewrite_compilation_unit(tree.root());
    assert!(!std::ptr::eq(rewritten, tree.root()));

    let before = global_statements(tree.root().members);
    let after = global_statements(rewritten.members);
    assert!(after[0].ptr_eq(&before[0]));
    assert!(!after[1].ptr_eq(&before[1]));

    let Statement::VariableDeclaration(declaration) = after[1] else {
        panic!("expected a variable declaration");
    };
    let Expression::Binary(binary) = declaration.initializer else {
        panic!("expected a binary expression");
    };
    let Expression::Literal(left) = binary.left else {
        panic!("expected a literal");
    };
    assert_eq!(left.value, LiteralValue::Integer(42));
    let Statement::VariableDeclaration(original) = before[1] else {
        panic!("expected a variable declaration");
    };
    let Expression::Binary(original_binary) = original.initializer else {
        panic!("expected a binary expression");
    };
    assert!(binary.right.ptr_eq(&original_binary.right));
}
