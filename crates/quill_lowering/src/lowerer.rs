//! Desugaring of structured control flow into labels and jumps.
//!
//! ```text
//! if c T              gotoFalse c end; T; end:
//! if c T else E       gotoFalse c else; T; goto end; else: E; end:
//! while c B           continue: gotoFalse c break; B; goto continue; break:
//! do B while c        start: B; continue: gotoTrue c start; break:
//! for v = lo to hi B  { var v = lo; let upperBound = hi;
//!                       while v <= upperBound { B; continue: v = v + 1 } }
//! ```
//!
//! The result is flattened into one statement list. Void functions whose
//! last statement can fall through get an explicit `return`.

use quill_binder::rewriter::{walk_compound_assignment_expression, BoundTreeRewriter};
use quill_binder::*;
use quill_core::text::TextLocation;
use quill_core::Value;
use quill_syntax::SyntaxKind;
use std::rc::Rc;

/// Lower `body` of `function` into a flat statement list.
pub fn lower(function: &FunctionSymbol, body: &BoundStatement) -> Vec<BoundStatement> {
    let mut lowerer = Lowerer { label_count: 0 };
    let rewritten = lowerer.rewrite_statement(body);
    let mut statements = flatten(rewritten);
    if function.ty == TypeSymbol::Void && can_fall_through(statements.last()) {
        statements.push(BoundStatement::Return(Rc::new(BoundReturnStatement {
            location: body.location().clone(),
            expression: None,
            is_synthesized: true,
        })));
    }
    statements
}

struct Lowerer {
    label_count: usize,
}

impl Lowerer {
    fn generate_label(&mut self) -> BoundLabel {
        self.label_count += 1;
        BoundLabel::new(format!("Label{}", self.label_count))
    }
}

impl BoundTreeRewriter for Lowerer {
    fn rewrite_if_statement(&mut self, node: &Rc<BoundIfStatement>) -> BoundStatement {
        let location = node.location.clone();
        let block = match &node.else_statement {
            None => {
                let end = self.generate_label();
                BoundStatement::block(
                    location.clone(),
                    vec![
                        BoundStatement::conditional_goto(location.clone(), end.clone(), node.condition.clone(), false),
                        node.then_statement.clone(),
                        BoundStatement::label(location, end),
                    ],
                )
            }
            Some(else_statement) => {
                let else_label = self.generate_label();
                let end = self.generate_label();
                BoundStatement::block(
                    location.clone(),
                    vec![
                        BoundStatement::conditional_goto(location.clone(), else_label.clone(), node.condition.clone(), false),
                        node.then_statement.clone(),
                        BoundStatement::synthesized_goto(location.clone(), end.clone()),
                        BoundStatement::label(location.clone(), else_label),
                        else_statement.clone(),
                        BoundStatement::label(location, end),
                    ],
                )
            }
        };
        self.rewrite_statement(&block)
    }

    fn rewrite_while_statement(&mut self, node: &Rc<BoundWhileStatement>) -> BoundStatement {
        let location = node.location.clone();
        let block = BoundStatement::block(
            location.clone(),
            vec![
                BoundStatement::label(location.clone(), node.continue_label.clone()),
                BoundStatement::conditional_goto(location.clone(), node.break_label.clone(), node.condition.clone(), false),
                node.body.clone(),
                BoundStatement::synthesized_goto(location.clone(), node.continue_label.clone()),
                BoundStatement::label(location, node.break_label.clone()),
            ],
        );
        self.rewrite_statement(&block)
    }

    fn rewrite_do_while_statement(&mut self, node: &Rc<BoundDoWhileStatement>) -> BoundStatement {
        let location = node.location.clone();
        let start = self.generate_label();
        let block = BoundStatement::block(
            location.clone(),
            vec![
                BoundStatement::label(location.clone(), start.clone()),
                node.body.clone(),
                BoundStatement::label(location.clone(), node.continue_label.clone()),
                BoundStatement::conditional_goto(location.clone(), start, node.condition.clone(), true),
                BoundStatement::label(location, node.break_label.clone()),
            ],
        );
        self.rewrite_statement(&block)
    }

    fn rewrite_for_statement(&mut self, node: &Rc<BoundForStatement>) -> BoundStatement {
        let location = node.location.clone();
        let variable = node.variable.clone();
        let upper_bound = VariableSymbol::synthesized("upperBound", TypeSymbol::Int, true, node.upper_bound.constant().cloned());

        let condition = BoundExpression::binary(
            location.clone(),
            BoundExpression::variable(location.clone(), variable.clone()),
            BoundBinaryOperator::builtin(SyntaxKind::LessOrEqualsToken, TypeSymbol::Int),
            BoundExpression::variable(location.clone(), upper_bound.clone()),
        );
        let increment = synthesized_statement(
            location.clone(),
            BoundExpression::assignment(
                location.clone(),
                variable.clone(),
                BoundExpression::binary(
                    location.clone(),
                    BoundExpression::variable(location.clone(), variable.clone()),
                    BoundBinaryOperator::builtin(SyntaxKind::PlusToken, TypeSymbol::Int),
                    BoundExpression::literal(location.clone(), Value::Integer(1)),
                ),
            ),
        );
        let body = BoundStatement::block(
            location.clone(),
            vec![
                node.body.clone(),
                BoundStatement::label(location.clone(), node.continue_label.clone()),
                increment,
            ],
        );
        let loop_statement = BoundStatement::While(Rc::new(BoundWhileStatement {
            location: location.clone(),
            condition,
            body,
            break_label: node.break_label.clone(),
            continue_label: self.generate_label(),
        }));
        let block = BoundStatement::block(
            location.clone(),
            vec![
                BoundStatement::variable_declaration(location.clone(), variable, node.lower_bound.clone()),
                BoundStatement::variable_declaration(location, upper_bound, node.upper_bound.clone()),
                loop_statement,
            ],
        );
        self.rewrite_statement(&block)
    }

    fn rewrite_compound_assignment_expression(&mut self, node: &Rc<BoundCompoundAssignmentExpression>) -> BoundExpression {
        let BoundExpression::CompoundAssignment(node) = walk_compound_assignment_expression(self, node) else {
            unreachable!("compound assignment rewrote to another kind");
        };
        let location = node.location.clone();
        let value = BoundExpression::binary(
            location.clone(),
            BoundExpression::variable(location.clone(), node.variable.clone()),
            node.op,
            node.expression.clone(),
        );
        BoundExpression::assignment(location, node.variable.clone(), value)
    }
}

fn synthesized_statement(location: TextLocation, expression: BoundExpression) -> BoundStatement {
    BoundStatement::Expression(Rc::new(BoundExpressionStatement {
        location,
        expression,
        is_synthesized: true,
    }))
}

/// Inline nested blocks into one list, iteratively.
pub fn flatten(statement: BoundStatement) -> Vec<BoundStatement> {
    let mut statements = Vec::new();
    let mut stack = vec![statement];
    while let Some(current) = stack.pop() {
        match current {
            BoundStatement::Block(block) => stack.extend(block.statements.iter().rev().cloned()),
            other => statements.push(other),
        }
    }
    statements
}

fn can_fall_through(last: Option<&BoundStatement>) -> bool {
    !matches!(last, Some(BoundStatement::Return(_) | BoundStatement::Goto(_)))
}
