//! Bound tree rewriter.
//!
//! Each `rewrite_*` method defaults to the matching `walk_*` function, which
//! rewrites the children and rebuilds the node only when one of them came
//! back as a different node. Overriding a method and calling the `walk_*`
//! function gives the usual "rewrite children, then post-process" shape.

use crate::bound_tree::*;
use std::rc::Rc;

pub trait BoundTreeRewriter: Sized {
    fn rewrite_statement(&mut self, statement: &BoundStatement) -> BoundStatement {
        walk_statement(self, statement)
    }

    fn rewrite_block_statement(&mut self, node: &Rc<BoundBlockStatement>) -> BoundStatement {
        walk_block_statement(self, node)
    }

    fn rewrite_variable_declaration(&mut self, node: &Rc<BoundVariableDeclaration>) -> BoundStatement {
        walk_variable_declaration(self, node)
    }

    fn rewrite_if_statement(&mut self, node: &Rc<BoundIfStatement>) -> BoundStatement {
        walk_if_statement(self, node)
    }

    fn rewrite_while_statement(&mut self, node: &Rc<BoundWhileStatement>) -> BoundStatement {
        walk_while_statement(self, node)
    }

    fn rewrite_do_while_statement(&mut self, node: &Rc<BoundDoWhileStatement>) -> BoundStatement {
        walk_do_while_statement(self, node)
    }

    fn rewrite_for_statement(&mut self, node: &Rc<BoundForStatement>) -> BoundStatement {
        walk_for_statement(self, node)
    }

    fn rewrite_label_statement(&mut self, node: &Rc<BoundLabelStatement>) -> BoundStatement {
        BoundStatement::Label(node.clone())
    }

    fn rewrite_goto_statement(&mut self, node: &Rc<BoundGotoStatement>) -> BoundStatement {
        BoundStatement::Goto(node.clone())
    }

    fn rewrite_conditional_goto_statement(&mut self, node: &Rc<BoundConditionalGotoStatement>) -> BoundStatement {
        walk_conditional_goto_statement(self, node)
    }

    fn rewrite_return_statement(&mut self, node: &Rc<BoundReturnStatement>) -> BoundStatement {
        walk_return_statement(self, node)
    }

    fn rewrite_expression_statement(&mut self, node: &Rc<BoundExpressionStatement>) -> BoundStatement {
        walk_expression_statement(self, node)
    }

    fn rewrite_expression(&mut self, expression: &BoundExpression) -> BoundExpression {
        walk_expression(self, expression)
    }

    fn rewrite_assignment_expression(&mut self, node: &Rc<BoundAssignmentExpression>) -> BoundExpression {
        walk_assignment_expression(self, node)
    }

    fn rewrite_compound_assignment_expression(&mut self, node: &Rc<BoundCompoundAssignmentExpression>) -> BoundExpression {
        walk_compound_assignment_expression(self, node)
    }

    fn rewrite_unary_expression(&mut self, node: &Rc<BoundUnaryExpression>) -> BoundExpression {
        walk_unary_expression(self, node)
    }

    fn rewrite_binary_expression(&mut self, node: &Rc<BoundBinaryExpression>) -> BoundExpression {
        walk_binary_expression(self, node)
    }

    fn rewrite_call_expression(&mut self, node: &Rc<BoundCallExpression>) -> BoundExpression {
        walk_call_expression(self, node)
    }

    fn rewrite_conversion_expression(&mut self, node: &Rc<BoundConversionExpression>) -> BoundExpression {
        walk_conversion_expression(self, node)
    }
}

// ============================================================================
// Statements
// ============================================================================

pub fn walk_statement<R: BoundTreeRewriter>(rewriter: &mut R, statement: &BoundStatement) -> BoundStatement {
    match statement {
        BoundStatement::Block(n) => rewriter.rewrite_block_statement(n),
        BoundStatement::VariableDeclaration(n) => rewriter.rewrite_variable_declaration(n),
        BoundStatement::If(n) => rewriter.rewrite_if_statement(n),
        BoundStatement::While(n) => rewriter.rewrite_while_statement(n),
        BoundStatement::DoWhile(n) => rewriter.rewrite_do_while_statement(n),
        BoundStatement::For(n) => rewriter.rewrite_for_statement(n),
        BoundStatement::Label(n) => rewriter.rewrite_label_statement(n),
        BoundStatement::Goto(n) => rewriter.rewrite_goto_statement(n),
        BoundStatement::ConditionalGoto(n) => rewriter.rewrite_conditional_goto_statement(n),
        BoundStatement::Return(n) => rewriter.rewrite_return_statement(n),
        BoundStatement::Expression(n) => rewriter.rewrite_expression_statement(n),
    }
}

/// Rewrite a list, returning `None` when every element came back unchanged.
pub fn rewrite_statements<R: BoundTreeRewriter>(rewriter: &mut R, statements: &[BoundStatement]) -> Option<Vec<BoundStatement>> {
    let mut changed: Option<Vec<BoundStatement>> = None;
    for (index, statement) in statements.iter().enumerate() {
        let rewritten = rewriter.rewrite_statement(statement);
        match &mut changed {
            Some(list) => list.push(rewritten),
            None if !rewritten.ptr_eq(statement) => {
                let mut list = Vec::with_capacity(statements.len());
                list.extend(statements[..index].iter().cloned());
                list.push(rewritten);
                changed = Some(list);
            }
            None => {}
        }
    }
    changed
}

pub fn walk_block_statement<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundBlockStatement>) -> BoundStatement {
    match rewrite_statements(rewriter, &node.statements) {
        Some(statements) => BoundStatement::block(node.location.clone(), statements),
        None => BoundStatement::Block(node.clone()),
    }
}

pub fn walk_variable_declaration<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundVariableDeclaration>) -> BoundStatement {
    let initializer = rewriter.rewrite_expression(&node.initializer);
    if initializer.ptr_eq(&node.initializer) {
        return BoundStatement::VariableDeclaration(node.clone());
    }
    BoundStatement::variable_declaration(node.location.clone(), node.variable.clone(), initializer)
}

pub fn walk_if_statement<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundIfStatement>) -> BoundStatement {
    let condition = rewriter.rewrite_expression(&node.condition);
    let then_statement = rewriter.rewrite_statement(&node.then_statement);
    let else_statement = node.else_statement.as_ref().map(|s| rewriter.rewrite_statement(s));
    let else_unchanged = match (&else_statement, &node.else_statement) {
        (Some(a), Some(b)) => a.ptr_eq(b),
        (None, None) => true,
        _ => false,
    };
    if condition.ptr_eq(&node.condition) && then_statement.ptr_eq(&node.then_statement) && else_unchanged {
        return BoundStatement::If(node.clone());
    }
    BoundStatement::If(Rc::new(BoundIfStatement {
        location: node.location.clone(),
        condition,
        then_statement,
        else_statement,
    }))
}

pub fn walk_while_statement<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundWhileStatement>) -> BoundStatement {
    let condition = rewriter.rewrite_expression(&node.condition);
    let body = rewriter.rewrite_statement(&node.body);
    if condition.ptr_eq(&node.condition) && body.ptr_eq(&node.body) {
        return BoundStatement::While(node.clone());
    }
    BoundStatement::While(Rc::new(BoundWhileStatement {
        location: node.location.clone(),
        condition,
        body,
        break_label: node.break_label.clone(),
        continue_label: node.continue_label.clone(),
    }))
}

pub fn walk_do_while_statement<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundDoWhileStatement>) -> BoundStatement {
    let body = rewriter.rewrite_statement(&node.body);
    let condition = rewriter.rewrite_expression(&node.condition);
    if condition.ptr_eq(&node.condition) && body.ptr_eq(&node.body) {
        return BoundStatement::DoWhile(node.clone());
    }
    BoundStatement::DoWhile(Rc::new(BoundDoWhileStatement {
        location: node.location.clone(),
        body,
        condition,
        break_label: node.break_label.clone(),
        continue_label: node.continue_label.clone(),
    }))
}

pub fn walk_for_statement<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundForStatement>) -> BoundStatement {
    let lower_bound = rewriter.rewrite_expression(&node.lower_bound);
    let upper_bound = rewriter.rewrite_expression(&node.upper_bound);
    let body = rewriter.rewrite_statement(&node.body);
    if lower_bound.ptr_eq(&node.lower_bound) && upper_bound.ptr_eq(&node.upper_bound) && body.ptr_eq(&node.body) {
        return BoundStatement::For(node.clone());
    }
    BoundStatement::For(Rc::new(BoundForStatement {
        location: node.location.clone(),
        variable: node.variable.clone(),
        lower_bound,
        upper_bound,
        body,
        break_label: node.break_label.clone(),
        continue_label: node.continue_label.clone(),
    }))
}

pub fn walk_conditional_goto_statement<R: BoundTreeRewriter>(
    rewriter: &mut R,
    node: &Rc<BoundConditionalGotoStatement>,
) -> BoundStatement {
    let condition = rewriter.rewrite_expression(&node.condition);
    if condition.ptr_eq(&node.condition) {
        return BoundStatement::ConditionalGoto(node.clone());
    }
    BoundStatement::conditional_goto(node.location.clone(), node.label.clone(), condition, node.jump_if_true)
}

pub fn walk_return_statement<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundReturnStatement>) -> BoundStatement {
    let Some(expression) = &node.expression else {
        return BoundStatement::Return(node.clone());
    };
    let rewritten = rewriter.rewrite_expression(expression);
    if rewritten.ptr_eq(expression) {
        return BoundStatement::Return(node.clone());
    }
    BoundStatement::Return(Rc::new(BoundReturnStatement {
        location: node.location.clone(),
        expression: Some(rewritten),
        is_synthesized: node.is_synthesized,
    }))
}

pub fn walk_expression_statement<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundExpressionStatement>) -> BoundStatement {
    let expression = rewriter.rewrite_expression(&node.expression);
    if expression.ptr_eq(&node.expression) {
        return BoundStatement::Expression(node.clone());
    }
    BoundStatement::Expression(Rc::new(BoundExpressionStatement {
        location: node.location.clone(),
        expression,
        is_synthesized: node.is_synthesized,
    }))
}

// ============================================================================
// Expressions
// ============================================================================

pub fn walk_expression<R: BoundTreeRewriter>(rewriter: &mut R, expression: &BoundExpression) -> BoundExpression {
    match expression {
        BoundExpression::Error(_) | BoundExpression::Literal(_) | BoundExpression::Variable(_) | BoundExpression::Increment(_) => {
            expression.clone()
        }
        BoundExpression::Assignment(n) => rewriter.rewrite_assignment_expression(n),
        BoundExpression::CompoundAssignment(n) => rewriter.rewrite_compound_assignment_expression(n),
        BoundExpression::Unary(n) => rewriter.rewrite_unary_expression(n),
        BoundExpression::Binary(n) => rewriter.rewrite_binary_expression(n),
        BoundExpression::Call(n) => rewriter.rewrite_call_expression(n),
        BoundExpression::Conversion(n) => rewriter.rewrite_conversion_expression(n),
    }
}

pub fn walk_assignment_expression<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundAssignmentExpression>) -> BoundExpression {
    let expression = rewriter.rewrite_expression(&node.expression);
    if expression.ptr_eq(&node.expression) {
        return BoundExpression::Assignment(node.clone());
    }
    BoundExpression::assignment(node.location.clone(), node.variable.clone(), expression)
}

pub fn walk_compound_assignment_expression<R: BoundTreeRewriter>(
    rewriter: &mut R,
    node: &Rc<BoundCompoundAssignmentExpression>,
) -> BoundExpression {
    let expression = rewriter.rewrite_expression(&node.expression);
    if expression.ptr_eq(&node.expression) {
        return BoundExpression::CompoundAssignment(node.clone());
    }
    BoundExpression::compound_assignment(node.location.clone(), node.variable.clone(), node.op, expression)
}

pub fn walk_unary_expression<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundUnaryExpression>) -> BoundExpression {
    let operand = rewriter.rewrite_expression(&node.operand);
    if operand.ptr_eq(&node.operand) {
        return BoundExpression::Unary(node.clone());
    }
    BoundExpression::unary(node.location.clone(), node.op, operand)
}

pub fn walk_binary_expression<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundBinaryExpression>) -> BoundExpression {
    let left = rewriter.rewrite_expression(&node.left);
    let right = rewriter.rewrite_expression(&node.right);
    if left.ptr_eq(&node.left) && right.ptr_eq(&node.right) {
        return BoundExpression::Binary(node.clone());
    }
    BoundExpression::binary(node.location.clone(), left, node.op, right)
}

pub fn walk_call_expression<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundCallExpression>) -> BoundExpression {
    let arguments: Vec<BoundExpression> = node.arguments.iter().map(|a| rewriter.rewrite_expression(a)).collect();
    if arguments.iter().zip(&node.arguments).all(|(a, b)| a.ptr_eq(b)) {
        return BoundExpression::Call(node.clone());
    }
    BoundExpression::call(node.location.clone(), node.function.clone(), arguments)
}

pub fn walk_conversion_expression<R: BoundTreeRewriter>(rewriter: &mut R, node: &Rc<BoundConversionExpression>) -> BoundExpression {
    let expression = rewriter.rewrite_expression(&node.expression);
    if expression.ptr_eq(&node.expression) {
        return BoundExpression::Conversion(node.clone());
    }
    BoundExpression::conversion(node.location.clone(), node.ty, expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::BoundBinaryOperator;
    use crate::symbol::{TypeSymbol, VariableKind, VariableSymbol};
    use quill_core::text::{SourceText, TextLocation, TextSpan};
    use quill_core::Value;
    use quill_syntax::SyntaxKind;

    struct Identity;

    impl BoundTreeRewriter for Identity {}

    /// Replaces every literal `1` with `2`.
    struct BumpOnes;

    impl BoundTreeRewriter for BumpOnes {
        fn rewrite_expression(&mut self, expression: &BoundExpression) -> BoundExpression {
            match expression {
                BoundExpression::Literal(literal) if literal.value == Value::Integer(1) => {
                    BoundExpression::literal(literal.location.clone(), Value::Integer(2))
                }
                _ => walk_expression(self, expression),
            }
        }
    }

    fn location() -> TextLocation {
        TextLocation::new(SourceText::shared("test.qs", "v + 1"), TextSpan::new(0, 5))
    }

    fn sum() -> BoundExpression {
        let variable = VariableSymbol::new("v", VariableKind::Local, TypeSymbol::Int, false, None, None);
        let plus = BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::Int, TypeSymbol::Int).unwrap();
        BoundExpression::binary(
            location(),
            BoundExpression::variable(location(), variable),
            plus,
            BoundExpression::literal(location(), Value::Integer(1)),
        )
    }

    #[test]
    fn test_unchanged_tree_is_reused() {
        let expression = sum();
        let rewritten = Identity.rewrite_expression(&expression);
        match (&expression, &rewritten) {
            (BoundExpression::Binary(before), BoundExpression::Binary(after)) => assert!(Rc::ptr_eq(before, after)),
            _ => panic!("expected binary expressions"),
        }
    }

    #[test]
    fn test_changed_child_rebuilds_only_its_parent() {
        let expression = sum();
        let rewritten = BumpOnes.rewrite_expression(&expression);
        let (BoundExpression::Binary(before), BoundExpression::Binary(after)) = (&expression, &rewritten) else {
            panic!("expected binary expressions");
        };
        assert!(!Rc::ptr_eq(before, after));
        match (&before.left, &after.left) {
            (BoundExpression::Variable(old), BoundExpression::Variable(new)) => assert!(Rc::ptr_eq(old, new)),
            _ => panic!("expected variables"),
        }
        match &after.right {
            BoundExpression::Literal(literal) => assert_eq!(literal.value, Value::Integer(2)),
            _ => panic!("expected a literal"),
        }
    }
}
