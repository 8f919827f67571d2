//! Read-only traversal of the bound tree.
//!
//! Default methods walk into every child. Dispatch is an exhaustive `match`
//! over `BoundStatement`/`BoundExpression`.

use crate::bound_tree::*;

pub trait BoundTreeVisitor {
    fn visit_statement(&mut self, statement: &BoundStatement) {
        match statement {
            BoundStatement::Block(n) => self.visit_block_statement(n),
            BoundStatement::VariableDeclaration(n) => self.visit_variable_declaration(n),
            BoundStatement::If(n) => self.visit_if_statement(n),
            BoundStatement::While(n) => self.visit_while_statement(n),
            BoundStatement::DoWhile(n) => self.visit_do_while_statement(n),
            BoundStatement::For(n) => self.visit_for_statement(n),
            BoundStatement::Label(n) => self.visit_label_statement(n),
            BoundStatement::Goto(n) => self.visit_goto_statement(n),
            BoundStatement::ConditionalGoto(n) => self.visit_conditional_goto_statement(n),
            BoundStatement::Return(n) => self.visit_return_statement(n),
            BoundStatement::Expression(n) => self.visit_expression_statement(n),
        }
    }

    fn visit_block_statement(&mut self, node: &BoundBlockStatement) {
        for statement in &node.statements {
            self.visit_statement(statement);
        }
    }

    fn visit_variable_declaration(&mut self, node: &BoundVariableDeclaration) {
        self.visit_expression(&node.initializer);
    }

    fn visit_if_statement(&mut self, node: &BoundIfStatement) {
        self.visit_expression(&node.condition);
        self.visit_statement(&node.then_statement);
        if let Some(else_statement) = &node.else_statement {
            self.visit_statement(else_statement);
        }
    }

    fn visit_while_statement(&mut self, node: &BoundWhileStatement) {
        self.visit_expression(&node.condition);
        self.visit_statement(&node.body);
    }

    fn visit_do_while_statement(&mut self, node: &BoundDoWhileStatement) {
        self.visit_statement(&node.body);
        self.visit_expression(&node.condition);
    }

    fn visit_for_statement(&mut self, node: &BoundForStatement) {
        self.visit_expression(&node.lower_bound);
        self.visit_expression(&node.upper_bound);
        self.visit_statement(&node.body);
    }

    fn visit_label_statement(&mut self, _node: &BoundLabelStatement) {}

    fn visit_goto_statement(&mut self, _node: &BoundGotoStatement) {}

    fn visit_conditional_goto_statement(&mut self, node: &BoundConditionalGotoStatement) {
        self.visit_expression(&node.condition);
    }

    fn visit_return_statement(&mut self, node: &BoundReturnStatement) {
        if let Some(expression) = &node.expression {
            self.visit_expression(expression);
        }
    }

    fn visit_expression_statement(&mut self, node: &BoundExpressionStatement) {
        self.visit_expression(&node.expression);
    }

    // -- Expressions --

    fn visit_expression(&mut self, expression: &BoundExpression) {
        match expression {
            BoundExpression::Error(n) => self.visit_error_expression(n),
            BoundExpression::Literal(n) => self.visit_literal_expression(n),
            BoundExpression::Variable(n) => self.visit_variable_expression(n),
            BoundExpression::Assignment(n) => self.visit_assignment_expression(n),
            BoundExpression::CompoundAssignment(n) => self.visit_compound_assignment_expression(n),
            BoundExpression::Unary(n) => self.visit_unary_expression(n),
            BoundExpression::Binary(n) => self.visit_binary_expression(n),
            BoundExpression::Call(n) => self.visit_call_expression(n),
            BoundExpression::Conversion(n) => self.visit_conversion_expression(n),
            BoundExpression::Increment(n) => self.visit_increment_expression(n),
        }
    }

    fn visit_error_expression(&mut self, _node: &BoundErrorExpression) {}

    fn visit_literal_expression(&mut self, _node: &BoundLiteralExpression) {}

    fn visit_variable_expression(&mut self, _node: &BoundVariableExpression) {}

    fn visit_assignment_expression(&mut self, node: &BoundAssignmentExpression) {
        self.visit_expression(&node.expression);
    }

    fn visit_compound_assignment_expression(&mut self, node: &BoundCompoundAssignmentExpression) {
        self.visit_expression(&node.expression);
    }

    fn visit_unary_expression(&mut self, node: &BoundUnaryExpression) {
        self.visit_expression(&node.operand);
    }

    fn visit_binary_expression(&mut self, node: &BoundBinaryExpression) {
        self.visit_expression(&node.left);
        self.visit_expression(&node.right);
    }

    fn visit_call_expression(&mut self, node: &BoundCallExpression) {
        for argument in &node.arguments {
            self.visit_expression(argument);
        }
    }

    fn visit_conversion_expression(&mut self, node: &BoundConversionExpression) {
        self.visit_expression(&node.expression);
    }

    fn visit_increment_expression(&mut self, _node: &BoundIncrementExpression) {}
}
