//! Syntax visitor trait for traversing a syntax tree.
//!
//! Provides a `SyntaxVisitor` trait whose default methods walk into every
//! child in source order. Statement and expression dispatch is an exhaustive
//! `match`, so adding a node variant fails to compile until it is handled here.

use crate::node::*;

/// A visitor that traverses the syntax tree. Implement this trait to perform
/// operations on each node kind. Default implementations walk into children.
pub trait SyntaxVisitor<'a> {
    fn visit_compilation_unit(&mut self, node: &'a CompilationUnit<'a>) {
        for member in node.members {
            self.visit_member(*member);
        }
        self.visit_token(node.end_of_file_token);
    }

    fn visit_member(&mut self, member: Member<'a>) {
        match member {
            Member::Function(n) => self.visit_function_declaration(n),
            Member::GlobalStatement(n) => self.visit_global_statement(n),
        }
    }

    fn visit_function_declaration(&mut self, node: &'a FunctionDeclaration<'a>) {
        self.visit_token(node.function_keyword);
        self.visit_token(node.identifier);
        self.visit_token(node.open_parenthesis_token);
        for (index, parameter) in node.parameters.iter().enumerate() {
            self.visit_parameter(parameter);
            if let Some(separator) = node.parameters.separator(index) {
                self.visit_token(separator);
            }
        }
        self.visit_token(node.close_parenthesis_token);
        if let Some(type_clause) = node.type_clause {
            self.visit_type_clause(type_clause);
        }
        self.visit_block_statement(node.body);
    }

    fn visit_parameter(&mut self, node: &'a Parameter<'a>) {
        self.visit_token(node.identifier);
        self.visit_type_clause(node.type_clause);
    }

    fn visit_type_clause(&mut self, node: &'a TypeClause<'a>) {
        self.visit_token(node.colon_token);
        self.visit_token(node.identifier);
    }

    fn visit_global_statement(&mut self, node: &'a GlobalStatement<'a>) {
        self.visit_statement(node.statement);
    }

    fn visit_statement(&mut self, statement: Statement<'a>) {
        match statement {
            Statement::Block(n) => self.visit_block_statement(n),
            Statement::VariableDeclaration(n) => self.visit_variable_declaration(n),
            Statement::If(n) => self.visit_if_statement(n),
            Statement::While(n) => self.visit_while_statement(n),
            Statement::DoWhile(n) => self.visit_do_while_statement(n),
            Statement::For(n) => self.visit_for_statement(n),
            Statement::Break(n) => self.visit_token(n.keyword),
            Statement::Continue(n) => self.visit_token(n.keyword),
            Statement::Return(n) => self.visit_return_statement(n),
            Statement::Label(n) => self.visit_label_statement(n),
            Statement::Goto(n) => self.visit_goto_statement(n),
            Statement::Expression(n) => self.visit_expression(n.expression),
        }
    }

    // -- Statements --

    fn visit_block_statement(&mut self, node: &'a BlockStatement<'a>) {
        self.visit_token(node.open_brace_token);
        for statement in node.statements {
            self.visit_statement(*statement);
        }
        self.visit_token(node.close_brace_token);
    }

    fn visit_variable_declaration(&mut self, node: &'a VariableDeclaration<'a>) {
        self.visit_token(node.keyword);
        self.visit_token(node.identifier);
        if let Some(type_clause) = node.type_clause {
            self.visit_type_clause(type_clause);
        }
        self.visit_token(node.equals_token);
        self.visit_expression(node.initializer);
    }

    fn visit_if_statement(&mut self, node: &'a IfStatement<'a>) {
        self.visit_token(node.if_keyword);
        self.visit_expression(node.condition);
        self.visit_statement(node.then_statement);
        if let Some(else_clause) = node.else_clause {
            self.visit_token(else_clause.else_keyword);
            self.visit_statement(else_clause.else_statement);
        }
    }

    fn visit_while_statement(&mut self, node: &'a WhileStatement<'a>) {
        self.visit_token(node.while_keyword);
        self.visit_expression(node.condition);
        self.visit_statement(node.body);
    }

    fn visit_do_while_statement(&mut self, node: &'a DoWhileStatement<'a>) {
        self.visit_token(node.do_keyword);
        self.visit_statement(node.body);
        self.visit_token(node.while_keyword);
        self.visit_expression(node.condition);
    }

    fn visit_for_statement(&mut self, node: &'a ForStatement<'a>) {
        self.visit_token(node.for_keyword);
        self.visit_token(node.identifier);
        self.visit_token(node.equals_token);
        self.visit_expression(node.lower_bound);
        self.visit_token(node.to_keyword);
        self.visit_expression(node.upper_bound);
        self.visit_statement(node.body);
    }

    fn visit_return_statement(&mut self, node: &'a ReturnStatement<'a>) {
        self.visit_token(node.return_keyword);
        if let Some(expression) = node.expression {
            self.visit_expression(expression);
        }
    }

    fn visit_label_statement(&mut self, node: &'a LabelStatement<'a>) {
        self.visit_token(node.identifier);
        self.visit_token(node.colon_token);
    }

    fn visit_goto_statement(&mut self, node: &'a GotoStatement<'a>) {
        self.visit_token(node.goto_keyword);
        self.visit_token(node.label);
    }

    // -- Expressions --

    fn visit_expression(&mut self, expression: Expression<'a>) {
        match expression {
            Expression::Literal(n) => self.visit_token(n.literal_token),
            Expression::Name(n) => self.visit_name_expression(n),
            Expression::Unary(n) => self.visit_unary_expression(n),
            Expression::Binary(n) => self.visit_binary_expression(n),
            Expression::Parenthesized(n) => {
                self.visit_token(n.open_parenthesis_token);
                self.visit_expression(n.expression);
                self.visit_token(n.close_parenthesis_token);
            }
            Expression::Assignment(n) => self.visit_assignment_expression(n),
            Expression::Call(n) => self.visit_call_expression(n),
            Expression::Prefix(n) => {
                self.visit_token(n.operator_token);
                self.visit_token(n.identifier);
            }
            Expression::Postfix(n) => {
                self.visit_token(n.identifier);
                self.visit_token(n.operator_token);
            }
        }
    }

    fn visit_name_expression(&mut self, node: &'a NameExpression<'a>) {
        self.visit_token(node.identifier);
    }

    fn visit_unary_expression(&mut self, node: &'a UnaryExpression<'a>) {
        self.visit_token(node.operator_token);
        self.visit_expression(node.operand);
    }

    fn visit_binary_expression(&mut self, node: &'a BinaryExpression<'a>) {
        self.visit_expression(node.left);
        self.visit_token(node.operator_token);
        self.visit_expression(node.right);
    }

    fn visit_assignment_expression(&mut self, node: &'a AssignmentExpression<'a>) {
        self.visit_token(node.identifier);
        self.visit_token(node.assignment_token);
        self.visit_expression(node.expression);
    }

    fn visit_call_expression(&mut self, node: &'a CallExpression<'a>) {
        self.visit_token(node.identifier);
        self.visit_token(node.open_parenthesis_token);
        for (index, argument) in node.arguments.iter().enumerate() {
            self.visit_expression(*argument);
            if let Some(separator) = node.arguments.separator(index) {
                self.visit_token(separator);
            }
        }
        self.visit_token(node.close_parenthesis_token);
    }

    // -- Tokens --

    fn visit_token(&mut self, _token: &'a SyntaxToken<'a>) {}
}
