//! Syntax rewriter trait for producing modified copies of a syntax tree.
//!
//! Each default method rewrites the children first and reuses the original
//! node when every child came back unchanged, so a rewriter that touches one
//! leaf allocates only the spine above it.

use crate::node::*;
use quill_core::CompilerArena;
use std::ptr;

pub trait SyntaxRewriter<'a> {
    /// The arena new nodes are allocated in.
    fn arena(&self) -> &'a CompilerArena;

    fn rewrite_compilation_unit(&mut self, node: &'a CompilationUnit<'a>) -> &'a CompilationUnit<'a> {
        let members: Vec<Member<'a>> = node.members.iter().map(|m| self.rewrite_member(*m)).collect();
        let end_of_file_token = self.rewrite_token(node.end_of_file_token);
        let unchanged = members.iter().zip(node.members).all(|(a, b)| same_member(a, b))
            && ptr::eq(end_of_file_token, node.end_of_file_token);
        if unchanged {
            return node;
        }
        let arena = self.arena();
        arena.alloc(CompilationUnit {
            members: arena.alloc_vec(members),
            end_of_file_token,
        })
    }

    fn rewrite_member(&mut self, member: Member<'a>) -> Member<'a> {
        match member {
            Member::Function(n) => Member::Function(self.rewrite_function_declaration(n)),
            Member::GlobalStatement(n) => {
                let statement = self.rewrite_statement(n.statement);
                if statement.ptr_eq(&n.statement) {
                    return member;
                }
                Member::GlobalStatement(self.arena().alloc(GlobalStatement { statement }))
            }
        }
    }

    fn rewrite_function_declaration(&mut self, node: &'a FunctionDeclaration<'a>) -> &'a FunctionDeclaration<'a> {
        let function_keyword = self.rewrite_token(node.function_keyword);
        let identifier = self.rewrite_token(node.identifier);
        let open_parenthesis_token = self.rewrite_token(node.open_parenthesis_token);
        let parameters = self.rewrite_parameters(node.parameters);
        let close_parenthesis_token = self.rewrite_token(node.close_parenthesis_token);
        let type_clause = node.type_clause.map(|t| self.rewrite_type_clause(t));
        let body = self.rewrite_block_statement(node.body);
        let unchanged = ptr::eq(function_keyword, node.function_keyword)
            && ptr::eq(identifier, node.identifier)
            && ptr::eq(open_parenthesis_token, node.open_parenthesis_token)
            && ptr::eq(parameters.nodes, node.parameters.nodes)
            && ptr::eq(close_parenthesis_token, node.close_parenthesis_token)
            && same_option(type_clause, node.type_clause)
            && ptr::eq(body, node.body);
        if unchanged {
            return node;
        }
        self.arena().alloc(FunctionDeclaration {
            function_keyword,
            identifier,
            open_parenthesis_token,
            parameters,
            close_parenthesis_token,
            type_clause,
            body,
        })
    }

    fn rewrite_parameters(
        &mut self,
        list: SeparatedList<'a, &'a Parameter<'a>>,
    ) -> SeparatedList<'a, &'a Parameter<'a>> {
        let nodes: Vec<&'a Parameter<'a>> = list.iter().map(|p| self.rewrite_parameter(*p)).collect();
        let separators: Vec<&'a SyntaxToken<'a>> = list.separators.iter().map(|s| self.rewrite_token(*s)).collect();
        if nodes.iter().zip(list.nodes).all(|(a, b)| ptr::eq(*a, *b))
            && separators.iter().zip(list.separators).all(|(a, b)| ptr::eq(*a, *b))
        {
            return list;
        }
        let arena = self.arena();
        SeparatedList::new(arena.alloc_vec(nodes), arena.alloc_vec(separators))
    }

    fn rewrite_parameter(&mut self, node: &'a Parameter<'a>) -> &'a Parameter<'a> {
        let identifier = self.rewrite_token(node.identifier);
        let type_clause = self.rewrite_type_clause(node.type_clause);
        if ptr::eq(identifier, node.identifier) && ptr::eq(type_clause, node.type_clause) {
            return node;
        }
        self.arena().alloc(Parameter { identifier, type_clause })
    }

    fn rewrite_type_clause(&mut self, node: &'a TypeClause<'a>) -> &'a TypeClause<'a> {
        let colon_token = self.rewrite_token(node.colon_token);
        let identifier = self.rewrite_token(node.identifier);
        if ptr::eq(colon_token, node.colon_token) && ptr::eq(identifier, node.identifier) {
            return node;
        }
        self.arena().alloc(TypeClause { colon_token, identifier })
    }

    // -- Statements --

    fn rewrite_statement(&mut self, statement: Statement<'a>) -> Statement<'a> {
        match statement {
            Statement::Block(n) => Statement::Block(self.rewrite_block_statement(n)),
            Statement::VariableDeclaration(n) => self.rewrite_variable_declaration(n),
            Statement::If(n) => self.rewrite_if_statement(n),
            Statement::While(n) => self.rewrite_while_statement(n),
            Statement::DoWhile(n) => self.rewrite_do_while_statement(n),
            Statement::For(n) => self.rewrite_for_statement(n),
            Statement::Break(n) => {
                let keyword = self.rewrite_token(n.keyword);
                if ptr::eq(keyword, n.keyword) {
                    return statement;
                }
                Statement::Break(self.arena().alloc(BreakStatement { keyword }))
            }
            Statement::Continue(n) => {
                let keyword = self.rewrite_token(n.keyword);
                if ptr::eq(keyword, n.keyword) {
                    return statement;
                }
                Statement::Continue(self.arena().alloc(ContinueStatement { keyword }))
            }
            Statement::Return(n) => self.rewrite_return_statement(n),
            Statement::Label(n) => {
                let identifier = self.rewrite_token(n.identifier);
                let colon_token = self.rewrite_token(n.colon_token);
                if ptr::eq(identifier, n.identifier) && ptr::eq(colon_token, n.colon_token) {
                    return statement;
                }
                Statement::Label(self.arena().alloc(LabelStatement { identifier, colon_token }))
            }
            Statement::Goto(n) => {
                let goto_keyword = self.rewrite_token(n.goto_keyword);
                let label = self.rewrite_token(n.label);
                if ptr::eq(goto_keyword, n.goto_keyword) && ptr::eq(label, n.label) {
                    return statement;
                }
                Statement::Goto(self.arena().alloc(GotoStatement { goto_keyword, label }))
            }
            Statement::Expression(n) => {
                let expression = self.rewrite_expression(n.expression);
                if expression.ptr_eq(&n.expression) {
                    return statement;
                }
                Statement::Expression(self.arena().alloc(ExpressionStatement { expression }))
            }
        }
    }

    fn rewrite_block_statement(&mut self, node: &'a BlockStatement<'a>) -> &'a BlockStatement<'a> {
        let open_brace_token = self.rewrite_token(node.open_brace_token);
        let statements: Vec<Statement<'a>> = node.statements.iter().map(|s| self.rewrite_statement(*s)).collect();
        let close_brace_token = self.rewrite_token(node.close_brace_token);
        let unchanged = ptr::eq(open_brace_token, node.open_brace_token)
            && statements.iter().zip(node.statements).all(|(a, b)| a.ptr_eq(b))
            && ptr::eq(close_brace_token, node.close_brace_token);
        if unchanged {
            return node;
        }
        let arena = self.arena();
        arena.alloc(BlockStatement {
            open_brace_token,
            statements: arena.alloc_vec(statements),
            close_brace_token,
        })
    }

    fn rewrite_variable_declaration(&mut self, node: &'a VariableDeclaration<'a>) -> Statement<'a> {
        let keyword = self.rewrite_token(node.keyword);
        let identifier = self.rewrite_token(node.identifier);
        let type_clause = node.type_clause.map(|t| self.rewrite_type_clause(t));
        let equals_token = self.rewrite_token(node.equals_token);
        let initializer = self.rewrite_expression(node.initializer);
        let unchanged = ptr::eq(keyword, node.keyword)
            && ptr::eq(identifier, node.identifier)
            && same_option(type_clause, node.type_clause)
            && ptr::eq(equals_token, node.equals_token)
            && initializer.ptr_eq(&node.initializer);
        if unchanged {
            return Statement::VariableDeclaration(node);
        }
        Statement::VariableDeclaration(self.arena().alloc(VariableDeclaration {
            keyword,
            identifier,
            type_clause,
            equals_token,
            initializer,
        }))
    }

    fn rewrite_if_statement(&mut self, node: &'a IfStatement<'a>) -> Statement<'a> {
        let if_keyword = self.rewrite_token(node.if_keyword);
        let condition = self.rewrite_expression(node.condition);
        let then_statement = self.rewrite_statement(node.then_statement);
        let else_clause = node.else_clause.map(|e| self.rewrite_else_clause(e));
        let unchanged = ptr::eq(if_keyword, node.if_keyword)
            && condition.ptr_eq(&node.condition)
            && then_statement.ptr_eq(&node.then_statement)
            && same_option(else_clause, node.else_clause);
        if unchanged {
            return Statement::If(node);
        }
        Statement::If(self.arena().alloc(IfStatement {
            if_keyword,
            condition,
            then_statement,
            else_clause,
        }))
    }

    fn rewrite_else_clause(&mut self, node: &'a ElseClause<'a>) -> &'a ElseClause<'a> {
        let else_keyword = self.rewrite_token(node.else_keyword);
        let else_statement = self.rewrite_statement(node.else_statement);
        if ptr::eq(else_keyword, node.else_keyword) && else_statement.ptr_eq(&node.else_statement) {
            return node;
        }
        self.arena().alloc(ElseClause { else_keyword, else_statement })
    }

    fn rewrite_while_statement(&mut self, node: &'a WhileStatement<'a>) -> Statement<'a> {
        let while_keyword = self.rewrite_token(node.while_keyword);
        let condition = self.rewrite_expression(node.condition);
        let body = self.rewrite_statement(node.body);
        if ptr::eq(while_keyword, node.while_keyword) && condition.ptr_eq(&node.condition) && body.ptr_eq(&node.body) {
            return Statement::While(node);
        }
        Statement::While(self.arena().alloc(WhileStatement {
            while_keyword,
            condition,
            body,
        }))
    }

    fn rewrite_do_while_statement(&mut self, node: &'a DoWhileStatement<'a>) -> Statement<'a> {
        let do_keyword = self.rewrite_token(node.do_keyword);
        let body = self.rewrite_statement(node.body);
        let while_keyword = self.rewrite_token(node.while_keyword);
        let condition = self.rewrite_expression(node.condition);
        let unchanged = ptr::eq(do_keyword, node.do_keyword)
            && body.ptr_eq(&node.body)
            && ptr::eq(while_keyword, node.while_keyword)
            && condition.ptr_eq(&node.condition);
        if unchanged {
            return Statement::DoWhile(node);
        }
        Statement::DoWhile(self.arena().alloc(DoWhileStatement {
            do_keyword,
            body,
            while_keyword,
            condition,
        }))
    }

    fn rewrite_for_statement(&mut self, node: &'a ForStatement<'a>) -> Statement<'a> {
        let for_keyword = self.rewrite_token(node.for_keyword);
        let identifier = self.rewrite_token(node.identifier);
        let equals_token = self.rewrite_token(node.equals_token);
        let lower_bound = self.rewrite_expression(node.lower_bound);
        let to_keyword = self.rewrite_token(node.to_keyword);
        let upper_bound = self.rewrite_expression(node.upper_bound);
        let body = self.rewrite_statement(node.body);
        let unchanged = ptr::eq(for_keyword, node.for_keyword)
            && ptr::eq(identifier, node.identifier)
            && ptr::eq(equals_token, node.equals_token)
            && lower_bound.ptr_eq(&node.lower_bound)
            && ptr::eq(to_keyword, node.to_keyword)
            && upper_bound.ptr_eq(&node.upper_bound)
            && body.ptr_eq(&node.body);
        if unchanged {
            return Statement::For(node);
        }
        Statement::For(self.arena().alloc(ForStatement {
            for_keyword,
            identifier,
            equals_token,
            lower_bound,
            to_keyword,
            upper_bound,
            body,
        }))
    }

    fn rewrite_return_statement(&mut self, node: &'a ReturnStatement<'a>) -> Statement<'a> {
        let return_keyword = self.rewrite_token(node.return_keyword);
        let expression = node.expression.map(|e| self.rewrite_expression(e));
        let same_expression = match (expression, node.expression) {
            (Some(a), Some(b)) => a.ptr_eq(&b),
            (None, None) => true,
            _ => false,
        };
        if ptr::eq(return_keyword, node.return_keyword) && same_expression {
            return Statement::Return(node);
        }
        Statement::Return(self.arena().alloc(ReturnStatement { return_keyword, expression }))
    }

    // -- Expressions --

    fn rewrite_expression(&mut self, expression: Expression<'a>) -> Expression<'a> {
        match expression {
            Expression::Literal(n) => self.rewrite_literal_expression(n),
            Expression::Name(n) => self.rewrite_name_expression(n),
            Expression::Unary(n) => self.rewrite_unary_expression(n),
            Expression::Binary(n) => self.rewrite_binary_expression(n),
            Expression::Parenthesized(n) => self.rewrite_parenthesized_expression(n),
            Expression::Assignment(n) => self.rewrite_assignment_expression(n),
            Expression::Call(n) => self.rewrite_call_expression(n),
            Expression::Prefix(n) => {
                let operator_token = self.rewrite_token(n.operator_token);
                let identifier = self.rewrite_token(n.identifier);
                if ptr::eq(operator_token, n.operator_token) && ptr::eq(identifier, n.identifier) {
                    return expression;
                }
                Expression::Prefix(self.arena().alloc(PrefixExpression { operator_token, identifier }))
            }
            Expression::Postfix(n) => {
                let identifier = self.rewrite_token(n.identifier);
                let operator_token = self.rewrite_token(n.operator_token);
                if ptr::eq(operator_token, n.operator_token) && ptr::eq(identifier, n.identifier) {
                    return expression;
                }
                Expression::Postfix(self.arena().alloc(PostfixExpression { identifier, operator_token }))
            }
        }
    }

    fn rewrite_literal_expression(&mut self, node: &'a LiteralExpression<'a>) -> Expression<'a> {
        let literal_token = self.rewrite_token(node.literal_token);
        if ptr::eq(literal_token, node.literal_token) {
            return Expression::Literal(node);
        }
        let value = literal_token.value.unwrap_or(node.value);
        Expression::Literal(self.arena().alloc(LiteralExpression { literal_token, value }))
    }

    fn rewrite_name_expression(&mut self, node: &'a NameExpression<'a>) -> Expression<'a> {
        let identifier = self.rewrite_token(node.identifier);
        if ptr::eq(identifier, node.identifier) {
            return Expression::Name(node);
        }
        Expression::Name(self.arena().alloc(NameExpression { identifier }))
    }

    fn rewrite_unary_expression(&mut self, node: &'a UnaryExpression<'a>) -> Expression<'a> {
        let operator_token = self.rewrite_token(node.operator_token);
        let operand = self.rewrite_expression(node.operand);
        if ptr::eq(operator_token, node.operator_token) && operand.ptr_eq(&node.operand) {
            return Expression::Unary(node);
        }
        Expression::Unary(self.arena().alloc(UnaryExpression { operator_token, operand }))
    }

    fn rewrite_binary_expression(&mut self, node: &'a BinaryExpression<'a>) -> Expression<'a> {
        let left = self.rewrite_expression(node.left);
        let operator_token = self.rewrite_token(node.operator_token);
        let right = self.rewrite_expression(node.right);
        if left.ptr_eq(&node.left) && ptr::eq(operator_token, node.operator_token) && right.ptr_eq(&node.right) {
            return Expression::Binary(node);
        }
        Expression::Binary(self.arena().alloc(BinaryExpression {
            left,
            operator_token,
            right,
        }))
    }

    fn rewrite_parenthesized_expression(&mut self, node: &'a ParenthesizedExpression<'a>) -> Expression<'a> {
        let open_parenthesis_token = self.rewrite_token(node.open_parenthesis_token);
        let expression = self.rewrite_expression(node.expression);
        let close_parenthesis_token = self.rewrite_token(node.close_parenthesis_token);
        let unchanged = ptr::eq(open_parenthesis_token, node.open_parenthesis_token)
            && expression.ptr_eq(&node.expression)
            && ptr::eq(close_parenthesis_token, node.close_parenthesis_token);
        if unchanged {
            return Expression::Parenthesized(node);
        }
        Expression::Parenthesized(self.arena().alloc(ParenthesizedExpression {
            open_parenthesis_token,
            expression,
            close_parenthesis_token,
        }))
    }

    fn rewrite_assignment_expression(&mut self, node: &'a AssignmentExpression<'a>) -> Expression<'a> {
        let identifier = self.rewrite_token(node.identifier);
        let assignment_token = self.rewrite_token(node.assignment_token);
        let expression = self.rewrite_expression(node.expression);
        let unchanged = ptr::eq(identifier, node.identifier)
            && ptr::eq(assignment_token, node.assignment_token)
            && expression.ptr_eq(&node.expression);
        if unchanged {
            return Expression::Assignment(node);
        }
        Expression::Assignment(self.arena().alloc(AssignmentExpression {
            identifier,
            assignment_token,
            expression,
        }))
    }

    fn rewrite_call_expression(&mut self, node: &'a CallExpression<'a>) -> Expression<'a> {
        let identifier = self.rewrite_token(node.identifier);
        let open_parenthesis_token = self.rewrite_token(node.open_parenthesis_token);
        let arguments: Vec<Expression<'a>> = node.arguments.iter().map(|a| self.rewrite_expression(*a)).collect();
        let separators: Vec<&'a SyntaxToken<'a>> =
            node.arguments.separators.iter().map(|s| self.rewrite_token(*s)).collect();
        let close_parenthesis_token = self.rewrite_token(node.close_parenthesis_token);
        let unchanged = ptr::eq(identifier, node.identifier)
            && ptr::eq(open_parenthesis_token, node.open_parenthesis_token)
            && arguments.iter().zip(node.arguments.nodes).all(|(a, b)| a.ptr_eq(b))
            && separators.iter().zip(node.arguments.separators).all(|(a, b)| ptr::eq(*a, *b))
            && ptr::eq(close_parenthesis_token, node.close_parenthesis_token);
        if unchanged {
            return Expression::Call(node);
        }
        let arena = self.arena();
        Expression::Call(arena.alloc(CallExpression {
            identifier,
            open_parenthesis_token,
            arguments: SeparatedList::new(arena.alloc_vec(arguments), arena.alloc_vec(separators)),
            close_parenthesis_token,
        }))
    }

    // -- Tokens --

    fn rewrite_token(&mut self, token: &'a SyntaxToken<'a>) -> &'a SyntaxToken<'a> {
        token
    }
}

fn same_member(a: &Member<'_>, b: &Member<'_>) -> bool {
    match (a, b) {
        (Member::Function(a), Member::Function(b)) => ptr::eq(*a, *b),
        (Member::GlobalStatement(a), Member::GlobalStatement(b)) => ptr::eq(*a, *b),
        _ => false,
    }
}

fn same_option<T>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => ptr::eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
