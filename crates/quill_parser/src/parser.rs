//! The quill parser implementation.
//!
//! A recursive descent parser with precedence climbing for expressions. It
//! works over the complete token list of a file, so any amount of lookahead
//! is an index lookup. When a required token is absent the parser reports it
//! and synthesizes a zero-length missing token instead, and every list loop
//! forces at least one token of progress, so parsing always terminates.

use crate::precedence::{binary_operator_precedence, unary_operator_precedence, OperatorPrecedence};
use quill_core::text::{SourceText, TextLocation, TextSpan};
use quill_core::value::Value;
use quill_core::CompilerArena;
use quill_diagnostics::{messages, DiagnosticBag};
use quill_scanner::{LexResult, ScannedTrivia, Token};
use quill_syntax::node::*;
use quill_syntax::{SyntaxKind, SyntaxTree};
use std::sync::Arc;

/// Lex and parse a source text into a syntax tree allocated in `arena`.
pub fn parse<'a>(arena: &'a CompilerArena, source: Arc<SourceText>) -> SyntaxTree<'a> {
    let lexed = quill_scanner::lex(&source);
    parse_tokens(arena, source, lexed)
}

/// Parse a text given by name and contents.
pub fn parse_text<'a>(arena: &'a CompilerArena, file_name: &str, text: &str) -> SyntaxTree<'a> {
    parse(arena, SourceText::shared(file_name, text))
}

/// Parse tokens that were already scanned, e.g. on another thread.
pub fn parse_tokens<'a>(arena: &'a CompilerArena, source: Arc<SourceText>, lexed: LexResult) -> SyntaxTree<'a> {
    let span = tracing::debug_span!("parse", file = source.file_name());
    let _enter = span.enter();

    let parser = Parser::new(arena, source.clone(), lexed);
    let (root, diagnostics) = parser.parse_compilation_unit();
    tracing::debug!(members = root.members.len(), diagnostics = diagnostics.len(), "parsed");
    SyntaxTree::new(source, root, diagnostics)
}

/// The parser produces a `CompilationUnit` from a scanned token list.
pub struct Parser<'a> {
    arena: &'a CompilerArena,
    source: Arc<SourceText>,
    tokens: Vec<&'a SyntaxToken<'a>>,
    position: usize,
    diagnostics: DiagnosticBag,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a CompilerArena, source: Arc<SourceText>, lexed: LexResult) -> Self {
        let tokens = lexed
            .tokens
            .into_iter()
            .map(|token| alloc_token(arena, &source, token))
            .collect();
        Self {
            arena,
            source,
            tokens,
            position: 0,
            diagnostics: lexed.diagnostics,
        }
    }

    /// Parse the whole file. Lexer diagnostics come first, followed by the
    /// parser's own.
    pub fn parse_compilation_unit(mut self) -> (&'a CompilationUnit<'a>, DiagnosticBag) {
        let members = self.parse_members();
        let end_of_file_token = self.match_token(SyntaxKind::EndOfFileToken);
        let root = self.arena.alloc(CompilationUnit {
            members: self.arena.alloc_vec(members),
            end_of_file_token,
        });
        (root, self.diagnostics)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn peek(&self, offset: usize) -> &'a SyntaxToken<'a> {
        let index = (self.position + offset).min(self.tokens.len() - 1);
        self.tokens[index]
    }

    #[inline]
    fn current(&self) -> &'a SyntaxToken<'a> {
        self.peek(0)
    }

    #[inline]
    fn current_kind(&self) -> SyntaxKind {
        self.current().kind
    }

    fn next_token(&mut self) -> &'a SyntaxToken<'a> {
        let current = self.current();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        current
    }

    fn match_token(&mut self, kind: SyntaxKind) -> &'a SyntaxToken<'a> {
        if self.current_kind() == kind {
            return self.next_token();
        }

        let current = self.current();
        let location = TextLocation::new(self.source.clone(), current.span);
        self.diagnostics.report(
            location,
            &messages::UNEXPECTED_TOKEN,
            &[current.kind.describe(), kind.describe()],
        );
        self.arena.alloc(SyntaxToken {
            kind,
            span: TextSpan::empty(current.span.start),
            text: "",
            value: None,
            flags: TokenFlags::MISSING,
            leading_trivia: &[],
            trailing_trivia: &[],
        })
    }

    /// Drop the current token from the tree, keeping its text as skipped
    /// trivia in front of the token that follows it.
    fn skip_token(&mut self) {
        let skipped = self.current();
        if skipped.kind == SyntaxKind::EndOfFileToken {
            return;
        }
        self.position += 1;
        let next = self.tokens[self.position];

        let mut leading = skipped.leading_trivia.to_vec();
        leading.push(Trivia {
            kind: SyntaxKind::SkippedTextTrivia,
            span: skipped.span,
            text: skipped.text,
        });
        leading.extend_from_slice(skipped.trailing_trivia);
        leading.extend_from_slice(next.leading_trivia);

        let mut flags = next.flags;
        if skipped.has_preceding_line_break() {
            flags |= TokenFlags::PRECEDING_LINE_BREAK;
        }
        self.tokens[self.position] = self.arena.alloc(SyntaxToken {
            kind: next.kind,
            span: next.span,
            text: next.text,
            value: next.value,
            flags,
            leading_trivia: self.arena.alloc_vec(leading),
            trailing_trivia: next.trailing_trivia,
        });
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn parse_members(&mut self) -> Vec<Member<'a>> {
        let mut members = Vec::new();
        while self.current_kind() != SyntaxKind::EndOfFileToken {
            let start = self.position;
            members.push(self.parse_member());
            // Nothing consumed: skip the token so the loop makes progress.
            if self.position == start {
                self.skip_token();
            }
        }
        members
    }

    fn parse_member(&mut self) -> Member<'a> {
        if self.current_kind() == SyntaxKind::FunctionKeyword {
            return Member::Function(self.parse_function_declaration());
        }
        let statement = self.parse_statement();
        Member::GlobalStatement(self.arena.alloc(GlobalStatement { statement }))
    }

    fn parse_function_declaration(&mut self) -> &'a FunctionDeclaration<'a> {
        let function_keyword = self.match_token(SyntaxKind::FunctionKeyword);
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        let open_parenthesis_token = self.match_token(SyntaxKind::OpenParenthesisToken);
        let parameters = self.parse_parameter_list();
        let close_parenthesis_token = self.match_token(SyntaxKind::CloseParenthesisToken);
        let type_clause = self.parse_optional_type_clause();
        let body = self.parse_block_statement();
        self.arena.alloc(FunctionDeclaration {
            function_keyword,
            identifier,
            open_parenthesis_token,
            parameters,
            close_parenthesis_token,
            type_clause,
            body,
        })
    }

    fn parse_parameter_list(&mut self) -> SeparatedList<'a, &'a Parameter<'a>> {
        let mut nodes = Vec::new();
        let mut separators = Vec::new();
        while self.current_kind() != SyntaxKind::CloseParenthesisToken
            && self.current_kind() != SyntaxKind::EndOfFileToken
        {
            let identifier = self.match_token(SyntaxKind::IdentifierToken);
            let type_clause = self.parse_type_clause();
            nodes.push(&*self.arena.alloc(Parameter { identifier, type_clause }));

            if self.current_kind() != SyntaxKind::CommaToken {
                break;
            }
            separators.push(self.match_token(SyntaxKind::CommaToken));
        }
        SeparatedList::new(self.arena.alloc_vec(nodes), self.arena.alloc_vec(separators))
    }

    fn parse_optional_type_clause(&mut self) -> Option<&'a TypeClause<'a>> {
        if self.current_kind() != SyntaxKind::ColonToken {
            return None;
        }
        Some(self.parse_type_clause())
    }

    fn parse_type_clause(&mut self) -> &'a TypeClause<'a> {
        let colon_token = self.match_token(SyntaxKind::ColonToken);
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        self.arena.alloc(TypeClause { colon_token, identifier })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self) -> Statement<'a> {
        match self.current_kind() {
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block_statement()),
            SyntaxKind::LetKeyword | SyntaxKind::VarKeyword => self.parse_variable_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::BreakKeyword => {
                let keyword = self.match_token(SyntaxKind::BreakKeyword);
                Statement::Break(self.arena.alloc(BreakStatement { keyword }))
            }
            SyntaxKind::ContinueKeyword => {
                let keyword = self.match_token(SyntaxKind::ContinueKeyword);
                Statement::Continue(self.arena.alloc(ContinueStatement { keyword }))
            }
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::GotoKeyword => {
                let goto_keyword = self.match_token(SyntaxKind::GotoKeyword);
                let label = self.match_token(SyntaxKind::IdentifierToken);
                Statement::Goto(self.arena.alloc(GotoStatement { goto_keyword, label }))
            }
            SyntaxKind::IdentifierToken if self.peek(1).kind == SyntaxKind::ColonToken => {
                let identifier = self.match_token(SyntaxKind::IdentifierToken);
                let colon_token = self.match_token(SyntaxKind::ColonToken);
                Statement::Label(self.arena.alloc(LabelStatement { identifier, colon_token }))
            }
            _ => {
                let expression = self.parse_expression();
                Statement::Expression(self.arena.alloc(ExpressionStatement { expression }))
            }
        }
    }

    fn parse_block_statement(&mut self) -> &'a BlockStatement<'a> {
        let open_brace_token = self.match_token(SyntaxKind::OpenBraceToken);
        let mut statements = Vec::new();
        while self.current_kind() != SyntaxKind::EndOfFileToken && self.current_kind() != SyntaxKind::CloseBraceToken {
            let start = self.position;
            statements.push(self.parse_statement());
            // Nothing consumed: skip the token so the loop makes progress.
            if self.position == start {
                self.skip_token();
            }
        }
        let close_brace_token = self.match_token(SyntaxKind::CloseBraceToken);
        self.arena.alloc(BlockStatement {
            open_brace_token,
            statements: self.arena.alloc_vec(statements),
            close_brace_token,
        })
    }

    fn parse_variable_declaration(&mut self) -> Statement<'a> {
        let expected = if self.current_kind() == SyntaxKind::LetKeyword {
            SyntaxKind::LetKeyword
        } else {
            SyntaxKind::VarKeyword
        };
        let keyword = self.match_token(expected);
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        let type_clause = self.parse_optional_type_clause();
        let equals_token = self.match_token(SyntaxKind::EqualsToken);
        let initializer = self.parse_expression();
        Statement::VariableDeclaration(self.arena.alloc(VariableDeclaration {
            keyword,
            identifier,
            type_clause,
            equals_token,
            initializer,
        }))
    }

    fn parse_if_statement(&mut self) -> Statement<'a> {
        let if_keyword = self.match_token(SyntaxKind::IfKeyword);
        let condition = self.parse_expression();
        let then_statement = self.parse_statement();
        let else_clause = if self.current_kind() == SyntaxKind::ElseKeyword {
            let else_keyword = self.match_token(SyntaxKind::ElseKeyword);
            let else_statement = self.parse_statement();
            Some(&*self.arena.alloc(ElseClause { else_keyword, else_statement }))
        } else {
            None
        };
        Statement::If(self.arena.alloc(IfStatement {
            if_keyword,
            condition,
            then_statement,
            else_clause,
        }))
    }

    fn parse_while_statement(&mut self) -> Statement<'a> {
        let while_keyword = self.match_token(SyntaxKind::WhileKeyword);
        let condition = self.parse_expression();
        let body = self.parse_statement();
        Statement::While(self.arena.alloc(WhileStatement {
            while_keyword,
            condition,
            body,
        }))
    }

    fn parse_do_while_statement(&mut self) -> Statement<'a> {
        let do_keyword = self.match_token(SyntaxKind::DoKeyword);
        let body = self.parse_statement();
        let while_keyword = self.match_token(SyntaxKind::WhileKeyword);
        let condition = self.parse_expression();
        Statement::DoWhile(self.arena.alloc(DoWhileStatement {
            do_keyword,
            body,
            while_keyword,
            condition,
        }))
    }

    fn parse_for_statement(&mut self) -> Statement<'a> {
        let for_keyword = self.match_token(SyntaxKind::ForKeyword);
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        let equals_token = self.match_token(SyntaxKind::EqualsToken);
        let lower_bound = self.parse_expression();
        let to_keyword = self.match_token(SyntaxKind::ToKeyword);
        let upper_bound = self.parse_expression();
        let body = self.parse_statement();
        Statement::For(self.arena.alloc(ForStatement {
            for_keyword,
            identifier,
            equals_token,
            lower_bound,
            to_keyword,
            upper_bound,
            body,
        }))
    }

    /// The value of a `return` must start on the keyword's line.
    fn parse_return_statement(&mut self) -> Statement<'a> {
        let return_keyword = self.match_token(SyntaxKind::ReturnKeyword);
        let keyword_line = self.source.line_index(return_keyword.span.start);
        let current = self.current();
        let same_line = current.kind != SyntaxKind::EndOfFileToken
            && self.source.line_index(current.span.start) == keyword_line;
        let expression = if same_line && can_start_expression(current.kind) {
            Some(self.parse_expression())
        } else {
            None
        };
        Statement::Return(self.arena.alloc(ReturnStatement {
            return_keyword,
            expression,
        }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Expression<'a> {
        self.parse_assignment_expression()
    }

    /// Assignments are right-associative and need a bare name on the left.
    fn parse_assignment_expression(&mut self) -> Expression<'a> {
        if self.current_kind() == SyntaxKind::IdentifierToken && self.peek(1).kind.is_assignment_operator() {
            let identifier = self.next_token();
            let assignment_token = self.next_token();
            let expression = self.parse_assignment_expression();
            return Expression::Assignment(self.arena.alloc(AssignmentExpression {
                identifier,
                assignment_token,
                expression,
            }));
        }
        self.parse_binary_expression(OperatorPrecedence::Lowest)
    }

    /// Precedence climbing. Operators of equal precedence associate left.
    fn parse_binary_expression(&mut self, parent_precedence: OperatorPrecedence) -> Expression<'a> {
        let mut left = match unary_operator_precedence(self.current_kind()) {
            Some(precedence) if precedence >= parent_precedence => {
                let operator_token = self.next_token();
                let operand = self.parse_binary_expression(precedence);
                Expression::Unary(self.arena.alloc(UnaryExpression { operator_token, operand }))
            }
            _ => self.parse_primary_expression(),
        };

        loop {
            let precedence = match binary_operator_precedence(self.current_kind()) {
                Some(precedence) if precedence > parent_precedence => precedence,
                _ => break,
            };
            let operator_token = self.next_token();
            let right = self.parse_binary_expression(precedence);
            left = Expression::Binary(self.arena.alloc(BinaryExpression {
                left,
                operator_token,
                right,
            }));
        }

        left
    }

    fn parse_primary_expression(&mut self) -> Expression<'a> {
        match self.current_kind() {
            SyntaxKind::OpenParenthesisToken => self.parse_parenthesized_expression(),
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let literal_token = self.next_token();
                let value = LiteralValue::Boolean(literal_token.kind == SyntaxKind::TrueKeyword);
                Expression::Literal(self.arena.alloc(LiteralExpression { literal_token, value }))
            }
            SyntaxKind::NumberToken => {
                let literal_token = self.next_token();
                let value = literal_token.value.unwrap_or(LiteralValue::Integer(0));
                Expression::Literal(self.arena.alloc(LiteralExpression { literal_token, value }))
            }
            SyntaxKind::StringToken => {
                let literal_token = self.next_token();
                let value = literal_token.value.unwrap_or(LiteralValue::String(""));
                Expression::Literal(self.arena.alloc(LiteralExpression { literal_token, value }))
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                let operator_token = self.next_token();
                let identifier = self.match_token(SyntaxKind::IdentifierToken);
                Expression::Prefix(self.arena.alloc(PrefixExpression { operator_token, identifier }))
            }
            SyntaxKind::IdentifierToken if self.peek(1).kind == SyntaxKind::OpenParenthesisToken => {
                self.parse_call_expression()
            }
            SyntaxKind::IdentifierToken if self.peek(1).kind.is_increment_or_decrement() => {
                let identifier = self.next_token();
                let operator_token = self.next_token();
                Expression::Postfix(self.arena.alloc(PostfixExpression { identifier, operator_token }))
            }
            _ => {
                let identifier = self.match_token(SyntaxKind::IdentifierToken);
                Expression::Name(self.arena.alloc(NameExpression { identifier }))
            }
        }
    }

    fn parse_parenthesized_expression(&mut self) -> Expression<'a> {
        let open_parenthesis_token = self.match_token(SyntaxKind::OpenParenthesisToken);
        let expression = self.parse_expression();
        let close_parenthesis_token = self.match_token(SyntaxKind::CloseParenthesisToken);
        Expression::Parenthesized(self.arena.alloc(ParenthesizedExpression {
            open_parenthesis_token,
            expression,
            close_parenthesis_token,
        }))
    }

    fn parse_call_expression(&mut self) -> Expression<'a> {
        let identifier = self.match_token(SyntaxKind::IdentifierToken);
        let open_parenthesis_token = self.match_token(SyntaxKind::OpenParenthesisToken);
        let arguments = self.parse_arguments();
        let close_parenthesis_token = self.match_token(SyntaxKind::CloseParenthesisToken);
        Expression::Call(self.arena.alloc(CallExpression {
            identifier,
            open_parenthesis_token,
            arguments,
            close_parenthesis_token,
        }))
    }

    fn parse_arguments(&mut self) -> SeparatedList<'a, Expression<'a>> {
        let mut nodes = Vec::new();
        let mut separators = Vec::new();
        while self.current_kind() != SyntaxKind::CloseParenthesisToken
            && self.current_kind() != SyntaxKind::EndOfFileToken
        {
            nodes.push(self.parse_expression());
            if self.current_kind() != SyntaxKind::CommaToken {
                break;
            }
            separators.push(self.match_token(SyntaxKind::CommaToken));
        }
        SeparatedList::new(self.arena.alloc_vec(nodes), self.arena.alloc_vec(separators))
    }
}

/// Whether a token of this kind can begin an expression.
fn can_start_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IdentifierToken
            | SyntaxKind::NumberToken
            | SyntaxKind::StringToken
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::OpenParenthesisToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
    ) || unary_operator_precedence(kind).is_some()
}

/// Copy a scanned token into the arena.
fn alloc_token<'a>(arena: &'a CompilerArena, source: &SourceText, token: Token) -> &'a SyntaxToken<'a> {
    let value = token.value.map(|value| match value {
        Value::Boolean(value) => LiteralValue::Boolean(value),
        Value::Integer(value) => LiteralValue::Integer(value),
        Value::String(value) => LiteralValue::String(arena.alloc_str(&value)),
    });
    arena.alloc(SyntaxToken {
        kind: token.kind,
        span: token.span,
        text: arena.alloc_str(source.slice(token.span)),
        value,
        flags: token.flags,
        leading_trivia: alloc_trivia(arena, source, &token.leading_trivia),
        trailing_trivia: alloc_trivia(arena, source, &token.trailing_trivia),
    })
}

fn alloc_trivia<'a>(arena: &'a CompilerArena, source: &SourceText, trivia: &[ScannedTrivia]) -> &'a [Trivia<'a>] {
    let trivia: Vec<Trivia<'a>> = trivia
        .iter()
        .map(|t| Trivia {
            kind: t.kind,
            span: t.span,
            text: arena.alloc_str(source.slice(t.span)),
        })
        .collect();
    arena.alloc_vec(trivia)
}
