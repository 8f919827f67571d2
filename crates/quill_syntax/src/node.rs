//! Syntax node definitions.
//!
//! Every node is allocated in the compiler arena and refers to its children
//! through `&'a` references. Statements and expressions are closed `Copy`
//! enums over those references, so traversals are exhaustive `match`es.

use crate::syntax_kind::SyntaxKind;
use quill_core::text::TextSpan;
use quill_core::value::Value;

bitflags::bitflags! {
    /// Flags attached to a token by the lexer or parser.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u8 {
        const NONE                 = 0;
        /// Synthesized by the parser in place of a token that was not there.
        const MISSING              = 1 << 0;
        /// A line break appears in the token's leading trivia.
        const PRECEDING_LINE_BREAK = 1 << 1;
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Tokens and Trivia
// ============================================================================

/// The literal value carried by a number, string, `true` or `false` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralValue<'a> {
    Boolean(bool),
    Integer(i32),
    String(&'a str),
}

impl LiteralValue<'_> {
    pub fn to_value(&self) -> Value {
        match *self {
            LiteralValue::Boolean(value) => Value::Boolean(value),
            LiteralValue::Integer(value) => Value::Integer(value),
            LiteralValue::String(value) => Value::String(value.to_string()),
        }
    }
}

/// Non-semantic source text attached to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia<'a> {
    pub kind: SyntaxKind,
    pub span: TextSpan,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct SyntaxToken<'a> {
    pub kind: SyntaxKind,
    /// Span of the token itself, excluding trivia.
    pub span: TextSpan,
    pub text: &'a str,
    pub value: Option<LiteralValue<'a>>,
    pub flags: TokenFlags,
    pub leading_trivia: NodeList<'a, Trivia<'a>>,
    pub trailing_trivia: NodeList<'a, Trivia<'a>>,
}

impl<'a> SyntaxToken<'a> {
    /// Whether the parser synthesized this token to recover from an error.
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.flags.contains(TokenFlags::MISSING)
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Span of the token including its leading and trailing trivia.
    pub fn full_span(&self) -> TextSpan {
        let start = self.leading_trivia.first().map_or(self.span.start, |t| t.span.start);
        let end = self.trailing_trivia.last().map_or(self.span.end(), |t| t.span.end());
        TextSpan::from_bounds(start, end)
    }
}

/// Nodes separated by tokens, such as call arguments and parameters.
#[derive(Debug, Clone, Copy)]
pub struct SeparatedList<'a, T> {
    pub nodes: NodeList<'a, T>,
    pub separators: NodeList<'a, &'a SyntaxToken<'a>>,
}

impl<'a, T> SeparatedList<'a, T> {
    pub fn new(nodes: NodeList<'a, T>, separators: NodeList<'a, &'a SyntaxToken<'a>>) -> Self {
        debug_assert!(separators.len() + 1 >= nodes.len());
        Self { nodes, separators }
    }

    pub fn empty() -> Self {
        Self {
            nodes: &[],
            separators: &[],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.nodes.iter()
    }

    pub fn separator(&self, index: usize) -> Option<&'a SyntaxToken<'a>> {
        self.separators.get(index).copied()
    }
}

// ============================================================================
// Compilation unit and members
// ============================================================================

#[derive(Debug)]
pub struct CompilationUnit<'a> {
    pub members: NodeList<'a, Member<'a>>,
    pub end_of_file_token: &'a SyntaxToken<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Function(&'a FunctionDeclaration<'a>),
    GlobalStatement(&'a GlobalStatement<'a>),
}

#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub function_keyword: &'a SyntaxToken<'a>,
    pub identifier: &'a SyntaxToken<'a>,
    pub open_parenthesis_token: &'a SyntaxToken<'a>,
    pub parameters: SeparatedList<'a, &'a Parameter<'a>>,
    pub close_parenthesis_token: &'a SyntaxToken<'a>,
    pub type_clause: Option<&'a TypeClause<'a>>,
    pub body: &'a BlockStatement<'a>,
}

#[derive(Debug)]
pub struct Parameter<'a> {
    pub identifier: &'a SyntaxToken<'a>,
    pub type_clause: &'a TypeClause<'a>,
}

/// `: name` after a variable, parameter or function header.
#[derive(Debug)]
pub struct TypeClause<'a> {
    pub colon_token: &'a SyntaxToken<'a>,
    pub identifier: &'a SyntaxToken<'a>,
}

#[derive(Debug)]
pub struct GlobalStatement<'a> {
    pub statement: Statement<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    Block(&'a BlockStatement<'a>),
    VariableDeclaration(&'a VariableDeclaration<'a>),
    If(&'a IfStatement<'a>),
    While(&'a WhileStatement<'a>),
    DoWhile(&'a DoWhileStatement<'a>),
    For(&'a ForStatement<'a>),
    Break(&'a BreakStatement<'a>),
    Continue(&'a ContinueStatement<'a>),
    Return(&'a ReturnStatement<'a>),
    Label(&'a LabelStatement<'a>),
    Goto(&'a GotoStatement<'a>),
    Expression(&'a ExpressionStatement<'a>),
}

#[derive(Debug)]
pub struct BlockStatement<'a> {
    pub open_brace_token: &'a SyntaxToken<'a>,
    pub statements: NodeList<'a, Statement<'a>>,
    pub close_brace_token: &'a SyntaxToken<'a>,
}

/// `var name[: type] = initializer` or the read-only `let` form.
#[derive(Debug)]
pub struct VariableDeclaration<'a> {
    pub keyword: &'a SyntaxToken<'a>,
    pub identifier: &'a SyntaxToken<'a>,
    pub type_clause: Option<&'a TypeClause<'a>>,
    pub equals_token: &'a SyntaxToken<'a>,
    pub initializer: Expression<'a>,
}

impl VariableDeclaration<'_> {
    pub fn is_read_only(&self) -> bool {
        self.keyword.kind == SyntaxKind::LetKeyword
    }
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub if_keyword: &'a SyntaxToken<'a>,
    pub condition: Expression<'a>,
    pub then_statement: Statement<'a>,
    pub else_clause: Option<&'a ElseClause<'a>>,
}

#[derive(Debug)]
pub struct ElseClause<'a> {
    pub else_keyword: &'a SyntaxToken<'a>,
    pub else_statement: Statement<'a>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub while_keyword: &'a SyntaxToken<'a>,
    pub condition: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug)]
pub struct DoWhileStatement<'a> {
    pub do_keyword: &'a SyntaxToken<'a>,
    pub body: Statement<'a>,
    pub while_keyword: &'a SyntaxToken<'a>,
    pub condition: Expression<'a>,
}

/// `for name = lower to upper body`
#[derive(Debug)]
pub struct ForStatement<'a> {
    pub for_keyword: &'a SyntaxToken<'a>,
    pub identifier: &'a SyntaxToken<'a>,
    pub equals_token: &'a SyntaxToken<'a>,
    pub lower_bound: Expression<'a>,
    pub to_keyword: &'a SyntaxToken<'a>,
    pub upper_bound: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug)]
pub struct BreakStatement<'a> {
    pub keyword: &'a SyntaxToken<'a>,
}

#[derive(Debug)]
pub struct ContinueStatement<'a> {
    pub keyword: &'a SyntaxToken<'a>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub return_keyword: &'a SyntaxToken<'a>,
    pub expression: Option<Expression<'a>>,
}

/// `name:`
#[derive(Debug)]
pub struct LabelStatement<'a> {
    pub identifier: &'a SyntaxToken<'a>,
    pub colon_token: &'a SyntaxToken<'a>,
}

#[derive(Debug)]
pub struct GotoStatement<'a> {
    pub goto_keyword: &'a SyntaxToken<'a>,
    pub label: &'a SyntaxToken<'a>,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub expression: Expression<'a>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Expression<'a> {
    Literal(&'a LiteralExpression<'a>),
    Name(&'a NameExpression<'a>),
    Unary(&'a UnaryExpression<'a>),
    Binary(&'a BinaryExpression<'a>),
    Parenthesized(&'a ParenthesizedExpression<'a>),
    Assignment(&'a AssignmentExpression<'a>),
    Call(&'a CallExpression<'a>),
    Prefix(&'a PrefixExpression<'a>),
    Postfix(&'a PostfixExpression<'a>),
}

#[derive(Debug)]
pub struct LiteralExpression<'a> {
    pub literal_token: &'a SyntaxToken<'a>,
    pub value: LiteralValue<'a>,
}

#[derive(Debug)]
pub struct NameExpression<'a> {
    pub identifier: &'a SyntaxToken<'a>,
}

#[derive(Debug)]
pub struct UnaryExpression<'a> {
    pub operator_token: &'a SyntaxToken<'a>,
    pub operand: Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub left: Expression<'a>,
    pub operator_token: &'a SyntaxToken<'a>,
    pub right: Expression<'a>,
}

#[derive(Debug)]
pub struct ParenthesizedExpression<'a> {
    pub open_parenthesis_token: &'a SyntaxToken<'a>,
    pub expression: Expression<'a>,
    pub close_parenthesis_token: &'a SyntaxToken<'a>,
}

/// `name = value` or a compound form such as `name += value`.
#[derive(Debug)]
pub struct AssignmentExpression<'a> {
    pub identifier: &'a SyntaxToken<'a>,
    pub assignment_token: &'a SyntaxToken<'a>,
    pub expression: Expression<'a>,
}

#[derive(Debug)]
pub struct CallExpression<'a> {
    pub identifier: &'a SyntaxToken<'a>,
    pub open_parenthesis_token: &'a SyntaxToken<'a>,
    pub arguments: SeparatedList<'a, Expression<'a>>,
    pub close_parenthesis_token: &'a SyntaxToken<'a>,
}

/// `++name` or `--name`
#[derive(Debug)]
pub struct PrefixExpression<'a> {
    pub operator_token: &'a SyntaxToken<'a>,
    pub identifier: &'a SyntaxToken<'a>,
}

/// `name++` or `name--`
#[derive(Debug)]
pub struct PostfixExpression<'a> {
    pub identifier: &'a SyntaxToken<'a>,
    pub operator_token: &'a SyntaxToken<'a>,
}

// ============================================================================
// Generic node view
// ============================================================================

/// Any node or token of a syntax tree, for generic traversal.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'a> {
    Token(&'a SyntaxToken<'a>),
    CompilationUnit(&'a CompilationUnit<'a>),
    FunctionDeclaration(&'a FunctionDeclaration<'a>),
    GlobalStatement(&'a GlobalStatement<'a>),
    Parameter(&'a Parameter<'a>),
    TypeClause(&'a TypeClause<'a>),
    ElseClause(&'a ElseClause<'a>),
    Statement(Statement<'a>),
    Expression(Expression<'a>),
}

impl<'a> SyntaxNode<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxNode::Token(token) => token.kind,
            SyntaxNode::CompilationUnit(_) => SyntaxKind::CompilationUnit,
            SyntaxNode::FunctionDeclaration(_) => SyntaxKind::FunctionDeclaration,
            SyntaxNode::GlobalStatement(_) => SyntaxKind::GlobalStatement,
            SyntaxNode::Parameter(_) => SyntaxKind::Parameter,
            SyntaxNode::TypeClause(_) => SyntaxKind::TypeClause,
            SyntaxNode::ElseClause(_) => SyntaxKind::ElseClause,
            SyntaxNode::Statement(statement) => statement.kind(),
            SyntaxNode::Expression(expression) => expression.kind(),
        }
    }

    /// The direct children of this node, in source order.
    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        let mut children = Vec::new();
        match *self {
            SyntaxNode::Token(_) => {}
            SyntaxNode::CompilationUnit(node) => {
                for member in node.members {
                    children.push(SyntaxNode::from(*member));
                }
                children.push(SyntaxNode::Token(node.end_of_file_token));
            }
            SyntaxNode::FunctionDeclaration(node) => {
                children.push(SyntaxNode::Token(node.function_keyword));
                children.push(SyntaxNode::Token(node.identifier));
                children.push(SyntaxNode::Token(node.open_parenthesis_token));
                push_separated(&mut children, node.parameters, |p| SyntaxNode::Parameter(p));
                children.push(SyntaxNode::Token(node.close_parenthesis_token));
                if let Some(type_clause) = node.type_clause {
                    children.push(SyntaxNode::TypeClause(type_clause));
                }
                children.push(SyntaxNode::Statement(Statement::Block(node.body)));
            }
            SyntaxNode::GlobalStatement(node) => children.push(SyntaxNode::Statement(node.statement)),
            SyntaxNode::Parameter(node) => {
                children.push(SyntaxNode::Token(node.identifier));
                children.push(SyntaxNode::TypeClause(node.type_clause));
            }
            SyntaxNode::TypeClause(node) => {
                children.push(SyntaxNode::Token(node.colon_token));
                children.push(SyntaxNode::Token(node.identifier));
            }
            SyntaxNode::ElseClause(node) => {
                children.push(SyntaxNode::Token(node.else_keyword));
                children.push(SyntaxNode::Statement(node.else_statement));
            }
            SyntaxNode::Statement(statement) => statement_children(statement, &mut children),
            SyntaxNode::Expression(expression) => expression_children(expression, &mut children),
        }
        children
    }

    /// The first token of this node, or the token itself.
    pub fn first_token(&self) -> &'a SyntaxToken<'a> {
        match *self {
            SyntaxNode::Token(token) => token,
            _ => self.children()[0].first_token(),
        }
    }

    pub fn last_token(&self) -> &'a SyntaxToken<'a> {
        match *self {
            SyntaxNode::Token(token) => token,
            _ => {
                let children = self.children();
                children[children.len() - 1].last_token()
            }
        }
    }

    /// Span from the first token's start to the last token's end, without trivia.
    pub fn span(&self) -> TextSpan {
        match self {
            SyntaxNode::Token(token) => token.span,
            _ => TextSpan::from_bounds(self.first_token().span.start, self.last_token().span.end()),
        }
    }

    /// Union of the children's full spans, trivia included.
    pub fn full_span(&self) -> TextSpan {
        match self {
            SyntaxNode::Token(token) => token.full_span(),
            _ => self
                .children()
                .iter()
                .map(SyntaxNode::full_span)
                .reduce(|a, b| a.union(&b))
                .unwrap_or_default(),
        }
    }
}

fn push_separated<'a, T: Copy>(
    children: &mut Vec<SyntaxNode<'a>>,
    list: SeparatedList<'a, T>,
    wrap: impl Fn(T) -> SyntaxNode<'a>,
) {
    for (index, node) in list.nodes.iter().enumerate() {
        children.push(wrap(*node));
        if let Some(separator) = list.separator(index) {
            children.push(SyntaxNode::Token(separator));
        }
    }
}

fn statement_children<'a>(statement: Statement<'a>, children: &mut Vec<SyntaxNode<'a>>) {
    match statement {
        Statement::Block(node) => {
            children.push(SyntaxNode::Token(node.open_brace_token));
            children.extend(node.statements.iter().map(|s| SyntaxNode::Statement(*s)));
            children.push(SyntaxNode::Token(node.close_brace_token));
        }
        Statement::VariableDeclaration(node) => {
            children.push(SyntaxNode::Token(node.keyword));
            children.push(SyntaxNode::Token(node.identifier));
            if let Some(type_clause) = node.type_clause {
                children.push(SyntaxNode::TypeClause(type_clause));
            }
            children.push(SyntaxNode::Token(node.equals_token));
            children.push(SyntaxNode::Expression(node.initializer));
        }
        Statement::If(node) => {
            children.push(SyntaxNode::Token(node.if_keyword));
            children.push(SyntaxNode::Expression(node.condition));
            children.push(SyntaxNode::Statement(node.then_statement));
            if let Some(else_clause) = node.else_clause {
                children.push(SyntaxNode::ElseClause(else_clause));
            }
        }
        Statement::While(node) => {
            children.push(SyntaxNode::Token(node.while_keyword));
            children.push(SyntaxNode::Expression(node.condition));
            children.push(SyntaxNode::Statement(node.body));
        }
        Statement::DoWhile(node) => {
            children.push(SyntaxNode::Token(node.do_keyword));
            children.push(SyntaxNode::Statement(node.body));
            children.push(SyntaxNode::Token(node.while_keyword));
            children.push(SyntaxNode::Expression(node.condition));
        }
        Statement::For(node) => {
            children.push(SyntaxNode::Token(node.for_keyword));
            children.push(SyntaxNode::Token(node.identifier));
            children.push(SyntaxNode::Token(node.equals_token));
            children.push(SyntaxNode::Expression(node.lower_bound));
            children.push(SyntaxNode::Token(node.to_keyword));
            children.push(SyntaxNode::Expression(node.upper_bound));
            children.push(SyntaxNode::Statement(node.body));
        }
        Statement::Break(node) => children.push(SyntaxNode::Token(node.keyword)),
        Statement::Continue(node) => children.push(SyntaxNode::Token(node.keyword)),
        Statement::Return(node) => {
            children.push(SyntaxNode::Token(node.return_keyword));
            if let Some(expression) = node.expression {
                children.push(SyntaxNode::Expression(expression));
            }
        }
        Statement::Label(node) => {
            children.push(SyntaxNode::Token(node.identifier));
            children.push(SyntaxNode::Token(node.colon_token));
        }
        Statement::Goto(node) => {
            children.push(SyntaxNode::Token(node.goto_keyword));
            children.push(SyntaxNode::Token(node.label));
        }
        Statement::Expression(node) => children.push(SyntaxNode::Expression(node.expression)),
    }
}

fn expression_children<'a>(expression: Expression<'a>, children: &mut Vec<SyntaxNode<'a>>) {
    match expression {
        Expression::Literal(node) => children.push(SyntaxNode::Token(node.literal_token)),
        Expression::Name(node) => children.push(SyntaxNode::Token(node.identifier)),
        Expression::Unary(node) => {
            children.push(SyntaxNode::Token(node.operator_token));
            children.push(SyntaxNode::Expression(node.operand));
        }
        Expression::Binary(node) => {
            children.push(SyntaxNode::Expression(node.left));
            children.push(SyntaxNode::Token(node.operator_token));
            children.push(SyntaxNode::Expression(node.right));
        }
        Expression::Parenthesized(node) => {
            children.push(SyntaxNode::Token(node.open_parenthesis_token));
            children.push(SyntaxNode::Expression(node.expression));
            children.push(SyntaxNode::Token(node.close_parenthesis_token));
        }
        Expression::Assignment(node) => {
            children.push(SyntaxNode::Token(node.identifier));
            children.push(SyntaxNode::Token(node.assignment_token));
            children.push(SyntaxNode::Expression(node.expression));
        }
        Expression::Call(node) => {
            children.push(SyntaxNode::Token(node.identifier));
            children.push(SyntaxNode::Token(node.open_parenthesis_token));
            push_separated(children, node.arguments, SyntaxNode::Expression);
            children.push(SyntaxNode::Token(node.close_parenthesis_token));
        }
        Expression::Prefix(node) => {
            children.push(SyntaxNode::Token(node.operator_token));
            children.push(SyntaxNode::Token(node.identifier));
        }
        Expression::Postfix(node) => {
            children.push(SyntaxNode::Token(node.identifier));
            children.push(SyntaxNode::Token(node.operator_token));
        }
    }
}

impl<'a> Statement<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Statement::Block(_) => SyntaxKind::BlockStatement,
            Statement::VariableDeclaration(_) => SyntaxKind::VariableDeclaration,
            Statement::If(_) => SyntaxKind::IfStatement,
            Statement::While(_) => SyntaxKind::WhileStatement,
            Statement::DoWhile(_) => SyntaxKind::DoWhileStatement,
            Statement::For(_) => SyntaxKind::ForStatement,
            Statement::Break(_) => SyntaxKind::BreakStatement,
            Statement::Continue(_) => SyntaxKind::ContinueStatement,
            Statement::Return(_) => SyntaxKind::ReturnStatement,
            Statement::Label(_) => SyntaxKind::LabelStatement,
            Statement::Goto(_) => SyntaxKind::GotoStatement,
            Statement::Expression(_) => SyntaxKind::ExpressionStatement,
        }
    }

    pub fn span(&self) -> TextSpan {
        SyntaxNode::Statement(*self).span()
    }

    /// Whether both refer to the same arena node.
    pub fn ptr_eq(&self, other: &Statement<'a>) -> bool {
        self.kind() == other.kind() && self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        match *self {
            Statement::Block(n) => n as *const _ as *const (),
            Statement::VariableDeclaration(n) => n as *const _ as *const (),
            Statement::If(n) => n as *const _ as *const (),
            Statement::While(n) => n as *const _ as *const (),
            Statement::DoWhile(n) => n as *const _ as *const (),
            Statement::For(n) => n as *const _ as *const (),
            Statement::Break(n) => n as *const _ as *const (),
            Statement::Continue(n) => n as *const _ as *const (),
            Statement::Return(n) => n as *const _ as *const (),
            Statement::Label(n) => n as *const _ as *const (),
            Statement::Goto(n) => n as *const _ as *const (),
            Statement::Expression(n) => n as *const _ as *const (),
        }
    }
}

impl<'a> Expression<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Expression::Literal(_) => SyntaxKind::LiteralExpression,
            Expression::Name(_) => SyntaxKind::NameExpression,
            Expression::Unary(_) => SyntaxKind::UnaryExpression,
            Expression::Binary(_) => SyntaxKind::BinaryExpression,
            Expression::Parenthesized(_) => SyntaxKind::ParenthesizedExpression,
            Expression::Assignment(_) => SyntaxKind::AssignmentExpression,
            Expression::Call(_) => SyntaxKind::CallExpression,
            Expression::Prefix(_) => SyntaxKind::PrefixExpression,
            Expression::Postfix(_) => SyntaxKind::PostfixExpression,
        }
    }

    pub fn span(&self) -> TextSpan {
        SyntaxNode::Expression(*self).span()
    }

    /// Whether both refer to the same arena node.
    pub fn ptr_eq(&self, other: &Expression<'a>) -> bool {
        self.kind() == other.kind() && self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        match *self {
            Expression::Literal(n) => n as *const _ as *const (),
            Expression::Name(n) => n as *const _ as *const (),
            Expression::Unary(n) => n as *const _ as *const (),
            Expression::Binary(n) => n as *const _ as *const (),
            Expression::Parenthesized(n) => n as *const _ as *const (),
            Expression::Assignment(n) => n as *const _ as *const (),
            Expression::Call(n) => n as *const _ as *const (),
            Expression::Prefix(n) => n as *const _ as *const (),
            Expression::Postfix(n) => n as *const _ as *const (),
        }
    }
}

impl<'a> From<Member<'a>> for SyntaxNode<'a> {
    fn from(member: Member<'a>) -> Self {
        match member {
            Member::Function(function) => SyntaxNode::FunctionDeclaration(function),
            Member::GlobalStatement(global) => SyntaxNode::GlobalStatement(global),
        }
    }
}

impl<'a> From<Statement<'a>> for SyntaxNode<'a> {
    fn from(statement: Statement<'a>) -> Self {
        SyntaxNode::Statement(statement)
    }
}

impl<'a> From<Expression<'a>> for SyntaxNode<'a> {
    fn from(expression: Expression<'a>) -> Self {
        SyntaxNode::Expression(expression)
    }
}

impl<'a> From<&'a SyntaxToken<'a>> for SyntaxNode<'a> {
    fn from(token: &'a SyntaxToken<'a>) -> Self {
        SyntaxNode::Token(token)
    }
}
