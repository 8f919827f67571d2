//! The bound tree: the typed, fully resolved form of the syntax tree.
//!
//! Nodes are immutable and shared through `Rc`, so a rewriter can hand back
//! the very same node when nothing below it changed. Every expression knows
//! its type, and its constant value when it can be computed at compile time.

use crate::conversion::convert_value;
use crate::operators::{evaluate_binary, evaluate_unary, BoundBinaryOperator, BoundUnaryOperator};
use crate::symbol::{FunctionSymbol, TypeSymbol, VariableSymbol};
use quill_core::text::TextLocation;
use quill_core::value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundNodeKind {
    // Statements
    BlockStatement,
    VariableDeclaration,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    LabelStatement,
    GotoStatement,
    ConditionalGotoStatement,
    ReturnStatement,
    ExpressionStatement,

    // Expressions
    ErrorExpression,
    LiteralExpression,
    VariableExpression,
    AssignmentExpression,
    CompoundAssignmentExpression,
    UnaryExpression,
    BinaryExpression,
    CallExpression,
    ConversionExpression,
    IncrementExpression,
}

// ============================================================================
// Labels
// ============================================================================

static NEXT_LABEL_ID: AtomicU32 = AtomicU32::new(1);

/// A jump target. Labels compare by identity, so a generated `Label1` never
/// collides with a user label of the same name.
#[derive(Debug, Clone)]
pub struct BoundLabel {
    id: u32,
    name: Rc<str>,
}

impl BoundLabel {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self {
            id: NEXT_LABEL_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for BoundLabel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BoundLabel {}

impl Hash for BoundLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for BoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone)]
pub enum BoundStatement {
    Block(Rc<BoundBlockStatement>),
    VariableDeclaration(Rc<BoundVariableDeclaration>),
    If(Rc<BoundIfStatement>),
    While(Rc<BoundWhileStatement>),
    DoWhile(Rc<BoundDoWhileStatement>),
    For(Rc<BoundForStatement>),
    Label(Rc<BoundLabelStatement>),
    Goto(Rc<BoundGotoStatement>),
    ConditionalGoto(Rc<BoundConditionalGotoStatement>),
    Return(Rc<BoundReturnStatement>),
    Expression(Rc<BoundExpressionStatement>),
}

#[derive(Debug)]
pub struct BoundBlockStatement {
    pub location: TextLocation,
    pub statements: Vec<BoundStatement>,
}

#[derive(Debug)]
pub struct BoundVariableDeclaration {
    pub location: TextLocation,
    pub variable: Rc<VariableSymbol>,
    pub initializer: BoundExpression,
}

#[derive(Debug)]
pub struct BoundIfStatement {
    pub location: TextLocation,
    pub condition: BoundExpression,
    pub then_statement: BoundStatement,
    pub else_statement: Option<BoundStatement>,
}

#[derive(Debug)]
pub struct BoundWhileStatement {
    pub location: TextLocation,
    pub condition: BoundExpression,
    pub body: BoundStatement,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug)]
pub struct BoundDoWhileStatement {
    pub location: TextLocation,
    pub body: BoundStatement,
    pub condition: BoundExpression,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug)]
pub struct BoundForStatement {
    pub location: TextLocation,
    pub variable: Rc<VariableSymbol>,
    pub lower_bound: BoundExpression,
    pub upper_bound: BoundExpression,
    pub body: BoundStatement,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug)]
pub struct BoundLabelStatement {
    pub location: TextLocation,
    pub label: BoundLabel,
}

#[derive(Debug)]
pub struct BoundGotoStatement {
    pub location: TextLocation,
    pub label: BoundLabel,
    pub is_synthesized: bool,
}

/// Jump to `label` when `condition` evaluates to `jump_if_true`.
#[derive(Debug)]
pub struct BoundConditionalGotoStatement {
    pub location: TextLocation,
    pub label: BoundLabel,
    pub condition: BoundExpression,
    pub jump_if_true: bool,
}

#[derive(Debug)]
pub struct BoundReturnStatement {
    pub location: TextLocation,
    pub expression: Option<BoundExpression>,
    pub is_synthesized: bool,
}

#[derive(Debug)]
pub struct BoundExpressionStatement {
    pub location: TextLocation,
    pub expression: BoundExpression,
    pub is_synthesized: bool,
}

impl BoundStatement {
    pub fn kind(&self) -> BoundNodeKind {
        match self {
            BoundStatement::Block(_) => BoundNodeKind::BlockStatement,
            BoundStatement::VariableDeclaration(_) => BoundNodeKind::VariableDeclaration,
            BoundStatement::If(_) => BoundNodeKind::IfStatement,
            BoundStatement::While(_) => BoundNodeKind::WhileStatement,
            BoundStatement::DoWhile(_) => BoundNodeKind::DoWhileStatement,
            BoundStatement::For(_) => BoundNodeKind::ForStatement,
            BoundStatement::Label(_) => BoundNodeKind::LabelStatement,
            BoundStatement::Goto(_) => BoundNodeKind::GotoStatement,
            BoundStatement::ConditionalGoto(_) => BoundNodeKind::ConditionalGotoStatement,
            BoundStatement::Return(_) => BoundNodeKind::ReturnStatement,
            BoundStatement::Expression(_) => BoundNodeKind::ExpressionStatement,
        }
    }

    pub fn location(&self) -> &TextLocation {
        match self {
            BoundStatement::Block(n) => &n.location,
            BoundStatement::VariableDeclaration(n) => &n.location,
            BoundStatement::If(n) => &n.location,
            BoundStatement::While(n) => &n.location,
            BoundStatement::DoWhile(n) => &n.location,
            BoundStatement::For(n) => &n.location,
            BoundStatement::Label(n) => &n.location,
            BoundStatement::Goto(n) => &n.location,
            BoundStatement::ConditionalGoto(n) => &n.location,
            BoundStatement::Return(n) => &n.location,
            BoundStatement::Expression(n) => &n.location,
        }
    }

    /// Introduced by lowering rather than written in source.
    pub fn is_synthesized(&self) -> bool {
        match self {
            BoundStatement::VariableDeclaration(n) => n.variable.is_synthesized,
            BoundStatement::Return(n) => n.is_synthesized,
            BoundStatement::Expression(n) => n.is_synthesized,
            BoundStatement::Goto(n) => n.is_synthesized,
            _ => false,
        }
    }

    /// Corresponds to a statement the user wrote. Labels and conditional
    /// jumps never do, since only lowering emits them into a body.
    pub fn is_from_source(&self) -> bool {
        match self {
            BoundStatement::Label(_) | BoundStatement::ConditionalGoto(_) => false,
            _ => !self.is_synthesized(),
        }
    }

    /// Whether both refer to the same node.
    pub fn ptr_eq(&self, other: &BoundStatement) -> bool {
        match (self, other) {
            (BoundStatement::Block(a), BoundStatement::Block(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::VariableDeclaration(a), BoundStatement::VariableDeclaration(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::If(a), BoundStatement::If(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::While(a), BoundStatement::While(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::DoWhile(a), BoundStatement::DoWhile(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::For(a), BoundStatement::For(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::Label(a), BoundStatement::Label(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::Goto(a), BoundStatement::Goto(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::ConditionalGoto(a), BoundStatement::ConditionalGoto(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::Return(a), BoundStatement::Return(b)) => Rc::ptr_eq(a, b),
            (BoundStatement::Expression(a), BoundStatement::Expression(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    // -- Constructors used by the binder and lowering --

    pub fn block(location: TextLocation, statements: Vec<BoundStatement>) -> Self {
        BoundStatement::Block(Rc::new(BoundBlockStatement { location, statements }))
    }

    pub fn variable_declaration(location: TextLocation, variable: Rc<VariableSymbol>, initializer: BoundExpression) -> Self {
        BoundStatement::VariableDeclaration(Rc::new(BoundVariableDeclaration {
            location,
            variable,
            initializer,
        }))
    }

    pub fn label(location: TextLocation, label: BoundLabel) -> Self {
        BoundStatement::Label(Rc::new(BoundLabelStatement { location, label }))
    }

    /// A jump written as `goto`, `break` or `continue`.
    pub fn goto(location: TextLocation, label: BoundLabel) -> Self {
        BoundStatement::Goto(Rc::new(BoundGotoStatement {
            location,
            label,
            is_synthesized: false,
        }))
    }

    pub fn synthesized_goto(location: TextLocation, label: BoundLabel) -> Self {
        BoundStatement::Goto(Rc::new(BoundGotoStatement {
            location,
            label,
            is_synthesized: true,
        }))
    }

    pub fn conditional_goto(location: TextLocation, label: BoundLabel, condition: BoundExpression, jump_if_true: bool) -> Self {
        BoundStatement::ConditionalGoto(Rc::new(BoundConditionalGotoStatement {
            location,
            label,
            condition,
            jump_if_true,
        }))
    }

    pub fn expression(location: TextLocation, expression: BoundExpression) -> Self {
        BoundStatement::Expression(Rc::new(BoundExpressionStatement {
            location,
            expression,
            is_synthesized: false,
        }))
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone)]
pub enum BoundExpression {
    Error(Rc<BoundErrorExpression>),
    Literal(Rc<BoundLiteralExpression>),
    Variable(Rc<BoundVariableExpression>),
    Assignment(Rc<BoundAssignmentExpression>),
    CompoundAssignment(Rc<BoundCompoundAssignmentExpression>),
    Unary(Rc<BoundUnaryExpression>),
    Binary(Rc<BoundBinaryExpression>),
    Call(Rc<BoundCallExpression>),
    Conversion(Rc<BoundConversionExpression>),
    Increment(Rc<BoundIncrementExpression>),
}

/// Stands in for an expression that failed to bind. Its type is `?`.
#[derive(Debug)]
pub struct BoundErrorExpression {
    pub location: TextLocation,
}

#[derive(Debug)]
pub struct BoundLiteralExpression {
    pub location: TextLocation,
    pub value: Value,
}

#[derive(Debug)]
pub struct BoundVariableExpression {
    pub location: TextLocation,
    pub variable: Rc<VariableSymbol>,
}

#[derive(Debug)]
pub struct BoundAssignmentExpression {
    pub location: TextLocation,
    pub variable: Rc<VariableSymbol>,
    pub expression: BoundExpression,
}

/// `x op= e`, kept until lowering rewrites it to `x = x op e`.
#[derive(Debug)]
pub struct BoundCompoundAssignmentExpression {
    pub location: TextLocation,
    pub variable: Rc<VariableSymbol>,
    pub op: &'static BoundBinaryOperator,
    pub expression: BoundExpression,
}

#[derive(Debug)]
pub struct BoundUnaryExpression {
    pub location: TextLocation,
    pub op: &'static BoundUnaryOperator,
    pub operand: BoundExpression,
    constant: Option<Value>,
}

#[derive(Debug)]
pub struct BoundBinaryExpression {
    pub location: TextLocation,
    pub left: BoundExpression,
    pub op: &'static BoundBinaryOperator,
    pub right: BoundExpression,
    constant: Option<Value>,
}

#[derive(Debug)]
pub struct BoundCallExpression {
    pub location: TextLocation,
    pub function: Rc<FunctionSymbol>,
    pub arguments: Vec<BoundExpression>,
}

#[derive(Debug)]
pub struct BoundConversionExpression {
    pub location: TextLocation,
    pub ty: TypeSymbol,
    pub expression: BoundExpression,
    constant: Option<Value>,
}

/// `++x`, `--x`, `x++` or `x--` on an `int` variable. The prefix forms
/// produce the updated value, the postfix forms the previous one.
#[derive(Debug)]
pub struct BoundIncrementExpression {
    pub location: TextLocation,
    pub variable: Rc<VariableSymbol>,
    pub is_increment: bool,
    pub is_prefix: bool,
}

impl BoundExpression {
    pub fn kind(&self) -> BoundNodeKind {
        match self {
            BoundExpression::Error(_) => BoundNodeKind::ErrorExpression,
            BoundExpression::Literal(_) => BoundNodeKind::LiteralExpression,
            BoundExpression::Variable(_) => BoundNodeKind::VariableExpression,
            BoundExpression::Assignment(_) => BoundNodeKind::AssignmentExpression,
            BoundExpression::CompoundAssignment(_) => BoundNodeKind::CompoundAssignmentExpression,
            BoundExpression::Unary(_) => BoundNodeKind::UnaryExpression,
            BoundExpression::Binary(_) => BoundNodeKind::BinaryExpression,
            BoundExpression::Call(_) => BoundNodeKind::CallExpression,
            BoundExpression::Conversion(_) => BoundNodeKind::ConversionExpression,
            BoundExpression::Increment(_) => BoundNodeKind::IncrementExpression,
        }
    }

    pub fn ty(&self) -> TypeSymbol {
        match self {
            BoundExpression::Error(_) => TypeSymbol::Error,
            BoundExpression::Literal(n) => TypeSymbol::of_value(&n.value),
            BoundExpression::Variable(n) => n.variable.ty,
            BoundExpression::Assignment(n) => n.variable.ty,
            BoundExpression::CompoundAssignment(n) => n.variable.ty,
            BoundExpression::Unary(n) => n.op.ty,
            BoundExpression::Binary(n) => n.op.ty,
            BoundExpression::Call(n) => n.function.ty,
            BoundExpression::Conversion(n) => n.ty,
            BoundExpression::Increment(_) => TypeSymbol::Int,
        }
    }

    /// The compile-time value, if there is one.
    pub fn constant(&self) -> Option<&Value> {
        match self {
            BoundExpression::Literal(n) => Some(&n.value),
            BoundExpression::Variable(n) => n.variable.constant.as_ref(),
            BoundExpression::Unary(n) => n.constant.as_ref(),
            BoundExpression::Binary(n) => n.constant.as_ref(),
            BoundExpression::Conversion(n) => n.constant.as_ref(),
            _ => None,
        }
    }

    pub fn location(&self) -> &TextLocation {
        match self {
            BoundExpression::Error(n) => &n.location,
            BoundExpression::Literal(n) => &n.location,
            BoundExpression::Variable(n) => &n.location,
            BoundExpression::Assignment(n) => &n.location,
            BoundExpression::CompoundAssignment(n) => &n.location,
            BoundExpression::Unary(n) => &n.location,
            BoundExpression::Binary(n) => &n.location,
            BoundExpression::Call(n) => &n.location,
            BoundExpression::Conversion(n) => &n.location,
            BoundExpression::Increment(n) => &n.location,
        }
    }

    pub fn ptr_eq(&self, other: &BoundExpression) -> bool {
        match (self, other) {
            (BoundExpression::Error(a), BoundExpression::Error(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::Literal(a), BoundExpression::Literal(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::Variable(a), BoundExpression::Variable(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::Assignment(a), BoundExpression::Assignment(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::CompoundAssignment(a), BoundExpression::CompoundAssignment(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::Unary(a), BoundExpression::Unary(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::Binary(a), BoundExpression::Binary(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::Call(a), BoundExpression::Call(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::Conversion(a), BoundExpression::Conversion(b)) => Rc::ptr_eq(a, b),
            (BoundExpression::Increment(a), BoundExpression::Increment(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    // -- Constructors. Constants are computed here, bottom-up. --

    pub fn error(location: TextLocation) -> Self {
        BoundExpression::Error(Rc::new(BoundErrorExpression { location }))
    }

    pub fn literal(location: TextLocation, value: Value) -> Self {
        BoundExpression::Literal(Rc::new(BoundLiteralExpression { location, value }))
    }

    pub fn variable(location: TextLocation, variable: Rc<VariableSymbol>) -> Self {
        BoundExpression::Variable(Rc::new(BoundVariableExpression { location, variable }))
    }

    pub fn assignment(location: TextLocation, variable: Rc<VariableSymbol>, expression: BoundExpression) -> Self {
        BoundExpression::Assignment(Rc::new(BoundAssignmentExpression {
            location,
            variable,
            expression,
        }))
    }

    pub fn compound_assignment(
        location: TextLocation,
        variable: Rc<VariableSymbol>,
        op: &'static BoundBinaryOperator,
        expression: BoundExpression,
    ) -> Self {
        BoundExpression::CompoundAssignment(Rc::new(BoundCompoundAssignmentExpression {
            location,
            variable,
            op,
            expression,
        }))
    }

    pub fn unary(location: TextLocation, op: &'static BoundUnaryOperator, operand: BoundExpression) -> Self {
        let constant = operand.constant().and_then(|v| evaluate_unary(op.kind, v));
        BoundExpression::Unary(Rc::new(BoundUnaryExpression {
            location,
            op,
            operand,
            constant,
        }))
    }

    /// Folds only when both sides are known; `f() && false` keeps its call.
    pub fn binary(location: TextLocation, left: BoundExpression, op: &'static BoundBinaryOperator, right: BoundExpression) -> Self {
        let constant = match (left.constant(), right.constant()) {
            (Some(l), Some(r)) => evaluate_binary(op.kind, l, r),
            _ => None,
        };
        BoundExpression::Binary(Rc::new(BoundBinaryExpression {
            location,
            left,
            op,
            right,
            constant,
        }))
    }

    pub fn call(location: TextLocation, function: Rc<FunctionSymbol>, arguments: Vec<BoundExpression>) -> Self {
        BoundExpression::Call(Rc::new(BoundCallExpression {
            location,
            function,
            arguments,
        }))
    }

    pub fn conversion(location: TextLocation, ty: TypeSymbol, expression: BoundExpression) -> Self {
        let constant = expression.constant().and_then(|v| convert_value(v, ty));
        BoundExpression::Conversion(Rc::new(BoundConversionExpression {
            location,
            ty,
            expression,
            constant,
        }))
    }

    pub fn increment(location: TextLocation, variable: Rc<VariableSymbol>, is_increment: bool, is_prefix: bool) -> Self {
        BoundExpression::Increment(Rc::new(BoundIncrementExpression {
            location,
            variable,
            is_increment,
            is_prefix,
        }))
    }
}
