//! Operator precedence for binary and unary operators.

use quill_syntax::SyntaxKind;

/// Operator precedence levels. Higher binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    // Ranges from lowest to highest
    Lowest = 0,
    /// `|`, `||`, `^`
    LogicalOr = 1,
    /// `&`, `&&`
    LogicalAnd = 2,
    /// `==`, `!=`, `<`, `<=`, `>`, `>=`
    Comparison = 3,
    /// `+`, `-`
    Additive = 4,
    /// `*`, `/`, `%`
    Multiplicative = 5,
    /// Prefix `+`, `-`, `!`, `~`
    Unary = 6,
}

/// Get the unary operator precedence for a given token kind.
pub fn unary_operator_precedence(kind: SyntaxKind) -> Option<OperatorPrecedence> {
    match kind {
        SyntaxKind::PlusToken | SyntaxKind::MinusToken | SyntaxKind::BangToken | SyntaxKind::TildeToken => {
            Some(OperatorPrecedence::Unary)
        }
        _ => None,
    }
}

/// Get the binary operator precedence for a given token kind.
pub fn binary_operator_precedence(kind: SyntaxKind) -> Option<OperatorPrecedence> {
    match kind {
        SyntaxKind::StarToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            Some(OperatorPrecedence::Multiplicative)
        }
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => Some(OperatorPrecedence::Additive),
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::BangEqualsToken
        | SyntaxKind::LessToken
        | SyntaxKind::LessOrEqualsToken
        | SyntaxKind::GreaterToken
        | SyntaxKind::GreaterOrEqualsToken => Some(OperatorPrecedence::Comparison),
        SyntaxKind::AmpersandToken | SyntaxKind::AmpersandAmpersandToken => Some(OperatorPrecedence::LogicalAnd),
        SyntaxKind::PipeToken | SyntaxKind::PipePipeToken | SyntaxKind::HatToken => {
            Some(OperatorPrecedence::LogicalOr)
        }
        _ => None,
    }
}

/// All token kinds usable as unary operators.
pub fn unary_operator_kinds() -> impl Iterator<Item = SyntaxKind> {
    SyntaxKind::ALL.iter().copied().filter(|k| unary_operator_precedence(*k).is_some())
}

/// All token kinds usable as binary operators.
pub fn binary_operator_kinds() -> impl Iterator<Item = SyntaxKind> {
    SyntaxKind::ALL.iter().copied().filter(|k| binary_operator_precedence(*k).is_some())
}
