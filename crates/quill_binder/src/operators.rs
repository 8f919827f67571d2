//! Operator tables and their evaluation rules.
//!
//! The constant folder and the evaluator both go through `evaluate_unary`
//! and `evaluate_binary`, so folded and executed results always agree.

use crate::symbol::TypeSymbol;
use quill_core::value::Value;
use quill_syntax::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundUnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    OnesComplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundBinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulus,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BoundUnaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BoundUnaryOperatorKind,
    pub operand_type: TypeSymbol,
    pub ty: TypeSymbol,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BoundBinaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BoundBinaryOperatorKind,
    pub left_type: TypeSymbol,
    pub right_type: TypeSymbol,
    pub ty: TypeSymbol,
}

macro_rules! unary {
    ($syntax:ident, $kind:ident, $operand:ident) => {
        unary!($syntax, $kind, $operand, $operand)
    };
    ($syntax:ident, $kind:ident, $operand:ident, $result:ident) => {
        BoundUnaryOperator {
            syntax_kind: SyntaxKind::$syntax,
            kind: BoundUnaryOperatorKind::$kind,
            operand_type: TypeSymbol::$operand,
            ty: TypeSymbol::$result,
        }
    };
}

macro_rules! binary {
    ($syntax:ident, $kind:ident, $operand:ident) => {
        binary!($syntax, $kind, $operand, $operand)
    };
    ($syntax:ident, $kind:ident, $operand:ident, $result:ident) => {
        BoundBinaryOperator {
            syntax_kind: SyntaxKind::$syntax,
            kind: BoundBinaryOperatorKind::$kind,
            left_type: TypeSymbol::$operand,
            right_type: TypeSymbol::$operand,
            ty: TypeSymbol::$result,
        }
    };
}

static UNARY_OPERATORS: [BoundUnaryOperator; 4] = [
    unary!(BangToken, LogicalNegation, Bool),
    unary!(PlusToken, Identity, Int),
    unary!(MinusToken, Negation, Int),
    unary!(TildeToken, OnesComplement, Int),
];

static BINARY_OPERATORS: [BoundBinaryOperator; 24] = [
    binary!(PlusToken, Addition, Int),
    binary!(MinusToken, Subtraction, Int),
    binary!(StarToken, Multiplication, Int),
    binary!(SlashToken, Division, Int),
    binary!(PercentToken, Modulus, Int),
    binary!(AmpersandToken, BitwiseAnd, Int),
    binary!(PipeToken, BitwiseOr, Int),
    binary!(HatToken, BitwiseXor, Int),
    binary!(EqualsEqualsToken, Equals, Int, Bool),
    binary!(BangEqualsToken, NotEquals, Int, Bool),
    binary!(LessToken, Less, Int, Bool),
    binary!(LessOrEqualsToken, LessOrEquals, Int, Bool),
    binary!(GreaterToken, Greater, Int, Bool),
    binary!(GreaterOrEqualsToken, GreaterOrEquals, Int, Bool),
    binary!(AmpersandAmpersandToken, LogicalAnd, Bool),
    binary!(PipePipeToken, LogicalOr, Bool),
    binary!(AmpersandToken, BitwiseAnd, Bool),
    binary!(PipeToken, BitwiseOr, Bool),
    binary!(HatToken, BitwiseXor, Bool),
    binary!(EqualsEqualsToken, Equals, Bool),
    binary!(BangEqualsToken, NotEquals, Bool),
    binary!(PlusToken, Addition, String),
    binary!(EqualsEqualsToken, Equals, String, Bool),
    binary!(BangEqualsToken, NotEquals, String, Bool),
];

impl BoundUnaryOperator {
    /// Find the operator for a token applied to an operand of type `operand_type`.
    pub fn bind(syntax_kind: SyntaxKind, operand_type: TypeSymbol) -> Option<&'static BoundUnaryOperator> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.operand_type == operand_type)
    }

    pub fn all() -> &'static [BoundUnaryOperator] {
        &UNARY_OPERATORS
    }
}

impl BoundBinaryOperator {
    /// Find the operator for a token applied to operands of the given types.
    pub fn bind(syntax_kind: SyntaxKind, left_type: TypeSymbol, right_type: TypeSymbol) -> Option<&'static BoundBinaryOperator> {
        BINARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.left_type == left_type && op.right_type == right_type)
    }

    pub fn all() -> &'static [BoundBinaryOperator] {
        &BINARY_OPERATORS
    }

    /// Operator used by compiler-generated code, e.g. `for` loop increments.
    pub fn builtin(syntax_kind: SyntaxKind, operand_type: TypeSymbol) -> &'static BoundBinaryOperator {
        match Self::bind(syntax_kind, operand_type, operand_type) {
            Some(op) => op,
            None => unreachable!("no `{syntax_kind}` operator for {operand_type}"),
        }
    }
}

/// Apply a unary operator to a value. `None` when the operand has the wrong shape.
pub fn evaluate_unary(kind: BoundUnaryOperatorKind, operand: &Value) -> Option<Value> {
    match (kind, operand) {
        (BoundUnaryOperatorKind::Identity, Value::Integer(v)) => Some(Value::Integer(*v)),
        (BoundUnaryOperatorKind::Negation, Value::Integer(v)) => Some(Value::Integer(v.wrapping_neg())),
        (BoundUnaryOperatorKind::OnesComplement, Value::Integer(v)) => Some(Value::Integer(!*v)),
        (BoundUnaryOperatorKind::LogicalNegation, Value::Boolean(v)) => Some(Value::Boolean(!*v)),
        _ => None,
    }
}

/// Apply a binary operator to two values.
///
/// Integer arithmetic wraps. Division and modulus truncate toward zero and
/// yield `None` for a zero divisor, so they are never folded.
pub fn evaluate_binary(kind: BoundBinaryOperatorKind, left: &Value, right: &Value) -> Option<Value> {
    use BoundBinaryOperatorKind as K;

    let value = match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => {
            let (l, r) = (*l, *r);
            match kind {
                K::Addition => Value::Integer(l.wrapping_add(r)),
                K::Subtraction => Value::Integer(l.wrapping_sub(r)),
                K::Multiplication => Value::Integer(l.wrapping_mul(r)),
                K::Division if r == 0 => return None,
                K::Division => Value::Integer(l.wrapping_div(r)),
                K::Modulus if r == 0 => return None,
                K::Modulus => Value::Integer(l.wrapping_rem(r)),
                K::BitwiseAnd => Value::Integer(l & r),
                K::BitwiseOr => Value::Integer(l | r),
                K::BitwiseXor => Value::Integer(l ^ r),
                K::Equals => Value::Boolean(l == r),
                K::NotEquals => Value::Boolean(l != r),
                K::Less => Value::Boolean(l < r),
                K::LessOrEquals => Value::Boolean(l <= r),
                K::Greater => Value::Boolean(l > r),
                K::GreaterOrEquals => Value::Boolean(l >= r),
                K::LogicalAnd | K::LogicalOr => return None,
            }
        }
        (Value::Boolean(l), Value::Boolean(r)) => {
            let (l, r) = (*l, *r);
            match kind {
                K::LogicalAnd | K::BitwiseAnd => Value::Boolean(l & r),
                K::LogicalOr | K::BitwiseOr => Value::Boolean(l | r),
                K::BitwiseXor => Value::Boolean(l ^ r),
                K::Equals => Value::Boolean(l == r),
                K::NotEquals => Value::Boolean(l != r),
                _ => return None,
            }
        }
        (Value::String(l), Value::String(r)) => match kind {
            K::Addition => Value::String(format!("{l}{r}")),
            K::Equals => Value::Boolean(l == r),
            K::NotEquals => Value::Boolean(l != r),
            _ => return None,
        },
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        let op = BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::String, TypeSymbol::String).unwrap();
        assert_eq!(op.kind, BoundBinaryOperatorKind::Addition);
        assert_eq!(op.ty, TypeSymbol::String);
        assert!(BoundBinaryOperator::bind(SyntaxKind::MinusToken, TypeSymbol::String, TypeSymbol::String).is_none());
        assert!(BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::Int, TypeSymbol::Bool).is_none());
        assert!(BoundUnaryOperator::bind(SyntaxKind::BangToken, TypeSymbol::Int).is_none());
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        let div = |l, r| evaluate_binary(BoundBinaryOperatorKind::Division, &Value::Integer(l), &Value::Integer(r));
        let rem = |l, r| evaluate_binary(BoundBinaryOperatorKind::Modulus, &Value::Integer(l), &Value::Integer(r));
        assert_eq!(div(7, 2), Some(Value::Integer(3)));
        assert_eq!(div(-7, 2), Some(Value::Integer(-3)));
        assert_eq!(rem(-7, 2), Some(Value::Integer(-1)));
        assert_eq!(div(1, 0), None);
        assert_eq!(rem(1, 0), None);
        assert_eq!(div(i32::MIN, -1), Some(Value::Integer(i32::MIN)));
    }

    #[test]
    fn test_wrapping_arithmetic() {
        let add = evaluate_binary(BoundBinaryOperatorKind::Addition, &Value::Integer(i32::MAX), &Value::Integer(1));
        assert_eq!(add, Some(Value::Integer(i32::MIN)));
        assert_eq!(evaluate_unary(BoundUnaryOperatorKind::Negation, &Value::Integer(i32::MIN)), Some(Value::Integer(i32::MIN)));
        assert_eq!(evaluate_unary(BoundUnaryOperatorKind::OnesComplement, &Value::Integer(0)), Some(Value::Integer(-1)));
    }

    #[test]
    fn test_string_concatenation() {
        let joined = evaluate_binary(BoundBinaryOperatorKind::Addition, &Value::from("a"), &Value::from("b"));
        assert_eq!(joined, Some(Value::from("ab")));
    }
}
