//! Conversions between the built-in types.

use crate::symbol::TypeSymbol;
use quill_core::value::Value;

/// How a value of one type can become another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    None,
    Identity,
    Implicit,
    Explicit,
}

impl Conversion {
    pub fn classify(from: TypeSymbol, to: TypeSymbol) -> Conversion {
        if from == to {
            return Conversion::Identity;
        }
        match (from, to) {
            (TypeSymbol::Int | TypeSymbol::Bool, TypeSymbol::String) => Conversion::Explicit,
            (TypeSymbol::String, TypeSymbol::Int | TypeSymbol::Bool) => Conversion::Explicit,
            _ => Conversion::None,
        }
    }

    pub fn exists(self) -> bool {
        self != Conversion::None
    }

    pub fn is_identity(self) -> bool {
        self == Conversion::Identity
    }

    pub fn is_implicit(self) -> bool {
        matches!(self, Conversion::Identity | Conversion::Implicit)
    }

    pub fn is_explicit(self) -> bool {
        self == Conversion::Explicit
    }
}

/// Convert a value to `to`. `None` if the text does not parse as the target.
pub fn convert_value(value: &Value, to: TypeSymbol) -> Option<Value> {
    match (value, to) {
        (Value::Boolean(_), TypeSymbol::Bool) | (Value::Integer(_), TypeSymbol::Int) | (Value::String(_), TypeSymbol::String) => {
            Some(value.clone())
        }
        (Value::Boolean(_) | Value::Integer(_), TypeSymbol::String) => Some(Value::String(value.to_string())),
        (Value::String(text), TypeSymbol::Int) => text.trim().parse::<i32>().ok().map(Value::Integer),
        (Value::String(text), TypeSymbol::Bool) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") {
                Some(Value::Boolean(true))
            } else if text.eq_ignore_ascii_case("false") {
                Some(Value::Boolean(false))
            } else {
                None
            }
        }
        _ => None,
    }
}
