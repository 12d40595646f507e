use std::fmt::Display;

use crate::ast::types::Literals;

/// A tagged scalar on the operand stack or in the variable store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// The zero-value a declaration materialises for `literal`.
    pub fn default_for(literal: Literals) -> Self {
        match literal {
            Literals::Int => Value::Int(0),
            Literals::Float => Value::Float(0.0),
            Literals::Bool => Value::Bool(false),
            Literals::String => Value::Str(String::new()),
        }
    }

    /// Parses console input the way `read` does. Input is trimmed and
    /// anything unparsable becomes the zero-value.
    pub fn parse_input(literal: Literals, input: &str) -> Self {
        let input = input.trim();
        match literal {
            Literals::Int => input.parse().map(Value::Int).unwrap_or(Value::Int(0)),
            Literals::Float => input.parse().map(Value::Float).unwrap_or(Value::Float(0.0)),
            Literals::Bool => Value::Bool(input.eq_ignore_ascii_case("true")),
            Literals::String => Value::Str(input.to_string()),
        }
    }

    pub fn literal(&self) -> Literals {
        match self {
            Value::Int(_) => Literals::Int,
            Value::Float(_) => Literals::Float,
            Value::Bool(_) => Literals::Bool,
            Value::Str(_) => Literals::String,
        }
    }
}

/// Rounds to one fractional digit with ties away from zero. Magnitudes too
/// large to scale are already whole and are returned unchanged.
fn round_half_away(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }
    (value * 10.0).round() / 10.0
}

/// The form `print` writes: floats with one fractional digit, booleans
/// in lowercase.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:.1}", round_half_away(*value)),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "{}", value),
        }
    }
}
