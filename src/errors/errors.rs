use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A diagnostic from the front end or the type checker, tied to a source position.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{position}] {internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::AssignmentTypeMismatch { .. } => "AssignmentTypeMismatch",
            ErrorImpl::OperatorTypeMismatch { .. } => "OperatorTypeMismatch",
            ErrorImpl::ModuloRequiresIntegers { .. } => "ModuloRequiresIntegers",
            ErrorImpl::ComparisonTypeMismatch { .. } => "ComparisonTypeMismatch",
            ErrorImpl::EqualityTypeMismatch { .. } => "EqualityTypeMismatch",
            ErrorImpl::LogicalOperandMismatch { .. } => "LogicalOperandMismatch",
            ErrorImpl::UnaryTypeMismatch { .. } => "UnaryTypeMismatch",
            ErrorImpl::NonBooleanCondition { .. } => "NonBooleanCondition",
            ErrorImpl::MalformedTree { .. } => "MalformedTree",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { .. } => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::UnexpectedTokenDetailed { .. } => ErrorTip::None,
            ErrorImpl::NumberParseError { .. } => {
                ErrorTip::Suggestion(String::from("is it above the integer limit?"))
            }
            ErrorImpl::VariableAlreadyDeclared { .. } => ErrorTip::None,
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("declare `{}` before using it", variable))
            }
            ErrorImpl::AssignmentTypeMismatch { expected, .. } => {
                if expected == "float" {
                    ErrorTip::Suggestion(String::from("only `int` widens to `float` implicitly"))
                } else {
                    ErrorTip::None
                }
            }
            ErrorImpl::OperatorTypeMismatch { operator, .. } => {
                if operator == "." {
                    ErrorTip::Suggestion(String::from("`.` concatenates two strings"))
                } else {
                    ErrorTip::Suggestion(format!("`{}` expects int or float operands", operator))
                }
            }
            ErrorImpl::ModuloRequiresIntegers { .. } => ErrorTip::None,
            ErrorImpl::ComparisonTypeMismatch { .. } => ErrorTip::None,
            ErrorImpl::EqualityTypeMismatch { .. } => ErrorTip::Suggestion(String::from(
                "both sides must be the same type: int, float or string",
            )),
            ErrorImpl::LogicalOperandMismatch { .. } => ErrorTip::None,
            ErrorImpl::UnaryTypeMismatch { .. } => ErrorTip::None,
            ErrorImpl::NonBooleanCondition { .. } => ErrorTip::None,
            ErrorImpl::MalformedTree { .. } => ErrorTip::Suggestion(String::from(
                "the syntax tree does not match the grammar, this is a bug in the front end",
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("variable '{variable}' is already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable '{variable}' is not declared")]
    VariableNotDeclared { variable: String },
    #[error("cannot assign type '{received}' to variable '{variable}' of type '{expected}'")]
    AssignmentTypeMismatch {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("operator '{operator}' not supported for types '{left}' and '{right}'")]
    OperatorTypeMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("modulo '%' is only valid for integers, got '{left}' and '{right}'")]
    ModuloRequiresIntegers { left: String, right: String },
    #[error("comparison '{operator}' not valid for types '{left}' and '{right}'")]
    ComparisonTypeMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("equality operator '{operator}' not valid between '{left}' and '{right}'")]
    EqualityTypeMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("logical '{operator}' requires boolean operands, got '{left}' and '{right}'")]
    LogicalOperandMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("unary operator '{operator}' not applicable to type '{operand}'")]
    UnaryTypeMismatch { operator: String, operand: String },
    #[error("condition in '{construct}' must be of type bool, got '{received}'")]
    NonBooleanCondition { construct: String, received: String },
    #[error("malformed syntax tree: expected {expected}")]
    MalformedTree { expected: String },
}

/// A fatal fault raised while executing bytecode.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("stack underflow executing `{instruction}` at instruction {ip}")]
    StackUnderflow { instruction: String, ip: usize },
    #[error("division by zero executing `{instruction}` at instruction {ip}")]
    DivisionByZero { instruction: String, ip: usize },
    #[error("type mismatch executing `{instruction}` at instruction {ip}: expected {expected}, found {found}")]
    TypeMismatch {
        instruction: String,
        expected: String,
        found: String,
        ip: usize,
    },
    #[error("jump to unresolved label {label} at instruction {ip}")]
    UnresolvedLabel { label: u32, ip: usize },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Position of the faulting instruction, when there is one.
    pub fn get_ip(&self) -> Option<usize> {
        match self {
            RuntimeError::StackUnderflow { ip, .. }
            | RuntimeError::DivisionByZero { ip, .. }
            | RuntimeError::TypeMismatch { ip, .. }
            | RuntimeError::UnresolvedLabel { ip, .. } => Some(*ip),
            RuntimeError::Io(_) => None,
        }
    }
}
