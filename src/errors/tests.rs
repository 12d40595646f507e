//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip, RuntimeError};
use crate::Position;
use std::rc::Rc;

fn position(line: u32, column: u32) -> Position {
    Position::new(0, line, column, Rc::new("test.plc".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(1, 0),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        position(3, 7),
    );

    assert_eq!(error.get_position().line, 3);
    assert_eq!(error.get_position().column, 7);
}

#[test]
fn test_display_includes_line_and_column() {
    let error = Error::new(
        ErrorImpl::VariableAlreadyDeclared {
            variable: "x".to_string(),
        },
        position(1, 13),
    );

    assert_eq!(
        error.to_string(),
        "[Line 1, Pos 13] variable 'x' is already declared"
    );
}

#[test]
fn test_assignment_mismatch_message() {
    let error = Error::new(
        ErrorImpl::AssignmentTypeMismatch {
            variable: "i".to_string(),
            expected: "int".to_string(),
            received: "float".to_string(),
        },
        position(2, 0),
    );

    assert_eq!(error.get_error_name(), "AssignmentTypeMismatch");
    assert_eq!(
        error.to_string(),
        "[Line 2, Pos 0] cannot assign type 'float' to variable 'i' of type 'int'"
    );
}

#[test]
fn test_condition_message_names_construct() {
    let error = Error::new(
        ErrorImpl::NonBooleanCondition {
            construct: "while".to_string(),
            received: "int".to_string(),
        },
        position(4, 0),
    );

    assert!(error.to_string().contains("condition in 'while' must be of type bool, got 'int'"));
}

#[test]
fn test_variable_not_declared_error() {
    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "foo".to_string(),
        },
        position(1, 0),
    );

    assert_eq!(error.get_error_name(), "VariableNotDeclared");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("foo")),
        ErrorTip::None => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(1, 0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_concat_tip_differs_from_arithmetic_tip() {
    let concat = Error::new(
        ErrorImpl::OperatorTypeMismatch {
            operator: ".".to_string(),
            left: "int".to_string(),
            right: "string".to_string(),
        },
        position(1, 0),
    );
    let plus = Error::new(
        ErrorImpl::OperatorTypeMismatch {
            operator: "+".to_string(),
            left: "bool".to_string(),
            right: "int".to_string(),
        },
        position(1, 0),
    );

    assert_ne!(concat.get_tip().to_string(), plus.get_tip().to_string());
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_runtime_error_reports_ip() {
    let error = RuntimeError::DivisionByZero {
        instruction: "div I".to_string(),
        ip: 5,
    };

    assert_eq!(error.get_ip(), Some(5));
    assert_eq!(
        error.to_string(),
        "division by zero executing `div I` at instruction 5"
    );
}

#[test]
fn test_runtime_io_error_has_no_ip() {
    let error = RuntimeError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));

    assert_eq!(error.get_ip(), None);
}
