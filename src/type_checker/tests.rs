use std::rc::Rc;

use crate::{errors::errors::Error, lexer::lexer::tokenize, parser::parser::parse};

use super::type_checker::type_check;

fn check(source: &str) -> Vec<Error> {
    let tokens = tokenize(source.to_string(), Some("test.plc".to_string())).unwrap();
    let (_, program) = parse(tokens, Rc::new("test.plc".to_string()));
    type_check(&program.unwrap())
}

fn error_names(source: &str) -> Vec<String> {
    check(source).iter().map(|error| error.get_error_name().to_string()).collect()
}

#[test]
fn test_well_typed_program() {
    let source = r#"
        int i; float f; bool b; string s;
        i = 3 + 4;
        f = 1 + 2.5;
        f = i;
        b = 3 < 5 && !false;
        s = "ab" . "cd";
        i = i % 2;
        b = s == "abcd" || 1.5 != f;
        b = i > f;
        f = -f;
        read i, f, b, s;
        write i, f, b, s;
        if (b) write 1; else write 2;
        while (i < 10) i = i + 1;
    "#;

    assert!(check(source).is_empty());
}

#[test]
fn test_redeclaration() {
    let errors = check("int x; float x;");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "VariableAlreadyDeclared");
    assert_eq!(errors[0].get_position().column, 13);
    assert!(errors[0].to_string().contains("already declared"));
}

#[test]
fn test_redeclaration_within_one_declaration() {
    assert_eq!(error_names("int a, b, a;"), vec!["VariableAlreadyDeclared"]);
}

#[test]
fn test_use_before_declaration() {
    assert_eq!(error_names("write x; int x;"), vec!["VariableNotDeclared"]);
    assert_eq!(error_names("x = 1;"), vec!["VariableNotDeclared"]);
    assert_eq!(error_names("read y;"), vec!["VariableNotDeclared"]);
}

#[test]
fn test_assignment_widening_is_one_way() {
    assert!(check("float f; f = 1;").is_empty());
    assert_eq!(error_names("int i; i = 1.5;"), vec!["AssignmentTypeMismatch"]);
    assert_eq!(error_names("string s; s = 1;"), vec!["AssignmentTypeMismatch"]);
    assert_eq!(error_names("bool b; b = 0;"), vec!["AssignmentTypeMismatch"]);
}

#[test]
fn test_assignment_result_is_target_type() {
    // `f = 1` types to float, so it cannot be stored into an int
    assert_eq!(
        error_names("int i; float f; i = f = 1;"),
        vec!["AssignmentTypeMismatch"]
    );
}

#[test]
fn test_arithmetic_rejects_non_numeric() {
    assert_eq!(error_names(r#"write "a" + 1;"#), vec!["OperatorTypeMismatch"]);
    assert_eq!(error_names("write true * 2;"), vec!["OperatorTypeMismatch"]);
}

#[test]
fn test_concat_requires_strings() {
    assert_eq!(error_names(r#"write "a" . 1;"#), vec!["OperatorTypeMismatch"]);
    assert_eq!(error_names("write 1 . 2;"), vec!["OperatorTypeMismatch"]);
}

#[test]
fn test_modulo_requires_integers() {
    assert!(check("write 7 % 2;").is_empty());
    assert_eq!(error_names("write 7.0 % 2;"), vec!["ModuloRequiresIntegers"]);
}

#[test]
fn test_comparison_requires_numbers() {
    assert!(check("write 1 < 2.5;").is_empty());
    assert_eq!(error_names(r#"write "a" < "b";"#), vec!["ComparisonTypeMismatch"]);
}

#[test]
fn test_equality_requires_same_non_bool_type() {
    assert!(check(r#"write "a" == "b";"#).is_empty());
    assert_eq!(error_names("write 1 == 1.0;"), vec!["EqualityTypeMismatch"]);
    assert_eq!(error_names("write true == false;"), vec!["EqualityTypeMismatch"]);
}

#[test]
fn test_logical_requires_bools() {
    assert_eq!(error_names("write true && 1;"), vec!["LogicalOperandMismatch"]);
    assert_eq!(error_names("write 0 || false;"), vec!["LogicalOperandMismatch"]);
}

#[test]
fn test_unary_operators() {
    assert!(check("write -1, -2.5, !true;").is_empty());
    assert_eq!(error_names("write -true;"), vec!["UnaryTypeMismatch"]);
    assert_eq!(error_names("write !1;"), vec!["UnaryTypeMismatch"]);
}

#[test]
fn test_non_boolean_conditions() {
    let errors = check("int i; if (i) ; while (1.5) ; for (i = 0; i; i = i + 1) ;");

    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|error| error.get_error_name() == "NonBooleanCondition"));
    assert!(errors[0].to_string().contains("'if'"));
    assert!(errors[1].to_string().contains("'while'"));
    assert!(errors[2].to_string().contains("'for'"));
}

#[test]
fn test_bodies_checked_after_bad_condition() {
    assert_eq!(
        error_names("if (1) write x; else write y;"),
        vec!["NonBooleanCondition", "VariableNotDeclared", "VariableNotDeclared"]
    );
}

#[test]
fn test_for_declares_induction_variable() {
    assert!(check("for (int i = 0; i < 3; i = i + 1) write i;").is_empty());
    assert_eq!(
        error_names("int i; for (int i = 0; i < 3; i = i + 1) ;"),
        vec!["VariableAlreadyDeclared"]
    );
}

#[test]
fn test_induction_variable_stays_declared_after_loop() {
    assert_eq!(
        error_names("for (int i = 0; i < 3; i = i + 1) ; int i;"),
        vec!["VariableAlreadyDeclared"]
    );
}

#[test]
fn test_errors_do_not_cascade() {
    // One undeclared operand deep inside an expression yields one error
    assert_eq!(error_names("int i; i = (x + 1) * 2 - 3;"), vec!["VariableNotDeclared"]);
    assert_eq!(error_names("bool b; b = !(1 + true) && b;"), vec!["OperatorTypeMismatch"]);
}

#[test]
fn test_all_errors_collected() {
    let source = "int x; float x; y = 1; write 1 + true; if (2) ;";

    assert_eq!(check(source).len(), 4);
}
