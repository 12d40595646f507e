use std::io::Cursor;

use crate::{
    ast::types::Literals,
    bytecode::{instruction::Instruction, value::Value},
    errors::errors::RuntimeError,
};

use super::interpreter::{resolve_labels, Interpreter, InterpreterConfig};

type TestInterpreter = Interpreter<Cursor<Vec<u8>>, Vec<u8>>;

fn interpreter(input: &str) -> TestInterpreter {
    Interpreter::new(Cursor::new(input.as_bytes().to_vec()), vec![], InterpreterConfig::default())
}

fn run_text(text: &str, input: &str) -> (TestInterpreter, Result<(), RuntimeError>) {
    let mut interpreter = interpreter(input);
    let result = interpreter.run_text(text);
    (interpreter, result)
}

fn output_of(text: &str, input: &str) -> String {
    let (interpreter, result) = run_text(text, input);
    result.unwrap();
    String::from_utf8(interpreter.into_output()).unwrap()
}

#[test]
fn test_resolve_labels() {
    let instructions = vec![
        Instruction::Label(3),
        Instruction::Nop,
        Instruction::Label(1),
        Instruction::Label(2),
    ];
    let labels = resolve_labels(&instructions);

    assert_eq!(labels.get(&3), Some(&0));
    assert_eq!(labels.get(&1), Some(&2));
    assert_eq!(labels.get(&2), Some(&3));
    assert_eq!(labels.get(&0), None);
}

#[test]
fn test_integer_arithmetic() {
    assert_eq!(output_of("push I 7\npush I 2\nsub I\nprint 1", ""), "5\n");
    assert_eq!(output_of("push I 7\npush I 2\ndiv I\nprint 1", ""), "3\n");
    assert_eq!(output_of("push I -7\npush I 2\ndiv I\nprint 1", ""), "-3\n");
    assert_eq!(output_of("push I 7\npush I 3\nmod\nprint 1", ""), "1\n");
    assert_eq!(output_of("push I 6\npush I 7\nmul I\numinus I\nprint 1", ""), "-42\n");
}

#[test]
fn test_integer_overflow_wraps() {
    assert_eq!(output_of("push I 2147483647\npush I 1\nadd I\nprint 1", ""), "-2147483648\n");
}

#[test]
fn test_float_arithmetic() {
    assert_eq!(output_of("push F 1.0\npush F 8.0\ndiv F\nprint 1", ""), "0.1\n");
    assert_eq!(output_of("push I 3\nitof\npush F 0.5\nadd F\nprint 1", ""), "3.5\n");
    assert_eq!(output_of("push F 1.0\npush F 0.0\ndiv F\nprint 1", ""), "inf\n");
}

#[test]
fn test_print_keeps_push_order() {
    assert_eq!(
        output_of("push S \"x=\"\npush I 1\npush B false\npush F 2.5\nprint 4", ""),
        "x=1false2.5\n"
    );
}

#[test]
fn test_comparisons_and_logic() {
    assert_eq!(output_of("push I 1\npush I 2\nlt I\nprint 1", ""), "true\n");
    assert_eq!(output_of("push F 1.5\npush F 2.5\ngt F\nprint 1", ""), "false\n");
    assert_eq!(output_of("push B true\npush B false\nand\nprint 1", ""), "false\n");
    assert_eq!(output_of("push B true\npush B false\nor\nnot\nprint 1", ""), "false\n");
    assert_eq!(output_of("push S \"a\"\npush S \"a\"\neq S\nprint 1", ""), "true\n");
    assert_eq!(output_of("push B true\npush B true\neq B\nprint 1", ""), "true\n");
}

#[test]
fn test_concat() {
    assert_eq!(output_of("push S \"ab\"\npush S \"cd\"\nconcat\nprint 1", ""), "abcd\n");
}

#[test]
fn test_variables() {
    assert_eq!(output_of("push I 5\nsave x\nload x\nload x\nadd I\nprint 1", ""), "10\n");
    // Never saved loads as int zero
    assert_eq!(output_of("load missing\nprint 1", ""), "0\n");
}

#[test]
fn test_pop_on_empty_stack_is_ignored() {
    let (interpreter, result) = run_text("pop\npop\npush I 1", "");

    assert!(result.is_ok());
    assert_eq!(interpreter.stack(), &[Value::Int(1)]);
}

#[test]
fn test_jumps() {
    let text = "push I 0\nsave i\nlabel 0\nload i\npush I 3\nlt I\nfjmp 1\nload i\nprint 1\nload i\npush I 1\nadd I\nsave i\njmp 0\nlabel 1";

    assert_eq!(output_of(text, ""), "0\n1\n2\n");
}

#[test]
fn test_fjmp_falls_through_on_true() {
    assert_eq!(output_of("push B true\nfjmp 0\npush I 1\nprint 1\nlabel 0", ""), "1\n");
}

#[test]
fn test_unresolved_jump_is_ignored_by_default() {
    assert_eq!(output_of("jmp 9\npush I 1\nprint 1", ""), "1\n");
}

#[test]
fn test_unresolved_jump_is_fatal_when_strict() {
    let mut interpreter = Interpreter::new(
        Cursor::new(vec![]),
        vec![],
        InterpreterConfig { strict_labels: true },
    );
    let error = interpreter.run(&[Instruction::Jmp(9)]).unwrap_err();

    assert!(matches!(error, RuntimeError::UnresolvedLabel { label: 9, ip: 0 }));
}

#[test]
fn test_read_values() {
    let text = "read I\nread F\nread B\nread S\nprint 4";

    assert_eq!(output_of(text, "12\n2.5\nTrue\n  hi there \n"), "122.5truehi there\n");
}

#[test]
fn test_read_bad_input_and_eof_give_zero_values() {
    assert_eq!(output_of("read I\nread F\nread B\nprint 3", "abc\n"), "00.0false\n");
}

#[test]
fn test_division_by_zero_is_fatal() {
    let (_, result) = run_text("push I 1\npush I 0\ndiv I", "");
    let error = result.unwrap_err();

    assert!(matches!(error, RuntimeError::DivisionByZero { ip: 2, .. }));
    assert!(error.to_string().contains("div I"));

    let (_, result) = run_text("push I 1\npush I 0\nmod", "");
    assert!(matches!(result, Err(RuntimeError::DivisionByZero { ip: 2, .. })));
}

#[test]
fn test_stack_underflow_is_fatal() {
    for text in ["add I", "push I 1\nadd I", "print 1", "fjmp 0", "save x", "not", "concat"] {
        let (_, result) = run_text(text, "");
        assert!(
            matches!(result, Err(RuntimeError::StackUnderflow { .. })),
            "expected underflow for {:?}",
            text
        );
    }
}

#[test]
fn test_wrong_variant_is_fatal() {
    let (_, result) = run_text("push I 1\npush F 1.0\nadd I", "");
    let error = result.unwrap_err();

    assert!(matches!(error, RuntimeError::TypeMismatch { ip: 2, .. }));
    assert_eq!(error.get_ip(), Some(2));

    let (_, result) = run_text("push I 1\nnot", "");
    assert!(matches!(result, Err(RuntimeError::TypeMismatch { .. })));

    let (_, result) = run_text("push F 1.5\nitof", "");
    assert!(matches!(result, Err(RuntimeError::TypeMismatch { .. })));
}

#[test]
fn test_unrecognised_lines_are_skipped() {
    assert_eq!(output_of("push I 4\n\nhalt\n   \nprint 1", ""), "4\n");
}

#[test]
fn test_each_run_starts_fresh() {
    let mut interpreter = interpreter("");
    interpreter.run(&[Instruction::Push(Value::Int(1)), Instruction::Save(String::from("x"))]).unwrap();
    assert_eq!(interpreter.variable("x"), Some(&Value::Int(1)));

    interpreter.run(&[Instruction::Push(Value::Int(2))]).unwrap();
    assert_eq!(interpreter.variable("x"), None);
    assert_eq!(interpreter.stack(), &[Value::Int(2)]);
}

#[test]
fn test_eq_int_compares_values() {
    let instructions = [
        Instruction::Push(Value::Int(3)),
        Instruction::Push(Value::Int(3)),
        Instruction::Eq(Literals::Int),
    ];
    let mut interpreter = interpreter("");
    interpreter.run(&instructions).unwrap();

    assert_eq!(interpreter.stack(), &[Value::Bool(true)]);
}
