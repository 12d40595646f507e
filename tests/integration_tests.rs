//! End-to-end tests for the compile and run pipeline.
//!
//! Programs go from source text through tokenization, parsing, type checking
//! and code generation, then run on the interpreter with in-memory console I/O.

use std::{collections::HashSet, io::Cursor};

use plc::{
    bytecode::instruction::{parse_program, serialize, Instruction},
    compile_source,
    errors::errors::{ErrorImpl, RuntimeError},
    interpreter::interpreter::{Interpreter, InterpreterConfig},
    Phase,
};

type TestInterpreter = Interpreter<Cursor<Vec<u8>>, Vec<u8>>;

fn interpreter(input: &str) -> TestInterpreter {
    Interpreter::new(Cursor::new(input.as_bytes().to_vec()), vec![], InterpreterConfig::default())
}

fn run_instructions(instructions: &[Instruction], input: &str) -> String {
    let mut interpreter = interpreter(input);
    interpreter.run(instructions).unwrap();
    String::from_utf8(interpreter.into_output()).unwrap()
}

fn run_source(source: &str, input: &str) -> String {
    let instructions = compile_source(source, "test.plc").unwrap();
    run_instructions(&instructions, input)
}

#[test]
fn test_integer_assignment() {
    assert_eq!(run_source("int x; x = 3 + 4; write x;", ""), "7\n");
}

#[test]
fn test_float_widening_output() {
    assert_eq!(run_source("float y; y = 1 + 2.5; write y;", ""), "3.5\n");
}

#[test]
fn test_boolean_output_is_lowercase() {
    assert_eq!(run_source("bool b; b = 3 < 5; write b;", ""), "true\n");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(run_source(r#"string s; s = "ab" . "cd"; write s;"#, ""), "abcd\n");
}

#[test]
fn test_redeclaration_is_rejected() {
    let failure = compile_source("int x; float x;", "test.plc").unwrap_err();

    assert_eq!(failure.phase, Phase::Semantic);
    assert_eq!(failure.errors.len(), 1);
    assert!(matches!(
        failure.errors[0].get_internal_error(),
        ErrorImpl::VariableAlreadyDeclared { variable } if variable == "x"
    ));
    assert!(failure.errors[0].to_string().contains("already declared"));
}

#[test]
fn test_for_loop() {
    assert_eq!(run_source("int i; for (i=0; i<3; i=i+1) write i;", ""), "0\n1\n2\n");
    assert_eq!(run_source("for (int i = 3; i > 0; i = i - 1) write i;", ""), "3\n2\n1\n");
}

#[test]
fn test_all_semantic_errors_are_reported() {
    let failure = compile_source("int x; x = true; write y; if (1) ;", "test.plc").unwrap_err();

    assert_eq!(failure.phase, Phase::Semantic);
    let names: Vec<&str> = failure.errors.iter().map(|error| error.get_error_name()).collect();
    assert_eq!(names, ["AssignmentTypeMismatch", "VariableNotDeclared", "NonBooleanCondition"]);
}

#[test]
fn test_syntax_errors_stop_before_type_checking() {
    // `y` is undeclared, but the type checker never runs
    let failure = compile_source("int x x = 1; write y; write (1;", "test.plc").unwrap_err();

    assert_eq!(failure.phase, Phase::Syntax);
    assert_eq!(failure.errors.len(), 2);
}

#[test]
fn test_unrecognised_character_is_a_syntax_error() {
    let failure = compile_source("int x; x = 1 # 2;", "test.plc").unwrap_err();

    assert_eq!(failure.phase, Phase::Syntax);

    let failure = compile_source("int x @ ; float y # ;", "test.plc").unwrap_err();
    assert_eq!(failure.phase, Phase::Syntax);
    assert_eq!(failure.errors.len(), 2);
}

#[test]
fn test_widening_after_multi_instruction_operand() {
    // Integer division happens before the conversion
    assert_eq!(run_source("write 10 / 4 + 0.5;", ""), "2.5\n");
    assert_eq!(run_source("write 0.5 + 10 / 4;", ""), "2.5\n");
    assert_eq!(run_source("float f; f = (2 + 3) * 1.5; write f;", ""), "7.5\n");
    assert_eq!(run_source("int i; i = 7; write i % 4 < 3.5, 1.5 == i - 5.5;", ""), "truetrue\n");
}

#[test]
fn test_conversion_only_touches_int_operand() {
    let instructions = compile_source("int i; write (i + 1) * 2.5;", "test.plc").unwrap();

    let conversions = instructions.iter().filter(|instruction| **instruction == Instruction::Itof).count();
    assert_eq!(conversions, 1);

    let itof = instructions.iter().position(|instruction| *instruction == Instruction::Itof).unwrap();
    assert!(matches!(instructions[itof - 1], Instruction::Add(_)));
}

#[test]
fn test_logical_operators_do_not_short_circuit() {
    let source = "bool a; bool b; bool c; a = false && (b = true); a = true || (c = true); write a, b, c;";

    assert_eq!(run_source(source, ""), "truetruetrue\n");
}

#[test]
fn test_stack_balance_per_statement() {
    let prelude = "int x; float f; bool b; string s;";
    let cases = [
        ("", 0),
        (";", 0),
        ("x = 1;", 0),
        ("x = 1 + 2;", 0),
        ("f = x = 2;", 0),
        ("1 + 2;", 1),
        ("x;", 1),
        (r#""a" . "b";"#, 1),
        ("write x, f, b;", 0),
        ("read x, s;", 0),
        ("{ x = 1; write x; }", 0),
        ("if (x < 1) x = 2; else write x;", 0),
        ("if (true) ;", 0),
        ("while (x < 3) x = x + 1;", 0),
        ("for (x = 0; x < 3; x = x + 1) write x;", 0),
        ("for (int i = 0; i < 3; i = i + 1) ;", 0),
        ("for (x; x < 3; x + 1) x = x + 1;", 0),
    ];

    for (statement, delta) in cases {
        let source = format!("{} {}", prelude, statement);
        let instructions = compile_source(&source, "test.plc").unwrap();

        let mut interpreter = interpreter("4\nhello\n");
        interpreter.run(&instructions).unwrap();
        assert_eq!(interpreter.stack().len(), delta, "stack delta of {:?}", statement);
    }
}

#[test]
fn test_labels_are_unique_and_resolved() {
    let source = r#"
        int i; int j;
        for (i = 0; i < 3; i = i + 1) {
            while (j < i) { if (j == 1) write "one"; j = j + 1; }
            if (i > 1) write "big"; else if (i > 0) write "mid"; else write "small";
        }
    "#;
    let instructions = compile_source(source, "test.plc").unwrap();

    let mut labels = HashSet::new();
    for instruction in &instructions {
        if let Instruction::Label(label) = instruction {
            assert!(labels.insert(*label), "label {} allocated twice", label);
        }
    }
    for instruction in &instructions {
        if let Some(target) = instruction.jump_target() {
            assert!(labels.contains(&target), "jump to missing label {}", target);
        }
    }

    assert_eq!(run_instructions(&instructions, ""), "small\nmid\none\nbig\n");
}

#[test]
fn test_round_trip_through_text() {
    let programs = [
        ("int x; x = 3 + 4; write x;", ""),
        ("float y; y = 1 + 2.5; write y / 3;", ""),
        (r#"string s; s = "tab\tquote\" line\nbreak \\ end"; write s, s . "!";"#, ""),
        ("int i; for (i = 0; i < 4; i = i + 1) if (i % 2 == 0) write i; else write -i;", ""),
        ("int a; float b; bool c; string d; read a, b, c, d; write a * 2, b, !c, d;", "21\n0.5\nTRUE\n text \n"),
        ("1 + 2; write 2147483647 + 1;", ""),
    ];

    for (source, input) in programs {
        let instructions = compile_source(source, "test.plc").unwrap();
        let reloaded = parse_program(&serialize(&instructions));

        assert_eq!(reloaded, instructions, "{:?}", source);
        assert_eq!(run_instructions(&reloaded, input), run_instructions(&instructions, input));
    }
}

#[test]
fn test_read_with_bad_input_uses_zero_values() {
    let source = "int a; float b; bool c; read a, b, c; write a, b, c;";

    assert_eq!(run_source(source, "12\n2.5\ntrue\n"), "122.5true\n");
    assert_eq!(run_source(source, "twelve\n\nno\n"), "00.0false\n");
    assert_eq!(run_source(source, ""), "00.0false\n");
}

#[test]
fn test_division_by_zero_is_a_runtime_fault() {
    let instructions = compile_source("int x; write 1; x = 1 / 0; write 2;", "test.plc").unwrap();

    let mut interpreter = interpreter("");
    let error = interpreter.run(&instructions).unwrap_err();

    assert!(matches!(error, RuntimeError::DivisionByZero { .. }));
    // Output before the fault is kept
    assert_eq!(interpreter.output(), b"1\n");
}

#[test]
fn test_smallest_int_literal() {
    assert_eq!(run_source("int x; x = -2147483648; write x, \" \", -x, \" \", x - 1;", ""), "-2147483648 -2147483648 2147483647\n");
}

#[test]
fn test_float_print_rounds_ties_away_from_zero() {
    assert_eq!(run_source(r#"write 0.25, " ", 2.25, " ", 0.75, " ", 0.05, " ", -0.75;"#, ""), "0.3 2.3 0.8 0.1 -0.8\n");
}

#[test]
fn test_float_division_by_zero_follows_ieee() {
    assert_eq!(run_source("write 1.0 / 0.0, -1 / 0.0;", ""), "inf-inf\n");
}

#[test]
fn test_strict_labels_on_hand_written_bytecode() {
    let text = "push I 1\njmp 7\nprint 1";

    let mut lenient = interpreter("");
    lenient.run_text(text).unwrap();
    assert_eq!(lenient.output(), b"1\n");

    let mut strict = Interpreter::new(Cursor::new(vec![]), vec![], InterpreterConfig { strict_labels: true });
    assert!(matches!(strict.run_text(text), Err(RuntimeError::UnresolvedLabel { label: 7, ip: 1 })));
}
