#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc, time::Instant};

use tracing::info;

use crate::{
    ast::statements::ProgramStmt,
    bytecode::instruction::Instruction,
    compiler::compiler::compile,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A location in a source file.
///
/// `offset` is a byte offset, `line` is 1-based and `column` is 0-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32, file: Rc<String>) -> Self {
        Position { offset, line, column, file }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}, Pos {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// The phase that rejected a program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Syntax,
    Semantic,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Syntax => write!(f, "syntax"),
            Phase::Semantic => write!(f, "type"),
        }
    }
}

/// Diagnostics from the first phase that reported any.
#[derive(Debug, Clone)]
pub struct CompileErrors {
    pub phase: Phase,
    pub errors: Vec<Error>,
}

/// Runs the front end and returns the syntax tree, or every syntax error found.
pub fn parse_source(source: &str, file_name: &str) -> Result<ProgramStmt, Vec<Error>> {
    let start = Instant::now();
    let tokens = tokenize(source.to_string(), Some(String::from(file_name)))?;
    info!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let (_, ast) = parse(tokens, Rc::new(String::from(file_name)));
    info!(elapsed = ?parse_start.elapsed(), "parsed");

    ast
}

/// Parses, type checks and compiles a program.
///
/// Code generation only runs once both earlier phases reported nothing.
pub fn compile_source(source: &str, file_name: &str) -> Result<Vec<Instruction>, CompileErrors> {
    let ast = parse_source(source, file_name).map_err(|errors| CompileErrors {
        phase: Phase::Syntax,
        errors,
    })?;

    let type_check_start = Instant::now();
    let errors = type_check(&ast);
    info!(errors = errors.len(), elapsed = ?type_check_start.elapsed(), "type checked");

    if !errors.is_empty() {
        return Err(CompileErrors {
            phase: Phase::Semantic,
            errors,
        });
    }

    let compile_start = Instant::now();
    let instructions = compile(&ast).map_err(|error| CompileErrors {
        phase: Phase::Semantic,
        errors: vec![error],
    })?;
    info!(instructions = instructions.len(), elapsed = ?compile_start.elapsed(), "compiled");

    Ok(instructions)
}

/// Returns the 1-based line number, the text of the line and the offset of
/// `position` inside that line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // End of input sits just past the last line
    source
        .split_inclusive('\n')
        .last()
        .map(|line| (line_number - 1, line.to_string(), line.len()))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Error, ErrorImpl},
        Position,
    };

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nsecond\nthird line\nTesting { }\n";

        let (line_number, line, line_pos) = super::get_line_at_position(source, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(source, 40).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(source, 1000).is_none());
    }

    #[test]
    fn test_render_error_points_at_column() {
        let source = "int x;\n  float x;\n";
        let error = Error::new(
            ErrorImpl::VariableAlreadyDeclared { variable: String::from("x") },
            Position::new(15, 2, 8, Rc::new(String::from("main.plc"))),
        );

        let rendered = super::render_error(&error, source);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].starts_with("Error: [Line 2, Pos 8] variable 'x' is already declared"));
        assert_eq!(lines[1], "-> main.plc");
        assert_eq!(lines[3], "2 | float x;");
        assert!(lines[4].ends_with("------^"));
    }
}

/// Renders a diagnostic with the offending line and a caret under the column.
pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: [Line 2, Pos 6] message
        -> main.plc
          |
        2 | float x;
          | ------^
    */

    let position = error.get_position();
    let mut rendered = String::new();

    rendered.push_str(&format!("Error: {}", error));
    if let ErrorTip::Suggestion(tip) = error.get_tip() {
        rendered.push_str(&format!(" ({})", tip));
    }
    rendered.push('\n');
    rendered.push_str(&format!("-> {}\n", position.file));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return rendered;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    rendered.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    rendered.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    rendered.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    rendered
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
