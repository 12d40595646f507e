use std::fmt::Display;

use tracing::debug;

use crate::ast::types::Literals;

use super::value::Value;

/// One stack machine instruction.
///
/// Stack effects use `[..., operands] -> [..., results]`. Binary operators
/// pop the right operand first.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `[...] -> [..., value]`
    Push(Value),
    /// `[..., value] -> [...]`, nothing happens on an empty stack
    Pop,
    /// `[...] -> [..., variable]`
    Load(String),
    /// `[..., value] -> [...]`, binds the variable
    Save(String),
    Add(Literals),
    Sub(Literals),
    Mul(Literals),
    Div(Literals),
    /// Integer remainder, untyped
    Mod,
    UMinus(Literals),
    Concat,
    And,
    Or,
    Not,
    Gt(Literals),
    Lt(Literals),
    /// `B` selects plain value equality
    Eq(Literals),
    /// `[..., int] -> [..., float]`
    Itof,
    /// Pops `n` values and prints them on one line
    Print(usize),
    Read(Literals),
    Jmp(u32),
    /// Pops a bool, jumps when it is false
    Fjmp(u32),
    Label(u32),
    /// Blank or unrecognised line
    Nop,
}

impl Instruction {
    /// Whether this instruction transfers control to a label.
    pub fn jump_target(&self) -> Option<u32> {
        match self {
            Instruction::Jmp(label) | Instruction::Fjmp(label) => Some(*label),
            _ => None,
        }
    }

    /// Reads one line of bytecode text, `None` when it is malformed.
    pub fn parse_line(line: &str) -> Option<Instruction> {
        let line = line.trim();
        if line.is_empty() {
            return Some(Instruction::Nop);
        }

        let (mnemonic, rest) = split_word(line);
        let (operand, _) = split_word(rest);
        let tag = Literals::from_tag(operand);

        let instruction = match mnemonic {
            "push" => return parse_push(rest),
            "pop" => Instruction::Pop,
            "load" if !operand.is_empty() => Instruction::Load(operand.to_string()),
            "save" if !operand.is_empty() => Instruction::Save(operand.to_string()),
            "add" => Instruction::Add(numeric(tag?)?),
            "sub" => Instruction::Sub(numeric(tag?)?),
            "mul" => Instruction::Mul(numeric(tag?)?),
            "div" => Instruction::Div(numeric(tag?)?),
            "mod" => Instruction::Mod,
            "uminus" => Instruction::UMinus(numeric(tag?)?),
            "concat" => Instruction::Concat,
            "and" => Instruction::And,
            "or" => Instruction::Or,
            "not" => Instruction::Not,
            "gt" => Instruction::Gt(numeric(tag?)?),
            "lt" => Instruction::Lt(numeric(tag?)?),
            "eq" => Instruction::Eq(tag?),
            "itof" => Instruction::Itof,
            "print" => Instruction::Print(operand.parse().ok()?),
            "read" => Instruction::Read(tag?),
            "jmp" => Instruction::Jmp(operand.parse().ok()?),
            "fjmp" => Instruction::Fjmp(operand.parse().ok()?),
            "label" => Instruction::Label(operand.parse().ok()?),
            _ => return None,
        };

        Some(instruction)
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(index) => (&text[..index], text[index..].trim_start()),
        None => (text, ""),
    }
}

fn numeric(tag: Literals) -> Option<Literals> {
    tag.is_numeric().then_some(tag)
}

/// `push T literal`. A numeric literal that does not parse pushes the
/// zero-value of its type.
fn parse_push(rest: &str) -> Option<Instruction> {
    let (tag, literal) = split_word(rest);
    let tag = Literals::from_tag(tag)?;

    let value = match tag {
        Literals::Int => Value::Int(literal.parse().unwrap_or(0)),
        Literals::Float => Value::Float(literal.parse().unwrap_or(0.0)),
        Literals::Bool => Value::Bool(literal == "true"),
        Literals::String => {
            let first = literal.find('"')?;
            let last = literal.rfind('"')?;
            if last <= first {
                return None;
            }
            Value::Str(unescape(&literal[first + 1..last]))
        }
    };

    Some(Instruction::Push(value))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('\\') => result.push('\\'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            _ => {
                result.push(ch);
                continue;
            }
        }
        chars.next();
    }

    result
}

/// The bytecode text form of an instruction.
impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Push(Value::Int(value)) => write!(f, "push I {}", value),
            Instruction::Push(Value::Float(value)) => write!(f, "push F {:?}", value),
            Instruction::Push(Value::Bool(value)) => write!(f, "push B {}", value),
            Instruction::Push(Value::Str(value)) => write!(f, "push S \"{}\"", escape(value)),
            Instruction::Pop => write!(f, "pop"),
            Instruction::Load(name) => write!(f, "load {}", name),
            Instruction::Save(name) => write!(f, "save {}", name),
            Instruction::Add(tag) => write!(f, "add {}", tag.tag()),
            Instruction::Sub(tag) => write!(f, "sub {}", tag.tag()),
            Instruction::Mul(tag) => write!(f, "mul {}", tag.tag()),
            Instruction::Div(tag) => write!(f, "div {}", tag.tag()),
            Instruction::Mod => write!(f, "mod"),
            Instruction::UMinus(tag) => write!(f, "uminus {}", tag.tag()),
            Instruction::Concat => write!(f, "concat"),
            Instruction::And => write!(f, "and"),
            Instruction::Or => write!(f, "or"),
            Instruction::Not => write!(f, "not"),
            Instruction::Gt(tag) => write!(f, "gt {}", tag.tag()),
            Instruction::Lt(tag) => write!(f, "lt {}", tag.tag()),
            Instruction::Eq(tag) => write!(f, "eq {}", tag.tag()),
            Instruction::Itof => write!(f, "itof"),
            Instruction::Print(count) => write!(f, "print {}", count),
            Instruction::Read(tag) => write!(f, "read {}", tag.tag()),
            Instruction::Jmp(label) => write!(f, "jmp {}", label),
            Instruction::Fjmp(label) => write!(f, "fjmp {}", label),
            Instruction::Label(label) => write!(f, "label {}", label),
            Instruction::Nop => Ok(()),
        }
    }
}

/// Writes one instruction per line.
pub fn serialize(instructions: &[Instruction]) -> String {
    let mut text = String::new();
    for instruction in instructions {
        text.push_str(&instruction.to_string());
        text.push('\n');
    }
    text
}

/// Reads bytecode text back. Never fails: lines that do not parse are
/// kept as `Nop` so instruction positions stay aligned with line numbers.
pub fn parse_program(text: &str) -> Vec<Instruction> {
    text.lines()
        .enumerate()
        .map(|(index, line)| {
            Instruction::parse_line(line).unwrap_or_else(|| {
                debug!(line = index + 1, text = line, "ignoring unrecognised bytecode line");
                Instruction::Nop
            })
        })
        .collect()
}
