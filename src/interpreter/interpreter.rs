//! Stack machine interpreter.
//!
//! Runs an instruction sequence against an operand stack and a variable
//! store. Labels are resolved once before execution starts. Execution ends
//! when the instruction pointer runs off the end of the sequence.

use std::{
    collections::HashMap,
    io::{BufRead, Write},
};

use tracing::{debug, trace};

use crate::{
    ast::types::Literals,
    bytecode::{
        instruction::{parse_program, Instruction},
        value::Value,
    },
    errors::errors::RuntimeError,
};

/// Policy for anomalies the instruction set leaves open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InterpreterConfig {
    /// Jumping to a label that does not exist is fatal instead of a no-op.
    pub strict_labels: bool,
}

/// Maps every `label` id to its position. A repeated id keeps its last position.
pub fn resolve_labels(instructions: &[Instruction]) -> HashMap<u32, usize> {
    instructions
        .iter()
        .enumerate()
        .filter_map(|(position, instruction)| match instruction {
            Instruction::Label(label) => Some((*label, position)),
            _ => None,
        })
        .collect()
}

pub struct Interpreter<R: BufRead, W: Write> {
    input: R,
    output: W,
    config: InterpreterConfig,
    stack: Vec<Value>,
    variables: HashMap<String, Value>,
    labels: HashMap<u32, usize>,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub fn new(input: R, output: W, config: InterpreterConfig) -> Self {
        Interpreter {
            input,
            output,
            config,
            stack: vec![],
            variables: HashMap::new(),
            labels: HashMap::new(),
        }
    }

    /// Executes a program from a fresh stack and variable store.
    pub fn run(&mut self, instructions: &[Instruction]) -> Result<(), RuntimeError> {
        self.stack.clear();
        self.variables.clear();
        self.labels = resolve_labels(instructions);
        debug!(instructions = instructions.len(), labels = self.labels.len(), "labels resolved");

        let mut ip = 0;
        while ip < instructions.len() {
            let instruction = &instructions[ip];
            trace!(ip, %instruction, depth = self.stack.len(), "execute");

            match self.execute(ip, instruction)? {
                Some(target) => ip = target,
                None => ip += 1,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Parses bytecode text and runs it.
    pub fn run_text(&mut self, text: &str) -> Result<(), RuntimeError> {
        let instructions = parse_program(text);
        self.run(&instructions)
    }

    /// Values left on the stack by the last run.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs one instruction. Returns the jump target when control moves
    /// somewhere other than the next instruction.
    fn execute(&mut self, ip: usize, instruction: &Instruction) -> Result<Option<usize>, RuntimeError> {
        match instruction {
            Instruction::Push(value) => self.stack.push(value.clone()),
            Instruction::Pop => {
                self.stack.pop();
            }
            Instruction::Load(name) => {
                let value = self.variables.get(name).cloned().unwrap_or(Value::Int(0));
                self.stack.push(value);
            }
            Instruction::Save(name) => {
                let value = self.pop(ip, instruction)?;
                self.variables.insert(name.clone(), value);
            }
            Instruction::Add(tag) => {
                let result = self.arithmetic(ip, instruction, *tag, |a, b| Some(a.wrapping_add(b)), |a, b| a + b)?;
                self.stack.push(result);
            }
            Instruction::Sub(tag) => {
                let result = self.arithmetic(ip, instruction, *tag, |a, b| Some(a.wrapping_sub(b)), |a, b| a - b)?;
                self.stack.push(result);
            }
            Instruction::Mul(tag) => {
                let result = self.arithmetic(ip, instruction, *tag, |a, b| Some(a.wrapping_mul(b)), |a, b| a * b)?;
                self.stack.push(result);
            }
            Instruction::Div(tag) => {
                let result = self.arithmetic(ip, instruction, *tag, |a, b| (b != 0).then(|| a.wrapping_div(b)), |a, b| a / b)?;
                self.stack.push(result);
            }
            Instruction::Mod => {
                let result = self.arithmetic(ip, instruction, Literals::Int, |a, b| (b != 0).then(|| a.wrapping_rem(b)), |a, b| a % b)?;
                self.stack.push(result);
            }
            Instruction::UMinus(tag) => {
                let value = match self.pop_as(ip, instruction, *tag)? {
                    Value::Int(value) => Value::Int(value.wrapping_neg()),
                    Value::Float(value) => Value::Float(-value),
                    other => return Err(mismatch(ip, instruction, "int or float", &other)),
                };
                self.stack.push(value);
            }
            Instruction::Concat => {
                let right = self.pop(ip, instruction)?;
                let left = self.pop(ip, instruction)?;
                self.stack.push(Value::Str(format!("{}{}", left, right)));
            }
            Instruction::And => {
                let right = self.pop_bool(ip, instruction)?;
                let left = self.pop_bool(ip, instruction)?;
                self.stack.push(Value::Bool(left && right));
            }
            Instruction::Or => {
                let right = self.pop_bool(ip, instruction)?;
                let left = self.pop_bool(ip, instruction)?;
                self.stack.push(Value::Bool(left || right));
            }
            Instruction::Not => {
                let value = self.pop_bool(ip, instruction)?;
                self.stack.push(Value::Bool(!value));
            }
            Instruction::Gt(tag) => {
                let result = self.compare(ip, instruction, *tag, |a, b| a > b, |a, b| a > b)?;
                self.stack.push(Value::Bool(result));
            }
            Instruction::Lt(tag) => {
                let result = self.compare(ip, instruction, *tag, |a, b| a < b, |a, b| a < b)?;
                self.stack.push(Value::Bool(result));
            }
            Instruction::Eq(tag) => {
                let result = match tag {
                    Literals::Int | Literals::Float | Literals::String => {
                        let right = self.pop_as(ip, instruction, *tag)?;
                        let left = self.pop_as(ip, instruction, *tag)?;
                        left == right
                    }
                    Literals::Bool => {
                        let right = self.pop(ip, instruction)?;
                        let left = self.pop(ip, instruction)?;
                        left == right
                    }
                };
                self.stack.push(Value::Bool(result));
            }
            Instruction::Itof => {
                let value = match self.pop_as(ip, instruction, Literals::Int)? {
                    Value::Int(value) => value as f64,
                    other => return Err(mismatch(ip, instruction, "int", &other)),
                };
                self.stack.push(Value::Float(value));
            }
            Instruction::Print(count) => {
                if self.stack.len() < *count {
                    return Err(underflow(ip, instruction));
                }
                let values = self.stack.split_off(self.stack.len() - count);
                for value in &values {
                    write!(self.output, "{}", value)?;
                }
                writeln!(self.output)?;
                self.output.flush()?;
            }
            Instruction::Read(tag) => {
                let mut line = String::new();
                // End of input reads as an empty line
                self.input.read_line(&mut line)?;
                self.stack.push(Value::parse_input(*tag, &line));
            }
            Instruction::Jmp(label) => return self.jump_target(ip, *label),
            Instruction::Fjmp(label) => {
                if !self.pop_bool(ip, instruction)? {
                    return self.jump_target(ip, *label);
                }
            }
            Instruction::Label(_) | Instruction::Nop => {}
        }

        Ok(None)
    }

    fn jump_target(&self, ip: usize, label: u32) -> Result<Option<usize>, RuntimeError> {
        match self.labels.get(&label) {
            Some(position) => Ok(Some(*position)),
            None if self.config.strict_labels => Err(RuntimeError::UnresolvedLabel { label, ip }),
            None => {
                debug!(label, ip, "jump to unresolved label ignored");
                Ok(None)
            }
        }
    }

    fn pop(&mut self, ip: usize, instruction: &Instruction) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or_else(|| underflow(ip, instruction))
    }

    /// Pops a value that must have the variant selected by `tag`.
    fn pop_as(&mut self, ip: usize, instruction: &Instruction, tag: Literals) -> Result<Value, RuntimeError> {
        let value = self.pop(ip, instruction)?;
        if value.literal() != tag {
            return Err(mismatch(ip, instruction, &tag.to_string(), &value));
        }
        Ok(value)
    }

    fn pop_bool(&mut self, ip: usize, instruction: &Instruction) -> Result<bool, RuntimeError> {
        match self.pop(ip, instruction)? {
            Value::Bool(value) => Ok(value),
            other => Err(mismatch(ip, instruction, "bool", &other)),
        }
    }

    /// Pops right then left and applies the operation for `tag`.
    /// `int_op` returns `None` for a zero divisor.
    fn arithmetic(
        &mut self,
        ip: usize,
        instruction: &Instruction,
        tag: Literals,
        int_op: impl Fn(i32, i32) -> Option<i32>,
        float_op: impl Fn(f64, f64) -> f64,
    ) -> Result<Value, RuntimeError> {
        let right = self.pop_as(ip, instruction, tag)?;
        let left = self.pop_as(ip, instruction, tag)?;

        match (left, right) {
            (Value::Int(left), Value::Int(right)) => int_op(left, right)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::DivisionByZero { instruction: instruction.to_string(), ip }),
            (Value::Float(left), Value::Float(right)) => Ok(Value::Float(float_op(left, right))),
            (left, _) => Err(mismatch(ip, instruction, "int or float", &left)),
        }
    }

    fn compare(
        &mut self,
        ip: usize,
        instruction: &Instruction,
        tag: Literals,
        int_op: impl Fn(i32, i32) -> bool,
        float_op: impl Fn(f64, f64) -> bool,
    ) -> Result<bool, RuntimeError> {
        let right = self.pop_as(ip, instruction, tag)?;
        let left = self.pop_as(ip, instruction, tag)?;

        match (left, right) {
            (Value::Int(left), Value::Int(right)) => Ok(int_op(left, right)),
            (Value::Float(left), Value::Float(right)) => Ok(float_op(left, right)),
            (left, _) => Err(mismatch(ip, instruction, "int or float", &left)),
        }
    }
}

fn underflow(ip: usize, instruction: &Instruction) -> RuntimeError {
    RuntimeError::StackUnderflow { instruction: instruction.to_string(), ip }
}

fn mismatch(ip: usize, instruction: &Instruction, expected: &str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        instruction: instruction.to_string(),
        expected: expected.to_string(),
        found: found.literal().to_string(),
        ip,
    }
}
