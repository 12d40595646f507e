//! Main compiler module.
//!
//! This module contains the core Compiler structure. It owns the
//! instruction buffer, a symbol table of its own (independent from the
//! type checker's) and the label allocator for one generation run.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{statements::ProgramStmt, types::Literals},
    bytecode::{instruction::Instruction, value::Value},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::stmt::gen_statement;

/// Hands out label ids from one always increasing counter.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    next: u32,
}

impl LabelAllocator {
    pub fn new() -> Self {
        LabelAllocator { next: 0 }
    }

    pub fn fresh(&mut self) -> u32 {
        let label = self.next;
        self.next += 1;
        label
    }

    /// Number of labels allocated so far.
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// The state of one code generation run.
#[derive(Debug, Default)]
pub struct Compiler {
    /// Emitted code, in execution order
    pub instructions: Vec<Instruction>,
    /// Declared variables and their types
    pub symbol_table: HashMap<String, Literals>,
    pub labels: LabelAllocator,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            instructions: vec![],
            symbol_table: HashMap::new(),
            labels: LabelAllocator::new(),
        }
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Current end of the instruction buffer, used to mark operand boundaries.
    pub fn boundary(&self) -> usize {
        self.instructions.len()
    }

    /// Inserts an instruction at a previously recorded boundary.
    pub fn insert_at(&mut self, boundary: usize, instruction: Instruction) {
        self.instructions.insert(boundary, instruction);
    }

    pub fn fresh_label(&mut self) -> u32 {
        self.labels.fresh()
    }

    /// Declares a variable and materialises its default value.
    pub fn declare(&mut self, name: &str, var_type: Literals) {
        self.symbol_table.insert(name.to_string(), var_type);
        self.emit(Instruction::Push(Value::default_for(var_type)));
        self.emit(Instruction::Save(name.to_string()));
    }

    pub fn variable_type(&self, name: &str, position: &Position) -> Result<Literals, Error> {
        self.symbol_table.get(name).copied().ok_or_else(|| {
            Error::new(ErrorImpl::VariableNotDeclared { variable: name.to_string() }, position.clone())
        })
    }
}

/// Generates the instruction sequence for a type checked program.
pub fn compile(program: &ProgramStmt) -> Result<Vec<Instruction>, Error> {
    let mut compiler = Compiler::new();

    for stmt in program.iter() {
        gen_statement(&mut compiler, stmt)?;
    }

    debug!(
        instructions = compiler.instructions.len(),
        labels = compiler.labels.allocated(),
        "code generated"
    );
    Ok(compiler.instructions)
}
