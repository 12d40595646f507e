//! Stack machine vocabulary shared by the compiler and the interpreter.
//!
//! - `value`: tagged runtime scalars and their printed form
//! - `instruction`: the instruction set and its one-line-per-instruction
//!   text format

pub mod instruction;
pub mod value;
