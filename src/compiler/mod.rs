//! Code generation module for the compiler.
//!
//! This module turns a type checked AST into typed stack machine
//! instructions. It handles:
//!
//! - Compilation of expressions and statements
//! - Implicit `int` to `float` widening at exact operand boundaries
//! - Label allocation for `if`, `while` and `for`

pub mod compiler;
pub mod expr;
pub mod stmt;
