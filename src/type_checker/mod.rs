//! Type checking and semantic analysis module.
//!
//! This module walks the AST and collects semantic errors while:
//!
//! - Maintaining a flat symbol table in declaration order
//! - Inferring the type of every expression
//! - Checking operand types of every operator and assignment
//! - Requiring `bool` conditions in `if`, `while` and `for`
//!
//! Analysis never stops at the first error. An expression that already
//! produced a diagnostic types to an error marker so enclosing operators
//! do not report it again.

pub mod type_checker;

#[cfg(test)]
mod tests;
