//! Error types and error handling for the pipeline.
//!
//! This module defines the error types used throughout compilation and
//! execution. It includes:
//!
//! - Positioned diagnostics for the syntax and semantic phases
//! - Fatal runtime faults raised by the interpreter
//! - Error names and suggestions used when rendering diagnostics

pub mod errors;

#[cfg(test)]
mod tests;
