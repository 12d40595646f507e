//! Bytecode execution.
//!
//! The interpreter is generic over its input and output streams so that
//! console I/O can be swapped for in-memory buffers.

pub mod interpreter;

#[cfg(test)]
mod tests;
