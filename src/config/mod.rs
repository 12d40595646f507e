//! Command line and environment configuration for the `plc` binary.

pub mod config;
