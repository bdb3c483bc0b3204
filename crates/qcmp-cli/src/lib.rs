//! Library half of the `qcmp` command-line tool.
//!
//! The binary in `main.rs` only parses arguments, sets up logging and
//! dispatches; argument definitions, configuration and the comparison report
//! live here so they can be tested directly.

pub mod cli;
pub mod commands;
pub mod config;
pub mod report;
