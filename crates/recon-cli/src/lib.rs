//! Library surface of the reconciliation CLI: argument definitions,
//! subcommand implementations and logging setup. The binary in `main.rs`
//! is a thin shell over these modules so integration tests can drive the
//! commands directly.

pub mod cli;
pub mod commands;
pub mod logging;
