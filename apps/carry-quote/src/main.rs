//! # carry-quote Entry Point
//!
//! The actual work is in lib.rs for testability.

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    carry_quote::run(carry_quote::Cli::parse())
}
