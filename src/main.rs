//! # WLAN CAF Merge CLI
//!
//! This is the binary entry point for the `wlancaf-merge` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the selected command.
//! - Mapping failures to exit codes: git's own status for merge conflicts,
//!   `1` for everything else.
//!
//! The core logic lives in the `wlancaf_merge` library crate; the binary is
//! a thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use wlancaf_merge::error::Error;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err
                .downcast_ref::<Error>()
                .map(Error::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
