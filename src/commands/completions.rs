//! # Completions Command Implementation
//!
//! Prints a tab-completion script for `wlancaf-merge` on stdout. Family and
//! mode names are completed from the same value enums the parser uses, so
//! the script stays in step with the CLI.
//!
//! ```bash
//! wlancaf-merge completions bash > ~/.local/share/bash-completion/completions/wlancaf-merge
//! wlancaf-merge completions zsh > ~/.zfunc/_wlancaf-merge
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::{Cli, BIN_NAME};

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_script(args.shell, &mut io::stdout().lock())
}

fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    generate(shell, &mut Cli::command(), BIN_NAME, out);
    out.flush()?;
    Ok(())
}
