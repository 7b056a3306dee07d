//! CLI argument parsing and command dispatch

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::WriteStyle;
use log::Level;

use crate::commands;
use wlancaf_merge::output::OutputConfig;

/// Name of the installed binary.
pub const BIN_NAME: &str = "wlancaf-merge";

/// WLAN CAF Merge - Import Qualcomm WLAN drivers into a kernel tree as git subtrees
#[derive(Parser, Debug)]
#[command(name = "wlancaf-merge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(
        long,
        global = true,
        value_name = "WHEN",
        default_value = "auto",
        value_parser = ["auto", "always", "never"]
    )]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import or update a WLAN driver family as git subtrees
    Merge(commands::merge::MergeArgs),

    /// Check whether a merge could run, without touching the tree
    Check(commands::check::CheckArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        init_logging(&self.log_level, &output);

        match self.command {
            Commands::Merge(args) => commands::merge::execute(args, &output),
            Commands::Check(args) => commands::check::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Progress is logged at info level and printed bare; other levels carry
/// their level name.
fn init_logging(level: &str, output: &OutputConfig) {
    let env = env_logger::Env::default().default_filter_or(level);
    let style = if output.use_color {
        WriteStyle::Always
    } else {
        WriteStyle::Never
    };

    let _ = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            if record.level() == Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(
                    buf,
                    "{}: {}",
                    record.level().as_str().to_lowercase(),
                    record.args()
                )
            }
        })
        .write_style(style)
        .try_init();
}
