//! CLI argument parsing and dispatch

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::commands;
use crate::commands::completions::CompletionShell;
use amalgamate::output::OutputConfig;

/// Amalgamate - Merge C/C++ sources and headers into a single file
#[derive(Parser, Debug)]
#[command(name = "amalgamate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    merge: commands::merge::MergeArgs,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    completions: Option<CompletionShell>,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if let Some(shell) = self.completions {
            return commands::completions::execute(shell);
        }

        init_logging(&self.log_level);
        let out = OutputConfig::from_env_and_flag(&self.color);
        commands::merge::execute(self.merge, &out)
    }
}

/// Send log records to stderr at `level`; `RUST_LOG` overrides it.
fn init_logging(level: &str) {
    let level = level.parse().unwrap_or(LevelFilter::Warn);
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}
