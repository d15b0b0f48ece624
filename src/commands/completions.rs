//! # Shell Completions
//!
//! Generates completion scripts for `amalgamate --completions SHELL` using
//! `clap_complete`.
//!
//! ## Example
//!
//! ```bash
//! amalgamate --completions bash > ~/.local/share/bash-completion/completions/amalgamate
//! amalgamate --completions zsh > ~/.zfunc/_amalgamate
//! ```

use anyhow::Result;
use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Shell types for completion generation
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Fish Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish Shell
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Write the completion script for `shell` to stdout.
pub fn execute(shell: CompletionShell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(Shell::from(shell), &mut cmd, "amalgamate", &mut io::stdout());
    Ok(())
}
