//! Merge command implementation
//!
//! Runs the 5-phase pipeline on the files named on the command line and/or
//! in a project file:
//! 1. Expanding inputs and loading source units
//! 2. Recording local include edges
//! 3. Resolving depths (rejecting include cycles)
//! 4. Sorting, concatenating and filtering
//! 5. Writing to stdout or to the output file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, warn};

use amalgamate::config::{self, MergeConfig, PragmaOnce, StripMode, DEFAULT_FILE_NAME};
use amalgamate::directive::LibraryRule;
use amalgamate::output::{plan_line, status_line, OutputConfig};
use amalgamate::phases::orchestrator;
use amalgamate::suggestions;

/// Arguments for a merge run
#[derive(Args, Debug, Default)]
pub struct MergeArgs {
    /// Input files or quoted glob patterns, merged in this order when
    /// dependencies allow
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Remove every #pragma once instead of keeping the first
    #[arg(long)]
    pub no_pragma_once: bool,

    /// Text written at the top of the output (repeatable)
    #[arg(short, long, value_name = "TEXT")]
    pub prepend: Vec<String>,

    /// Directory searched for included files (repeatable)
    #[arg(short, long = "include", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// File or directory left out of the merge (repeatable)
    #[arg(short, long = "filter", value_name = "PATH")]
    pub filters: Vec<PathBuf>,

    /// Do nothing when the output is newer than every file it merges
    #[arg(long)]
    pub check_time: bool,

    /// Which quoted includes are removed from the output
    #[arg(long, value_enum, value_name = "MODE")]
    pub strip: Option<StripMode>,

    /// Treat <...> includes matching REGEX as part of the merge (repeatable)
    #[arg(short = 'L', long = "internal-library", value_name = "NAME=REGEX")]
    pub internal_libraries: Vec<String>,

    /// Path to a project file
    #[arg(short, long, value_name = "PATH", env = "AMALGAMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the merge order instead of merging
    #[arg(long)]
    pub list: bool,
}

impl MergeArgs {
    /// Build the run settings: project file first, then command-line flags.
    pub fn resolve(&self) -> Result<MergeConfig> {
        let mut merged = match self.project_file() {
            Some(path) => config::from_file(&path)
                .map_err(suggestions::explain)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => MergeConfig::default(),
        };

        merged.inputs.extend(self.files.iter().cloned());
        if self.output.is_some() {
            merged.output = self.output.clone();
        }
        if self.no_pragma_once {
            merged.pragma_once = PragmaOnce::DropAll;
        }
        merged.prepend.extend(self.prepend.iter().cloned());
        merged.include_dirs.extend(self.include_dirs.iter().cloned());
        merged.filters.extend(self.filters.iter().cloned());
        merged.check_time |= self.check_time;
        if let Some(strip) = self.strip {
            merged.strip = strip;
        }
        for spec in &self.internal_libraries {
            let rule = LibraryRule::parse_spec(spec).map_err(suggestions::explain)?;
            merged.internal_libraries.push(rule);
        }

        Ok(merged)
    }

    /// The explicit project file, or `.amalgamate.yaml` in the working
    /// directory when no files were named at all.
    fn project_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }
        let fallback = Path::new(DEFAULT_FILE_NAME);
        if self.files.is_empty() && fallback.is_file() {
            debug!("Using {}", fallback.display());
            return Some(fallback.to_path_buf());
        }
        None
    }
}

/// Execute a merge run
pub fn execute(args: MergeArgs, out: &OutputConfig) -> Result<()> {
    let config = args.resolve()?;
    if config.inputs.is_empty() {
        return Err(suggestions::no_inputs());
    }

    if args.list {
        if config.output.is_some() {
            warn!("--list prints the merge order; the output file is not written");
        }
        let plan = orchestrator::plan_order(&config).map_err(suggestions::explain)?;
        for unit in &plan {
            println!("{}", plan_line(unit));
        }
        return Ok(());
    }

    let outcome = orchestrator::execute(&config).map_err(suggestions::explain)?;
    if let Some(line) = status_line(out, &outcome) {
        println!("{line}");
    }
    Ok(())
}
