//! # Configuration Schema and Parsing
//!
//! This module defines the settings an amalgamation run is driven by, and the
//! optional YAML project file that records them next to the sources.
//!
//! ## Key Components
//!
//! - **`ProjectFile`**: The on-disk schema. Every key is optional; unknown
//!   keys are rejected so that typos do not silently change the output.
//!
//! - **`MergeConfig`**: The resolved settings the pipeline runs on. It is
//!   built from a project file, from command-line flags, or both.
//!
//! - **`PragmaOnce`** and **`StripMode`**: The two knobs of the filter
//!   pipeline.
//!
//! ## Example
//!
//! ```yaml
//! inputs:
//!   - src/Argos/*.cpp
//! output: single_src/Argos.cpp
//! prepend:
//!   - '#include "Argos.hpp"'
//! include_dirs:
//!   - include
//! filters:
//!   - include/Argos
//! internal_libraries:
//!   - name: argos
//!     pattern: '^Argos/'
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::directive::LibraryRule;
use crate::error::{Error, Result};
use crate::suggestions;

/// Conventional name of the project file.
pub const DEFAULT_FILE_NAME: &str = ".amalgamate.yaml";

/// What happens to compile-once markers in the merged stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PragmaOnce {
    /// Keep the first marker, drop the rest.
    #[default]
    KeepFirst,
    /// Drop every marker.
    DropAll,
}

/// Which quoted include directives are stripped from the merged stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StripMode {
    /// Only directives whose target was inlined (or deliberately filtered).
    #[default]
    Inlined,
    /// Every quoted directive, whether or not its target was merged.
    AllLocal,
}

/// One internal-library rule as written in the project file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LibrarySpec {
    pub name: String,
    pub pattern: String,
}

/// The `.amalgamate.yaml` schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectFile {
    /// Input files or glob patterns, in merge tiebreak order.
    pub inputs: Vec<String>,
    /// Destination file; stdout when absent.
    pub output: Option<PathBuf>,
    /// Literal blocks written ahead of the merged content.
    pub prepend: Vec<String>,
    /// Directories searched when resolving include targets.
    pub include_dirs: Vec<PathBuf>,
    /// Files or directories excluded from the merge.
    pub filters: Vec<PathBuf>,
    /// Keep the first `#pragma once` (default) or drop them all.
    pub pragma_once: Option<bool>,
    pub strip: Option<StripMode>,
    pub internal_libraries: Vec<LibrarySpec>,
    /// Skip the run when the output is newer than every merged file.
    pub check_time: bool,
}

impl ProjectFile {
    /// Resolve into a [`MergeConfig`], rebasing relative paths onto `base`.
    pub fn into_config(self, base: &Path) -> Result<MergeConfig> {
        let rebase = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };

        let internal_libraries = self
            .internal_libraries
            .into_iter()
            .map(|spec| LibraryRule::new(spec.name, &spec.pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(MergeConfig {
            inputs: self
                .inputs
                .into_iter()
                .map(|input| rebase(PathBuf::from(input)).to_string_lossy().into_owned())
                .collect(),
            output: self.output.map(rebase),
            prepend: self.prepend,
            include_dirs: self.include_dirs.into_iter().map(rebase).collect(),
            filters: self.filters.into_iter().map(rebase).collect(),
            pragma_once: match self.pragma_once {
                Some(false) => PragmaOnce::DropAll,
                Some(true) | None => PragmaOnce::KeepFirst,
            },
            strip: self.strip.unwrap_or_default(),
            internal_libraries,
            check_time: self.check_time,
        })
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone, Default)]
pub struct MergeConfig {
    pub inputs: Vec<String>,
    pub output: Option<PathBuf>,
    pub prepend: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub filters: Vec<PathBuf>,
    pub pragma_once: PragmaOnce,
    pub strip: StripMode,
    pub internal_libraries: Vec<LibraryRule>,
    pub check_time: bool,
}

/// Parses a YAML string into a `ProjectFile`.
///
/// An empty or comment-only document yields the default project.
pub fn parse(yaml_content: &str) -> Result<ProjectFile> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml_content)?;
    if value.is_null() {
        return Ok(ProjectFile::default());
    }
    serde_yaml::from_value(value).map_err(|e| {
        let message = e.to_string();
        let hint = if message.contains("unknown field") {
            suggestions::unknown_key_hint(&message)
        } else if message.contains("unknown variant") {
            Some("strip must be 'inlined' or 'all-local'".to_string())
        } else {
            None
        };
        Error::ConfigParse { message, hint }
    })
}

/// Read and resolve a project file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MergeConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    parse(&content)?.into_config(base)
}
