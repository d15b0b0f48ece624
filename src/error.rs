//! # Error Handling
//!
//! This module defines the centralized error type for the `amalgamate`
//! library. It uses the `thiserror` library to create an `Error` enum that
//! covers every fatal condition a merge run can hit, with messages that name
//! the file or node involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum of failure modes. Advisory conditions (a
//!   pattern that matched nothing, a duplicate input) are never errors; they
//!   are logged as warnings and the affected entry is skipped.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Fatal conditions fall into three groups:
//!
//! - Reading: an input or project file that cannot be read.
//! - Structure: a circular chain of local includes.
//! - Writing: the destination cannot be created or replaced.
//!
//! Every one of them aborts the run before anything is written to the
//! configured destination.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for amalgamation runs
#[derive(Error, Debug)]
pub enum Error {
    /// A source unit could not be read from disk.
    #[error("Cannot read '{}': {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Local includes form a cycle, so no dependency-respecting order exists.
    ///
    /// `node` is the unit that was reached a second time while still being
    /// resolved; `cycle` is the chain that leads back to it.
    #[error("Circular dependency on {node}: {cycle}")]
    CircularDependency { node: String, cycle: String },

    /// The destination could not be written.
    #[error("Cannot write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project file is malformed.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A user-supplied pattern (glob or internal-library rule) is invalid.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A search or filter directory could not be walked.
    #[error("Cannot scan directory '{}': {message}", path.display())]
    Walk { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Walk {
            path: err.path().map(PathBuf::from).unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
