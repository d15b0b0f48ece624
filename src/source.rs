//! Source units: the files being merged.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{Error, Result};
use crate::path::unit_key;

const UTF8_BOM: &str = "\u{feff}";

/// A single input file, read once and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Filesystem identity, canonicalized when the file was registered.
    pub path: PathBuf,
    /// Base filename; the node identity in the dependency graph.
    pub key: String,
    /// Lines without terminators.
    pub raw_lines: Vec<String>,
}

impl SourceUnit {
    /// Read `path` from disk, normalizing its encoding.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| Error::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "{} is not valid UTF-8; invalid sequences were replaced",
                    path.display()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Self::from_text(path, &text))
    }

    /// Build a unit from text already in memory.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        let key = unit_key(&path);
        Self {
            path,
            key,
            raw_lines: split_lines(text),
        }
    }
}

/// Split text into lines, dropping a leading byte-order mark and any
/// `\r\n` / `\n` terminators.
pub fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    text.lines().map(str::to_string).collect()
}

/// Whether a line is empty or whitespace-only.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
