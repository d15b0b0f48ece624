//! Phase 5: Emitting the Document
//!
//! This is the final phase of an amalgamation run. It writes the merged
//! document to standard output or to a destination file.
//!
//! ## Process
//!
//! 1.  **Compare**: If the destination already holds exactly the rendered
//!     bytes, nothing is written, so its modification time stays put for
//!     build systems that compare timestamps.
//!
//! 2.  **Create Directories**: Missing parent directories are created.
//!
//! 3.  **Replace**: The text is written to a temporary file next to the
//!     destination and renamed over it, so a failure never leaves a
//!     truncated file behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::info;
use tempfile::NamedTempFile;

use super::OutputDocument;
use crate::error::{Error, Result};

/// What the emitter did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The document went to the given writer (standard output).
    Streamed,
    /// The destination already held identical content.
    Unchanged(PathBuf),
    /// The destination was created or replaced.
    Updated(PathBuf),
}

/// Execute Phase 5: emit `document` to `destination`, or to stdout.
pub fn execute(document: &OutputDocument, destination: Option<&Path>) -> Result<EmitOutcome> {
    match destination {
        Some(path) => write_file(&document.render(), path),
        None => {
            let stdout = std::io::stdout();
            write_to(document, &mut stdout.lock())
        }
    }
}

/// Write the rendered document to `writer`.
pub fn write_to(document: &OutputDocument, writer: &mut impl Write) -> Result<EmitOutcome> {
    writer.write_all(document.render().as_bytes())?;
    writer.flush()?;
    Ok(EmitOutcome::Streamed)
}

/// Write `text` to `destination` unless it already holds exactly `text`.
pub fn write_file(text: &str, destination: &Path) -> Result<EmitOutcome> {
    if fs::read(destination).is_ok_and(|existing| existing == text.as_bytes()) {
        info!("{} is unchanged", destination.display());
        return Ok(EmitOutcome::Unchanged(destination.to_path_buf()));
    }

    let write_failed = |source| Error::WriteFailed {
        path: destination.to_path_buf(),
        source,
    };

    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_failed)?;

    let mut staged = NamedTempFile::new_in(parent).map_err(write_failed)?;
    staged.write_all(text.as_bytes()).map_err(write_failed)?;
    staged.as_file().sync_all().map_err(write_failed)?;

    // Temporary files are created owner-only; keep the destination's mode,
    // or use the usual mode for a new source file.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::metadata(destination)
            .map(|m| m.permissions())
            .unwrap_or_else(|_| fs::Permissions::from_mode(0o644));
        staged
            .as_file()
            .set_permissions(permissions)
            .map_err(write_failed)?;
    }

    staged
        .persist(destination)
        .map_err(|e| write_failed(e.error))?;
    info!("Updated {}", destination.display());
    Ok(EmitOutcome::Updated(destination.to_path_buf()))
}

/// Whether `destination` is newer than every one of `inputs`.
///
/// A missing destination is never up to date.
pub fn is_up_to_date(destination: &Path, inputs: &[PathBuf]) -> Result<bool> {
    let Ok(written) = fs::metadata(destination).and_then(|m| m.modified()) else {
        return Ok(false);
    };
    for input in inputs {
        let modified = modified_time(input)?;
        if modified >= written {
            return Ok(false);
        }
    }
    Ok(true)
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| Error::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })
}
