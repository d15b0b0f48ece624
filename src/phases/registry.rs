//! Phase 1: Input Registry
//!
//! This is the first phase of an amalgamation run. It turns the requested
//! input arguments into loaded [`SourceUnit`]s.
//!
//! ## Process
//!
//! 1.  **Expansion**: Each argument naming an existing path is taken as is;
//!     anything else is expanded as a glob pattern. Arguments that match
//!     nothing, and paths already registered, are skipped with a warning.
//!
//! 2.  **Loading**: Each path is read and encoding-normalized. Filtered
//!     paths are dropped, and a second file whose basename is already taken
//!     is skipped, since the basename is the unit's graph identity.
//!
//! 3.  **Closure**: Local includes that resolve to files not yet registered,
//!     whether beside the including file or in a search directory, pull
//!     those files in as additional units, breadth-first, until nothing new
//!     is referenced.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::path::is_glob;
use crate::resolve::{Directive, Disposition, IncludeResolver};
use crate::source::SourceUnit;

/// Expand input arguments into a deduplicated list of canonical file paths.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut seen = HashSet::new();

    for pattern in patterns {
        let literal = Path::new(pattern);
        if literal.exists() {
            let canonical = canonicalize(literal)?;
            if seen.insert(canonical.clone()) {
                paths.push(canonical);
            } else {
                warn!(
                    "{} is listed more than once among the input files. All but the first will be ignored.",
                    pattern
                );
            }
            continue;
        }

        if !is_glob(pattern) {
            warn!("{} not found.", pattern);
            continue;
        }

        let matches = glob::glob(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        let mut matched = false;
        for entry in matches {
            match entry {
                Ok(path) if path.is_file() => {
                    matched = true;
                    let canonical = canonicalize(&path)?;
                    if seen.insert(canonical.clone()) {
                        paths.push(canonical);
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping {}: {}", e.path().display(), e.error()),
            }
        }
        if !matched {
            warn!("{} not found.", pattern);
        }
    }

    Ok(paths)
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|source| Error::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Execute Phase 1: load the units for `paths` and every file reachable
/// from them through resolved local includes.
pub fn execute(paths: &[PathBuf], resolver: &IncludeResolver) -> Result<Vec<SourceUnit>> {
    let mut registry = Registry::default();

    for path in paths {
        if resolver.is_filtered(path) {
            warn!("{} is filtered out and will not be merged", path.display());
            continue;
        }
        registry.register(path)?;
    }

    let mut next = 0;
    while next < registry.units.len() {
        let unit = &registry.units[next];
        let referenced: Vec<PathBuf> = unit
            .raw_lines
            .iter()
            .filter_map(|line| match resolver.classify_line(line, &unit.path) {
                Some(Directive {
                    disposition: Disposition::Local {
                        path: Some(path), ..
                    },
                    ..
                }) => Some(path),
                _ => None,
            })
            .collect();
        let includer = unit.key.clone();
        for path in referenced {
            if !registry.seen.contains(&path) {
                debug!("{} pulls in {}", includer, path.display());
                registry.register(&path)?;
            }
        }
        next += 1;
    }

    info!("Registered {} source units", registry.units.len());
    Ok(registry.units)
}

#[derive(Default)]
struct Registry {
    units: Vec<SourceUnit>,
    seen: HashSet<PathBuf>,
    keys: HashMap<String, PathBuf>,
}

impl Registry {
    fn register(&mut self, path: &Path) -> Result<()> {
        if !self.seen.insert(path.to_path_buf()) {
            return Ok(());
        }
        let unit = SourceUnit::load(path)?;
        if let Some(existing) = self.keys.get(&unit.key) {
            warn!(
                "{} is skipped: its name {} is already taken by {}",
                path.display(),
                unit.key,
                existing.display()
            );
            return Ok(());
        }
        self.keys.insert(unit.key.clone(), unit.path.clone());
        self.units.push(unit);
        Ok(())
    }
}
