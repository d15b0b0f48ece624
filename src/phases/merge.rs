//! Phase 4: Ordering and Merge
//!
//! Turns the loaded units into one document whose local dependencies
//! physically precede their dependents.
//!
//! ## Process
//!
//! 1.  **Sort**: Units are stable-sorted by depth, so ties keep their input
//!     order.
//!
//! 2.  **Concatenate**: Unit lines are appended in sorted order with one
//!     blank line between units (unless the previous line is already blank).
//!     Each line remembers the unit it came from, so directives are later
//!     resolved against their own file's directory.
//!
//! 3.  **Filter**: One pass per filter over the whole stream, in order:
//!     compile-once collapsing, local-include stripping, global directive
//!     deduplication, blank-run collapsing.
//!
//! 4.  **Prepend**: Configured literal blocks go in front, untouched by the
//!     filters.

use std::collections::HashSet;

use log::{debug, trace};

use super::{DepthTable, OutputDocument};
use crate::config::{PragmaOnce, StripMode};
use crate::directive::{is_pragma_once, IncludeReference};
use crate::resolve::{Directive, Disposition, IncludeResolver};
use crate::source::{is_blank, SourceUnit};

/// Filter settings for the merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub pragma_once: PragmaOnce,
    pub strip: StripMode,
    pub prepend: Vec<String>,
}

/// A line of the concatenated stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLine<'a> {
    pub text: String,
    /// The unit the line came from; `None` for unit separators.
    pub unit: Option<&'a SourceUnit>,
}

impl AsRef<str> for StreamLine<'_> {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Execute Phase 4: merge `units` into a single document.
pub fn execute(
    units: Vec<SourceUnit>,
    depths: &DepthTable,
    resolver: &IncludeResolver,
    options: &MergeOptions,
) -> OutputDocument {
    let units = sort_units(units, depths);
    let merged: HashSet<String> = units.iter().map(|u| u.key.clone()).collect();

    let lines = concatenate(&units);
    let lines = collapse_pragma_once(lines, options.pragma_once);
    let lines = strip_local_includes(lines, resolver, &merged, options.strip);
    let lines = dedup_directives(lines);
    let lines = collapse_blank_runs(lines);

    debug!("Merged {} units into {} lines", units.len(), lines.len());
    OutputDocument {
        prepend: options.prepend.clone(),
        lines,
    }
}

/// Stable-sort units by ascending depth.
///
/// Units missing from the table sort first, like depth-0 units.
pub fn sort_units(mut units: Vec<SourceUnit>, depths: &DepthTable) -> Vec<SourceUnit> {
    units.sort_by_key(|unit| depths.get(&unit.key).unwrap_or(0));
    units
}

/// Append every unit's lines, separating units by a single blank line.
pub fn concatenate(units: &[SourceUnit]) -> Vec<StreamLine<'_>> {
    let mut lines: Vec<StreamLine<'_>> = Vec::new();
    for unit in units {
        if lines.last().is_some_and(|last| !is_blank(&last.text)) {
            lines.push(StreamLine {
                text: String::new(),
                unit: None,
            });
        }
        lines.extend(unit.raw_lines.iter().map(|text| StreamLine {
            text: text.clone(),
            unit: Some(unit),
        }));
    }
    lines
}

/// Keep at most the first compile-once marker.
pub fn collapse_pragma_once<T: AsRef<str>>(lines: Vec<T>, mode: PragmaOnce) -> Vec<T> {
    let mut keep_next = mode == PragmaOnce::KeepFirst;
    lines
        .into_iter()
        .filter(|line| {
            if !is_pragma_once(line.as_ref()) {
                return true;
            }
            let keep = keep_next;
            keep_next = false;
            keep
        })
        .collect()
}

/// Drop directives made redundant by inlining.
///
/// `merged` holds the keys of the units in the document.
pub fn strip_local_includes(
    lines: Vec<StreamLine<'_>>,
    resolver: &IncludeResolver,
    merged: &HashSet<String>,
    mode: StripMode,
) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| {
            let directive = line
                .unit
                .and_then(|unit| resolver.classify_line(&line.text, &unit.path));
            match directive {
                Some(directive) => {
                    let strip = should_strip(&directive, merged, mode);
                    if strip {
                        trace!("Stripping {}", line.text.trim());
                    }
                    !strip
                }
                None => true,
            }
        })
        .map(|line| line.text)
        .collect()
}

fn should_strip(directive: &Directive, merged: &HashSet<String>, mode: StripMode) -> bool {
    match &directive.disposition {
        Disposition::Filtered => true,
        Disposition::Local { key, .. } => {
            directive.library.is_some()
                || merged.contains(key)
                || (mode == StripMode::AllLocal && directive.reference.is_quoted())
        }
        Disposition::External => false,
    }
}

/// Keep each include target only the first time it appears.
pub fn dedup_directives(lines: Vec<String>) -> Vec<String> {
    let mut known: HashSet<String> = HashSet::new();
    lines
        .into_iter()
        .filter(|line| match IncludeReference::parse(line) {
            Some(reference) => known.insert(reference.literal_text),
            None => true,
        })
        .collect()
}

/// Collapse runs of blank lines to a single blank line.
pub fn collapse_blank_runs(lines: Vec<String>) -> Vec<String> {
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        let repeat = is_blank(&line) && output.last().is_some_and(|last| is_blank(last));
        if !repeat {
            output.push(line);
        }
    }
    output
}
