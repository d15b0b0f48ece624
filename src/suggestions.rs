//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Following CLI recommendations,
//! errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use amalgamate::suggestions;
//!
//! // Instead of:
//! let outcome = orchestrator::execute(&config)?;
//!
//! // Use:
//! let outcome = orchestrator::execute(&config).map_err(suggestions::explain)?;
//! ```

use crate::error::Error;

/// Keys accepted in a project file.
pub const PROJECT_KEYS: [&str; 9] = [
    "inputs",
    "output",
    "prepend",
    "include_dirs",
    "filters",
    "pragma_once",
    "strip",
    "internal_libraries",
    "check_time",
];

/// Generate an error for a run with nothing to merge.
pub fn no_inputs() -> anyhow::Error {
    anyhow::anyhow!(
        "No input files given\n\n\
         hint: Pass source files or glob patterns, e.g. 'amalgamate src/*.cpp'\n\
         hint: Use -c/--config to read inputs from a project file\n\
         hint: Set AMALGAMATE_CONFIG to a project file path"
    )
}

/// Attach a hint to a library error, where one is known.
pub fn explain(error: Error) -> anyhow::Error {
    let hint = match &error {
        Error::CircularDependency { .. } => {
            "hint: Remove one of the #include directives in the chain to break the cycle\n\
             hint: Move the declarations both files need into a separate header"
        }
        Error::FileUnreadable { .. } => {
            "hint: Check that the file exists and is readable\n\
             hint: Quote glob patterns so the shell does not expand them first"
        }
        Error::WriteFailed { .. } => {
            "hint: Check that the output directory is writable\n\
             hint: Use -o to choose a different destination"
        }
        Error::InvalidPattern { .. } => {
            "hint: Globs use * for one path component and ** for any depth\n\
             hint: Internal library rules are NAME=REGEX, e.g. 'argos=^Argos/'"
        }
        Error::Walk { .. } => "hint: -i and -f expect existing directories or files",
        _ => return anyhow::Error::new(error),
    };
    anyhow::anyhow!("{error}\n\n{hint}")
}

/// Build a hint for a project-file parse failure naming an unknown key.
///
/// Returns `None` when `message` is not about an unknown key.
pub fn unknown_key_hint(message: &str) -> Option<String> {
    let rest = message.split("unknown field `").nth(1)?;
    let key = rest.split('`').next()?;
    let did_you_mean = find_similar(key, &PROJECT_KEYS)
        .map(|s| format!("Did you mean '{s}'? "))
        .unwrap_or_default();
    Some(format!(
        "{did_you_mean}Valid keys are: {keys}",
        keys = PROJECT_KEYS.join(", ")
    ))
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }
    previous[b.len()]
}
