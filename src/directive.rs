//! # Directive Recognition
//!
//! Line-anchored recognition of the two preprocessor lines the merge cares
//! about: `#include` directives and the `#pragma once` compile-once marker.
//! Nothing else in a source line is interpreted.
//!
//! Bracketed directives normally name system headers and are only ever
//! deduplicated. A [`LibraryRule`] marks a family of bracketed targets as
//! belonging to the amalgamation itself, which makes them local-form.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::path::target_key;

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*#\s*include\s*(?:"([^"]+)"|<([^>]+)>)"#).expect("include pattern is valid")
});

static PRAGMA_ONCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*pragma\s+once\b").expect("pragma pattern is valid"));

/// How an include target is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeForm {
    /// `#include "name"`
    Quoted,
    /// `#include <name>`
    Bracketed,
}

/// A directive extracted from one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeReference {
    pub form: IncludeForm,
    /// The target payload between the delimiters; the dedup key.
    pub literal_text: String,
    /// Basename of the target, set for quoted directives only.
    pub target_key: Option<String>,
}

impl IncludeReference {
    /// Recognize an include directive at the start of `line`.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = INCLUDE_RE.captures(line)?;
        if let Some(quoted) = caps.get(1) {
            let literal_text = quoted.as_str().to_string();
            let target_key = Some(target_key(&literal_text).to_string());
            return Some(Self {
                form: IncludeForm::Quoted,
                literal_text,
                target_key,
            });
        }
        caps.get(2).map(|bracketed| Self {
            form: IncludeForm::Bracketed,
            literal_text: bracketed.as_str().to_string(),
            target_key: None,
        })
    }

    pub fn is_quoted(&self) -> bool {
        self.form == IncludeForm::Quoted
    }
}

/// Whether `line` is a compile-once marker.
pub fn is_pragma_once(line: &str) -> bool {
    PRAGMA_ONCE_RE.is_match(line)
}

/// A named rule marking bracketed targets as part of the amalgamated library.
///
/// Matching directives are stripped from the output and, when they resolve
/// to a file, contribute dependency edges like quoted includes do.
#[derive(Debug, Clone)]
pub struct LibraryRule {
    pub name: String,
    pattern: Regex,
}

impl LibraryRule {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name: name.into(),
            pattern,
        })
    }

    /// Parse the `NAME=REGEX` command-line form.
    pub fn parse_spec(spec: &str) -> Result<Self> {
        match spec.split_once('=') {
            Some((name, pattern)) if !name.is_empty() && !pattern.is_empty() => {
                Self::new(name, pattern)
            }
            _ => Err(Error::InvalidPattern {
                pattern: spec.to_string(),
                message: "expected NAME=REGEX".to_string(),
            }),
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, target: &str) -> bool {
        self.pattern.is_match(target)
    }
}
