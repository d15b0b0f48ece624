//! # Amalgamate Library
//!
//! This library merges a set of C/C++ source and header files into a single
//! self-contained file. Local dependencies are placed ahead of the files that
//! include them, and directives made redundant by the merge are removed. It
//! is designed to be used by the `amalgamate` command-line tool but can also
//! be called directly from build scripts.
//!
//! ## Quick Example
//!
//! ```
//! use amalgamate::phases::{depth, graph, merge};
//! use amalgamate::resolve::IncludeResolver;
//! use amalgamate::source::SourceUnit;
//!
//! let units = vec![
//!     SourceUnit::from_text("main.cpp", "#include \"util.h\"\nint main();\n"),
//!     SourceUnit::from_text("util.h", "#pragma once\nint util();\n"),
//! ];
//!
//! let resolver = IncludeResolver::empty();
//! let graph = graph::execute(&units, &resolver);
//! let depths = depth::execute(&graph).unwrap();
//! let document = merge::execute(units, &depths, &resolver, &Default::default());
//!
//! assert_eq!(
//!     document.render(),
//!     "#pragma once\nint util();\n\nint main();\n"
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Source units (`source`)**: One input file, keyed by its basename, held
//!   as lines of text.
//! - **Directives (`directive`, `resolve`)**: Recognition of `#include` and
//!   `#pragma once` lines, and classification of each include as local,
//!   filtered, or external.
//! - **Configuration (`config`)**: The settings of a run, from the command
//!   line or a `.amalgamate.yaml` project file.
//! - **Phases (`phases`)**: The pipeline that turns inputs into one document.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator`, which runs:
//!
//! 1.  **Registry**: Expand input patterns and load the source units, plus
//!     every file their local includes reach.
//! 2.  **Dependency Graph**: Record the local includes of every unit.
//! 3.  **Depth Resolution**: Give every unit a depth, rejecting cycles.
//! 4.  **Merge**: Sort by depth, concatenate, and filter directives.
//! 5.  **Emit**: Write to stdout, or to a file unless it is already current.

pub mod config;
pub mod directive;
pub mod error;
pub mod output;
pub mod path;
pub mod phases;
pub mod resolve;
pub mod source;
pub mod suggestions;

#[cfg(test)]
mod merge_proptest;
