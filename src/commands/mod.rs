//! # CLI Command Implementations
//!
//! The `amalgamate` binary has one job, merging, plus a helper that prints
//! shell completion scripts. Each lives in its own file:
//!
//! - `merge`: the `MergeArgs` flags and the run that drives the library
//!   pipeline.
//! - `completions`: `--completions SHELL`.

pub mod completions;
pub mod merge;
