//! Implementation of the 5 phases of an amalgamation run.
//!
//! ## Overview
//!
//! A run follows 5 phases, each consuming only what earlier phases produced:
//! 1. Registry - Expand input patterns and load the source units
//! 2. Dependency Graph - Record the local includes of every unit
//! 3. Depth Resolution - Assign cycle-checked depths to graph nodes
//! 4. Merge - Sort by depth, concatenate, and filter redundant directives
//! 5. Emit - Write the document to stdout or to a destination file
//!
//! The shared data types passed between phases live here.

use std::collections::HashMap;

// Phase modules
pub mod depth;
pub mod emit;
pub mod graph;
pub mod merge;
pub mod orchestrator;
pub mod registry;

// Numbered aliases, matching the pipeline order
pub use depth as phase3;
pub use emit as phase5;
pub use graph as phase2;
pub use merge as phase4;
pub use registry as phase1;

/// Local-include edges between source units, keyed by unit key.
///
/// A dependency that is not itself a key is external: referenced, but not
/// part of the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Node keys in unit input order
    order: Vec<String>,
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with its ordered dependencies, replacing any earlier entry
    /// for the same key.
    pub fn add_node(&mut self, key: impl Into<String>, dependencies: Vec<String>) {
        let key = key.into();
        if !self.edges.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.edges.insert(key, dependencies);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.edges.contains_key(key)
    }

    /// Dependencies of `key` in order of appearance; empty for unknown keys.
    pub fn dependencies(&self, key: &str) -> &[String] {
        self.edges.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Node keys in input order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Resolved depth of every graph node.
///
/// For every edge `n -> d` where `d` is a node, `depth(d) < depth(n)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthTable {
    depths: HashMap<String, usize>,
}

impl DepthTable {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.depths.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

impl FromIterator<(String, usize)> for DepthTable {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            depths: iter.into_iter().collect(),
        }
    }
}

/// The merged text handed to the emitter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputDocument {
    /// Literal blocks placed ahead of the merged lines
    pub prepend: Vec<String>,
    /// Filtered lines without terminators
    pub lines: Vec<String>,
}

impl OutputDocument {
    /// Render the document: each prepend block, newline-terminated, then
    /// every line terminated by `\n`.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for block in &self.prepend {
            text.push_str(block);
            if !block.ends_with('\n') {
                text.push('\n');
            }
        }
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}
