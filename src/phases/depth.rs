//! Phase 3: Depth Resolution
//!
//! Assigns every graph node a depth: 0 when it has no dependency that is a
//! node, otherwise one more than its deepest node dependency. External
//! dependencies count as depth -1 and so never raise a node's depth.
//!
//! ## Process
//!
//! 1.  **Coloring**: Every node starts unvisited. Nodes are visited in input
//!     order; a visit marks the node in progress, descends into each
//!     dependency that is a node, and marks it resolved with its depth.
//!
//! 2.  **Explicit Stack**: The traversal keeps its own stack of frames
//!     instead of recursing, so very deep include chains cannot overflow the
//!     call stack.
//!
//! 3.  **Cycle Detection**: Reaching a node that is still in progress means
//!     the includes form a cycle. The run aborts with the chain of nodes that
//!     leads back to it.

use std::collections::HashMap;

use log::{debug, trace};

use super::{DependencyGraph, DepthTable};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Resolved(usize),
}

#[derive(Debug, Clone, Copy)]
struct Frame<'g> {
    key: &'g str,
    /// Index of the next dependency to look at
    next: usize,
    /// Deepest resolved node dependency so far
    deepest: Option<usize>,
}

impl<'g> Frame<'g> {
    fn new(key: &'g str) -> Self {
        Self {
            key,
            next: 0,
            deepest: None,
        }
    }

    fn raise(&mut self, depth: usize) {
        self.deepest = Some(self.deepest.map_or(depth, |d| d.max(depth)));
    }
}

/// Execute Phase 3: compute the depth table for `graph`.
pub fn execute(graph: &DependencyGraph) -> Result<DepthTable> {
    let mut states: HashMap<&str, VisitState> =
        graph.keys().map(|key| (key, VisitState::Unvisited)).collect();

    for root in graph.keys() {
        if states.get(root) == Some(&VisitState::Unvisited) {
            resolve_from(root, graph, &mut states)?;
        }
    }

    Ok(states
        .into_iter()
        .filter_map(|(key, state)| match state {
            VisitState::Resolved(depth) => Some((key.to_string(), depth)),
            VisitState::Unvisited | VisitState::InProgress => None,
        })
        .collect())
}

fn resolve_from<'g>(
    root: &'g str,
    graph: &'g DependencyGraph,
    states: &mut HashMap<&'g str, VisitState>,
) -> Result<()> {
    let mut stack = vec![Frame::new(root)];
    states.insert(root, VisitState::InProgress);

    while let Some(&Frame { key, next, .. }) = stack.last() {
        let dependencies = graph.dependencies(key);

        let Some(dependency) = dependencies.get(next) else {
            let Some(frame) = stack.pop() else { break };
            let depth = frame.deepest.map_or(0, |d| d + 1);
            debug!("{} resolved at depth {}", frame.key, depth);
            states.insert(frame.key, VisitState::Resolved(depth));
            if let Some(parent) = stack.last_mut() {
                parent.raise(depth);
            }
            continue;
        };

        if let Some(top) = stack.last_mut() {
            top.next += 1;
        }
        let dependency = dependency.as_str();

        match states.get(dependency).copied() {
            None => trace!("{} -> {} is external", key, dependency),
            Some(VisitState::Resolved(depth)) => {
                if let Some(top) = stack.last_mut() {
                    top.raise(depth);
                }
            }
            Some(VisitState::InProgress) => return Err(cycle_error(&stack, dependency)),
            Some(VisitState::Unvisited) => {
                states.insert(dependency, VisitState::InProgress);
                stack.push(Frame::new(dependency));
            }
        }
    }

    Ok(())
}

/// Build the error for reaching `node` while it is still on the stack.
fn cycle_error(stack: &[Frame<'_>], node: &str) -> Error {
    let start = stack.iter().position(|f| f.key == node).unwrap_or(0);
    let mut chain: Vec<&str> = stack[start..].iter().map(|f| f.key).collect();
    chain.push(node);
    Error::CircularDependency {
        node: node.to_string(),
        cycle: chain.join(" -> "),
    }
}
