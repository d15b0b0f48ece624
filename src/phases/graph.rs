//! Phase 2: Dependency Graph Construction
//!
//! Scans every unit's lines for local include directives and records, per
//! unit, the keys they reference in order of appearance. Repeated includes
//! of the same target are kept; nothing is deduplicated at this stage.
//!
//! Targets that are not themselves units stay in the lists. The depth
//! resolver treats them as external.

use log::debug;

use super::DependencyGraph;
use crate::resolve::{Disposition, IncludeResolver};
use crate::source::SourceUnit;

/// Execute Phase 2: build the dependency graph for `units`.
pub fn execute(units: &[SourceUnit], resolver: &IncludeResolver) -> DependencyGraph {
    let mut graph = DependencyGraph::new();

    for unit in units {
        let dependencies: Vec<String> = unit
            .raw_lines
            .iter()
            .filter_map(|line| resolver.classify_line(line, &unit.path))
            .filter_map(|directive| match directive.disposition {
                Disposition::Local { key, .. } => Some(key),
                Disposition::Filtered | Disposition::External => None,
            })
            .collect();
        debug!("{} includes {:?}", unit.key, dependencies);
        graph.add_node(unit.key.clone(), dependencies);
    }

    graph
}
