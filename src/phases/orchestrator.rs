//! Orchestrator for a complete amalgamation run
//!
//! This module chains the phases into the operations the command line
//! exposes: merging inputs into one document, and planning the merge order
//! without emitting anything.

use std::path::PathBuf;

use log::{info, warn};

use super::emit::EmitOutcome;
use super::merge::MergeOptions;
use super::{phase1, phase2, phase3, phase4, phase5, DepthTable};
use crate::config::MergeConfig;
use crate::error::Result;
use crate::resolve::{FileIndex, FilterSet, IncludeResolver};
use crate::source::SourceUnit;

/// Result of [`execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// `check_time` found the destination newer than every loaded unit.
    UpToDate(PathBuf),
    /// The document was emitted.
    Emitted(EmitOutcome),
}

/// One unit of a planned merge, in merge order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUnit {
    pub depth: usize,
    pub key: String,
    pub path: PathBuf,
}

/// Execute a complete run (Phases 1-5).
///
/// Every fatal condition surfaces before Phase 5, so a failed run never
/// touches the destination. With `check_time`, the destination is compared
/// against every loaded unit, including headers pulled in by the closure.
pub fn execute(config: &MergeConfig) -> Result<RunOutcome> {
    let (units, resolver) = load(config)?;

    if config.check_time {
        match config.output.as_deref() {
            Some(output) => {
                let sources: Vec<PathBuf> = units.iter().map(|u| u.path.clone()).collect();
                if phase5::is_up_to_date(output, &sources)? {
                    info!("{} is up to date", output.display());
                    return Ok(RunOutcome::UpToDate(output.to_path_buf()));
                }
            }
            None => warn!("--check-time has no effect without an output file"),
        }
    }

    let depths = resolve_depths(&units, &resolver)?;

    // Phase 4: Ordering and Merge
    let options = MergeOptions {
        pragma_once: config.pragma_once,
        strip: config.strip,
        prepend: config.prepend.clone(),
    };
    let document = phase4::execute(units, &depths, &resolver, &options);

    // Phase 5: Emit
    let outcome = phase5::execute(&document, config.output.as_deref())?;
    Ok(RunOutcome::Emitted(outcome))
}

/// Resolve the merge order without merging or emitting anything.
pub fn plan_order(config: &MergeConfig) -> Result<Vec<PlannedUnit>> {
    let (units, resolver) = load(config)?;
    let depths = resolve_depths(&units, &resolver)?;

    Ok(phase4::sort_units(units, &depths)
        .into_iter()
        .map(|unit| PlannedUnit {
            depth: depths.get(&unit.key).unwrap_or(0),
            key: unit.key,
            path: unit.path,
        })
        .collect())
}

/// Phase 1: expand the inputs and load them with their include closure.
fn load(config: &MergeConfig) -> Result<(Vec<SourceUnit>, IncludeResolver)> {
    let inputs = phase1::expand_inputs(&config.inputs)?;
    let resolver = build_resolver(config, &inputs)?;
    let units = phase1::execute(&inputs, &resolver)?;
    Ok((units, resolver))
}

/// Phases 2-3: build the dependency graph and compute unit depths.
fn resolve_depths(units: &[SourceUnit], resolver: &IncludeResolver) -> Result<DepthTable> {
    // Phase 2: Dependency Graph
    let graph = phase2::execute(units, resolver);

    // Phase 3: Depth Resolution
    let depths = phase3::execute(&graph)?;
    info!("Resolved depths for {} units", depths.len());

    Ok(depths)
}

fn build_resolver(config: &MergeConfig, inputs: &[PathBuf]) -> Result<IncludeResolver> {
    let mut index = FileIndex::new();
    for dir in &config.include_dirs {
        index.add_search_dir(dir)?;
    }
    for input in inputs {
        index.add_input(input);
    }

    let mut filters = FilterSet::new();
    for filter in &config.filters {
        filters.add(filter)?;
    }

    Ok(IncludeResolver::new(
        index,
        filters,
        config.internal_libraries.clone(),
    ))
}
