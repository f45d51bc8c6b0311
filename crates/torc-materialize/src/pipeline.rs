//! Materialization pipeline orchestrator.

use std::time::Instant;

use torc_core::graph::Graph;
use torc_targets::Platform;

use crate::canonicalize::canonicalize;
use crate::error::MaterializationError;
use crate::gate::{gate_or_halt, GateConfig};
use crate::layout::estimate_layout;
use crate::report::MaterializationReport;
use crate::resource::{check_resource_fit, require_fit};
use crate::schedule::compute_schedule;
use crate::transform::TransformRegistry;

/// Configuration for the materialization pipeline.
pub struct PipelineConfig {
    /// Target platform.
    pub platform: Platform,
    /// Verification gate configuration.
    pub gate: GateConfig,
    /// Transform registry with registered lowerings/transforms.
    pub transforms: TransformRegistry,
    /// Whether to enforce resource constraints (halt on overflow).
    pub enforce_resource_fit: bool,
}

/// Output of a successful materialization pipeline run.
pub struct PipelineOutput {
    /// The transformed graph ready for code emission.
    pub graph: Graph,
    /// Pipeline report with statistics.
    pub report: MaterializationReport,
}

/// Run the full materialization pipeline:
/// canonicalize -> verify gate -> transform -> schedule + layout + resource fit -> report.
pub fn materialize(
    graph: Graph,
    config: PipelineConfig,
) -> Result<PipelineOutput, MaterializationError> {
    let start = Instant::now();

    // Stage 1: Canonicalization
    let (mut graph, canon_stats) = canonicalize(graph)?;

    // Stage 2: Verification gate
    let _verify_report = gate_or_halt(&graph, &config.gate)?;

    // Stage 3: Apply transforms
    let transform_stats = config
        .transforms
        .apply_all(&mut graph, &config.platform);

    // Stage 4a: Compute execution schedule
    let schedule = compute_schedule(&graph)?;

    // Stage 4b: Estimate memory layout
    let layout = estimate_layout(&graph, &config.platform)?;

    // Stage 4c: Resource fitting
    let resource_report = check_resource_fit(&layout, &config.platform);
    if config.enforce_resource_fit {
        require_fit(&resource_report)?;
    }

    let duration_ms = start.elapsed().as_millis() as u64;

    let report = MaterializationReport {
        target: config.platform.name.clone(),
        duration_ms,
        canonicalization: canon_stats,
        verification_passed: true,
        transforms: transform_stats,
        schedule_depth: schedule.sequential_depth,
        max_parallelism: schedule.max_parallelism,
        resources: Some(resource_report),
    };

    Ok(PipelineOutput { graph, report })
}
