//! Verification gate: decides whether a graph passes verification for materialization.

use torc_core::graph::Graph;
use torc_verify::engine::VerificationEngine;
use torc_verify::profile::VerificationProfile;
use torc_verify::report::VerificationReport;

use crate::error::MaterializationError;

/// The gate's decision on whether materialization may proceed.
#[derive(Debug)]
pub enum GateDecision {
    /// All obligations verified (or waived, within limits).
    Pass {
        report: VerificationReport,
        waived: usize,
    },
    /// Materialization must stop.
    Halt {
        failed: usize,
        pending: usize,
        report: VerificationReport,
    },
}

/// Configuration for the verification gate.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Verification profile to use.
    pub profile: VerificationProfile,
    /// If true, pending obligations are treated as blocking (halt).
    /// If false, only failed obligations block.
    pub strict: bool,
    /// Maximum number of waivers allowed before halting.
    pub max_waivers: Option<usize>,
}

impl GateConfig {
    /// Development gate: lenient, pending obligations allowed.
    pub fn development() -> Self {
        Self {
            profile: VerificationProfile::development(),
            strict: false,
            max_waivers: None,
        }
    }

    /// Strict gate: pending obligations block, no waivers allowed.
    pub fn strict() -> Self {
        Self {
            profile: VerificationProfile::certification(),
            strict: true,
            max_waivers: Some(0),
        }
    }
}

/// Run the verification gate, returning the decision (which owns the report).
pub fn verification_gate(graph: &Graph, config: &GateConfig) -> GateDecision {
    let mut engine = VerificationEngine::new(config.profile.clone());
    let report = engine.verify(graph);

    let failed = report.summary.failed;
    let pending = report.summary.pending;
    let waived = report.summary.waived;

    // Check waiver limit
    if let Some(max) = config.max_waivers {
        if waived > max {
            return GateDecision::Halt {
                failed,
                pending,
                report,
            };
        }
    }

    // Check for failures
    if failed > 0 {
        return GateDecision::Halt {
            failed,
            pending,
            report,
        };
    }

    // In strict mode, pending obligations also block
    if config.strict && pending > 0 {
        return GateDecision::Halt {
            failed,
            pending,
            report,
        };
    }

    GateDecision::Pass { report, waived }
}

/// Run the verification gate and return an error if it halts.
pub fn gate_or_halt(
    graph: &Graph,
    config: &GateConfig,
) -> Result<VerificationReport, MaterializationError> {
    match verification_gate(graph, config) {
        GateDecision::Pass { report, .. } => Ok(report),
        GateDecision::Halt {
            failed, pending, ..
        } => Err(MaterializationError::VerificationFailed { failed, pending }),
    }
}
