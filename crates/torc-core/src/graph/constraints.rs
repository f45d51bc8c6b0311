//! Constraint and lifetime metadata for edges and regions.
//!
//! These types annotate edges with ownership/lifetime semantics and
//! regions with execution constraints.

use serde::{Deserialize, Serialize};

use super::region::RegionId;

/// Lifetime annotation for an edge, describing how long the data persists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifetime {
    /// Data lives for the duration of the specified region.
    Region(RegionId),
    /// Data lives for the entire program execution.
    Static,
    /// Data lifetime is manually managed (e.g., via Allocate/Deallocate).
    Manual,
    /// Data lives for at most the specified number of nanoseconds.
    Bounded(u64),
}

/// Bandwidth constraint for an edge, specifying data throughput requirements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BandwidthConstraint {
    /// Minimum required throughput in bytes per second.
    pub min_bytes_per_sec: u64,
    /// Optional maximum throughput cap in bytes per second.
    pub max_bytes_per_sec: Option<u64>,
}

impl BandwidthConstraint {
    /// Create a bandwidth constraint with only a minimum requirement.
    pub fn min(min_bytes_per_sec: u64) -> Self {
        Self {
            min_bytes_per_sec,
            max_bytes_per_sec: None,
        }
    }

    /// Create a bandwidth constraint with both min and max bounds.
    ///
    /// # Panics
    ///
    /// Panics if `min_bytes_per_sec > max_bytes_per_sec`.
    pub fn bounded(min_bytes_per_sec: u64, max_bytes_per_sec: u64) -> Self {
        assert!(
            min_bytes_per_sec <= max_bytes_per_sec,
            "BandwidthConstraint: min ({min_bytes_per_sec}) must be <= max ({max_bytes_per_sec})"
        );
        Self {
            min_bytes_per_sec,
            max_bytes_per_sec: Some(max_bytes_per_sec),
        }
    }
}

/// Execution constraint that can be applied to a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    /// Maximum wall-clock time in nanoseconds.
    MaxTime(u64),
    /// Maximum memory usage in bytes.
    MaxMemory(usize),
    /// Maximum energy budget in microjoules.
    MaxEnergy(u64),
    /// User-defined constraint with a name and description.
    Custom { name: String, description: String },
}
