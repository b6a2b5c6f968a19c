//! Tolerances and filters for the clustering and collapsing pipelines

use crate::error::{ClusterError, Result};
use serde::Serialize;

/// Capacity of the bounded queues between pipeline stages
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Configuration for streaming clustering and consensus
#[derive(Clone, Debug, Serialize)]
pub struct ClusterConfig {
    /// Tolerance for internal exon boundaries (splice junctions)
    pub boundary_tolerance: u64,
    /// Tolerance for the transcript start and the terminal exon boundaries
    pub end_boundary_tolerance: u64,
    /// Minimum number of members for a cluster to be reported
    pub min_coverage: usize,
    /// Minimum share (percent) of its soft group a cluster must hold
    pub min_isoform_percent: f64,
    /// Bounded queue capacity between stages
    pub channel_capacity: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            boundary_tolerance: 10,
            end_boundary_tolerance: 30,
            min_coverage: 10,
            min_isoform_percent: 1.0,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.min_isoform_percent) {
            return Err(ClusterError::Config(format!(
                "minimum isoform percent must be within [0, 100], got {}",
                self.min_isoform_percent
            )));
        }
        check_capacity(self.channel_capacity)
    }
}

/// Configuration for 3' locus assignment and partial collapsing
#[derive(Clone, Debug, Serialize)]
pub struct CollapseConfig {
    /// Maximum distance (exclusive) between a transcript 3' end and a locus mean
    pub three_prime_tolerance: u64,
    /// Tolerance on the 5' boundary of the shorter transcript
    pub five_prime_tolerance: u64,
    /// Tolerance on internal exon boundaries
    pub internal_tolerance: u64,
    /// Drop single-exon transcripts before locus assignment
    pub discard_monoexonic: bool,
    /// Drop transcripts without orientation before locus assignment
    pub discard_unoriented: bool,
    /// Bounded queue capacity between stages
    pub channel_capacity: usize,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            three_prime_tolerance: 30,
            five_prime_tolerance: 5000,
            internal_tolerance: 5,
            discard_monoexonic: false,
            discard_unoriented: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl CollapseConfig {
    pub fn validate(&self) -> Result<()> {
        check_capacity(self.channel_capacity)
    }
}

fn check_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(ClusterError::Config("channel capacity must be positive".to_string()));
    }
    Ok(())
}
