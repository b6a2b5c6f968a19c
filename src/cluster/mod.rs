//! Streaming clustering of transcripts and per-cluster consensus

pub mod consensus;
pub mod relations;
pub mod stream;

pub use consensus::{median_consensus, passes_coverage};
pub use relations::{hard_related, soft_related};
pub use stream::{cluster_transcripts, ClusterStream, TranscriptCluster};
