//! Clustering and collapsing of long-read transcript alignments
//!
//! `cluster` groups coordinate-sorted transcripts with the same exon
//! structure and reduces each cluster to a median consensus. `collapse`
//! groups transcripts by their 3' end and folds 5' truncated copies into
//! the longest compatible transcript.

pub mod cluster;
pub mod collapse;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod stats;
pub mod transcript;

pub use config::{ClusterConfig, CollapseConfig};
pub use error::{ClusterError, Result};
pub use transcript::{Exon, Strand, Transcript};
