pub mod cluster_tab;
pub mod gff;

pub use cluster_tab::{create_cluster_tab, ClusterTabWriter};
pub use gff::{create_output, open_gff, read_transcripts, GffTranscriptReader, GffWriter};
