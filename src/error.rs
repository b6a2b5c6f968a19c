use thiserror::Error;

/// Errors raised while reading, clustering or collapsing transcripts.
///
/// Tolerance mismatches are not errors; every variant here stops the run.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed GFF record at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("exon at line {line} belongs to '{exon_transcript}' but the current transcript is '{current}'")]
    ExonMismatch {
        line: usize,
        exon_transcript: String,
        current: String,
    },

    #[error("exon at line {line} appears before any transcript record")]
    OrphanExon { line: usize },

    #[error("input is not sorted: '{id}' at {chrom}:{start} follows {prev_chrom}:{prev_start}")]
    UnsortedInput {
        id: String,
        chrom: String,
        start: i64,
        prev_chrom: String,
        prev_start: i64,
    },

    #[error("transcript '{0}' has no exons")]
    NoExons(String),

    #[error("cluster '{0}' has no members")]
    EmptyCluster(String),

    #[error("cluster '{cluster}': member '{transcript}' has {found} exons, expected {expected}")]
    ExonCountMismatch {
        cluster: String,
        transcript: String,
        expected: usize,
        found: usize,
    },

    #[error("group id mismatch while merging '{left}' ({left_group:?}) with '{right}' ({right_group:?})")]
    GroupMismatch {
        left: String,
        left_group: Option<String>,
        right: String,
        right_group: Option<String>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("pipeline stage '{0}' terminated unexpectedly")]
    StageFailed(&'static str),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
