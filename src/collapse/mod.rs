//! 3' locus assignment and collapsing of partial transcripts

pub mod locus;
pub mod merge;

pub use locus::{three_prime, Locus, LocusPool};
pub use merge::{collapse_into, collapse_locus, collapse_pool, merge_forward, merge_reverse, try_merge};
