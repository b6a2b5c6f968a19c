//! Pipelines behind the `cluster`, `collapse` and `sort` subcommands

pub mod cluster;
pub mod collapse;
pub mod sort;

pub use cluster::run_cluster;
pub use collapse::run_collapse;
pub use sort::run_sort;

use crate::error::Result;
use crate::io::GffTranscriptReader;
use crate::transcript::Transcript;
use crossbeam::channel::Sender;
use std::io::BufRead;

/// Parse transcripts and forward them downstream until the input ends, an
/// error has been forwarded or the receiver hangs up.
pub(crate) fn read_stage<R: BufRead>(input: R, output: Sender<Result<Transcript>>) {
    for record in GffTranscriptReader::new(input) {
        if output.send(record).is_err() {
            break;
        }
    }
}
