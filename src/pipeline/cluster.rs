//! Cluster pipeline: reader -> streaming clusterer -> consensus writer
//!
//! The reader and clusterer run on scoped threads connected by bounded
//! channels, the consumer runs on the calling thread. A consumer error drops
//! its receiver, which stops the upstream stages at their next send.

use crate::cluster::{median_consensus, passes_coverage, ClusterStream, TranscriptCluster};
use crate::config::ClusterConfig;
use crate::error::{ClusterError, Result};
use crate::io::{ClusterTabWriter, GffWriter};
use crate::pipeline::read_stage;
use crate::stats::{ClusterRunStats, SizeSummary};
use crate::transcript::Transcript;
use crossbeam::channel::{bounded, Receiver, Sender};
use std::io::{BufRead, Write};
use std::thread;
use tracing::info;

fn cluster_stage(input: Receiver<Result<Transcript>>, output: Sender<Result<TranscriptCluster>>, config: &ClusterConfig) -> (usize, usize) {
    let mut transcripts = 0;
    let counted = input.into_iter().inspect(|tr| {
        if tr.is_ok() {
            transcripts += 1;
        }
    });

    let mut stream = ClusterStream::from_config(counted, config);
    for cluster in stream.by_ref() {
        if output.send(cluster).is_err() {
            break;
        }
    }
    let groups = stream.groups_flushed();
    drop(stream);

    (transcripts, groups)
}

/// Cluster a sorted GFF stream and write one consensus per reported cluster.
///
/// Membership of the reported clusters goes to `membership` when given.
pub fn run_cluster<R, W, T>(
    input: R,
    output: W,
    mut membership: Option<ClusterTabWriter<T>>,
    config: &ClusterConfig,
) -> Result<ClusterRunStats>
where
    R: BufRead + Send,
    W: Write,
    T: Write,
{
    config.validate()?;
    info!(
        "Clustering with boundary tolerance {}, end tolerance {}",
        config.boundary_tolerance, config.end_boundary_tolerance
    );

    let mut stats = ClusterRunStats::new(config);
    let mut writer = GffWriter::new(output);
    let mut sizes = Vec::new();

    let (tr_tx, tr_rx) = bounded(config.channel_capacity);
    let (cl_tx, cl_rx) = bounded(config.channel_capacity);

    let (transcripts, groups) = thread::scope(|scope| -> Result<(usize, usize)> {
        let reader = scope.spawn(move || read_stage(input, tr_tx));
        let clusterer = scope.spawn(move || cluster_stage(tr_rx, cl_tx, config));

        for cluster in cl_rx {
            let cluster = cluster?;
            sizes.push(cluster.len());

            if !passes_coverage(&cluster, config.min_coverage, config.min_isoform_percent) {
                stats.filtered += 1;
                continue;
            }

            if let Some(tab) = membership.as_mut() {
                tab.write_cluster(&cluster)?;
            }
            let consensus = median_consensus(&cluster)?;
            writer.write_transcript(&consensus)?;
            stats.reported += 1;
        }

        reader.join().map_err(|_| ClusterError::StageFailed("reader"))?;
        clusterer.join().map_err(|_| ClusterError::StageFailed("cluster"))
    })?;

    writer.flush()?;
    if let Some(tab) = membership.as_mut() {
        tab.flush()?;
    }

    stats.transcripts = transcripts;
    stats.soft_groups = groups;
    stats.clusters = SizeSummary::from_sizes(&sizes);
    info!(
        "Read {} transcripts into {} groups and {} clusters, {} reported",
        stats.transcripts, stats.soft_groups, stats.clusters.count, stats.reported
    );

    Ok(stats)
}
