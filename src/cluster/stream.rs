//! Streaming clustering of coordinate-sorted transcripts
//!
//! Transcripts arrive sorted by chromosome and start. Consecutive transcripts
//! whose starts are within the terminal tolerance of any cached transcript
//! form a soft group. When the next transcript falls outside the window the
//! soft group is split into hard clusters of identical exon structure.
//!
//! Hard clustering is greedy: each transcript joins the first cluster holding
//! a hard-related member, so the partition depends on arrival order.

use crate::cluster::relations::{belongs_to_window, hard_related};
use crate::config::ClusterConfig;
use crate::error::{ClusterError, Result};
use crate::transcript::Transcript;
use ahash::AHashSet;
use std::collections::VecDeque;
use std::mem;
use tracing::debug;

/// A set of transcripts sharing the same exon structure
#[derive(Debug, Clone)]
pub struct TranscriptCluster {
    /// Unique cluster identifier
    pub id: String,
    /// Identifier of the soft group the cluster was carved from
    pub group_id: String,
    /// Number of transcripts in the soft group
    pub locus_size: usize,
    /// Member transcripts in arrival order
    pub transcripts: Vec<Transcript>,
}

impl TranscriptCluster {
    pub fn new(id: impl Into<String>, group_id: impl Into<String>, locus_size: usize) -> Self {
        TranscriptCluster {
            id: id.into(),
            group_id: group_id.into(),
            locus_size,
            transcripts: Vec::with_capacity(1),
        }
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Share of the soft group held by this cluster, in percent
    pub fn isoform_percent(&self) -> f64 {
        if self.locus_size == 0 {
            return 0.0;
        }
        100.0 * self.transcripts.len() as f64 / self.locus_size as f64
    }
}

/// Split one soft group into hard clusters.
///
/// Cluster identifiers are drawn from `next_cluster`, which is advanced for
/// every cluster opened.
pub fn hard_cluster(
    cache: Vec<Transcript>,
    group_id: &str,
    boundary_tolerance: u64,
    end_tolerance: u64,
    next_cluster: &mut usize,
) -> Vec<TranscriptCluster> {
    let locus_size = cache.len();
    let mut clusters: Vec<TranscriptCluster> = Vec::new();

    for tr in cache {
        let found = clusters.iter().position(|cluster| {
            cluster
                .transcripts
                .iter()
                .any(|member| hard_related(&tr, member, boundary_tolerance, end_tolerance))
        });

        match found {
            Some(i) => clusters[i].transcripts.push(tr),
            None => {
                *next_cluster += 1;
                let mut cluster = TranscriptCluster::new(format!("cluster_{}", next_cluster), group_id, locus_size);
                cluster.transcripts.push(tr);
                clusters.push(cluster);
            }
        }
    }

    clusters
}

/// Lazy clustering adaptor over a sorted transcript stream
pub struct ClusterStream<I> {
    input: I,
    boundary_tolerance: u64,
    end_tolerance: u64,
    cache: Vec<Transcript>,
    pending: VecDeque<TranscriptCluster>,
    groups: usize,
    clusters: usize,
    current: Option<(String, i64)>,
    finished_chroms: AHashSet<String>,
    done: bool,
}

impl<I> ClusterStream<I>
where
    I: Iterator<Item = Result<Transcript>>,
{
    pub fn new(input: I, boundary_tolerance: u64, end_tolerance: u64) -> Self {
        ClusterStream {
            input,
            boundary_tolerance,
            end_tolerance,
            cache: Vec::with_capacity(1000),
            pending: VecDeque::new(),
            groups: 0,
            clusters: 0,
            current: None,
            finished_chroms: AHashSet::new(),
            done: false,
        }
    }

    pub fn from_config(input: I, config: &ClusterConfig) -> Self {
        Self::new(input, config.boundary_tolerance, config.end_boundary_tolerance)
    }

    /// Number of soft groups flushed so far
    pub fn groups_flushed(&self) -> usize {
        self.groups
    }

    fn check_order(&mut self, tr: &Transcript) -> Result<()> {
        if tr.has_no_exons() {
            return Err(ClusterError::NoExons(tr.id.clone()));
        }

        match self.current.as_mut() {
            Some((chrom, start)) if *chrom == tr.chrom => {
                if tr.start < *start {
                    return Err(unsorted(tr, chrom, *start));
                }
                *start = tr.start;
            }
            Some((chrom, start)) => {
                if self.finished_chroms.contains(&tr.chrom) {
                    return Err(unsorted(tr, chrom, *start));
                }
                self.finished_chroms.insert(mem::take(chrom));
                *chrom = tr.chrom.clone();
                *start = tr.start;
            }
            None => self.current = Some((tr.chrom.clone(), tr.start)),
        }

        Ok(())
    }

    fn flush(&mut self, cache: Vec<Transcript>) {
        if cache.is_empty() {
            return;
        }

        self.groups += 1;
        let group_id = format!("group_{}", self.groups);
        let size = cache.len();
        let clusters = hard_cluster(
            cache,
            &group_id,
            self.boundary_tolerance,
            self.end_tolerance,
            &mut self.clusters,
        );
        debug!("{}: {} transcripts split into {} clusters", group_id, size, clusters.len());
        self.pending.extend(clusters);
    }
}

fn unsorted(tr: &Transcript, prev_chrom: &str, prev_start: i64) -> ClusterError {
    ClusterError::UnsortedInput {
        id: tr.id.clone(),
        chrom: tr.chrom.clone(),
        start: tr.start,
        prev_chrom: prev_chrom.to_string(),
        prev_start,
    }
}

impl<I> Iterator for ClusterStream<I>
where
    I: Iterator<Item = Result<Transcript>>,
{
    type Item = Result<TranscriptCluster>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cluster) = self.pending.pop_front() {
                return Some(Ok(cluster));
            }
            if self.done {
                return None;
            }

            match self.input.next() {
                Some(Ok(tr)) => {
                    if let Err(e) = self.check_order(&tr) {
                        self.done = true;
                        return Some(Err(e));
                    }
                    if belongs_to_window(&tr, &self.cache, self.end_tolerance) {
                        self.cache.push(tr);
                    } else {
                        let cache = mem::replace(&mut self.cache, vec![tr]);
                        self.flush(cache);
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    let cache = mem::take(&mut self.cache);
                    self.flush(cache);
                }
            }
        }
    }
}

/// Cluster an in-memory, sorted list of transcripts
pub fn cluster_transcripts(transcripts: Vec<Transcript>, config: &ClusterConfig) -> Result<Vec<TranscriptCluster>> {
    ClusterStream::from_config(transcripts.into_iter().map(Ok), config).collect()
}
