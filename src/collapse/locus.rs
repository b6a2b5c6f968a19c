//! 3' end loci
//!
//! Loci live in a slot-indexed store; a side index maps each chromosome and
//! strand to its slots in creation order, so updating the running mean never
//! requires rekeying.

use crate::config::CollapseConfig;
use crate::transcript::{Strand, Transcript};
use ahash::AHashMap;
use tracing::debug;

/// 3' coordinate of a transcript. Unoriented transcripts use the start by convention.
pub fn three_prime(tr: &Transcript) -> i64 {
    match tr.strand {
        Strand::Forward => tr.end(),
        Strand::Reverse | Strand::Unknown => tr.start,
    }
}

/// A group of transcripts sharing a 3' end
#[derive(Debug, Clone)]
pub struct Locus {
    pub id: String,
    pub chrom: String,
    pub strand: Strand,
    /// Running mean of the members' 3' coordinates
    pub three_prime: f64,
    /// Number of members
    pub count: usize,
    /// Smallest 3' coordinate assigned
    pub min_three_prime: i64,
    /// Largest 3' coordinate assigned
    pub max_three_prime: i64,
}

impl Locus {
    /// Distance between the outermost 3' ends assigned to the locus
    pub fn three_prime_spread(&self) -> u64 {
        self.max_three_prime.abs_diff(self.min_three_prime)
    }

    fn new(id: String, tr: &Transcript) -> Self {
        let value = three_prime(tr);
        Locus {
            id,
            chrom: tr.chrom.clone(),
            strand: tr.strand,
            three_prime: value as f64,
            count: 1,
            min_three_prime: value,
            max_three_prime: value,
        }
    }

    fn update(&mut self, value: i64) {
        let n = self.count as f64;
        self.three_prime = (self.three_prime * n + value as f64) / (n + 1.0);
        self.count += 1;
        self.min_three_prime = self.min_three_prime.min(value);
        self.max_three_prime = self.max_three_prime.max(value);
    }
}

/// Pool of 3' loci and their transcripts
#[derive(Debug, Default)]
pub struct LocusPool {
    three_prime_tolerance: u64,
    discard_monoexonic: bool,
    discard_unoriented: bool,
    loci: Vec<Locus>,
    members: Vec<Vec<Transcript>>,
    index: AHashMap<String, AHashMap<Strand, Vec<usize>>>,
    discarded: usize,
}

impl LocusPool {
    pub fn new(three_prime_tolerance: u64) -> Self {
        LocusPool {
            three_prime_tolerance,
            ..Default::default()
        }
    }

    pub fn from_config(config: &CollapseConfig) -> Self {
        LocusPool {
            three_prime_tolerance: config.three_prime_tolerance,
            discard_monoexonic: config.discard_monoexonic,
            discard_unoriented: config.discard_unoriented,
            ..Default::default()
        }
    }

    /// Find the first locus (in creation order) compatible with `tr`
    pub fn search(&self, tr: &Transcript) -> Option<usize> {
        // Unoriented transcripts always start their own locus
        if tr.strand == Strand::Unknown {
            return None;
        }

        let value = three_prime(tr) as f64;
        let tolerance = self.three_prime_tolerance as f64;
        self.index
            .get(tr.chrom.as_str())?
            .get(&tr.strand)?
            .iter()
            .copied()
            .find(|&slot| (value - self.loci[slot].three_prime).abs() < tolerance)
    }

    /// Assign a transcript to a locus, creating one if needed.
    ///
    /// Returns `false` if the transcript was dropped by one of the filters.
    pub fn insert(&mut self, mut tr: Transcript) -> bool {
        if self.discard_monoexonic && tr.is_monoexonic() {
            self.discarded += 1;
            return false;
        }
        if self.discard_unoriented && tr.strand == Strand::Unknown {
            self.discarded += 1;
            return false;
        }

        match self.search(&tr) {
            Some(slot) => {
                self.loci[slot].update(three_prime(&tr));
                tr.group_id = Some(self.loci[slot].id.clone());
                self.members[slot].push(tr);
            }
            None => {
                let slot = self.loci.len();
                let locus = Locus::new(format!("locus_{}", slot + 1), &tr);
                debug!("New locus {} at {}:{} ({})", locus.id, locus.chrom, locus.three_prime, locus.strand);
                tr.group_id = Some(locus.id.clone());
                self.index
                    .entry(locus.chrom.clone())
                    .or_default()
                    .entry(locus.strand)
                    .or_default()
                    .push(slot);
                self.loci.push(locus);
                self.members.push(vec![tr]);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Number of transcripts dropped by the filters
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn loci(&self) -> &[Locus] {
        &self.loci
    }

    /// Transcripts assigned to the locus in `slot`
    pub fn members(&self, slot: usize) -> &[Transcript] {
        &self.members[slot]
    }

    /// Finalise the pool into loci with their transcripts, in creation order
    pub fn into_loci(self) -> Vec<(Locus, Vec<Transcript>)> {
        self.loci.into_iter().zip(self.members).collect()
    }
}

impl Extend<Transcript> for LocusPool {
    fn extend<T: IntoIterator<Item = Transcript>>(&mut self, iter: T) {
        for tr in iter {
            self.insert(tr);
        }
    }
}
