use std::cmp::Ordering;
use std::fmt;

/// Orientation of a transcript on its chromosome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
    Unknown,
}

impl Strand {
    /// Parse a GFF strand column. Anything other than `+` or `-` is unoriented.
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::Unknown,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unknown => '.',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An exon, positioned relative to the start of its transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exon {
    /// Offset of the exon start from the transcript start
    pub offset: i64,
    /// Exon length in bases
    pub length: i64,
}

impl Exon {
    pub fn new(offset: i64, length: i64) -> Self {
        Exon { offset, length }
    }

    /// Relative end (half-open)
    pub fn end(&self) -> i64 {
        self.offset + self.length
    }
}

/// A spliced transcript alignment with its exon structure and aggregate metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Transcript identifier
    pub id: String,

    /// Chromosome (reference sequence) name
    pub chrom: String,

    /// 0-based genomic start
    pub start: i64,

    /// Orientation
    pub strand: Strand,

    /// Exons in increasing genomic order
    exons: Vec<Exon>,

    /// Soft group or locus this transcript was assigned to
    pub group_id: Option<String>,

    /// Number of reads/transcripts represented by this record
    pub size: usize,
}

impl Transcript {
    /// Create a new transcript from exons relative to `start`
    pub fn new(id: impl Into<String>, chrom: impl Into<String>, start: i64, strand: Strand, exons: Vec<Exon>) -> Self {
        Transcript {
            id: id.into(),
            chrom: chrom.into(),
            start,
            strand,
            exons,
            group_id: None,
            size: 1,
        }
    }

    /// Create a transcript from absolute, 0-based half-open exon intervals.
    ///
    /// Exons are sorted by start and the transcript starts at the first exon.
    /// An empty interval list gives an exon-less transcript, which the
    /// clustering stages reject.
    pub fn from_intervals(
        id: impl Into<String>,
        chrom: impl Into<String>,
        strand: Strand,
        intervals: &[(i64, i64)],
    ) -> Self {
        let mut sorted = intervals.to_vec();
        sorted.sort_unstable();
        let start = sorted.first().map(|&(s, _)| s).unwrap_or(0);
        let exons = sorted
            .iter()
            .map(|&(s, e)| Exon::new(s - start, e - s))
            .collect();
        Transcript::new(id, chrom, start, strand, exons)
    }

    /// Set the group identifier for this transcript
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Set the aggregate size for this transcript
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    /// Replace the exon list. Exons are re-sorted by offset.
    pub fn set_exons(&mut self, mut exons: Vec<Exon>) {
        exons.sort_unstable_by_key(|e| e.offset);
        self.exons = exons;
    }

    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    pub fn is_monoexonic(&self) -> bool {
        self.exons.len() == 1
    }

    /// Absolute start of exon `i`
    pub fn exon_start(&self, i: usize) -> i64 {
        self.start + self.exons[i].offset
    }

    /// Absolute end of exon `i`
    pub fn exon_end(&self, i: usize) -> i64 {
        self.start + self.exons[i].end()
    }

    /// Absolute end of the transcript (end of the last exon)
    pub fn end(&self) -> i64 {
        self.exons.last().map(|e| self.start + e.end()).unwrap_or(self.start)
    }

    /// Genomic span covered by the transcript
    pub fn span(&self) -> i64 {
        self.end() - self.start
    }

    pub fn has_no_exons(&self) -> bool {
        self.exons.is_empty()
    }
}

/// Order transcripts by chromosome name, start and span
pub fn compare_by_coordinate(a: &Transcript, b: &Transcript) -> Ordering {
    a.chrom
        .cmp(&b.chrom)
        .then(a.start.cmp(&b.start))
        .then(a.span().cmp(&b.span()))
}

/// Sort transcripts by chromosome name, start and span
pub fn sort_transcripts(transcripts: &mut [Transcript]) {
    transcripts.sort_by(compare_by_coordinate);
}
