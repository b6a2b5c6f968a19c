use clap::{Parser, Subcommand};
use isoclust::config::{ClusterConfig, CollapseConfig, DEFAULT_CHANNEL_CAPACITY};

#[derive(Parser, Debug)]
#[command(name = "isoclust", version, about = "Cluster and collapse long-read transcript alignments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log per-group and per-locus details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster sorted transcripts by exon structure and emit median consensus transcripts
    Cluster {
        /// Sorted GFF2(.gz) input, `-` or omitted for stdin
        input: Option<String>,

        /// Tolerance for internal exon boundaries
        #[arg(short = 'd', long, default_value_t = 10)]
        boundary_tolerance: u64,

        /// Tolerance for transcript ends and terminal exon boundaries
        #[arg(short = 'e', long, default_value_t = 30)]
        end_tolerance: u64,

        /// Minimum cluster size
        #[arg(short = 'c', long, default_value_t = 10)]
        min_coverage: usize,

        /// Minimum share of its soft group a cluster must hold (percent)
        #[arg(short = 'p', long, default_value_t = 1.0)]
        min_isoform_percent: f64,

        /// Write cluster memberships in tabular format to this file
        #[arg(short = 'a', long)]
        clusters: Option<String>,

        /// Write run statistics as JSON to this file
        #[arg(long)]
        stats: Option<String>,

        /// Output GFF2 file, stdout if omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Capacity of the queues between pipeline stages
        #[arg(long, default_value_t = DEFAULT_CHANNEL_CAPACITY)]
        channel_capacity: usize,
    },

    /// Collapse 5' truncated transcripts into longer ones sharing their 3' end
    Collapse {
        /// GFF2(.gz) input, `-` or omitted for stdin
        input: Option<String>,

        /// Tolerance for internal exon boundaries
        #[arg(short = 'd', long, default_value_t = 5)]
        internal_tolerance: u64,

        /// Tolerance for 3' ends when assigning loci
        #[arg(short = 'e', long, default_value_t = 30)]
        three_prime_tolerance: u64,

        /// Tolerance for the 5' end of the shorter transcript
        #[arg(short = 'f', long, default_value_t = 5000)]
        five_prime_tolerance: u64,

        /// Discard single-exon transcripts
        #[arg(short = 'M', long)]
        discard_monoexonic: bool,

        /// Discard transcripts without strand
        #[arg(short = 'U', long)]
        discard_unoriented: bool,

        /// Write run statistics as JSON to this file
        #[arg(long)]
        stats: Option<String>,

        /// Output GFF2 file, stdout if omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Number of threads
        #[arg(short, long, default_value_t = num_cpus::get())]
        threads: usize,

        /// Capacity of the queues between pipeline stages
        #[arg(long, default_value_t = DEFAULT_CHANNEL_CAPACITY)]
        channel_capacity: usize,
    },

    /// Sort transcripts by chromosome, start and length
    Sort {
        /// GFF2(.gz) input, `-` or omitted for stdin
        input: Option<String>,

        /// Output GFF2 file, stdout if omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}

pub fn cluster_config(
    boundary_tolerance: u64,
    end_tolerance: u64,
    min_coverage: usize,
    min_isoform_percent: f64,
    channel_capacity: usize,
) -> ClusterConfig {
    ClusterConfig {
        boundary_tolerance,
        end_boundary_tolerance: end_tolerance,
        min_coverage,
        min_isoform_percent,
        channel_capacity,
    }
}

pub fn collapse_config(
    internal_tolerance: u64,
    three_prime_tolerance: u64,
    five_prime_tolerance: u64,
    discard_monoexonic: bool,
    discard_unoriented: bool,
    channel_capacity: usize,
) -> CollapseConfig {
    CollapseConfig {
        three_prime_tolerance,
        five_prime_tolerance,
        internal_tolerance,
        discard_monoexonic,
        discard_unoriented,
        channel_capacity,
    }
}
