//! Collapse pipeline: reader -> 3' locus pool -> parallel collapse -> sorted output

use crate::collapse::{collapse_pool, LocusPool};
use crate::config::CollapseConfig;
use crate::error::{ClusterError, Result};
use crate::io::GffWriter;
use crate::pipeline::read_stage;
use crate::stats::{CollapseRunStats, SizeSummary};
use crate::transcript::sort_transcripts;
use crossbeam::channel::bounded;
use std::io::{BufRead, Write};
use std::thread;
use tracing::info;

/// Assign every transcript to a 3' locus, collapse partial transcripts
/// within each locus and write the survivors sorted by coordinate.
pub fn run_collapse<R, W>(input: R, output: W, config: &CollapseConfig) -> Result<CollapseRunStats>
where
    R: BufRead + Send,
    W: Write,
{
    config.validate()?;
    info!(
        "Collapsing with 3' tolerance {}, 5' tolerance {}, internal tolerance {}",
        config.three_prime_tolerance, config.five_prime_tolerance, config.internal_tolerance
    );

    let mut stats = CollapseRunStats::new(config);
    let mut pool = LocusPool::from_config(config);
    let (tx, rx) = bounded(config.channel_capacity);

    thread::scope(|scope| -> Result<()> {
        let reader = scope.spawn(move || read_stage(input, tx));

        for tr in rx {
            pool.insert(tr?);
            stats.transcripts += 1;
        }

        reader.join().map_err(|_| ClusterError::StageFailed("reader"))
    })?;

    stats.discarded = pool.discarded();
    let spreads: Vec<usize> = pool
        .loci()
        .iter()
        .map(|locus| locus.three_prime_spread() as usize)
        .collect();
    stats.three_prime_spread = SizeSummary::from_sizes(&spreads);

    let loci = pool.into_loci();
    let sizes: Vec<usize> = loci.iter().map(|(_, members)| members.len()).collect();
    stats.loci = SizeSummary::from_sizes(&sizes);
    info!(
        "Assigned {} transcripts to {} loci ({} discarded)",
        stats.transcripts - stats.discarded,
        stats.loci.count,
        stats.discarded
    );

    let mut transcripts = collapse_pool(loci, config)?;
    sort_transcripts(&mut transcripts);
    stats.collapsed = transcripts.len();

    let mut writer = GffWriter::new(output);
    writer.write_transcripts(&transcripts)?;
    writer.flush()?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_transcripts;

    // Full-length forward transcript, a 5' truncated copy, and an unrelated
    // reverse transcript listed first
    const INPUT: &str = "\
chr2\tx\tmRNA\t101\t300\t1\t-\t.\ttranscript_id \"rev\";
chr2\tx\texon\t101\t300\t1\t-\t.\ttranscript_id \"rev\";
chr1\tx\tmRNA\t101\t600\t2\t+\t.\ttranscript_id \"full\";
chr1\tx\texon\t101\t200\t2\t+\t.\ttranscript_id \"full\";
chr1\tx\texon\t301\t400\t2\t+\t.\ttranscript_id \"full\";
chr1\tx\texon\t501\t600\t2\t+\t.\ttranscript_id \"full\";
chr1\tx\tmRNA\t351\t610\t3\t+\t.\ttranscript_id \"partial\";
chr1\tx\texon\t351\t400\t3\t+\t.\ttranscript_id \"partial\";
chr1\tx\texon\t501\t610\t3\t+\t.\ttranscript_id \"partial\";
";

    #[test]
    fn test_run_collapse() {
        let mut out = Vec::new();
        let stats = run_collapse(INPUT.as_bytes(), &mut out, &CollapseConfig::default()).unwrap();

        assert_eq!(stats.transcripts, 3);
        assert_eq!(stats.loci.count, 2);
        assert_eq!(stats.collapsed, 2);
        // 3' ends 600 and 610 share a locus, the reverse locus has one member
        assert_eq!(stats.three_prime_spread.max, 10);
        assert_eq!(stats.three_prime_spread.count, 2);
        assert!((stats.three_prime_spread.mean - 5.0).abs() < 1e-9);

        let trs = read_transcripts(out.as_slice()).unwrap();
        let ids: Vec<&str> = trs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["full", "rev"]);
        assert_eq!(trs[0].size, 5);
        assert_eq!(trs[0].exon_count(), 3);
        assert_eq!(trs[0].group_id.as_deref(), Some("locus_2"));
    }

    #[test]
    fn test_run_collapse_discards() {
        let config = CollapseConfig {
            discard_monoexonic: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        let stats = run_collapse(INPUT.as_bytes(), &mut out, &config).unwrap();

        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.collapsed, 1);
    }
}
