use crate::config::{ClusterConfig, CollapseConfig};
use crate::error::Result;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fs::File;
use std::io::BufWriter;

/// Summary of a distribution of group sizes
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SizeSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub max: usize,
}

impl SizeSummary {
    pub fn from_sizes(sizes: &[usize]) -> Self {
        if sizes.is_empty() {
            return SizeSummary::default();
        }

        let values: Vec<f64> = sizes.iter().map(|&s| s as f64).collect();
        // Sample deviation is undefined for a single value
        let std_dev = if values.len() > 1 { values.iter().std_dev() } else { 0.0 };

        SizeSummary {
            count: sizes.len(),
            mean: values.iter().mean(),
            std_dev,
            max: sizes.iter().copied().max().unwrap_or(0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClusterRunStats {
    pub config: ClusterConfig,
    pub transcripts: usize,
    pub soft_groups: usize,
    pub clusters: SizeSummary,
    /// Clusters passing the coverage filters
    pub reported: usize,
    pub filtered: usize,
}

impl ClusterRunStats {
    pub fn new(config: &ClusterConfig) -> Self {
        ClusterRunStats {
            config: config.clone(),
            transcripts: 0,
            soft_groups: 0,
            clusters: SizeSummary::default(),
            reported: 0,
            filtered: 0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollapseRunStats {
    pub config: CollapseConfig,
    pub transcripts: usize,
    /// Transcripts dropped by the monoexonic/unoriented filters
    pub discarded: usize,
    pub loci: SizeSummary,
    /// Distance between the outermost 3' ends of each locus
    pub three_prime_spread: SizeSummary,
    /// Transcripts left after collapsing
    pub collapsed: usize,
}

impl CollapseRunStats {
    pub fn new(config: &CollapseConfig) -> Self {
        CollapseRunStats {
            config: config.clone(),
            transcripts: 0,
            discarded: 0,
            loci: SizeSummary::default(),
            three_prime_spread: SizeSummary::default(),
            collapsed: 0,
        }
    }
}

/// Write run statistics as pretty-printed JSON
pub fn write_stats<T: Serialize>(stats: &T, path: &str) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, stats).map_err(std::io::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_size_summary() {
        let summary = SizeSummary::from_sizes(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(summary.count, 8);
        assert_eq!(summary.max, 9);
        assert!((summary.mean - 5.0).abs() < 1e-9);
        // Sample standard deviation: sqrt(32 / 7)
        assert!((summary.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_size_summary_degenerate() {
        assert_eq!(SizeSummary::from_sizes(&[]), SizeSummary::default());

        let single = SizeSummary::from_sizes(&[3]);
        assert_eq!(single.std_dev, 0.0);
        assert_eq!(single.mean, 3.0);
    }

    #[test]
    fn test_write_stats_json() {
        let mut stats = CollapseRunStats::new(&CollapseConfig::default());
        stats.transcripts = 12;
        stats.collapsed = 5;

        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        write_stats(&stats, path).unwrap();

        let value: serde_json::Value = serde_json::from_reader(File::open(path).unwrap()).unwrap();
        assert_eq!(value["transcripts"], 12);
        assert_eq!(value["collapsed"], 5);
        assert_eq!(value["config"]["five_prime_tolerance"], 5000);
        assert_eq!(value["three_prime_spread"]["max"], 0);
    }
}
