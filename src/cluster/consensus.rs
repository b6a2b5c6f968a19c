use crate::cluster::stream::TranscriptCluster;
use crate::error::{ClusterError, Result};
use crate::transcript::{Exon, Transcript};
use ndarray::Array1;
use ndarray_stats::interpolate::Midpoint;
use ndarray_stats::Quantile1dExt;
use noisy_float::types::n64;

/// Median of a set of coordinates. Even counts take the midpoint of the two
/// middle values, rounded down to a whole base.
fn median_coordinate(values: Vec<i64>, cluster_id: &str) -> Result<i64> {
    let mut values = Array1::from(values);
    values
        .quantile_mut(n64(0.5), &Midpoint)
        .map_err(|_| ClusterError::EmptyCluster(cluster_id.to_string()))
}

/// Build a representative transcript for a cluster from the per-exon medians
/// of its members' exon boundaries.
///
/// Starts and ends are summarised independently. The first member provides
/// the chromosome, strand and exon count.
pub fn median_consensus(cluster: &TranscriptCluster) -> Result<Transcript> {
    let template = cluster
        .transcripts
        .first()
        .ok_or_else(|| ClusterError::EmptyCluster(cluster.id.clone()))?;

    let n_exons = template.exon_count();
    for tr in &cluster.transcripts {
        if tr.has_no_exons() {
            return Err(ClusterError::NoExons(tr.id.clone()));
        }
        if tr.exon_count() != n_exons {
            return Err(ClusterError::ExonCountMismatch {
                cluster: cluster.id.clone(),
                transcript: tr.id.clone(),
                expected: n_exons,
                found: tr.exon_count(),
            });
        }
    }

    let mut boundaries = Vec::with_capacity(n_exons);
    for i in 0..n_exons {
        let starts = cluster.transcripts.iter().map(|tr| tr.exon_start(i)).collect();
        let ends = cluster.transcripts.iter().map(|tr| tr.exon_end(i)).collect();
        boundaries.push((
            median_coordinate(starts, &cluster.id)?,
            median_coordinate(ends, &cluster.id)?,
        ));
    }

    // Transcript starts at the start of the first exon
    let pos = boundaries[0].0;
    let exons = boundaries
        .iter()
        .map(|&(start, end)| Exon::new(start - pos, end - start))
        .collect();

    Ok(Transcript::new(cluster.id.clone(), template.chrom.clone(), pos, template.strand, exons)
        .with_group(cluster.group_id.clone())
        .with_size(cluster.len()))
}

/// Check whether a cluster is large enough to be reported
pub fn passes_coverage(cluster: &TranscriptCluster, min_coverage: usize, min_isoform_percent: f64) -> bool {
    cluster.len() >= min_coverage && cluster.isoform_percent() >= min_isoform_percent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Strand;

    fn cluster_of(transcripts: Vec<Transcript>, locus_size: usize) -> TranscriptCluster {
        let mut cluster = TranscriptCluster::new("cluster_1", "group_1", locus_size);
        cluster.transcripts = transcripts;
        cluster
    }

    #[test]
    fn test_single_exon_median() {
        let cluster = cluster_of(
            vec![
                Transcript::from_intervals("a", "chr1", Strand::Forward, &[(100, 200)]),
                Transcript::from_intervals("b", "chr1", Strand::Forward, &[(102, 198)]),
                Transcript::from_intervals("c", "chr1", Strand::Forward, &[(104, 202)]),
            ],
            3,
        );

        let cons = median_consensus(&cluster).unwrap();
        assert_eq!(cons.id, "cluster_1");
        assert_eq!(cons.group_id.as_deref(), Some("group_1"));
        assert_eq!(cons.size, 3);
        assert_eq!(cons.start, 102);
        assert_eq!(cons.exon_start(0), 102);
        assert_eq!(cons.exon_end(0), 200);
    }

    #[test]
    fn test_multi_exon_even_count() {
        let cluster = cluster_of(
            vec![
                Transcript::from_intervals("a", "chr3", Strand::Reverse, &[(1000, 1100), (1500, 1600)]),
                Transcript::from_intervals("b", "chr3", Strand::Reverse, &[(1003, 1102), (1501, 1611)]),
            ],
            2,
        );

        let cons = median_consensus(&cluster).unwrap();
        assert_eq!(cons.chrom, "chr3");
        assert_eq!(cons.strand, Strand::Reverse);
        assert_eq!(cons.exon_count(), 2);
        // Midpoints rounded down
        assert_eq!(cons.exon_start(0), 1001);
        assert_eq!(cons.exon_end(0), 1101);
        assert_eq!(cons.exon_start(1), 1500);
        assert_eq!(cons.exon_end(1), 1605);
        assert_eq!(cons.start, 1001);
    }

    #[test]
    fn test_structural_errors() {
        let empty = cluster_of(vec![], 0);
        assert!(matches!(median_consensus(&empty), Err(ClusterError::EmptyCluster(_))));

        let no_exons = cluster_of(vec![Transcript::new("x", "chr1", 5, Strand::Forward, vec![])], 1);
        assert!(matches!(median_consensus(&no_exons), Err(ClusterError::NoExons(_))));

        let mixed = cluster_of(
            vec![
                Transcript::from_intervals("a", "chr1", Strand::Forward, &[(100, 200)]),
                Transcript::from_intervals("b", "chr1", Strand::Forward, &[(100, 150), (170, 200)]),
            ],
            2,
        );
        assert!(matches!(
            median_consensus(&mixed),
            Err(ClusterError::ExonCountMismatch { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn test_passes_coverage() {
        let members = (0..3)
            .map(|i| Transcript::from_intervals(format!("t{}", i), "chr1", Strand::Forward, &[(100, 200)]))
            .collect();
        let cluster = cluster_of(members, 12);

        assert!(passes_coverage(&cluster, 3, 25.0));
        assert!(!passes_coverage(&cluster, 4, 25.0));
        assert!(!passes_coverage(&cluster, 3, 26.0));
    }
}
