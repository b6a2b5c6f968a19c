use isoclust::collapse::{collapse_locus, three_prime, LocusPool};
use isoclust::{Strand, Transcript};
use proptest::prelude::*;

/// Transcripts sharing a handful of 3' ends with 5' truncations of varying depth
fn partial_strategy() -> impl Strategy<Value = Transcript> {
    (
        prop_oneof![Just(Strand::Forward), Just(Strand::Reverse)],
        prop_oneof![Just(5000i64), Just(5010), Just(8000)],
        0usize..4,
        1i64..150,
        0i64..8,
    )
        .prop_map(|(strand, anchor, skipped, trim, jitter)| {
            // Full-length model: four 100 bp exons separated by 200 bp introns
            let model: Vec<(i64, i64)> = (0..4).map(|i| (anchor + 300 * i, anchor + 300 * i + 100)).collect();
            let mut intervals: Vec<(i64, i64)> = match strand {
                Strand::Forward => model[skipped..].to_vec(),
                _ => model[..model.len() - skipped].to_vec(),
            };
            let last = intervals.len() - 1;

            // 5' truncation on the side away from the 3' end, small 3' jitter
            match strand {
                Strand::Forward => {
                    intervals[0].0 = (intervals[0].0 + trim).min(intervals[0].1 - 1);
                    intervals[last].1 += jitter;
                }
                _ => {
                    intervals[last].1 = (intervals[last].1 - trim).max(intervals[last].0 + 1);
                    intervals[0].0 -= jitter;
                }
            }
            Transcript::from_intervals("t", "chr1", strand, &intervals)
        })
}

proptest! {
    #[test]
    fn locus_means_track_members(
        transcripts in proptest::collection::vec(partial_strategy(), 1..40),
        tolerance in 1u64..60,
    ) {
        let mut pool = LocusPool::new(tolerance);
        pool.extend(transcripts.clone());

        let mut assigned = 0;
        for (slot, locus) in pool.loci().iter().enumerate() {
            let members = pool.members(slot);
            prop_assert_eq!(locus.count, members.len());
            assigned += members.len();

            let mean = members.iter().map(|t| three_prime(t) as f64).sum::<f64>() / members.len() as f64;
            prop_assert!((locus.three_prime - mean).abs() < 1e-6);
            prop_assert!(members.iter().all(|t| t.strand == locus.strand && t.chrom == locus.chrom));
            prop_assert!(members.iter().all(|t| t.group_id.as_deref() == Some(locus.id.as_str())));
        }
        prop_assert_eq!(assigned, transcripts.len());
    }

    #[test]
    fn collapse_is_idempotent_and_keeps_size(
        transcripts in proptest::collection::vec(partial_strategy(), 1..40),
        five in 0u64..300,
        internal in 0u64..10,
    ) {
        let total: usize = transcripts.iter().map(|t| t.size).sum();
        let mut pool = LocusPool::new(30);
        pool.extend(transcripts);

        let mut collapsed_total = 0;
        for (locus, members) in pool.into_loci() {
            let once = collapse_locus(&locus, members, five, internal).unwrap();
            let twice = collapse_locus(&locus, once.clone(), five, internal).unwrap();
            prop_assert_eq!(&once, &twice);
            collapsed_total += once.iter().map(|t| t.size).sum::<usize>();
        }
        prop_assert_eq!(collapsed_total, total);
    }
}

#[test]
fn locus_pool_running_mean_example() {
    let mut pool = LocusPool::new(50);
    for (id, end) in [("a", 1000), ("b", 1030), ("c", 1100)] {
        pool.insert(Transcript::from_intervals(id, "chr1", Strand::Forward, &[(end - 200, end)]));
    }

    let loci = pool.loci();
    assert_eq!(loci.len(), 2);
    assert_eq!(loci[0].count, 2);
    assert!((loci[0].three_prime - 1015.0).abs() < 1e-9);
    assert_eq!(loci[1].count, 1);
    assert!((loci[1].three_prime - 1100.0).abs() < 1e-9);
}
