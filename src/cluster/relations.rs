use crate::transcript::Transcript;

/// Decide whether two transcripts start close enough on the same chromosome
/// to belong to the same streaming window.
pub fn soft_related(a: &Transcript, b: &Transcript, end_tolerance: u64) -> bool {
    a.chrom == b.chrom && a.start.abs_diff(b.start) <= end_tolerance
}

/// Decide whether two transcripts share the same exon structure.
///
/// The first exon start and the last exon end are compared with
/// `end_tolerance`; every other exon boundary uses `boundary_tolerance`.
pub fn hard_related(a: &Transcript, b: &Transcript, boundary_tolerance: u64, end_tolerance: u64) -> bool {
    if a.chrom != b.chrom || a.strand != b.strand {
        return false;
    }

    if a.start.abs_diff(b.start) > end_tolerance {
        return false;
    }

    let n = a.exon_count();
    if n != b.exon_count() {
        return false;
    }

    for i in 0..n {
        let delta_start = a.exon_start(i).abs_diff(b.exon_start(i));
        let delta_end = a.exon_end(i).abs_diff(b.exon_end(i));

        let start_tolerance = if i == 0 { end_tolerance } else { boundary_tolerance };
        if delta_start > start_tolerance {
            return false;
        }

        let end_tol = if i == n - 1 { end_tolerance } else { boundary_tolerance };
        if delta_end > end_tol {
            return false;
        }
    }

    true
}

/// Check whether `tr` is softly related to any member of `cache`.
/// An empty cache accepts everything.
pub fn belongs_to_window(tr: &Transcript, cache: &[Transcript], end_tolerance: u64) -> bool {
    cache.is_empty() || cache.iter().any(|member| soft_related(tr, member, end_tolerance))
}
