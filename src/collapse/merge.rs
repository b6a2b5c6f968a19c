//! Merging of partial transcripts into longer ones sharing their 3' end
//!
//! Within a locus every transcript ends at (roughly) the same 3' position, so
//! exons are aligned from the 3' end: the last exons for forward loci and the
//! first exons for reverse loci. The shorter transcript's 5' boundary is
//! allowed to drift by the five-prime tolerance, every splice junction must
//! agree within the internal tolerance.

use crate::collapse::locus::Locus;
use crate::config::CollapseConfig;
use crate::error::{ClusterError, Result};
use crate::transcript::{Strand, Transcript};
use rayon::prelude::*;
use tracing::{debug, info};

/// Fold `short` into `long`: the structure of `long` is kept and the sizes add up.
pub fn collapse_into(long: &Transcript, short: &Transcript) -> Result<Transcript> {
    if long.group_id != short.group_id {
        return Err(ClusterError::GroupMismatch {
            left: long.id.clone(),
            left_group: long.group_id.clone(),
            right: short.id.clone(),
            right_group: short.group_id.clone(),
        });
    }

    let mut merged = long.clone();
    merged.size = long.size + short.size;
    Ok(merged)
}

/// The transcript with more exons comes first; `a` wins ties.
fn long_short<'a>(a: &'a Transcript, b: &'a Transcript) -> (&'a Transcript, &'a Transcript) {
    if b.exon_count() > a.exon_count() {
        (b, a)
    } else {
        (a, b)
    }
}

fn check_exons(a: &Transcript, b: &Transcript) -> Result<()> {
    for tr in [a, b] {
        if tr.has_no_exons() {
            return Err(ClusterError::NoExons(tr.id.clone()));
        }
    }
    Ok(())
}

fn forward_compatible(long: &Transcript, short: &Transcript, five_tol: u64, int_tol: u64) -> bool {
    let n_long = long.exon_count();
    let n_short = short.exon_count();
    let shift = n_long - n_short;

    for i in (shift..n_long).rev() {
        let s = i - shift;
        let delta_five = long.exon_start(i).abs_diff(short.exon_start(s));
        let delta_three = long.exon_end(i).abs_diff(short.exon_end(s));

        let ok = if i == n_long - 1 {
            // 3' end already agrees through locus membership
            if n_short > 1 {
                delta_five <= int_tol
            } else {
                delta_five <= five_tol
            }
        } else if s == 0 {
            delta_five <= five_tol && delta_three <= int_tol
        } else {
            delta_five <= int_tol && delta_three <= int_tol
        };

        if !ok {
            return false;
        }
    }

    true
}

fn reverse_compatible(long: &Transcript, short: &Transcript, five_tol: u64, int_tol: u64) -> bool {
    let n_short = short.exon_count();

    for i in 0..n_short {
        let delta_three = long.exon_start(i).abs_diff(short.exon_start(i));
        let delta_five = long.exon_end(i).abs_diff(short.exon_end(i));

        let ok = if i == 0 {
            if n_short > 1 {
                delta_five <= int_tol
            } else {
                delta_five <= five_tol
            }
        } else if i == n_short - 1 {
            delta_three <= int_tol && delta_five <= five_tol
        } else {
            delta_three <= int_tol && delta_five <= int_tol
        };

        if !ok {
            return false;
        }
    }

    true
}

/// Try to merge two forward-strand transcripts aligned on their last exons.
///
/// Returns `Ok(None)` when any boundary falls outside its tolerance.
pub fn merge_forward(a: &Transcript, b: &Transcript, five_tol: u64, int_tol: u64) -> Result<Option<Transcript>> {
    check_exons(a, b)?;
    let (long, short) = long_short(a, b);
    if !forward_compatible(long, short, five_tol, int_tol) {
        return Ok(None);
    }
    collapse_into(long, short).map(Some)
}

/// Try to merge two reverse-strand transcripts aligned on their first exons.
pub fn merge_reverse(a: &Transcript, b: &Transcript, five_tol: u64, int_tol: u64) -> Result<Option<Transcript>> {
    check_exons(a, b)?;
    let (long, short) = long_short(a, b);
    if !reverse_compatible(long, short, five_tol, int_tol) {
        return Ok(None);
    }
    collapse_into(long, short).map(Some)
}

/// Merge in the direction given by the locus strand. Unoriented loci never merge.
pub fn try_merge(strand: Strand, a: &Transcript, b: &Transcript, five_tol: u64, int_tol: u64) -> Result<Option<Transcript>> {
    match strand {
        Strand::Forward => merge_forward(a, b, five_tol, int_tol),
        Strand::Reverse => merge_reverse(a, b, five_tol, int_tol),
        Strand::Unknown => Ok(None),
    }
}

/// One greedy pass: every transcript merges into the first compatible output
/// entry or is appended. Returns the output and the number of merges.
fn greedy_pass(
    transcripts: Vec<Transcript>,
    strand: Strand,
    five_tol: u64,
    int_tol: u64,
) -> Result<(Vec<Transcript>, usize)> {
    let mut out: Vec<Transcript> = Vec::with_capacity(transcripts.len());
    let mut merges = 0;

    for tr in transcripts {
        let mut merged = None;
        for (i, existing) in out.iter().enumerate() {
            if let Some(m) = try_merge(strand, existing, &tr, five_tol, int_tol)? {
                merged = Some((i, m));
                break;
            }
        }

        match merged {
            Some((i, m)) => {
                out[i] = m;
                merges += 1;
            }
            None => out.push(tr),
        }
    }

    Ok((out, merges))
}

/// Collapse the partial transcripts of one locus.
///
/// Passes repeat until one performs no merge, so collapsing the output again
/// is a no-op.
pub fn collapse_locus(locus: &Locus, transcripts: Vec<Transcript>, five_tol: u64, int_tol: u64) -> Result<Vec<Transcript>> {
    let input = transcripts.len();
    let (mut current, mut merges) = greedy_pass(transcripts, locus.strand, five_tol, int_tol)?;
    while merges > 0 {
        (current, merges) = greedy_pass(current, locus.strand, five_tol, int_tol)?;
    }

    if current.len() < input {
        debug!("{}: collapsed {} transcripts into {}", locus.id, input, current.len());
    }
    Ok(current)
}

/// Collapse every locus in parallel and gather the surviving transcripts
pub fn collapse_pool(loci: Vec<(Locus, Vec<Transcript>)>, config: &CollapseConfig) -> Result<Vec<Transcript>> {
    let n_loci = loci.len();
    let collapsed: Vec<Vec<Transcript>> = loci
        .into_par_iter()
        .map(|(locus, transcripts)| {
            collapse_locus(&locus, transcripts, config.five_prime_tolerance, config.internal_tolerance)
        })
        .collect::<Result<_>>()?;

    let transcripts: Vec<Transcript> = collapsed.into_iter().flatten().collect();
    info!("Collapsed {} loci into {} transcripts", n_loci, transcripts.len());
    Ok(transcripts)
}
