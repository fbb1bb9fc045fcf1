use ahash::AHashMap;

use crate::{
    accession::Accession,
    candidate::{MatchCandidate, MatchStatus},
    error::MatchError,
    scorefile::ScorefileRow,
};

/// One row per accession (spec §3 `FilterSummary`), produced by the coverage
/// gate and left-joined onto the summary log in §4.6.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSummary {
    pub accession: Accession,
    pub score_pass: bool,
    /// Fraction of scorefile rows with at least one matched candidate.
    pub rate: f64,
}

/// Computes per-accession coverage and fails the run if any accession falls
/// below `min_overlap` (spec §4.4).
///
/// `min_overlap == 0.0` disables the ratio gate, but an empty final
/// candidate set against a non-empty scorefile always fails with
/// [`MatchError::NoMatches`], independent of `min_overlap`.
pub fn coverage_gate(
    scorefile: &[ScorefileRow],
    candidates: &[MatchCandidate],
    min_overlap: f64,
) -> Result<Vec<FilterSummary>, MatchError> {
    if scorefile.is_empty() {
        return Ok(Vec::new());
    }

    let any_matched = candidates.iter().any(|c| c.match_status == MatchStatus::Matched);
    if !any_matched {
        return Err(MatchError::NoMatches);
    }

    let mut matched_rows: AHashMap<&Accession, ahash::AHashSet<u64>> = AHashMap::default();
    for candidate in candidates.iter().filter(|c| c.match_status == MatchStatus::Matched) {
        matched_rows.entry(&candidate.accession).or_default().insert(candidate.row_nr);
    }

    let mut total_rows: AHashMap<&Accession, u64> = AHashMap::default();
    for row in scorefile {
        *total_rows.entry(&row.accession).or_insert(0) += 1;
    }

    // Sorted up front so that, if more than one accession fails, the
    // reported `CoverageBelowThreshold { accession, .. }` is deterministic
    // rather than depending on the hash map's iteration order (spec §5:
    // outputs, including errors, must be bit-identical across runs).
    let mut accessions: Vec<&Accession> = total_rows.keys().copied().collect();
    accessions.sort();

    let mut summaries = Vec::with_capacity(accessions.len());
    for accession in accessions {
        let total = *total_rows.get(accession).expect("accession came from total_rows's own keys");
        let matched = matched_rows.get(accession).map(|rows| rows.len() as u64).unwrap_or(0);
        let fail_rate = 1.0 - (matched as f64 / total as f64);
        let rate = 1.0 - fail_rate;
        let score_pass = rate >= min_overlap;

        if !score_pass {
            return Err(MatchError::CoverageBelowThreshold {
                accession: accession.clone(),
                rate,
            });
        }

        summaries.push(FilterSummary {
            accession: accession.clone(),
            score_pass,
            rate,
        });
    }

    Ok(summaries)
}
