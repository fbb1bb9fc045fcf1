use ahash::AHashMap;
use ordered_float::NotNan;

use crate::{
    accession::Accession,
    candidate::{MatchCandidate, MatchStatus},
    coverage::FilterSummary,
    dataset::Dataset,
    error::MatchError,
    scorefile::{EffectType, ScorefileRow},
    strategy::MatchStrategy,
};

/// One row of the per-candidate raw log (spec §4.6 "Raw log").
///
/// Produced by a full outer join of the scorefile with the full candidate
/// set; a scorefile row with no candidates still appears once, with
/// `match_status = unmatched` and every candidate-only field `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLogRow {
    pub dataset: Dataset,
    pub accession: Accession,
    pub row_nr: u64,
    pub chr_name: Option<String>,
    pub chr_position: Option<u64>,
    pub effect_allele: String,
    pub other_allele: Option<String>,
    pub effect_weight: NotNan<f64>,
    pub effect_type: EffectType,
    pub id: Option<String>,
    pub reference: Option<String>,
    pub alt: Option<String>,
    pub matched_effect_allele: Option<String>,
    pub match_type: Option<MatchStrategy>,
    pub is_multiallelic: Option<bool>,
    pub ambiguous: Option<bool>,
    pub match_flipped: Option<bool>,
    pub duplicate_best_match: Option<bool>,
    pub duplicate_id: Option<bool>,
    pub best_match: Option<bool>,
    pub match_status: MatchStatus,
}

/// Builds the raw log and sorts it by `(accession, row_nr, chr_name,
/// chr_position, match_status)`, matching a columnar engine's lexical sort
/// on the rendered `match_status` string (spec §4.6).
pub fn make_raw_log(scorefile: &[ScorefileRow], candidates: &[MatchCandidate], dataset: &Dataset) -> Vec<RawLogRow> {
    let mut by_row: AHashMap<(&Accession, u64), Vec<&MatchCandidate>> = AHashMap::default();
    for candidate in candidates {
        by_row.entry((&candidate.accession, candidate.row_nr)).or_default().push(candidate);
    }

    let mut rows = Vec::with_capacity(scorefile.len());
    for row in scorefile {
        let matches = by_row.get(&(&row.accession, row.row_nr));
        match matches {
            Some(matches) if !matches.is_empty() => {
                for candidate in matches {
                    rows.push(RawLogRow {
                        dataset: dataset.clone(),
                        accession: row.accession.clone(),
                        row_nr: row.row_nr,
                        chr_name: row.chr_name.clone(),
                        chr_position: row.chr_position,
                        effect_allele: row.effect_allele.clone(),
                        other_allele: row.other_allele.clone(),
                        effect_weight: row.effect_weight,
                        effect_type: row.effect_type,
                        id: Some(candidate.id.clone()),
                        reference: Some(candidate.reference.clone()),
                        alt: Some(candidate.alt.clone()),
                        matched_effect_allele: Some(candidate.matched_effect_allele.clone()),
                        match_type: Some(candidate.match_type),
                        is_multiallelic: Some(candidate.is_multiallelic),
                        ambiguous: Some(candidate.ambiguous),
                        match_flipped: Some(candidate.match_flipped),
                        duplicate_best_match: Some(candidate.duplicate_best_match),
                        duplicate_id: Some(candidate.duplicate_id),
                        best_match: Some(candidate.best_match),
                        match_status: candidate.match_status,
                    });
                }
            }
            _ => rows.push(RawLogRow {
                dataset: dataset.clone(),
                accession: row.accession.clone(),
                row_nr: row.row_nr,
                chr_name: row.chr_name.clone(),
                chr_position: row.chr_position,
                effect_allele: row.effect_allele.clone(),
                other_allele: row.other_allele.clone(),
                effect_weight: row.effect_weight,
                effect_type: row.effect_type,
                id: None,
                reference: None,
                alt: None,
                matched_effect_allele: None,
                match_type: None,
                is_multiallelic: None,
                ambiguous: None,
                match_flipped: None,
                duplicate_best_match: None,
                duplicate_id: None,
                best_match: None,
                match_status: MatchStatus::Unmatched,
            }),
        }
    }

    rows.sort_by(|a, b| {
        (a.accession.as_str(), a.row_nr, &a.chr_name, a.chr_position, a.match_status.as_str()).cmp(&(
            b.accession.as_str(),
            b.row_nr,
            &b.chr_name,
            b.chr_position,
            b.match_status.as_str(),
        ))
    });
    rows
}

/// One row of the aggregated per-accession summary log (spec §4.6
/// "Summary log").
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLogRow {
    pub dataset: Dataset,
    pub accession: Accession,
    pub match_status: MatchStatus,
    pub ambiguous: bool,
    pub is_multiallelic: bool,
    pub match_flipped: bool,
    pub duplicate_best_match: bool,
    pub duplicate_id: bool,
    pub count: u64,
    pub percent: f64,
    pub score_pass: Option<bool>,
}

#[derive(PartialEq, Eq, Hash, Clone)]
struct GroupKey {
    accession: Accession,
    match_status: MatchStatus,
    ambiguous: bool,
    is_multiallelic: bool,
    match_flipped: bool,
    duplicate_best_match: bool,
    duplicate_id: bool,
}

/// Builds the summary log: outer-joins the scorefile with `best_match`
/// candidates, aggregates counts per group, left-joins [`FilterSummary`],
/// and derives `percent` within each `(dataset, accession)` group.
///
/// Fails with [`MatchError::InternalConsistency`] if, for any accession, the
/// summed group counts do not equal that accession's scorefile row count
/// (spec §4.6 "Cross-check invariant").
pub fn make_summary_log(
    scorefile: &[ScorefileRow],
    candidates: &[MatchCandidate],
    filter_summary: &[FilterSummary],
    dataset: &Dataset,
) -> Result<Vec<SummaryLogRow>, MatchError> {
    let mut best_by_row: AHashMap<(&Accession, u64), &MatchCandidate> = AHashMap::default();
    for candidate in candidates.iter().filter(|c| c.best_match) {
        best_by_row.insert((&candidate.accession, candidate.row_nr), candidate);
    }

    let mut counts: AHashMap<GroupKey, u64> = AHashMap::default();
    let mut total_by_accession: AHashMap<&Accession, u64> = AHashMap::default();

    for row in scorefile {
        *total_by_accession.entry(&row.accession).or_insert(0) += 1;

        let key = match best_by_row.get(&(&row.accession, row.row_nr)) {
            Some(candidate) => GroupKey {
                accession: row.accession.clone(),
                match_status: candidate.match_status,
                ambiguous: candidate.ambiguous,
                is_multiallelic: candidate.is_multiallelic,
                match_flipped: candidate.match_flipped,
                duplicate_best_match: candidate.duplicate_best_match,
                duplicate_id: candidate.duplicate_id,
            },
            None => GroupKey {
                accession: row.accession.clone(),
                match_status: MatchStatus::Unmatched,
                ambiguous: false,
                is_multiallelic: false,
                match_flipped: false,
                duplicate_best_match: false,
                duplicate_id: false,
            },
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut totals_per_group: AHashMap<&Accession, u64> = AHashMap::default();
    for (key, count) in &counts {
        *totals_per_group.entry(&key.accession).or_insert(0) += count;
    }
    for (accession, total) in &total_by_accession {
        if totals_per_group.get(*accession).copied().unwrap_or(0) != *total {
            return Err(MatchError::InternalConsistency(format!(
                "summary log counts for accession {accession} do not sum to its scorefile row count"
            )));
        }
    }

    let filter_summary_by_accession: AHashMap<&Accession, &FilterSummary> =
        filter_summary.iter().map(|f| (&f.accession, f)).collect();

    let mut rows = Vec::with_capacity(counts.len());
    for (key, count) in counts {
        let total = *total_by_accession.get(&key.accession).expect("accession present in totals");
        let percent = count as f64 / total as f64 * 100.0;
        let score_pass = filter_summary_by_accession.get(&key.accession).map(|f| f.score_pass);
        rows.push(SummaryLogRow {
            dataset: dataset.clone(),
            accession: key.accession,
            match_status: key.match_status,
            ambiguous: key.ambiguous,
            is_multiallelic: key.is_multiallelic,
            match_flipped: key.match_flipped,
            duplicate_best_match: key.duplicate_best_match,
            duplicate_id: key.duplicate_id,
            count,
            percent,
            score_pass,
        });
    }

    rows.sort_by(|a, b| a.accession.cmp(&b.accession).then(a.match_status.as_str().cmp(b.match_status.as_str())));
    Ok(rows)
}
