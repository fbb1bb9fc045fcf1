//! Variant-matching engine for polygenic scores: joins a harmonized scoring
//! file against one or more target genotype variant tables, selects one best
//! candidate per scorefile row, enforces per-score coverage thresholds, and
//! assembles a per-candidate raw log and a per-score summary log.

pub mod accession;
pub mod candidate;
pub mod combine;
pub mod config;
pub mod coverage;
pub mod dataset;
pub mod error;
pub mod log;
pub mod postprocess;
pub mod scorefile;
pub mod session;
pub mod strategy;
pub mod target;

use crate::{
    candidate::MatchCandidate,
    config::MatchConfig,
    coverage::{coverage_gate, FilterSummary},
    error::MatchError,
    log::{make_raw_log, make_summary_log, RawLogRow, SummaryLogRow},
    postprocess::postprocess,
    scorefile::{check_weights, complement_valid_alleles, ScorefileRow},
    session::Session,
    target::{handle_multiallelic, TargetRow},
};

/// Everything a single matching run (or a combined multi-shard run) produces:
/// the finalized candidate set, the per-accession coverage summary, and the
/// two logs described in spec §4.6.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub candidates: Vec<MatchCandidate>,
    pub filter_summary: Vec<FilterSummary>,
    pub raw_log: Vec<RawLogRow>,
    pub summary_log: Vec<SummaryLogRow>,
}

/// Runs the full five-stage pipeline (preprocess -> candidate generation ->
/// postprocess -> coverage gate -> log assembly) over one chromosome shard.
pub fn match_shard(
    session: &Session,
    scorefile: Vec<ScorefileRow>,
    target: Vec<TargetRow>,
    config: &MatchConfig,
) -> Result<MatchResult, MatchError> {
    check_weights(&scorefile)?;

    let annotated_scorefile = complement_valid_alleles(scorefile.clone());
    let annotated_target = handle_multiallelic(target, config.remove_multiallelic, config.is_pvar);

    let candidates = candidate::generate_candidates(session, &annotated_scorefile, &annotated_target, config.skip_flip);
    let candidates = postprocess(candidates, config.remove_ambiguous);

    finalize(scorefile, candidates, config)
}

/// Concatenates candidate sets produced by [`match_shard`] on independent
/// chromosome shards, re-derives the unified best-match/duplicate
/// annotations, and re-runs the coverage gate and log assembly over the
/// combined scorefile (spec §4.5).
pub fn combine_shards(
    shards: Vec<Vec<MatchCandidate>>,
    scorefile: Vec<ScorefileRow>,
    config: &MatchConfig,
) -> Result<MatchResult, MatchError> {
    let candidates = combine::combine_shards(shards, config.remove_ambiguous)?;
    finalize(scorefile, candidates, config)
}

fn finalize(scorefile: Vec<ScorefileRow>, candidates: Vec<MatchCandidate>, config: &MatchConfig) -> Result<MatchResult, MatchError> {
    let filter_summary = coverage_gate(&scorefile, &candidates, config.min_overlap)?;
    let raw_log = make_raw_log(&scorefile, &candidates, &config.dataset);
    let summary_log = make_summary_log(&scorefile, &candidates, &filter_summary, &config.dataset)?;

    Ok(MatchResult {
        candidates,
        filter_summary,
        raw_log,
        summary_log,
    })
}
