//! End-to-end scenarios A-F (spec §8), driven through the public pipeline
//! entry points (`match_shard`/`combine_shards`) rather than internal
//! module APIs, the way `liftover/tests/annotation.rs` exercises its crate
//! from the outside.

use ordered_float::NotNan;

use pgs_match::{
    accession::Accession,
    combine_shards,
    config::MatchConfig,
    dataset::Dataset,
    error::MatchError,
    match_shard,
    scorefile::{EffectType, ScorefileRow},
    session::Session,
    strategy::MatchStrategy,
    target::TargetRow,
};

fn config(min_overlap: f64) -> MatchConfig {
    MatchConfig::new(min_overlap, true, false, true, false, Dataset::new("cohort").unwrap(), false, 2).unwrap()
}

fn row(row_nr: u64, accession: &str, chr: &str, pos: u64, effect: &str, other: Option<&str>) -> ScorefileRow {
    ScorefileRow {
        row_nr,
        accession: Accession::new(accession).unwrap(),
        chr_name: Some(chr.to_owned()),
        chr_position: Some(pos),
        effect_allele: effect.to_owned(),
        other_allele: other.map(str::to_owned),
        effect_weight: NotNan::new(0.5).unwrap(),
        effect_type: EffectType::Additive,
    }
}

fn target(chr: &str, pos: u64, id: &str, reference: &str, alt: &str) -> TargetRow {
    TargetRow {
        chrom: chr.to_owned(),
        pos,
        id: id.to_owned(),
        reference: reference.to_owned(),
        alt: alt.to_owned(),
    }
}

#[test]
fn scenario_a_exact_refalt_match() {
    let session = Session::enter(2).unwrap();
    let scorefile = vec![row(1, "PGS001", "1", 100, "A", Some("G"))];
    let target = vec![target("1", 100, "rs1", "A", "G")];

    let result = match_shard(&session, scorefile, target, &config(0.5)).unwrap();

    assert_eq!(result.candidates.len(), 1);
    let candidate = &result.candidates[0];
    assert_eq!(candidate.match_type, MatchStrategy::RefAlt);
    assert_eq!(candidate.matched_effect_allele, "A");
    assert!(candidate.best_match);
    assert!(!candidate.ambiguous);
    assert_eq!(result.raw_log.len(), 1);
    assert_eq!(result.raw_log[0].match_status.as_str(), "matched");
}

#[test]
fn scenario_b_strand_flip_match() {
    let session = Session::enter(1).unwrap();
    let scorefile = vec![row(1, "PGS001", "1", 200, "A", Some("C"))];
    let target = vec![target("1", 200, "rs2", "T", "G")];

    let result = match_shard(&session, scorefile, target, &config(0.5)).unwrap();

    assert_eq!(result.candidates.len(), 1);
    let candidate = &result.candidates[0];
    assert_eq!(candidate.match_type, MatchStrategy::RefAltFlip);
    assert!(candidate.match_flipped);
    assert_eq!(candidate.matched_effect_allele, "T");
}

#[test]
fn scenario_c_ambiguous_palindrome_with_flip_dropped() {
    let session = Session::enter(1).unwrap();
    let scorefile = vec![row(1, "PGS001", "1", 300, "A", Some("T"))];
    let target = vec![target("1", 300, "rs3", "A", "T"), target("1", 300, "rs3b", "T", "A")];

    let result = match_shard(&session, scorefile, target, &config(0.5)).unwrap();

    let refalt = result
        .candidates
        .iter()
        .find(|c| c.match_type == MatchStrategy::RefAlt)
        .unwrap();
    assert!(refalt.ambiguous);
    assert!(!refalt.exclude);
    assert!(refalt.best_match);

    let flip = result
        .candidates
        .iter()
        .filter(|c| c.match_flipped)
        .collect::<Vec<_>>();
    assert!(flip.iter().all(|c| c.exclude), "palindromic flip matches must be excluded, not absent");
    assert!(flip.iter().all(|c| !c.best_match));
}

#[test]
fn scenario_d_coverage_gate_failure() {
    let session = Session::enter(1).unwrap();
    let scorefile = vec![
        row(1, "PGS002", "1", 100, "A", Some("G")),
        row(2, "PGS002", "1", 200, "C", Some("T")),
    ];
    let target = vec![target("1", 100, "rs10", "A", "G")];

    let err = match_shard(&session, scorefile, target, &config(0.75)).unwrap_err();
    match err {
        MatchError::CoverageBelowThreshold { accession, rate } => {
            assert_eq!(accession.as_str(), "PGS002");
            assert!((rate - 0.5).abs() < 1e-9);
        }
        other => panic!("expected CoverageBelowThreshold, got {other:?}"),
    }
}

#[test]
fn scenario_e_combiner_rejects_duplicate_id_across_shards() {
    let session = Session::enter(1).unwrap();
    let scorefile_shard1 = vec![row(7, "PGS003", "1", 100, "A", Some("G"))];
    let target_shard1 = vec![target("1", 100, "rs42", "A", "G")];
    let shard1 = match_shard(&session, scorefile_shard1.clone(), target_shard1, &config(0.0)).unwrap();

    let scorefile_shard2 = vec![row(7, "PGS003", "2", 500, "C", Some("T"))];
    let target_shard2 = vec![target("2", 500, "rs42", "C", "T")];
    let shard2 = match_shard(&session, scorefile_shard2, target_shard2, &config(0.0)).unwrap();

    let combined_scorefile = scorefile_shard1;
    let err = combine_shards(
        vec![shard1.candidates, shard2.candidates],
        combined_scorefile,
        &config(0.0),
    )
    .unwrap_err();
    assert!(matches!(err, MatchError::DuplicateIdAcrossShards { .. }));
}

#[test]
fn scenario_f_ref_alignment_outranks_alt_alignment_in_best_match_priority() {
    let session = Session::enter(1).unwrap();
    // A single scorefile row (effect=A, other=T — palindromic, so both
    // candidates below are equally `ambiguous`) with two targets at the
    // same locus: one satisfies the ref-aligned `refalt` key shape, the
    // other only the alt-aligned `altref` key shape. Priority step 3
    // (REF-aligned before ALT-aligned) must decide before step 4
    // (ambiguity) is ever consulted.
    let scorefile = vec![row(1, "PGS004", "1", 400, "A", Some("T"))];
    let target = vec![target("1", 400, "rs_refalt", "A", "T"), target("1", 400, "rs_altref", "T", "A")];

    let result = match_shard(&session, scorefile, target, &config(0.0)).unwrap();
    assert_eq!(result.candidates.len(), 2);

    let refalt = result
        .candidates
        .iter()
        .find(|c| c.match_type == MatchStrategy::RefAlt)
        .unwrap();
    let altref = result
        .candidates
        .iter()
        .find(|c| c.match_type == MatchStrategy::AltRef)
        .unwrap();

    assert_eq!(refalt.ambiguous, altref.ambiguous, "ambiguous is a property of the scorefile row, not the match");
    assert!(refalt.best_match, "ref-aligned strategy wins at priority step 3, before ambiguity is ever compared");
    assert!(!altref.best_match);
    assert_eq!(result.raw_log.len(), 2, "both candidates remain visible in the raw log");
}
