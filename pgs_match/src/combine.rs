use ahash::AHashSet;

use crate::{
    candidate::{MatchCandidate, MatchStatus},
    error::MatchError,
    postprocess::postprocess,
};

/// Concatenates candidate sets from multiple chromosome-sharded matching
/// runs, asserts global uniqueness of matched target `ID`s, then re-derives
/// `duplicate_ID`/`duplicate_best_match`/`best_match` over the unified set
/// (spec §4.5).
///
/// This re-runs postprocess (§4.3) over the concatenated frame rather than
/// only re-validating each shard's already-finalized matches — a deliberate
/// divergence from the original per-shard combiner, which could only
/// re-validate because its inputs had already collapsed to one row per
/// scorefile entry.
pub fn combine_shards(shards: Vec<Vec<MatchCandidate>>, remove_ambiguous: bool) -> Result<Vec<MatchCandidate>, MatchError> {
    let unified: Vec<MatchCandidate> = shards.into_iter().flatten().collect();

    let matched: Vec<&MatchCandidate> = unified
        .iter()
        .filter(|c| c.match_status == MatchStatus::Matched)
        .collect();
    let distinct_ids: AHashSet<&str> = matched.iter().map(|c| c.id.as_str()).collect();
    if distinct_ids.len() != matched.len() {
        let mut seen = AHashSet::default();
        let duplicate = matched
            .iter()
            .find(|c| !seen.insert(c.id.as_str()))
            .expect("count mismatch implies a repeated id exists");
        return Err(MatchError::DuplicateIdAcrossShards {
            id: duplicate.id.clone(),
        });
    }

    Ok(postprocess(unified, remove_ambiguous))
}

#[cfg(test)]
mod tests {
    use ordered_float::NotNan;

    use super::*;
    use crate::{accession::Accession, scorefile::EffectType, strategy::MatchStrategy};

    fn matched_candidate(row_nr: u64, id: &str) -> MatchCandidate {
        MatchCandidate {
            row_nr,
            accession: Accession::new("PGS003").unwrap(),
            chr_name: "1".to_owned(),
            chr_position: 100,
            effect_allele: "A".to_owned(),
            other_allele: Some("G".to_owned()),
            effect_weight: NotNan::new(0.5).unwrap(),
            effect_type: EffectType::Additive,
            id: id.to_owned(),
            reference: "A".to_owned(),
            alt: "G".to_owned(),
            is_multiallelic: false,
            matched_effect_allele: "A".to_owned(),
            match_type: MatchStrategy::RefAlt,
            ambiguous: false,
            match_flipped: false,
            duplicate_best_match: false,
            duplicate_id: false,
            best_match: true,
            match_status: MatchStatus::Matched,
            exclude: false,
        }
    }

    #[test]
    fn scenario_e_duplicate_id_across_shards_fails() {
        let shard1 = vec![matched_candidate(7, "rs42")];
        let shard2 = vec![matched_candidate(7, "rs42")];
        let err = combine_shards(vec![shard1, shard2], true).unwrap_err();
        assert!(matches!(err, MatchError::DuplicateIdAcrossShards { .. }));
    }

    #[test]
    fn distinct_ids_across_shards_succeed() {
        let shard1 = vec![matched_candidate(7, "rs42")];
        let shard2 = vec![matched_candidate(8, "rs43")];
        let combined = combine_shards(vec![shard1, shard2], true).unwrap();
        assert_eq!(combined.len(), 2);
    }
}
