use ahash::{AHashMap, AHashSet};

use crate::{
    accession::Accession,
    candidate::{MatchCandidate, MatchStatus},
};

/// `true` iff `{a, b}` is one of the two palindromic pairs (spec §3 I5).
fn is_palindromic(a: &str, b: &str) -> bool {
    matches!(
        (a.to_ascii_uppercase().as_str(), b.to_ascii_uppercase().as_str()),
        ("A", "T") | ("T", "A") | ("C", "G") | ("G", "C")
    )
}

/// The priority tuple from spec §4.3 step 5; smaller sorts better. Rust's
/// lexicographic tuple `Ord` matches the priority list item for item, so the
/// selection is a single `.min()` over this tuple plus the target `ID`
/// tie-break.
fn priority(candidate: &MatchCandidate) -> (u8, u8, u8, u8, u8) {
    (
        candidate.match_flipped as u8,
        (!candidate.match_type.has_other_allele()) as u8,
        (!candidate.match_type.is_ref_aligned()) as u8,
        candidate.ambiguous as u8,
        candidate.is_multiallelic as u8,
    )
}

/// Runs spec §4.3's seven postprocess steps over a unioned candidate set.
///
/// Candidates that become `exclude = true` (ambiguous-and-flipped, when
/// `remove_ambiguous` is set) are retained rather than physically dropped,
/// so `match_status = "excluded"` stays reachable in the raw log; they are
/// never eligible for `best_match` and are not counted by `duplicate_ID`.
pub fn postprocess(mut candidates: Vec<MatchCandidate>, remove_ambiguous: bool) -> Vec<MatchCandidate> {
    for candidate in &mut candidates {
        candidate.ambiguous = candidate
            .other_allele
            .as_deref()
            .is_some_and(|other| is_palindromic(&candidate.effect_allele, other));
        candidate.match_flipped = candidate.match_type.is_flip();
    }

    if remove_ambiguous {
        for candidate in &mut candidates {
            if candidate.ambiguous && candidate.match_flipped {
                candidate.exclude = true;
            }
        }
    }

    annotate_duplicate_id(&mut candidates);
    select_best_matches(&mut candidates);

    for candidate in &mut candidates {
        candidate.match_status = if candidate.exclude {
            MatchStatus::Excluded
        } else if candidate.best_match {
            MatchStatus::Matched
        } else {
            MatchStatus::Unmatched
        };
    }

    candidates
}

fn annotate_duplicate_id(candidates: &mut [MatchCandidate]) {
    let mut rows_by_id: AHashMap<(Accession, String), AHashSet<u64>> = AHashMap::default();
    for candidate in candidates.iter().filter(|c| !c.exclude) {
        rows_by_id
            .entry((candidate.accession.clone(), candidate.id.clone()))
            .or_default()
            .insert(candidate.row_nr);
    }

    for candidate in candidates.iter_mut() {
        if candidate.exclude {
            continue;
        }
        let key = (candidate.accession.clone(), candidate.id.clone());
        if rows_by_id.get(&key).is_some_and(|rows| rows.len() > 1) {
            candidate.duplicate_id = true;
        }
    }
}

fn select_best_matches(candidates: &mut [MatchCandidate]) {
    let mut groups: AHashMap<(Accession, u64), Vec<usize>> = AHashMap::default();
    for (i, candidate) in candidates.iter().enumerate() {
        groups
            .entry((candidate.accession.clone(), candidate.row_nr))
            .or_default()
            .push(i);
    }

    for indices in groups.into_values() {
        let eligible: Vec<usize> = indices.into_iter().filter(|&i| !candidates[i].exclude).collect();
        if eligible.is_empty() {
            continue;
        }

        let best_priority = eligible
            .iter()
            .map(|&i| priority(&candidates[i]))
            .min()
            .expect("eligible is non-empty");
        let tied: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|&i| priority(&candidates[i]) == best_priority)
            .collect();
        let duplicate_best_match = tied.len() > 1;

        let best_idx = *tied
            .iter()
            .min_by(|&&a, &&b| candidates[a].id.cmp(&candidates[b].id))
            .expect("tied is non-empty");

        for &i in &eligible {
            candidates[i].duplicate_best_match = duplicate_best_match;
        }
        candidates[best_idx].best_match = true;
    }
}

#[cfg(test)]
mod tests {
    use ordered_float::NotNan;

    use super::*;
    use crate::{scorefile::EffectType, strategy::MatchStrategy};

    fn candidate(
        row_nr: u64,
        effect: &str,
        other: Option<&str>,
        id: &str,
        match_type: MatchStrategy,
        is_multiallelic: bool,
    ) -> MatchCandidate {
        MatchCandidate {
            row_nr,
            accession: Accession::new("PGS001").unwrap(),
            chr_name: "1".to_owned(),
            chr_position: 100,
            effect_allele: effect.to_owned(),
            other_allele: other.map(str::to_owned),
            effect_weight: NotNan::new(0.5).unwrap(),
            effect_type: EffectType::Additive,
            id: id.to_owned(),
            reference: "A".to_owned(),
            alt: "G".to_owned(),
            is_multiallelic,
            matched_effect_allele: effect.to_owned(),
            match_type,
            ambiguous: false,
            match_flipped: false,
            duplicate_best_match: false,
            duplicate_id: false,
            best_match: false,
            match_status: MatchStatus::Unmatched,
            exclude: false,
        }
    }

    #[test]
    fn scenario_c_ambiguous_flip_is_excluded_not_removed() {
        let candidates = vec![
            candidate(1, "A", Some("T"), "rs3", MatchStrategy::RefAlt, false),
            candidate(1, "A", Some("T"), "rs3b", MatchStrategy::RefAltFlip, false),
        ];
        let result = postprocess(candidates, true);
        assert_eq!(result.len(), 2, "excluded rows are retained, not dropped");

        let refalt = result.iter().find(|c| c.match_type == MatchStrategy::RefAlt).unwrap();
        assert!(refalt.ambiguous);
        assert!(!refalt.exclude);
        assert!(refalt.best_match);
        assert_eq!(refalt.match_status, MatchStatus::Matched);

        let flip = result.iter().find(|c| c.match_type == MatchStrategy::RefAltFlip).unwrap();
        assert!(flip.exclude);
        assert!(!flip.best_match);
        assert_eq!(flip.match_status, MatchStatus::Excluded);
    }

    #[test]
    fn scenario_f_ref_alignment_beats_ambiguity_tiebreak() {
        let refalt = candidate(1, "A", Some("T"), "rs1", MatchStrategy::RefAlt, false); // ambiguous: A/T
        let altref = candidate(1, "A", Some("C"), "rs2", MatchStrategy::AltRef, false); // non-ambiguous: A/C
        let candidates = vec![refalt, altref];

        let result = postprocess(candidates, false);
        let refalt = result.iter().find(|c| c.match_type == MatchStrategy::RefAlt).unwrap();
        let altref = result.iter().find(|c| c.match_type == MatchStrategy::AltRef).unwrap();
        assert!(refalt.best_match, "ref-alignment outranks ambiguity at step 3 vs step 4");
        assert!(!altref.best_match);
        assert!(!refalt.duplicate_best_match);
    }

    #[test]
    fn at_most_one_best_match_per_group() {
        let candidates = vec![
            candidate(1, "A", Some("G"), "rs1", MatchStrategy::RefAlt, false),
            candidate(1, "A", Some("G"), "rs2", MatchStrategy::AltRef, false),
            candidate(2, "C", Some("T"), "rs3", MatchStrategy::RefAlt, false),
        ];
        let result = postprocess(candidates, false);
        let row1_best = result.iter().filter(|c| c.row_nr == 1 && c.best_match).count();
        let row2_best = result.iter().filter(|c| c.row_nr == 2 && c.best_match).count();
        assert_eq!(row1_best, 1);
        assert_eq!(row2_best, 1);
    }

    #[test]
    fn duplicate_best_match_flags_whole_group_on_tie() {
        let candidates = vec![
            candidate(1, "A", Some("G"), "rs2", MatchStrategy::RefAlt, false),
            candidate(1, "A", Some("G"), "rs1", MatchStrategy::RefAlt, false),
        ];
        let result = postprocess(candidates, false);
        assert!(result.iter().all(|c| c.duplicate_best_match));
        assert_eq!(result.iter().filter(|c| c.best_match).count(), 1);
        // lexicographically smaller ID wins the tie-break
        assert!(result.iter().find(|c| c.best_match).unwrap().id == "rs1");
    }

    #[test]
    fn duplicate_id_ignores_excluded_candidates() {
        let mut excluded = candidate(1, "A", Some("T"), "rs1", MatchStrategy::RefAltFlip, false);
        excluded.exclude = true;
        let other_row = candidate(2, "A", Some("T"), "rs1", MatchStrategy::RefAlt, false);
        let candidates = vec![excluded, other_row];
        let result = postprocess(candidates, false);
        let live = result.iter().find(|c| !c.exclude).unwrap();
        assert!(!live.duplicate_id);
    }
}
