use ahash::AHashMap;
use ordered_float::NotNan;
use rayon::prelude::*;

use crate::{
    accession::Accession,
    scorefile::{AnnotatedScorefileRow, EffectType},
    session::Session,
    strategy::MatchStrategy,
    target::AnnotatedTargetRow,
};

/// `match_status` (spec §4.3 step 7).
///
/// Canonical lowercase string rendering is used both for serialization and
/// for the log sort order (spec §4.6 sorts on this column lexically; this
/// renders the same strings a columnar engine's string sort would compare).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchStatus {
    Matched,
    Excluded,
    Unmatched,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Excluded => "excluded",
            Self::Unmatched => "unmatched",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One successful join between a scorefile row and a target row (spec §3
/// `MatchCandidate`). `ambiguous`, `match_flipped`, `duplicate_best_match`,
/// `duplicate_ID`, `best_match`, `match_status` and `exclude` are populated
/// by postprocess; candidate generation leaves them at their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub row_nr: u64,
    pub accession: Accession,
    pub chr_name: String,
    pub chr_position: u64,
    pub effect_allele: String,
    pub other_allele: Option<String>,
    pub effect_weight: NotNan<f64>,
    pub effect_type: EffectType,

    pub id: String,
    pub reference: String,
    pub alt: String,
    pub is_multiallelic: bool,

    pub matched_effect_allele: String,
    pub match_type: MatchStrategy,

    pub ambiguous: bool,
    pub match_flipped: bool,
    pub duplicate_best_match: bool,
    pub duplicate_id: bool,
    pub best_match: bool,
    pub match_status: MatchStatus,
    pub exclude: bool,
}

impl MatchCandidate {
    fn new(
        row: &AnnotatedScorefileRow,
        target: &AnnotatedTargetRow,
        matched_effect_allele: String,
        match_type: MatchStrategy,
    ) -> Self {
        Self {
            row_nr: row.row.row_nr,
            accession: row.row.accession.clone(),
            chr_name: row
                .row
                .chr_name
                .clone()
                .expect("candidates are only generated for rows with a non-null chr_name"),
            chr_position: row
                .row
                .chr_position
                .expect("candidates are only generated for rows with a non-null chr_position"),
            effect_allele: row.row.effect_allele.clone(),
            other_allele: row.row.other_allele.clone(),
            effect_weight: row.row.effect_weight,
            effect_type: row.row.effect_type,
            id: target.id.clone(),
            reference: target.reference.clone(),
            alt: target.alt.clone(),
            is_multiallelic: target.is_multiallelic,
            matched_effect_allele,
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
}

/// Index over target rows keyed by interned `(chrom, pos, ...)` tuples, the
/// Rust analogue of polars joining on `Categorical` dictionary ids (spec
/// §5's "all allele/accession columns must be treated as categorical").
struct TargetIndex<'t> {
    by_ref_alt: AHashMap<(u32, u64, u32, u32), Vec<&'t AnnotatedTargetRow>>,
    by_ref: AHashMap<(u32, u64, u32), Vec<&'t AnnotatedTargetRow>>,
    by_alt: AHashMap<(u32, u64, u32), Vec<&'t AnnotatedTargetRow>>,
}

impl<'t> TargetIndex<'t> {
    fn build(session: &Session, target: &'t [AnnotatedTargetRow]) -> Self {
        let mut by_ref_alt: AHashMap<(u32, u64, u32, u32), Vec<&AnnotatedTargetRow>> = AHashMap::default();
        let mut by_ref: AHashMap<(u32, u64, u32), Vec<&AnnotatedTargetRow>> = AHashMap::default();
        let mut by_alt: AHashMap<(u32, u64, u32), Vec<&AnnotatedTargetRow>> = AHashMap::default();

        for row in target {
            let chrom = session.intern(&row.chrom);
            let reference = session.intern(&row.reference);
            let alt = session.intern(&row.alt);

            by_ref_alt
                .entry((chrom, row.pos, reference, alt))
                .or_default()
                .push(row);
            by_ref.entry((chrom, row.pos, reference)).or_default().push(row);
            by_alt.entry((chrom, row.pos, alt)).or_default().push(row);
        }

        Self {
            by_ref_alt,
            by_ref,
            by_alt,
        }
    }
}

/// Runs the (up to) eight strategy joins between `scorefile` and `target`
/// and concatenates their outputs in [`MatchStrategy::ALL`] order (spec
/// §4.2, §5 determinism guarantee).
///
/// Each strategy's join runs on `session`'s worker pool; table order is
/// preserved by construction (`par_iter` over a fixed-size array keeps
/// `collect()` indexed), so the result does not depend on scheduling.
pub fn generate_candidates(
    session: &Session,
    scorefile: &[AnnotatedScorefileRow],
    target: &[AnnotatedTargetRow],
    skip_flip: bool,
) -> Vec<MatchCandidate> {
    let index = TargetIndex::build(session, target);

    session.install(|| {
        MatchStrategy::ALL
            .par_iter()
            .map(|&strategy| {
                if skip_flip && strategy.is_flip() {
                    return Vec::new();
                }
                run_strategy(session, strategy, scorefile, &index)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    })
}

fn run_strategy(
    session: &Session,
    strategy: MatchStrategy,
    scorefile: &[AnnotatedScorefileRow],
    index: &TargetIndex,
) -> Vec<MatchCandidate> {
    scorefile
        .par_iter()
        .filter(|row| row.row.chr_name.is_some() && row.row.chr_position.is_some())
        .filter(|row| row.row.other_allele.is_some() == strategy.has_other_allele())
        .flat_map_iter(|row| candidates_for_row(session, strategy, row, index))
        .collect()
}

fn candidates_for_row<'t>(
    session: &Session,
    strategy: MatchStrategy,
    row: &AnnotatedScorefileRow,
    index: &TargetIndex<'t>,
) -> Vec<MatchCandidate> {
    let chrom = session.intern(row.row.chr_name.as_deref().unwrap());
    let pos = row.row.chr_position.unwrap();

    let (matched_effect_allele, matches): (String, &[&AnnotatedTargetRow]) = match strategy {
        MatchStrategy::RefAlt | MatchStrategy::RefAltFlip | MatchStrategy::AltRef | MatchStrategy::AltRefFlip => {
            let (effect, other) = if strategy.is_flip() {
                (row.effect_allele_flip.as_str(), row.other_allele_flip.as_deref().unwrap())
            } else {
                (row.row.effect_allele.as_str(), row.row.other_allele.as_deref().unwrap())
            };
            let effect_id = session.intern(effect);
            let other_id = session.intern(other);
            let key = if strategy.is_ref_aligned() {
                (chrom, pos, effect_id, other_id)
            } else {
                (chrom, pos, other_id, effect_id)
            };
            (
                effect.to_owned(),
                index.by_ref_alt.get(&key).map(Vec::as_slice).unwrap_or(&[]),
            )
        }
        MatchStrategy::NoOaRef
        | MatchStrategy::NoOaAlt
        | MatchStrategy::NoOaRefFlip
        | MatchStrategy::NoOaAltFlip => {
            let effect = if strategy.is_flip() {
                row.effect_allele_flip.as_str()
            } else {
                row.row.effect_allele.as_str()
            };
            let effect_id = session.intern(effect);
            let key = (chrom, pos, effect_id);
            let by = if strategy.is_ref_aligned() { &index.by_ref } else { &index.by_alt };
            (effect.to_owned(), by.get(&key).map(Vec::as_slice).unwrap_or(&[]))
        }
    };

    matches
        .iter()
        .map(|target| MatchCandidate::new(row, target, matched_effect_allele.clone(), strategy))
        .collect()
}
