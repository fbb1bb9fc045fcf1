use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::accession::Accession;
use biocore::dna::complement_if_strict_dna;

/// A single row of a harmonized scoring file, as ingested from the caller's
/// columnar frame (spec §3 `ScorefileRow`, §6 "Scorefile frame").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorefileRow {
    /// Monotonic per-input-file row identity; never recomputed downstream.
    pub row_nr: u64,
    pub accession: Accession,
    /// Null `chr_name`/`chr_position` rows never generate a candidate but
    /// must survive to the log (spec §8 boundary behaviour).
    pub chr_name: Option<String>,
    pub chr_position: Option<u64>,
    pub effect_allele: String,
    pub other_allele: Option<String>,
    pub effect_weight: NotNan<f64>,
    pub effect_type: EffectType,
}

/// `effect_type` categorical (spec §3). Trimmed to the three values spec.md
/// names; dosage-specific/interaction variants belong to the score-computation
/// stage this engine does not perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    Additive,
    Dominant,
    Recessive,
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Additive => "additive",
            Self::Dominant => "dominant",
            Self::Recessive => "recessive",
        };
        write!(f, "{s}")
    }
}

/// A [`ScorefileRow`] with the strand-complement columns added by preprocess
/// (spec §4.1 `complement_valid_alleles`).
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedScorefileRow {
    pub row: ScorefileRow,
    pub effect_allele_flip: String,
    pub other_allele_flip: Option<String>,
}

impl AnnotatedScorefileRow {
    pub fn from_row(row: ScorefileRow) -> Self {
        let effect_allele_flip = complement_if_strict_dna(&row.effect_allele);
        let other_allele_flip = row.other_allele.as_deref().map(complement_if_strict_dna);
        Self {
            row,
            effect_allele_flip,
            other_allele_flip,
        }
    }
}

/// Annotates every row of a scorefile with its strand-complement columns.
///
/// Length-preserving and idempotent on the flip columns themselves (applying
/// the complement twice to a valid-DNA string returns the original), per
/// spec §4.1/§8 property 1.
pub fn complement_valid_alleles(rows: Vec<ScorefileRow>) -> Vec<AnnotatedScorefileRow> {
    rows.into_iter().map(AnnotatedScorefileRow::from_row).collect()
}

/// Fails with [`MatchError::DuplicateWeight`] if any
/// `(accession, chr_name, chr_position, effect_allele)` combination with a
/// non-null position appears on more than one row (spec §4.1
/// `check_weights`).
pub fn check_weights(rows: &[ScorefileRow]) -> Result<(), crate::error::MatchError> {
    use ahash::AHashSet;

    let mut seen: AHashSet<(&Accession, &str, u64, &str)> = AHashSet::default();
    for row in rows {
        let Some(chr_name) = row.chr_name.as_deref() else {
            continue;
        };
        let Some(chr_position) = row.chr_position else {
            continue;
        };
        let key = (&row.accession, chr_name, chr_position, row.effect_allele.as_str());
        if !seen.insert(key) {
            return Err(crate::error::MatchError::DuplicateWeight {
                accession: row.accession.clone(),
                chr_name: chr_name.to_owned(),
                chr_position,
                effect_allele: row.effect_allele.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(effect: &str, other: Option<&str>) -> ScorefileRow {
        ScorefileRow {
            row_nr: 1,
            accession: Accession::new("PGS000001").unwrap(),
            chr_name: Some("1".to_owned()),
            chr_position: Some(100),
            effect_allele: effect.to_owned(),
            other_allele: other.map(str::to_owned),
            effect_weight: NotNan::new(0.5).unwrap(),
            effect_type: EffectType::Additive,
        }
    }

    #[test]
    fn complements_valid_dna() {
        let annotated = AnnotatedScorefileRow::from_row(row("A", Some("T")));
        assert_eq!(annotated.effect_allele_flip, "T");
        assert_eq!(annotated.other_allele_flip.as_deref(), Some("A"));
    }

    #[test]
    fn passes_through_non_dna() {
        let annotated = AnnotatedScorefileRow::from_row(row("INS", None));
        assert_eq!(annotated.effect_allele_flip, "INS");
        assert_eq!(annotated.other_allele_flip, None);
    }

    #[test]
    fn preserves_length() {
        let annotated = AnnotatedScorefileRow::from_row(row("ACGT", Some("TGCA")));
        assert_eq!(annotated.effect_allele_flip.len(), 4);
    }

    #[test]
    fn check_weights_rejects_duplicates() {
        let rows = vec![row("A", Some("G")), row("A", Some("C"))];
        assert!(check_weights(&rows).is_err());
    }

    #[test]
    fn check_weights_ignores_null_position() {
        let mut unplaced = row("A", Some("G"));
        unplaced.chr_position = None;
        let rows = vec![row("A", Some("G")), unplaced];
        // the first row alone is unique; the null-position row never conflicts
        assert!(check_weights(&rows[..1]).is_ok());
    }

    #[test]
    fn check_weights_allows_distinct_effect_alleles() {
        let rows = vec![row("A", Some("G")), row("G", Some("A"))];
        assert!(check_weights(&rows).is_ok());
    }
}
