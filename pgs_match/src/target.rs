use serde::{Deserialize, Serialize};

/// A single row of a target genotype variant table (spec §3 `TargetRow`,
/// §6 "Target frame (bim or pvar flavour)").
///
/// `alt` may be comma-separated before preprocess explodes or removes
/// multiallelic rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRow {
    #[serde(rename = "#CHROM")]
    pub chrom: String,
    #[serde(rename = "POS")]
    pub pos: u64,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "REF")]
    pub reference: String,
    #[serde(rename = "ALT")]
    pub alt: String,
}

/// A [`TargetRow`] after `handle_multiallelic` (spec §4.1): `alt` holds a
/// single allele and `is_multiallelic` records whether the original row's
/// `ALT` had more than one comma-separated allele.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTargetRow {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub reference: String,
    pub alt: String,
    pub is_multiallelic: bool,
}

/// Annotates `is_multiallelic` and either drops or explodes multiallelic
/// target rows (spec §4.1 `handle_multiallelic`).
///
/// Warns (does not fail) when `remove = true` and `is_pvar = false`: a
/// `bim`-flavoured target is already biallelic, so the flag has no effect
/// and is almost certainly a caller mistake.
pub fn handle_multiallelic(rows: Vec<TargetRow>, remove: bool, is_pvar: bool) -> Vec<AnnotatedTargetRow> {
    if remove && !is_pvar {
        log::warn!(
            "--remove_multiallelic was set but the target input is not pvar-flavoured; \
             it is already biallelic and the flag has no effect"
        );
    }

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let alleles: Vec<&str> = row.alt.split(',').collect();
        let is_multiallelic = alleles.len() > 1;

        if is_multiallelic && remove {
            continue;
        }

        for allele in alleles {
            out.push(AnnotatedTargetRow {
                chrom: row.chrom.clone(),
                pos: row.pos,
                id: row.id.clone(),
                reference: row.reference.clone(),
                alt: allele.to_owned(),
                is_multiallelic,
            });
        }
    }
    out
}
