use crate::accession::Accession;

/// Everything that can make the pipeline fail. All variants are fatal: the
/// pipeline does not retry, since every stage is a pure deterministic
/// transform over immutable frames.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "duplicate weight for accession {accession} at {chr_name}:{chr_position} effect allele {effect_allele:?}"
    )]
    DuplicateWeight {
        accession: Accession,
        chr_name: String,
        chr_position: u64,
        effect_allele: String,
    },

    #[error("accession {accession} covers only {rate:.4} of its scorefile rows, below min_overlap")]
    CoverageBelowThreshold { accession: Accession, rate: f64 },

    #[error("no candidates were produced for a non-empty scorefile")]
    NoMatches,

    #[error("target ID {id:?} is matched in more than one shard")]
    DuplicateIdAcrossShards { id: String },

    #[error("internal consistency check failed: {0}")]
    InternalConsistency(String),

    #[error("unknown match strategy tag: {0:?}")]
    InvalidStrategy(String),

    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, MatchError>;
