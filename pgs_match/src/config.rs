use crate::{dataset::Dataset, error::MatchError};

/// Tunables for a matching run (spec §6 "Configuration (enumerated)").
///
/// Constructed via [`MatchConfig::new`], which validates every field once up
/// front rather than having each pipeline stage re-check ad hoc flags.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum per-accession coverage in `(0, 1]`; `0.0` disables the gate.
    pub min_overlap: f64,
    /// Drop palindromic flipped matches during postprocess.
    pub remove_ambiguous: bool,
    /// Drop multiallelic targets instead of exploding them during preprocess.
    pub remove_multiallelic: bool,
    /// Whether the target frame is already biallelic (`bim`) rather than
    /// potentially multiallelic (`pvar`); used only to decide whether
    /// `remove_multiallelic` on an already-biallelic input deserves a warning.
    pub is_pvar: bool,
    /// Disable the four `*_flip` strand-complement strategies.
    pub skip_flip: bool,
    /// Tag stamped on every log row.
    pub dataset: Dataset,
    /// Whether to shard output by chromosome.
    pub split: bool,
    /// Columnar engine worker count used for candidate-strategy dispatch.
    pub n_threads: usize,
}

impl MatchConfig {
    pub fn new(
        min_overlap: f64,
        remove_ambiguous: bool,
        remove_multiallelic: bool,
        is_pvar: bool,
        skip_flip: bool,
        dataset: Dataset,
        split: bool,
        n_threads: usize,
    ) -> Result<Self, MatchError> {
        let config = Self {
            min_overlap,
            remove_ambiguous,
            remove_multiallelic,
            is_pvar,
            skip_flip,
            dataset,
            split,
            n_threads,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=1.0).contains(&self.min_overlap) || self.min_overlap.is_nan() {
            return Err(MatchError::ConfigError(format!(
                "min_overlap must be within [0, 1], found {}",
                self.min_overlap
            )));
        }
        if self.n_threads == 0 {
            return Err(MatchError::ConfigError(
                "n_threads must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// `true` iff the coverage gate is disabled (`min_overlap == 0`).
    pub fn gate_disabled(&self) -> bool {
        self.min_overlap == 0.0
    }
}

impl Default for MatchConfig {
    /// Matches spec §6's documented defaults, with a permissive `dataset` and
    /// single-threaded execution a caller is expected to override.
    fn default() -> Self {
        Self {
            min_overlap: 0.75,
            remove_ambiguous: true,
            remove_multiallelic: false,
            is_pvar: true,
            skip_flip: false,
            dataset: Dataset::new("dataset").expect("\"dataset\" is a valid default label"),
            split: false,
            n_threads: 1,
        }
    }
}
