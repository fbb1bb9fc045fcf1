/// One of the eight (S, T) key-tuple choices enumerated in spec §4.2.
///
/// This is a data-driven dispatch table, not branching logic: every property
/// a join or a best-match comparison needs is a method here, and
/// [`MatchStrategy::ALL`] fixes the canonical order in which strategy
/// outputs are concatenated regardless of which order they finished
/// executing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    RefAlt,
    AltRef,
    RefAltFlip,
    AltRefFlip,
    NoOaRef,
    NoOaAlt,
    NoOaRefFlip,
    NoOaAltFlip,
}

impl MatchStrategy {
    /// Canonical table order (spec §4.2). Candidate generation concatenates
    /// per-strategy outputs in this order no matter how the worker pool
    /// scheduled them.
    pub const ALL: [MatchStrategy; 8] = [
        MatchStrategy::RefAlt,
        MatchStrategy::AltRef,
        MatchStrategy::RefAltFlip,
        MatchStrategy::AltRefFlip,
        MatchStrategy::NoOaRef,
        MatchStrategy::NoOaAlt,
        MatchStrategy::NoOaRefFlip,
        MatchStrategy::NoOaAltFlip,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RefAlt => "refalt",
            Self::AltRef => "altref",
            Self::RefAltFlip => "refalt_flip",
            Self::AltRefFlip => "altref_flip",
            Self::NoOaRef => "no_oa_ref",
            Self::NoOaAlt => "no_oa_alt",
            Self::NoOaRefFlip => "no_oa_ref_flip",
            Self::NoOaAltFlip => "no_oa_alt_flip",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|strategy| strategy.as_str() == s)
    }

    /// Whether this strategy's S keys include `other_allele` (the
    /// `refalt`/`altref` family) as opposed to the `no_oa_*` family.
    pub fn has_other_allele(self) -> bool {
        matches!(
            self,
            Self::RefAlt | Self::AltRef | Self::RefAltFlip | Self::AltRefFlip
        )
    }

    /// Whether this strategy uses the `*_FLIP` strand-complement columns.
    pub fn is_flip(self) -> bool {
        matches!(
            self,
            Self::RefAltFlip | Self::AltRefFlip | Self::NoOaRefFlip | Self::NoOaAltFlip
        )
    }

    /// Whether the effect allele is matched against target `REF` (as
    /// opposed to `ALT`) — best-match priority step 3 prefers this.
    pub fn is_ref_aligned(self) -> bool {
        matches!(self, Self::RefAlt | Self::RefAltFlip | Self::NoOaRef | Self::NoOaRefFlip)
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
