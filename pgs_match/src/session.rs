use std::sync::Mutex;

use ahash::AHashMap;

use crate::error::MatchError;

/// A process-wide string-interning cache, entered for the duration of a
/// matching run (spec §5 "Shared resources").
///
/// Candidate generation interns every `chr_name`/allele value it touches
/// before building its join indices, so equal strings across the scorefile
/// and target frames — and, for the combiner, across shards — always map to
/// the same small integer id. This is the Rust analogue of casting allele
/// and accession columns to a `Categorical` dtype backed by one shared
/// dictionary (`_cast_categorical` in the original matcher).
#[derive(Default)]
pub struct Interner {
    ids: AHashMap<String, u32>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning its (possibly newly assigned) id.
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(s.to_owned());
        self.ids.insert(s.to_owned(), id);
        id
    }

    pub fn resolve(&self, id: u32) -> &str {
        &self.strings[id as usize]
    }
}

/// Owns the interning cache and the bounded worker pool for one matching run
/// (spec §5: "a process-wide string interning cache is entered for the
/// duration of a matching session... exited deterministically when the
/// session ends", and `n_threads` as "a configurable worker count").
pub struct Session {
    interner: Mutex<Interner>,
    pool: rayon::ThreadPool,
}

impl Session {
    pub fn enter(n_threads: usize) -> Result<Self, MatchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
            .map_err(|e| MatchError::ConfigError(e.to_string()))?;
        Ok(Self {
            interner: Mutex::new(Interner::new()),
            pool,
        })
    }

    pub fn intern(&self, s: &str) -> u32 {
        self.interner.lock().expect("interner mutex poisoned").intern(s)
    }

    /// Runs `f` on the session's bounded worker pool. Candidate generation's
    /// per-strategy joins run here; the fixed strategy-table order used to
    /// concatenate their outputs keeps the result independent of scheduling.
    pub fn install<T: Send>(&self, f: impl FnOnce() -> T + Send) -> T {
        self.pool.install(f)
    }
}

// `Session` is entered once and dropped deterministically at the end of a
// matching run, exactly like `with pl.StringCache():` in the original
// `match_variants.py` / `combine_matches.py` scopes.
