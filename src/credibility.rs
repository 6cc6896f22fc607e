//! # Credibility Table
//!
//! Maps publisher domains (e.g. "reuters.com", "www.bbc.co.uk") to a
//! trustworthiness score in `[0.0, 1.0]`.
//!
//! - Built-in seed with well-known outlets, initialized once.
//! - Case-insensitive lookup; a leading `www.` is ignored.
//! - Overrides can extend or replace seed entries (from config or a JSON file).
//!
//! The scorer falls back to the source's own reliability score and then to a
//! neutral 0.5 when a domain is not in the table.

use crate::error::RankingError;
use anyhow::Context;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::{fs, path::Path};

/// Score used when neither the table nor the source knows anything.
pub const DEFAULT_CREDIBILITY: f64 = 0.5;

static BUILTIN: Lazy<CredibilityTable> = Lazy::new(|| {
    let scores = [
        ("reuters.com", 0.95),
        ("apnews.com", 0.95),
        ("bbc.com", 0.90),
        ("bbc.co.uk", 0.90),
        ("npr.org", 0.88),
        ("pbs.org", 0.88),
        ("nytimes.com", 0.85),
        ("washingtonpost.com", 0.85),
        ("theguardian.com", 0.85),
        ("wsj.com", 0.85),
        ("economist.com", 0.85),
        ("cnn.com", 0.75),
        ("foxnews.com", 0.70),
        ("msnbc.com", 0.70),
    ]
    .into_iter()
    .map(|(d, s)| (d.to_string(), s))
    .collect();
    CredibilityTable { scores }
});

#[derive(Debug, Clone, PartialEq)]
pub struct CredibilityTable {
    scores: HashMap<String, f64>,
}

impl Default for CredibilityTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl CredibilityTable {
    /// The shared built-in seed.
    pub fn builtin() -> &'static CredibilityTable {
        &BUILTIN
    }

    /// An empty table: every lookup misses.
    pub fn empty() -> Self {
        Self {
            scores: HashMap::new(),
        }
    }

    /// Copy of `self` with extra domain scores layered on top.
    /// Every score must be finite and within [0,1].
    pub fn with_overrides<I, K>(&self, overrides: I) -> Result<Self, RankingError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut out = self.clone();
        for (domain, score) in overrides {
            let key = normalize_domain(domain.as_ref());
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(RankingError::InvalidScore { key, value: score });
            }
            out.scores.insert(key, score);
        }
        Ok(out)
    }

    /// Copy of `self` with overrides from a JSON object `{ "domain": score, ... }`.
    /// Entries are applied in key order, so the first bad key is reported.
    pub fn with_overrides_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading credibility overrides from {}", path.display()))?;
        let map: BTreeMap<String, f64> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing credibility overrides in {}", path.display()))?;
        self.with_overrides(map)
            .with_context(|| format!("invalid credibility override in {}", path.display()))
    }

    /// Table score for a domain, if known.
    pub fn score_for(&self, domain: &str) -> Option<f64> {
        self.scores.get(&normalize_domain(domain)).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Lower-case, trim, and strip one leading `www.`.
pub fn normalize_domain(domain: &str) -> String {
    let d = domain.trim().to_ascii_lowercase();
    match d.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => d,
    }
}
