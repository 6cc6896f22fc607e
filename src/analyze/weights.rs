//! Validated ranking weights, named presets, and hot-reload from a JSON file.
//!
//! JSON shape (all seven fields required, sum must be 1.0 ± 0.01):
//! {
//!   "quality": 0.20,
//!   "credibility": 0.20,
//!   "engagement": 0.15,
//!   "visuals": 0.10,
//!   "timeliness": 0.15,
//!   "category_diversity": 0.10,
//!   "geographic_diversity": 0.10
//! }
//!
//! A `RankingWeights` value can only be obtained through validation, so the
//! engine never sees a vector that breaks the invariant.

use crate::error::RankingError;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{PoisonError, RwLock},
    time::SystemTime,
};
use tracing::warn;

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Unvalidated weights, e.g. straight from a config file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawWeights {
    pub quality: f64,
    pub credibility: f64,
    pub engagement: f64,
    pub visuals: f64,
    pub timeliness: f64,
    pub category_diversity: f64,
    pub geographic_diversity: f64,
}

impl RawWeights {
    pub fn sum(&self) -> f64 {
        self.quality
            + self.credibility
            + self.engagement
            + self.visuals
            + self.timeliness
            + self.category_diversity
            + self.geographic_diversity
    }
}

/// Immutable weight vector. Construct via [`RankingWeights::new`], `TryFrom<RawWeights>`,
/// deserialization, or one of the preset constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights", into = "RawWeights")]
pub struct RankingWeights {
    quality: f64,
    credibility: f64,
    engagement: f64,
    visuals: f64,
    timeliness: f64,
    category_diversity: f64,
    geographic_diversity: f64,
}

impl RankingWeights {
    pub const DEFAULT: RankingWeights = RankingWeights {
        quality: 0.20,
        credibility: 0.20,
        engagement: 0.15,
        visuals: 0.10,
        timeliness: 0.15,
        category_diversity: 0.10,
        geographic_diversity: 0.10,
    };

    /// Emphasizes quality and credibility.
    pub const QUALITY_FOCUSED: RankingWeights = RankingWeights {
        quality: 0.30,
        credibility: 0.30,
        engagement: 0.10,
        visuals: 0.05,
        timeliness: 0.10,
        category_diversity: 0.08,
        geographic_diversity: 0.07,
    };

    /// Emphasizes engagement and visuals.
    pub const ENGAGEMENT_FOCUSED: RankingWeights = RankingWeights {
        quality: 0.15,
        credibility: 0.15,
        engagement: 0.25,
        visuals: 0.20,
        timeliness: 0.10,
        category_diversity: 0.08,
        geographic_diversity: 0.07,
    };

    /// Freshness first, still anchored on credible sources.
    pub const BREAKING_NEWS: RankingWeights = RankingWeights {
        quality: 0.15,
        credibility: 0.20,
        engagement: 0.10,
        visuals: 0.10,
        timeliness: 0.30,
        category_diversity: 0.08,
        geographic_diversity: 0.07,
    };

    /// Validating constructor, argument order matches the JSON shape.
    pub fn new(
        quality: f64,
        credibility: f64,
        engagement: f64,
        visuals: f64,
        timeliness: f64,
        category_diversity: f64,
        geographic_diversity: f64,
    ) -> Result<Self, RankingError> {
        Self::try_from(RawWeights {
            quality,
            credibility,
            engagement,
            visuals,
            timeliness,
            category_diversity,
            geographic_diversity,
        })
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }
    pub fn credibility(&self) -> f64 {
        self.credibility
    }
    pub fn engagement(&self) -> f64 {
        self.engagement
    }
    pub fn visuals(&self) -> f64 {
        self.visuals
    }
    pub fn timeliness(&self) -> f64 {
        self.timeliness
    }
    pub fn category_diversity(&self) -> f64 {
        self.category_diversity
    }
    pub fn geographic_diversity(&self) -> f64 {
        self.geographic_diversity
    }

    pub fn sum(&self) -> f64 {
        self.to_raw().sum()
    }

    pub fn to_raw(&self) -> RawWeights {
        RawWeights {
            quality: self.quality,
            credibility: self.credibility,
            engagement: self.engagement,
            visuals: self.visuals,
            timeliness: self.timeliness,
            category_diversity: self.category_diversity,
            geographic_diversity: self.geographic_diversity,
        }
    }
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<RawWeights> for RankingWeights {
    type Error = RankingError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        let sum = raw.sum();
        if sum.is_nan() || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RankingError::InvalidWeights {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }
        Ok(Self {
            quality: raw.quality,
            credibility: raw.credibility,
            engagement: raw.engagement,
            visuals: raw.visuals,
            timeliness: raw.timeliness,
            category_diversity: raw.category_diversity,
            geographic_diversity: raw.geographic_diversity,
        })
    }
}

impl From<RankingWeights> for RawWeights {
    fn from(w: RankingWeights) -> Self {
        w.to_raw()
    }
}

/// Named weight presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Default,
    QualityFocused,
    EngagementFocused,
    BreakingNews,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Default,
        Preset::QualityFocused,
        Preset::EngagementFocused,
        Preset::BreakingNews,
    ];

    pub fn weights(self) -> RankingWeights {
        match self {
            Preset::Default => RankingWeights::DEFAULT,
            Preset::QualityFocused => RankingWeights::QUALITY_FOCUSED,
            Preset::EngagementFocused => RankingWeights::ENGAGEMENT_FOCUSED,
            Preset::BreakingNews => RankingWeights::BREAKING_NEWS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::QualityFocused => "quality_focused",
            Preset::EngagementFocused => "engagement_focused",
            Preset::BreakingNews => "breaking_news",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| RankingError::UnknownPreset(s.to_string()))
    }
}

/// Hot-reload wrapper: reloads when the weight file mtime changes.
/// Files that fail to parse or validate are ignored; the last good vector stays.
#[derive(Debug)]
pub struct HotReloadWeights {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    weights: RankingWeights,
    last_modified: Option<SystemTime>,
}

impl HotReloadWeights {
    /// Create with a path (defaults to "config/weights.json" if `None`) and the
    /// vector to use until a valid file shows up.
    pub fn new(path: Option<&Path>, fallback: RankingWeights) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config/weights.json"));
        Self {
            path,
            inner: RwLock::new(State {
                weights: fallback,
                last_modified: None,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the latest weights, reloading if the file changed.
    pub fn current(&self) -> RankingWeights {
        let mtime = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            // No file: keep whatever we have.
            Err(_) => return self.read_state().weights,
        };

        {
            let guard = self.read_state();
            if guard.last_modified == Some(mtime) {
                return guard.weights;
            }
        }

        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Double-check in case another reader reloaded first.
        if guard.last_modified != Some(mtime) {
            match load_weights_file(&self.path) {
                Ok(w) => guard.weights = w,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "ignoring invalid weights file");
                }
            }
            // Remember the mtime either way so a broken file is not re-parsed on every call.
            guard.last_modified = Some(mtime);
        }
        guard.weights
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load and validate weights directly (no caching).
pub fn load_weights_file(path: &Path) -> anyhow::Result<RankingWeights> {
    let bytes = fs::read(path)?;
    let raw: RawWeights = serde_json::from_slice(&bytes)?;
    Ok(RankingWeights::try_from(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Write, thread, time::Duration};

    #[test]
    fn presets_satisfy_sum_invariant() {
        for p in Preset::ALL {
            let w = p.weights();
            assert!(
                (w.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
                "{p} sums to {}",
                w.sum()
            );
            assert_eq!(RankingWeights::try_from(w.to_raw()), Ok(w));
        }
    }

    #[test]
    fn rejects_vectors_off_by_more_than_tolerance() {
        let err = RankingWeights::new(0.5, 0.5, 0.5, 0.1, 0.1, 0.1, 0.1).unwrap_err();
        assert!(matches!(err, RankingError::InvalidWeights { .. }));
        assert!(RankingWeights::new(0.2, 0.2, 0.15, 0.1, 0.15, 0.1, 0.085).is_err());
        // Inside the tolerance band.
        assert!(RankingWeights::new(0.2, 0.2, 0.15, 0.1, 0.15, 0.1, 0.095).is_ok());
    }

    #[test]
    fn rejects_nan() {
        assert!(RankingWeights::new(f64::NAN, 0.2, 0.15, 0.1, 0.15, 0.1, 0.1).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok = r#"{"quality":0.25,"credibility":0.25,"engagement":0.15,"visuals":0.10,
                     "timeliness":0.10,"category_diversity":0.08,"geographic_diversity":0.07}"#;
        let w: RankingWeights = serde_json::from_str(ok).unwrap();
        assert!((w.quality() - 0.25).abs() < 1e-12);

        let bad = r#"{"quality":0.9,"credibility":0.25,"engagement":0.15,"visuals":0.10,
                      "timeliness":0.10,"category_diversity":0.08,"geographic_diversity":0.07}"#;
        assert!(serde_json::from_str::<RankingWeights>(bad).is_err());
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!("breaking_news".parse::<Preset>(), Ok(Preset::BreakingNews));
        assert_eq!("Quality-Focused".parse::<Preset>(), Ok(Preset::QualityFocused));
        assert!(matches!(
            "viral".parse::<Preset>(),
            Err(RankingError::UnknownPreset(_))
        ));
    }

    #[test]
    fn loads_and_hot_reloads_keeping_last_good() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("weights.json");

        let hot = HotReloadWeights::new(Some(&path), RankingWeights::DEFAULT);
        assert_eq!(hot.current(), RankingWeights::DEFAULT);

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(
                f,
                r#"{{"quality":0.30,"credibility":0.30,"engagement":0.10,"visuals":0.05,"timeliness":0.10,"category_diversity":0.08,"geographic_diversity":0.07}}"#
            )
            .unwrap();
            f.sync_all().unwrap();
        }
        assert_eq!(hot.current(), RankingWeights::QUALITY_FOCUSED);

        // Ensure different mtime (coarse filesystem granularity).
        thread::sleep(Duration::from_millis(1100));

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(
                f,
                r#"{{"quality":0.9,"credibility":0.9,"engagement":0.9,"visuals":0.9,"timeliness":0.9,"category_diversity":0.9,"geographic_diversity":0.9}}"#
            )
            .unwrap();
            f.sync_all().unwrap();
        }
        assert_eq!(hot.current(), RankingWeights::QUALITY_FOCUSED);
    }
}
