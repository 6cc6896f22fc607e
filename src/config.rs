// src/config.rs
//! Ranking configuration: preset or explicit weights, default top-N, and
//! credibility overrides. Loaded from TOML or JSON.
//!
//! TOML shape:
//! ```toml
//! preset = "breaking_news"
//! top_n = 10
//! weights_file = "config/weights.json"   # optional, hot-reloaded
//! credibility_file = "config/credibility.json"   # optional, [credibility] wins
//!
//! [weights]                               # optional, wins over `preset`
//! quality = 0.2
//! # ...
//!
//! [credibility]
//! "example.org" = 0.8
//! ```
//!
//! Lookup order for `load_default()`:
//! 1) $RANKING_CONFIG_PATH
//! 2) config/ranking.toml
//! 3) config/ranking.json
//! 4) built-in defaults
//!
//! `$RANKING_PRESET` overrides the preset from the file.

use crate::analyze::weights::{HotReloadWeights, Preset, RankingWeights, RawWeights};
use crate::credibility::CredibilityTable;
use crate::engine::RankingEngine;
use crate::error::RankingError;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_CONFIG_PATH: &str = "RANKING_CONFIG_PATH";
pub const ENV_PRESET: &str = "RANKING_PRESET";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Preset name; ignored when `weights` is set.
    pub preset: Option<String>,
    pub weights: Option<RawWeights>,
    pub top_n: Option<usize>,
    /// Domain -> score, layered over the built-in table and `credibility_file`.
    pub credibility: HashMap<String, f64>,
    /// JSON object of domain -> score, applied before the inline overrides.
    pub credibility_file: Option<PathBuf>,
    /// JSON weight file watched for changes.
    pub weights_file: Option<PathBuf>,
}

impl RankingConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading ranking config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing ranking config {}", path.display()))
    }

    /// Load using env var + fallbacks, then apply `$RANKING_PRESET`.
    pub fn load_default() -> Result<Self> {
        let mut cfg = match locate_config()? {
            Some(path) => {
                debug!(path = %path.display(), "loading ranking config");
                Self::load_from(&path)?
            }
            None => Self::default(),
        };
        if let Ok(preset) = std::env::var(ENV_PRESET) {
            let preset = preset.trim();
            if !preset.is_empty() {
                cfg.preset = Some(preset.to_string());
            }
        }
        Ok(cfg)
    }

    /// Explicit weights if given, else the named preset, else the default preset.
    pub fn resolve_weights(&self) -> Result<RankingWeights, RankingError> {
        if let Some(raw) = self.weights {
            return RankingWeights::try_from(raw);
        }
        match self.preset.as_deref() {
            Some(name) => Ok(name.parse::<Preset>()?.weights()),
            None => Ok(RankingWeights::DEFAULT),
        }
    }

    /// Built-in table, then `credibility_file`, then the inline overrides.
    /// Validation failures carry a [`RankingError`] (see `downcast_ref`).
    pub fn credibility_table(&self) -> Result<CredibilityTable> {
        let base = match self.credibility_file.as_deref() {
            Some(path) => {
                debug!(path = %path.display(), "loading credibility overrides");
                CredibilityTable::builtin().with_overrides_file(path)?
            }
            None => CredibilityTable::builtin().clone(),
        };
        let mut overrides: Vec<(&String, f64)> =
            self.credibility.iter().map(|(k, v)| (k, *v)).collect();
        // HashMap order is random; keep error reporting deterministic.
        overrides.sort_by(|a, b| a.0.cmp(b.0));
        Ok(base.with_overrides(overrides)?)
    }

    /// Validate everything and build an engine. Fails before any article is scored.
    pub fn build_engine(&self) -> Result<RankingEngine> {
        let weights = self.resolve_weights()?;
        let table = self.credibility_table()?;
        Ok(RankingEngine::new(weights).with_credibility(table))
    }

    /// Hot-reloading weights for `weights_file`, falling back to the resolved weights.
    pub fn hot_weights(&self) -> Result<Option<HotReloadWeights>, RankingError> {
        let fallback = self.resolve_weights()?;
        Ok(self
            .weights_file
            .as_deref()
            .map(|p| HotReloadWeights::new(Some(p), fallback)))
    }
}

fn locate_config() -> Result<Option<PathBuf>> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Ok(Some(pb));
        }
        return Err(anyhow!(
            "{ENV_CONFIG_PATH} points to non-existent path {}",
            pb.display()
        ));
    }
    for candidate in ["config/ranking.toml", "config/ranking.json"] {
        let pb = PathBuf::from(candidate);
        if pb.exists() {
            return Ok(Some(pb));
        }
    }
    Ok(None)
}

fn parse_config(s: &str, hint_ext: &str) -> Result<RankingConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        // Unknown extension: sniff the content.
        _ if s.trim_start().starts_with('{') => Ok(serde_json::from_str(s)?),
        _ => Ok(toml::from_str(s)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_and_json_parse_to_same_config() {
        let toml = r#"
preset = "quality_focused"
top_n = 3

[credibility]
"example.org" = 0.8
"#;
        let json = r#"{"preset":"quality_focused","top_n":3,"credibility":{"example.org":0.8}}"#;
        let a = parse_config(toml, "toml").unwrap();
        let b = parse_config(json, "json").unwrap();
        assert_eq!(a, b);
        assert_eq!(parse_config(json, "").unwrap(), b);
        assert_eq!(a.resolve_weights().unwrap(), RankingWeights::QUALITY_FOCUSED);
    }

    #[test]
    fn explicit_weights_win_over_preset() {
        let toml = r#"
preset = "breaking_news"

[weights]
quality = 0.25
credibility = 0.25
engagement = 0.15
visuals = 0.10
timeliness = 0.10
category_diversity = 0.08
geographic_diversity = 0.07
"#;
        let cfg = parse_config(toml, "toml").unwrap();
        let w = cfg.resolve_weights().unwrap();
        assert!((w.quality() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn invalid_config_fails_before_engine_exists() {
        let cfg = RankingConfig {
            preset: Some("clickbait_max".into()),
            ..Default::default()
        };
        let err = cfg.build_engine().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RankingError>(),
            Some(RankingError::UnknownPreset(_))
        ));

        let mut cfg = RankingConfig::default();
        cfg.credibility.insert("bad.example".into(), 2.0);
        let err = cfg.build_engine().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RankingError>(),
            Some(RankingError::InvalidScore { .. })
        ));
    }

    #[test]
    fn empty_config_is_default_engine() {
        let engine = RankingConfig::default().build_engine().unwrap();
        assert_eq!(*engine.weights(), RankingWeights::DEFAULT);
        assert_eq!(engine.credibility(), CredibilityTable::builtin());
    }
}
