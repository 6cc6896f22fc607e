// src/error.rs
//! Typed validation errors for the ranking engine.
//!
//! Only configuration can fail: a weight vector that breaks the sum-to-one
//! invariant, an unknown preset name, or a credibility override outside [0,1].
//! Individual articles never produce errors; missing fields fall back to defaults.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    /// The seven weights do not sum to 1.0 within the allowed tolerance.
    #[error("weights must sum to 1.0 (±{tolerance}), got {sum}")]
    InvalidWeights { sum: f64, tolerance: f64 },

    #[error("unknown ranking preset `{0}` (expected default, quality_focused, engagement_focused or breaking_news)")]
    UnknownPreset(String),

    #[error("score for `{key}` must be a finite value in [0, 1], got {value}")]
    InvalidScore { key: String, value: f64 },
}
