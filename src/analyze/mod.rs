// src/analyze/mod.rs
//! Scoring building blocks: weight vectors, per-criterion scorers, and the diversity reranker.
//!
//! Everything here is pure; the orchestration lives in `crate::engine`.

pub mod rerank;
pub mod scoring;
pub mod weights;

use crate::article::Article;
use crate::credibility::CredibilityTable;
use crate::ranking::{Criterion, ScoreBreakdown};
use chrono::{DateTime, Utc};

// Re-export convenient types.
pub use crate::analyze::rerank::{apply_diversity_penalty, DiversityAdjustment, DiversityKey};
pub use crate::analyze::weights::{HotReloadWeights, Preset, RankingWeights, RawWeights};

/// Score one article on the five base criteria, in criterion order.
pub fn score_article(
    article: &Article,
    credibility: &CredibilityTable,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let mut scores = ScoreBreakdown::new();
    scores.insert(Criterion::Quality, scoring::quality(article));
    scores.insert(
        Criterion::Credibility,
        scoring::credibility(article, credibility),
    );
    scores.insert(Criterion::Engagement, scoring::engagement(article));
    scores.insert(Criterion::Visuals, scoring::visuals(article));
    scores.insert(Criterion::Timeliness, scoring::timeliness(article, now));
    scores
}

/// Weighted first-pass total over the five base criteria.
/// The two diversity weights are not part of this sum.
pub fn weighted_total(scores: &ScoreBreakdown, w: &RankingWeights) -> f64 {
    Criterion::BASE
        .iter()
        .map(|c| scores.get(*c).unwrap_or(0.0) * c.weight_in(w))
        .sum()
}
