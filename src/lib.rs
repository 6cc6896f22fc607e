// src/lib.rs
//! Article ranking with diversity-aware re-ranking.
//!
//! ```ignore
//! use article_ranker::{RankingEngine, RankingWeights, explain};
//!
//! let engine = RankingEngine::new(RankingWeights::BREAKING_NEWS);
//! let batch = engine.rank(&articles, None, Some(10));
//! for r in &batch.results {
//!     println!("{} {:.3} {:?}", r.article_id, r.total_score, explain(r));
//! }
//! batch.write_back(&mut articles);
//! ```

pub mod analyze;
pub mod article;
pub mod config;
pub mod credibility;
pub mod engine;
pub mod error;
pub mod explain;
pub mod metrics;
pub mod ranking;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{Preset, RankingWeights, RawWeights};
pub use crate::article::{Article, ArticleSource, ArticleStatus};
pub use crate::config::RankingConfig;
pub use crate::credibility::CredibilityTable;
pub use crate::engine::RankingEngine;
pub use crate::error::RankingError;
pub use crate::explain::explain;
pub use crate::ranking::{Criterion, RankingBatch, RankingResult, ScoreBreakdown};
