//! # Ranking Engine
//! Pure pipeline that maps a batch of articles to a `RankingBatch`.
//! No I/O and no state between calls; safe to share across threads.
//!
//! Order:
//! 1) score every article on the five base criteria and take the weighted total
//! 2) stable sort descending; assign rank position and percentile
//! 3) diversity penalty in that order, then a stable re-sort
//! 4) optional truncation to the top N (positions/percentiles are not recomputed)

use crate::analyze::rerank::{apply_diversity_penalty, sort_by_total_desc, DiversityKey};
use crate::analyze::{score_article, weighted_total, RankingWeights};
use crate::article::Article;
use crate::credibility::CredibilityTable;
use crate::ranking::{Criterion, RankingBatch, RankingResult};
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    weights: RankingWeights,
    credibility: CredibilityTable,
}

impl RankingEngine {
    pub fn new(weights: RankingWeights) -> Self {
        Self {
            weights,
            credibility: CredibilityTable::default(),
        }
    }

    /// Replace the credibility table (e.g. built-in seed plus config overrides).
    pub fn with_credibility(mut self, table: CredibilityTable) -> Self {
        self.credibility = table;
        self
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    pub fn credibility(&self) -> &CredibilityTable {
        &self.credibility
    }

    /// Rank `articles` against the current wall clock.
    /// `weights` overrides the engine's vector for this call only.
    pub fn rank(
        &self,
        articles: &[Article],
        weights: Option<&RankingWeights>,
        top_n: Option<usize>,
    ) -> RankingBatch {
        self.rank_at(articles, weights, top_n, Utc::now())
    }

    /// Same as [`rank`](Self::rank) with an explicit reference time for timeliness.
    pub fn rank_at(
        &self,
        articles: &[Article],
        weights: Option<&RankingWeights>,
        top_n: Option<usize>,
        now: DateTime<Utc>,
    ) -> RankingBatch {
        crate::metrics::ensure_metrics_described();
        let started = Instant::now();
        let weights = *weights.unwrap_or(&self.weights);
        debug!(articles = articles.len(), ?top_n, "ranking batch");

        // (1) first pass
        let mut ranked: Vec<(RankingResult, DiversityKey<'_>)> = articles
            .iter()
            .map(|a| {
                let scores = score_article(a, &self.credibility, now);
                let total_score = weighted_total(&scores, &weights);
                let result = RankingResult {
                    article_id: a.id.clone(),
                    total_score,
                    scores,
                    weights_used: weights,
                    rank_position: 0,
                    percentile: 0.0,
                };
                let key = DiversityKey {
                    category: a.category.as_deref(),
                    source: a.source.name.as_str(),
                };
                (result, key)
            })
            .collect();

        // (2) stable sort, positions over the whole batch
        sort_by_total_desc(&mut ranked);
        assign_positions(ranked.iter_mut().map(|(r, _)| r));

        // (3) diversity pass + re-sort
        let mut results = apply_diversity_penalty(ranked);
        let penalized = results
            .iter()
            .filter(|r| {
                [Criterion::CategoryDiversity, Criterion::GeographicDiversity]
                    .iter()
                    .any(|c| r.score(*c).is_some_and(|s| s < 1.0))
            })
            .count();

        // (4) truncation
        if let Some(n) = top_n {
            results.truncate(n);
        }

        let processing_time = started.elapsed();
        counter!("ranking_batches_total").increment(1);
        counter!("ranking_articles_total").increment(articles.len() as u64);
        counter!("ranking_penalized_total").increment(penalized as u64);
        histogram!("ranking_duration_ms").record(processing_time.as_secs_f64() * 1000.0);
        info!(
            articles = articles.len(),
            results = results.len(),
            penalized,
            elapsed_ms = processing_time.as_secs_f64() * 1000.0,
            "ranking batch done"
        );

        RankingBatch {
            results,
            total_articles: articles.len(),
            processing_time,
            weights_used: weights,
        }
    }

    /// Best `limit` articles of one category (exact match), ranked on their own.
    pub fn top_by_category(
        &self,
        articles: &[Article],
        category: &str,
        limit: usize,
    ) -> Vec<RankingResult> {
        let filtered: Vec<Article> = articles
            .iter()
            .filter(|a| a.category.as_deref() == Some(category))
            .cloned()
            .collect();
        self.rank(&filtered, None, Some(limit)).results
    }
}

/// 1-based position and percentile `(n - i) / n * 100` in current order.
fn assign_positions<'a>(results: impl ExactSizeIterator<Item = &'a mut RankingResult>) {
    let n = results.len();
    for (i, r) in results.enumerate() {
        r.rank_position = i + 1;
        r.percentile = (n - i) as f64 / n as f64 * 100.0;
    }
}
