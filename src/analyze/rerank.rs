// src/analyze/rerank.rs
//! Diversity reranking: penalize repeats of a category or source further down the list.
//!
//! - Walk the results in first-pass rank order, counting categories and sources seen so far.
//! - Each result loses `category_count * 0.02 + source_count * 0.03` (floored at 0) and
//!   gets `category_diversity` / `geographic_diversity` sub-scores (`1 - count * 0.2`, floored at 0).
//! - Results without a category never pay the category part.
//! - Finally re-sort descending by the adjusted total, stable on ties.
//!
//! The penalty constants are fixed; the weight vector's diversity weights do not enter here.

use crate::ranking::{Criterion, RankingResult};
use std::collections::HashMap;

pub const CATEGORY_PENALTY: f64 = 0.02;
pub const SOURCE_PENALTY: f64 = 0.03;
/// Sub-score drop per earlier occurrence.
pub const DIVERSITY_DECAY: f64 = 0.2;

/// What a result is compared on for diversity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiversityKey<'a> {
    pub category: Option<&'a str>,
    pub source: &'a str,
}

/// Adjustment for one result given how often its category and source were already seen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiversityAdjustment {
    pub penalty: f64,
    pub category_diversity: f64,
    pub geographic_diversity: f64,
}

impl DiversityAdjustment {
    pub fn for_counts(category_count: usize, source_count: usize) -> Self {
        let (c, s) = (category_count as f64, source_count as f64);
        Self {
            penalty: c * CATEGORY_PENALTY + s * SOURCE_PENALTY,
            category_diversity: (1.0 - c * DIVERSITY_DECAY).max(0.0),
            geographic_diversity: (1.0 - s * DIVERSITY_DECAY).max(0.0),
        }
    }

    /// Apply to a result: reduce the total and record both sub-scores.
    pub fn apply(&self, result: &mut RankingResult) {
        result.total_score = (result.total_score - self.penalty).max(0.0);
        result
            .scores
            .insert(Criterion::CategoryDiversity, self.category_diversity);
        result
            .scores
            .insert(Criterion::GeographicDiversity, self.geographic_diversity);
    }
}

/// Penalize repeats and re-sort.
///
/// `ranked` must already be in first-pass order; counters advance strictly in
/// that order, never in the re-sorted one. Returns the results in final order.
pub fn apply_diversity_penalty(
    ranked: Vec<(RankingResult, DiversityKey<'_>)>,
) -> Vec<RankingResult> {
    let mut seen_categories: HashMap<&str, usize> = HashMap::new();
    let mut seen_sources: HashMap<&str, usize> = HashMap::new();

    let mut out = Vec::with_capacity(ranked.len());
    for (mut result, key) in ranked {
        let category_count = key
            .category
            .and_then(|c| seen_categories.get(c).copied())
            .unwrap_or(0);
        let source_count = seen_sources.get(key.source).copied().unwrap_or(0);

        DiversityAdjustment::for_counts(category_count, source_count).apply(&mut result);

        if let Some(c) = key.category {
            *seen_categories.entry(c).or_insert(0) += 1;
        }
        *seen_sources.entry(key.source).or_insert(0) += 1;

        out.push(result);
    }

    sort_by_total_desc(&mut out);
    out
}

/// Anything that carries a total score to sort on.
pub trait Scored {
    fn total_score(&self) -> f64;
}

impl Scored for RankingResult {
    fn total_score(&self) -> f64 {
        self.total_score
    }
}

impl Scored for (RankingResult, DiversityKey<'_>) {
    fn total_score(&self) -> f64 {
        self.0.total_score
    }
}

impl<T: Scored> Scored for &T {
    fn total_score(&self) -> f64 {
        T::total_score(self)
    }
}

/// Stable descending sort by total score. Used for both the first pass and the re-sort.
pub fn sort_by_total_desc<T: Scored>(items: &mut [T]) {
    items.sort_by(|a, b| b.total_score().total_cmp(&a.total_score()));
}
