// src/ranking.rs
//! Ranking output: per-article results and the whole-batch summary.
//!
//! Shapes are what the publishing layer stores back onto articles, so they
//! serialize to stable JSON (criterion names in snake_case, breakdown in
//! insertion order) and read back from it.

use crate::analyze::rerank::sort_by_total_desc;
use crate::analyze::weights::RankingWeights;
use crate::article::{Article, ArticleStatus};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Scoring criteria. The first five feed the weighted total; the two diversity
/// criteria are added by the re-ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Quality,
    Credibility,
    Engagement,
    Visuals,
    Timeliness,
    CategoryDiversity,
    GeographicDiversity,
}

impl Criterion {
    /// Criteria that contribute to the first-pass weighted total.
    pub const BASE: [Criterion; 5] = [
        Criterion::Quality,
        Criterion::Credibility,
        Criterion::Engagement,
        Criterion::Visuals,
        Criterion::Timeliness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Quality => "quality",
            Criterion::Credibility => "credibility",
            Criterion::Engagement => "engagement",
            Criterion::Visuals => "visuals",
            Criterion::Timeliness => "timeliness",
            Criterion::CategoryDiversity => "category_diversity",
            Criterion::GeographicDiversity => "geographic_diversity",
        }
    }

    /// Capitalized name for human-readable output.
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Quality => "Quality",
            Criterion::Credibility => "Credibility",
            Criterion::Engagement => "Engagement",
            Criterion::Visuals => "Visuals",
            Criterion::Timeliness => "Timeliness",
            Criterion::CategoryDiversity => "Category diversity",
            Criterion::GeographicDiversity => "Geographic diversity",
        }
    }

    /// Weight for this criterion in `w`.
    pub fn weight_in(self, w: &RankingWeights) -> f64 {
        match self {
            Criterion::Quality => w.quality(),
            Criterion::Credibility => w.credibility(),
            Criterion::Engagement => w.engagement(),
            Criterion::Visuals => w.visuals(),
            Criterion::Timeliness => w.timeliness(),
            Criterion::CategoryDiversity => w.category_diversity(),
            Criterion::GeographicDiversity => w.geographic_diversity(),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered criterion -> score mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    entries: Vec<(Criterion, f64)>,
}

impl ScoreBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, criterion: Criterion, score: f64) {
        match self.entries.iter_mut().find(|(c, _)| *c == criterion) {
            Some(slot) => slot.1 = score,
            None => self.entries.push((criterion, score)),
        }
    }

    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == criterion)
            .map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ScoreBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (c, s) in &self.entries {
            map.serialize_entry(c.as_str(), s)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = ScoreBreakdown;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of criterion name to score")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = ScoreBreakdown::new();
                while let Some((criterion, score)) = access.next_entry::<Criterion, f64>()? {
                    out.insert(criterion, score);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(BreakdownVisitor)
    }
}

/// Ranking outcome for one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub article_id: String,
    /// Weighted first-pass total, minus the diversity penalty (floored at 0).
    pub total_score: f64,
    pub scores: ScoreBreakdown,
    pub weights_used: RankingWeights,
    /// 1-based position in the first-pass ordering of the whole batch.
    pub rank_position: usize,
    /// Standing within the whole batch, in (0, 100].
    pub percentile: f64,
}

impl RankingResult {
    pub fn score(&self, criterion: Criterion) -> Option<f64> {
        self.scores.get(criterion)
    }
}

/// Everything one `rank` call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingBatch {
    pub results: Vec<RankingResult>,
    /// Number of input articles (before truncation).
    pub total_articles: usize,
    #[serde(
        rename = "processing_time_ms",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub processing_time: Duration,
    pub weights_used: RankingWeights,
}

fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

fn deserialize_millis<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    let ms = f64::deserialize(d)?;
    Duration::try_from_secs_f64(ms / 1000.0).map_err(de::Error::custom)
}

impl RankingBatch {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn processing_time_ms(&self) -> f64 {
        self.processing_time.as_secs_f64() * 1000.0
    }

    /// The `n` best results by total score (ties keep batch order).
    pub fn top(&self, n: usize) -> Vec<&RankingResult> {
        let mut sorted: Vec<&RankingResult> = self.results.iter().collect();
        sort_by_total_desc(&mut sorted);
        sorted.truncate(n);
        sorted
    }

    pub fn get(&self, article_id: &str) -> Option<&RankingResult> {
        self.results.iter().find(|r| r.article_id == article_id)
    }

    /// Copy scores onto the matching articles and mark them `Ranked`.
    /// Articles without a result in this batch are left untouched.
    /// Returns the number of articles updated.
    pub fn write_back(&self, articles: &mut [Article]) -> usize {
        let mut updated = 0;
        for article in articles.iter_mut() {
            let Some(result) = self.get(&article.id) else {
                continue;
            };
            article.rank_score = result.total_score;
            article.ranking_details = result
                .scores
                .iter()
                .map(|(c, s)| (c.as_str().to_string(), s))
                .collect();
            article.status = ArticleStatus::Ranked;
            updated += 1;
        }
        updated
    }
}
