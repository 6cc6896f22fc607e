// src/article.rs
//! Content records consumed by the ranking engine.
//!
//! Records arrive from the scraper/content store already materialized. Every
//! optional field may be missing; the scoring functions resolve the defaults, so
//! deserialization is deliberately lenient (`#[serde(default)]` everywhere but `id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle state of an article in the publishing pipeline.
/// The engine never changes it; `RankingBatch::write_back` moves it to `Ranked`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    #[default]
    Scraped,
    Ranked,
    Enhanced,
    Published,
    Rejected,
    Error,
}

/// Where an article came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleSource {
    /// Display name, e.g. "Reuters". Used as the diversity key.
    pub name: String,
    pub url: String,
    /// Host name, e.g. "www.reuters.com". Used for the credibility lookup.
    pub domain: String,
    /// Reliability reported by the scraper, in [0,1].
    pub reliability_score: Option<f64>,
    pub country: Option<String>,
}

impl ArticleSource {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            name: name.into(),
            url: format!("https://{domain}"),
            domain,
            reliability_score: None,
            country: None,
        }
    }

    pub fn with_reliability(mut self, score: f64) -> Self {
        self.reliability_score = Some(score);
        self
    }
}

/// A scraped news article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: ArticleSource,

    // Content
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub excerpt: String,

    // Media
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub generated_image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,

    // Metadata
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ArticleStatus,

    // Filled in from a ranking batch.
    #[serde(default)]
    pub rank_score: f64,
    #[serde(default)]
    pub ranking_details: BTreeMap<String, f64>,
}

impl Article {
    /// Minimal record: id, title and source. Everything else defaults.
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: ArticleSource) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source,
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_generated_image(mut self, url: impl Into<String>) -> Self {
        self.generated_image_url = Some(url.into());
        self
    }

    pub fn with_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn scraped(mut self, at: DateTime<Utc>) -> Self {
        self.scraped_at = Some(at);
        self
    }
}
