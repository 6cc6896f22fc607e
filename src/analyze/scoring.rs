//! Per-article criterion scores.
//!
//! Each function looks at one article (plus static tables) and returns a score
//! in [0,1]. Missing optional fields never fail; they resolve to the documented
//! defaults here, in one place.
//!
//! - quality     : length tiers, headline length, attribution, structure, clickbait penalty
//! - credibility : domain table -> source reliability -> 0.5
//! - engagement  : 0.5 base plus headline cues (question, digits, trending terms, breaking/exclusive)
//! - visuals     : primary image, generated image, gallery
//! - timeliness  : step function over hours since scrape

use crate::article::Article;
use crate::credibility::{CredibilityTable, DEFAULT_CREDIBILITY};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Headline phrases that read as clickbait. Each matching pattern costs 0.1 quality.
static CLICKBAIT: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\byou won't believe\b",
        r"(?i)\bshocking\b",
        r"(?i)\bthis one trick\b",
        r"(?i)\b\d+ (things|reasons|ways)\b",
        r"!!+",
        r"\?\?+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("clickbait regex"))
    .collect()
});

/// Blank line between paragraphs, LF or CRLF.
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n\r?\n").expect("paragraph regex"));

/// Topics that tend to draw readers. Plain substring match on the lower-cased title.
pub const TRENDING_TERMS: [&str; 6] = ["ai", "climate", "election", "economy", "health", "tech"];

const CLICKBAIT_PENALTY: f64 = 0.1;
const TIMELINESS_UNKNOWN: f64 = 0.5;

/// Upper bounds (exclusive, in hours) and the score for ages below them.
const TIMELINESS_STEPS: [(f64, f64); 6] = [
    (1.0, 1.0),
    (6.0, 0.9),
    (12.0, 0.8),
    (24.0, 0.7),
    (48.0, 0.5),
    (72.0, 0.3),
];
const TIMELINESS_STALE: f64 = 0.1;

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Content quality from length, headline, attribution and structure.
pub fn quality(article: &Article) -> f64 {
    let mut score = 0.0;

    let content_len = article.content.chars().count();
    if content_len >= 2000 {
        score += 0.3;
    } else if content_len >= 1000 {
        score += 0.2;
    } else if content_len >= 500 {
        score += 0.1;
    }

    let title_len = article.title.chars().count();
    if (40..=100).contains(&title_len) {
        score += 0.2;
    } else if (20..=120).contains(&title_len) {
        score += 0.1;
    }

    if article.author.as_deref().is_some_and(|a| !a.is_empty()) {
        score += 0.1;
    }

    if article.excerpt.chars().count() > 50 {
        score += 0.1;
    }

    if !article.content.is_empty() {
        if PARAGRAPH_BREAK.split(&article.content).count() >= 3 {
            score += 0.1;
        }
        // Quoted material suggests sourcing.
        if article.content.contains(['"', '\'']) {
            score += 0.1;
        }
    }

    score -= clickbait_hits(&article.title) as f64 * CLICKBAIT_PENALTY;

    clamp01(score)
}

/// Number of clickbait patterns the title matches (each pattern counts once).
pub fn clickbait_hits(title: &str) -> usize {
    CLICKBAIT.iter().filter(|re| re.is_match(title)).count()
}

/// Source credibility: table entry for the domain, else the source's own
/// reliability score (if present and positive), else 0.5.
pub fn credibility(article: &Article, table: &CredibilityTable) -> f64 {
    if let Some(score) = table.score_for(&article.source.domain) {
        return score;
    }
    match article.source.reliability_score {
        Some(r) if r.is_finite() && r > 0.0 => clamp01(r),
        _ => DEFAULT_CREDIBILITY,
    }
}

/// Engagement potential from headline cues.
pub fn engagement(article: &Article) -> f64 {
    let mut score = 0.5;
    let title = article.title.to_lowercase();

    if title.contains('?') {
        score += 0.1;
    }
    if title.chars().any(|c| c.is_ascii_digit()) {
        score += 0.05;
    }
    for term in TRENDING_TERMS {
        if title.contains(term) {
            score += 0.05;
        }
    }
    if title.contains("breaking") {
        score += 0.1;
    }
    if title.contains("exclusive") {
        score += 0.1;
    }

    clamp01(score)
}

/// Visual content available for the article.
pub fn visuals(article: &Article) -> f64 {
    let mut score = 0.0;
    if present(&article.image_url) {
        score += 0.5;
    }
    if present(&article.generated_image_url) {
        score += 0.3;
    }
    if article.images.len() > 1 {
        score += 0.2;
    }
    clamp01(score)
}

fn present(url: &Option<String>) -> bool {
    url.as_deref().is_some_and(|u| !u.trim().is_empty())
}

/// Freshness relative to `now`. Unknown scrape time is neutral.
pub fn timeliness(article: &Article, now: DateTime<Utc>) -> f64 {
    let Some(scraped_at) = article.scraped_at else {
        return TIMELINESS_UNKNOWN;
    };
    let hours = (now - scraped_at).num_milliseconds() as f64 / 3_600_000.0;
    timeliness_for_age(hours)
}

/// Step function over article age in hours. Negative ages (clock skew) count as fresh.
pub fn timeliness_for_age(hours: f64) -> f64 {
    TIMELINESS_STEPS
        .iter()
        .find(|(limit, _)| hours < *limit)
        .map(|(_, score)| *score)
        .unwrap_or(TIMELINESS_STALE)
}
