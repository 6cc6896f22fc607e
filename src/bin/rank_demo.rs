//! Demo that ranks a JSON file of articles (or a small built-in sample) and
//! prints the batch, per-article explanations, and the Prometheus metrics.
//!
//! Usage: `rank_demo [articles.json]`

use anyhow::Context;
use article_ranker::{explain, Article, ArticleSource, RankingConfig};
use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;

fn sample_articles() -> Vec<Article> {
    let now = Utc::now();
    let reuters = ArticleSource::new("Reuters", "www.reuters.com");
    let blog = ArticleSource::new("Tech Blog", "techblog.example").with_reliability(0.6);
    vec![
        Article::new(
            "r1",
            "Central bank holds rates steady as inflation cools in spring",
            reuters.clone(),
        )
        .with_content(format!(
            "{}\n\n\"We remain data dependent,\" the governor said.\n\n{}",
            "Policy makers kept the benchmark rate unchanged. ".repeat(30),
            "Markets were little changed after the announcement. ".repeat(10)
        ))
        .with_author("Staff Reporter")
        .with_category("Economy")
        .with_image("https://img.example/r1.jpg")
        .scraped(now - Duration::minutes(20)),
        Article::new("r2", "Exporters brace for new tariffs on steel", reuters)
        .with_content("Steel exporters said on Monday... ".repeat(40))
        .with_category("Economy")
        .scraped(now - Duration::hours(3)),
        Article::new("b1", "You Won't Believe These 5 AI Gadgets!!!", blog)
            .with_content("Gadgets. ".repeat(80))
            .with_category("Tech")
            .with_images(["a.jpg", "b.jpg", "c.jpg"])
            .scraped(now - Duration::hours(30)),
    ]
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("article_ranker=info,warn")),
        )
        .with_target(false)
        .init();

    let prometheus = article_ranker::metrics::install_prometheus()?;

    let cfg = RankingConfig::load_default()?;
    let engine = cfg.build_engine()?;

    let mut articles = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading articles from {path}"))?;
            serde_json::from_str::<Vec<Article>>(&raw)
                .with_context(|| format!("parsing articles in {path}"))?
        }
        None => sample_articles(),
    };

    let weights = cfg.hot_weights()?.map(|hot| hot.current());
    let batch = engine.rank(&articles, weights.as_ref(), cfg.top_n);
    println!("{}", serde_json::to_string_pretty(&batch)?);

    for r in &batch.results {
        println!("#{} {} ({:.3})", r.rank_position, r.article_id, r.total_score);
        for line in explain(r).values() {
            println!("    {line}");
        }
    }

    let updated = batch.write_back(&mut articles);
    println!("updated {updated} article(s)");
    println!("{}", prometheus.render());
    Ok(())
}
