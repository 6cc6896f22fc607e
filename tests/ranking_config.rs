// tests/ranking_config.rs
use article_ranker::config::{ENV_CONFIG_PATH, ENV_PRESET};
use article_ranker::{RankingConfig, RankingError, RankingWeights};
use std::{env, fs};

#[test]
fn load_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("ranking.toml");
    fs::write(
        &p_toml,
        r#"
preset = "engagement_focused"
top_n = 5

[credibility]
"www.Herald.example" = 0.8
"#,
    )
    .unwrap();
    let cfg = RankingConfig::load_from(&p_toml).unwrap();
    assert_eq!(cfg.top_n, Some(5));
    let engine = cfg.build_engine().unwrap();
    assert_eq!(*engine.weights(), RankingWeights::ENGAGEMENT_FOCUSED);
    assert_eq!(engine.credibility().score_for("herald.example"), Some(0.8));
    assert_eq!(engine.credibility().score_for("reuters.com"), Some(0.95));

    let p_json = dir.path().join("ranking.json");
    fs::write(&p_json, r#"{"preset":"breaking-news"}"#).unwrap();
    let cfg = RankingConfig::load_from(&p_json).unwrap();
    assert_eq!(cfg.resolve_weights().unwrap(), RankingWeights::BREAKING_NEWS);
}

#[test]
fn invalid_weights_in_file_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("ranking.toml");
    fs::write(
        &p,
        r#"
[weights]
quality = 0.5
credibility = 0.5
engagement = 0.5
visuals = 0.1
timeliness = 0.1
category_diversity = 0.1
geographic_diversity = 0.1
"#,
    )
    .unwrap();
    let cfg = RankingConfig::load_from(&p).unwrap();
    let err = cfg.build_engine().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RankingError>(),
        Some(RankingError::InvalidWeights { .. })
    ));
    assert!(err.to_string().contains("must sum to 1.0"));
}

#[test]
fn credibility_file_sits_under_inline_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let cred = dir.path().join("credibility.json");
    fs::write(&cred, r#"{"herald.example": 0.8, "cnn.com": 0.6}"#).unwrap();

    let p = dir.path().join("ranking.toml");
    fs::write(
        &p,
        format!(
            r#"
credibility_file = {:?}

[credibility]
"cnn.com" = 0.65
"#,
            cred.display().to_string()
        ),
    )
    .unwrap();
    let cfg = RankingConfig::load_from(&p).unwrap();
    assert_eq!(cfg.credibility_file.as_deref(), Some(cred.as_path()));

    let engine = cfg.build_engine().unwrap();
    let table = engine.credibility();
    assert_eq!(table.score_for("www.herald.example"), Some(0.8));
    // Inline wins over the file.
    assert_eq!(table.score_for("cnn.com"), Some(0.65));
    // Built-in seed still underneath.
    assert_eq!(table.score_for("reuters.com"), Some(0.95));
}

#[test]
fn credibility_file_errors_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    let cred = dir.path().join("credibility.json");
    fs::write(&cred, r#"{"herald.example": 1.4}"#).unwrap();

    let cfg = RankingConfig {
        credibility_file: Some(cred.clone()),
        ..Default::default()
    };
    let err = cfg.build_engine().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RankingError>(),
        Some(RankingError::InvalidScore { key, value })
            if key == "herald.example" && *value == 1.4
    ));
    assert!(format!("{err:#}").contains("credibility.json"));

    let missing = RankingConfig {
        credibility_file: Some(dir.path().join("absent.json")),
        ..Default::default()
    };
    assert!(missing.build_engine().is_err());
}

#[test]
fn malformed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("ranking.toml");
    fs::write(&p, "top_n = \"many\"").unwrap();
    let err = RankingConfig::load_from(&p).unwrap_err();
    assert!(format!("{err:#}").contains("ranking.toml"));
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_PRESET);

    // 1) Nothing anywhere -> defaults
    let cfg = RankingConfig::load_default().unwrap();
    assert_eq!(cfg, RankingConfig::default());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("ranking.toml"), r#"preset = "quality_focused""#).unwrap();
    let cfg = RankingConfig::load_default().unwrap();
    assert_eq!(cfg.resolve_weights().unwrap(), RankingWeights::QUALITY_FOCUSED);

    // 3) Env path wins over the fallback
    let p_env = tmp.path().join("custom.json");
    fs::write(&p_env, r#"{"top_n": 2}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    let cfg = RankingConfig::load_default().unwrap();
    assert_eq!(cfg.top_n, Some(2));
    assert_eq!(cfg.resolve_weights().unwrap(), RankingWeights::DEFAULT);

    // 4) Preset env overrides the file
    env::set_var(ENV_PRESET, "breaking_news");
    let cfg = RankingConfig::load_default().unwrap();
    assert_eq!(cfg.resolve_weights().unwrap(), RankingWeights::BREAKING_NEWS);

    // 5) Env path to a missing file is an error, not a silent default
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("nope.toml").display().to_string());
    assert!(RankingConfig::load_default().is_err());

    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_PRESET);
    env::set_current_dir(&old).unwrap();
}

#[test]
fn weights_file_is_hot_reloaded_through_config() {
    let dir = tempfile::tempdir().unwrap();
    let wf = dir.path().join("weights.json");
    let cfg = RankingConfig {
        preset: Some("quality_focused".into()),
        weights_file: Some(wf.clone()),
        ..Default::default()
    };
    let hot = cfg.hot_weights().unwrap().expect("weights_file set");
    // No file yet: resolved preset.
    assert_eq!(hot.current(), RankingWeights::QUALITY_FOCUSED);

    let raw = serde_json::to_string(&RankingWeights::BREAKING_NEWS).unwrap();
    fs::write(&wf, raw).unwrap();
    assert_eq!(hot.current(), RankingWeights::BREAKING_NEWS);

    assert!(RankingConfig::default().hot_weights().unwrap().is_none());
}
