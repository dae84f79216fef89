use boltbot_core::{load_sources, BotConfig, ConfigError, CoreError};
use std::env;
use std::fs;
use std::path::PathBuf;

fn temp_sources_path() -> PathBuf {
    env::temp_dir().join(format!("boltbot_sources_{}.toml", uuid::Uuid::new_v4()))
}

#[test]
fn test_sources_file_is_loaded() {
    let path = temp_sources_path();
    fs::write(
        &path,
        r#"
[[sources]]
name = "ESPN"
url = "https://www.espn.com/espn/rss/nfl/news?team=SD"
keywords = ["Chargers", "Justin Herbert"]

[[sources]]
name = "Bolts From The Blue"
url = "https://www.boltsfromtheblue.com/rss/index.xml"
"#,
    )
    .unwrap();

    let sources = load_sources(&path).unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].name, "ESPN");
    assert_eq!(sources[0].keywords, vec!["Chargers", "Justin Herbert"]);
    assert!(sources[1].keywords.is_empty());

    let path_str = path.display().to_string();
    let config = BotConfig::from_lookup(|key| match key {
        "SOURCES_FILE" => Some(path_str.clone()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.sources, sources);

    fs::remove_file(&path).ok();
}

#[test]
fn test_invalid_feed_url_is_rejected() {
    let path = temp_sources_path();
    fs::write(
        &path,
        r#"
[[sources]]
name = "Broken"
url = "not a url"
keywords = ["chargers"]
"#,
    )
    .unwrap();

    let result = load_sources(&path);
    assert!(matches!(
        result,
        Err(CoreError::Config(ConfigError::InvalidValue { .. }))
    ));

    fs::remove_file(&path).ok();
}

#[test]
fn test_missing_sources_file() {
    let result = load_sources(&temp_sources_path());
    assert!(matches!(
        result,
        Err(CoreError::Config(ConfigError::FileNotFound { .. }))
    ));
}
