//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use std::path::PathBuf;

use tcg_browser::api::{ResponseCache, TcgClient};
use tcg_browser::config::{ApiConfig, CacheConfig, Config, SecureString};
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "test-key";

/// Config pointing the client at `base_url`, with short timeouts and an
/// ephemeral bind address.
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        ..ApiConfig::default()
    };
    config.server.bind_addr = "127.0.0.1:0".to_string();
    config
}

/// Client for `config` with a fresh cache and the test API key.
pub fn test_client(config: &Config) -> TcgClient {
    TcgClient::new(
        &config.api,
        SecureString::new(TEST_API_KEY.to_string()),
        ResponseCache::new(&CacheConfig::default()),
    )
    .expect("Failed to build client")
}

/// Write `content` to a temporary `config.toml`.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// `{"data": [...]}` search page with the given card ids.
pub fn cards_page(ids: &[&str], total_count: u64) -> String {
    let cards: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "name": format!("Card {id}"),
                "set": {"id": "sv1", "name": "Scarlet & Violet", "series": "Scarlet & Violet"}
            })
        })
        .collect();
    serde_json::json!({
        "data": cards,
        "page": 1,
        "pageSize": 24,
        "count": ids.len(),
        "totalCount": total_count,
    })
    .to_string()
}

/// `{"data": {...}}` for a single card.
pub fn card_item(id: &str, name: &str) -> String {
    serde_json::json!({
        "data": {
            "id": id,
            "name": name,
            "supertype": "Pokémon",
            "types": ["Fire"],
            "rarity": "Rare Holo",
            "artist": "Mitsuhiro Arita",
            "set": {"id": "base1", "name": "Base", "series": "Base"}
        }
    })
    .to_string()
}
