//! Save/load round-trip tests
//!
//! Tests that every registered section survives a save followed by a fresh
//! load, for each supported format.

use sectional::{ConfigManager, EncodingFormat, ManagerOptions, Record, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tempfile::TempDir;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct WebServer {
    host: String,
    port: u16,
    enable_https: bool,
    allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct CacheStats {
    total_hits: i64,
    total_misses: i64,
    hit_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct DatabaseCache {
    max_size: u64,
    strategy: String,
    enabled_tables: Vec<String>,
    limits: BTreeMap<String, u32>,
    stats: CacheStats,
}

fn sample_server() -> WebServer {
    WebServer {
        host: "0.0.0.0".to_string(),
        port: 8443,
        enable_https: true,
        allowed_origins: vec!["https://example.org".to_string(), "https://api.example.org".to_string()],
    }
}

fn sample_cache() -> DatabaseCache {
    let mut limits = BTreeMap::new();
    limits.insert("orders".to_string(), 500);
    limits.insert("users".to_string(), 1000);

    DatabaseCache {
        max_size: 100 * 1024 * 1024,
        strategy: "lru".to_string(),
        enabled_tables: vec!["users".to_string(), "orders".to_string()],
        limits,
        stats: CacheStats {
            total_hits: 1250,
            total_misses: 75,
            hit_ratio: 0.5,
        },
    }
}

fn config_path(temp_dir: &TempDir, format: EncodingFormat) -> std::path::PathBuf {
    temp_dir.path().join(format!("app.{}", format.extension()))
}

async fn roundtrip(format: EncodingFormat) -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = config_path(&temp_dir, format);

    // Save populated records
    let writer = ConfigManager::new(ManagerOptions::new(format, &path)).await?;
    writer.add_simple_section("web_server", Record::new(sample_server()))?;
    writer.add_simple_section("database_cache", Record::new(sample_cache()))?;
    writer.save().await?;

    // Load into fresh, zero-valued records
    let server = Record::new(WebServer::default());
    let cache = Record::new(DatabaseCache::default());
    let reader = ConfigManager::new(ManagerOptions::new(format, &path)).await?;
    reader.add_simple_section("web_server", server.clone())?;
    reader.add_simple_section("database_cache", cache.clone())?;

    let report = reader.load().await?;

    assert_eq!(report.loaded, vec!["database_cache".to_string(), "web_server".to_string()]);
    assert!(report.skipped.is_empty());
    assert!(report.ignored.is_empty());
    assert_eq!(server.snapshot(), sample_server(), "format {format}");
    assert_eq!(cache.snapshot(), sample_cache(), "format {format}");
    Ok(())
}

#[cfg(test)]
mod roundtrip_tests {
    use super::*;

    #[tokio::test]
    async fn test_json_roundtrip() -> Result<()> {
        roundtrip(EncodingFormat::Json).await
    }

    #[tokio::test]
    async fn test_yaml_roundtrip() -> Result<()> {
        roundtrip(EncodingFormat::Yaml).await
    }

    #[tokio::test]
    async fn test_toml_roundtrip() -> Result<()> {
        roundtrip(EncodingFormat::Toml).await
    }
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Port {
        #[serde(rename = "Port")]
        port: u16,
    }

    #[tokio::test]
    async fn test_web_server_port_scenario() -> Result<()> {
        for format in EncodingFormat::ALL {
            let temp_dir = TempDir::new().unwrap();
            let path = config_path(&temp_dir, format);

            let manager = ConfigManager::new(ManagerOptions::new(format, &path)).await?;
            manager.add_simple_section("web_server", Record::new(Port { port: 8080 }))?;
            manager.save().await?;

            let fresh = Record::new(Port { port: 0 });
            let reloaded = ConfigManager::new(ManagerOptions::new(format, &path)).await?;
            reloaded.add_simple_section("web_server", fresh.clone())?;
            reloaded.load().await?;

            assert_eq!(fresh.read().port, 8080, "format {format}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_mutations_after_load_are_saved() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let path = config_path(&temp_dir, EncodingFormat::Yaml);

        let server = Record::new(sample_server());
        let manager = ConfigManager::new(ManagerOptions::new(EncodingFormat::Yaml, &path)).await?;
        manager.add_simple_section("web_server", server.clone())?;
        manager.save().await?;
        manager.load().await?;

        server.write().port = 9000;
        manager.save().await?;

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("port: 9000"));
        Ok(())
    }

    #[tokio::test]
    async fn test_saved_file_is_keyed_by_section_name() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let path = config_path(&temp_dir, EncodingFormat::Toml);

        let manager = ConfigManager::new(ManagerOptions::new(EncodingFormat::Toml, &path)).await?;
        manager.add_simple_section("web_server", Record::new(sample_server()))?;
        manager.save().await?;

        let table: toml::Table = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table["web_server"]["port"].as_integer(), Some(8443));
        Ok(())
    }
}
