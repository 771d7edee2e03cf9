//! Section registry tests
//!
//! Tests for name uniqueness and type checks performed when sections are
//! registered.

use sectional::{ConfigManager, EncodingFormat, ManagerOptions, Record, Section, SectionalError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tempfile::TempDir;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct WebServer {
    port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Logging {
    level: String,
}

async fn manager(temp_dir: &TempDir) -> ConfigManager {
    let path = temp_dir.path().join("app.json");
    ConfigManager::new(ManagerOptions::new(EncodingFormat::Json, path))
        .await
        .unwrap()
}

#[cfg(test)]
mod name_uniqueness_tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        let first = Record::new(WebServer { port: 1 });
        manager.add_simple_section("server", first.clone()).unwrap();

        let err = manager
            .add_simple_section("server", Record::new(Logging::default()))
            .unwrap_err();
        assert!(matches!(err, SectionalError::DuplicateName { ref name } if name == "server"));
        assert_eq!(err.section(), Some("server"));

        // The registry is unchanged by the failed call
        assert_eq!(manager.section_names(), vec!["server".to_string()]);
        manager.save().await.unwrap();
        let saved = std::fs::read_to_string(manager.path()).unwrap();
        assert!(saved.contains("\"port\": 1"));
        assert!(!saved.contains("level"));
    }

    #[tokio::test]
    async fn test_default_names_collide_for_same_type() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        manager
            .register_section(Section::new(Record::new(WebServer::default())).unwrap())
            .unwrap();
        let err = manager
            .register_section(Section::new(Record::new(WebServer { port: 2 })).unwrap())
            .unwrap_err();

        assert!(matches!(err, SectionalError::DuplicateName { ref name } if name == "WebServer"));
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_names_coexist() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        manager
            .register_section(Section::new(Record::new(WebServer::default())).unwrap())
            .unwrap();
        manager
            .register_section(
                Section::new(Record::new(WebServer::default()))
                    .unwrap()
                    .with_name(|| "admin_server".to_string()),
            )
            .unwrap();
        manager
            .add_simple_section("logging", Record::new(Logging::default()))
            .unwrap();

        assert_eq!(
            manager.section_names(),
            vec!["WebServer".to_string(), "admin_server".to_string(), "logging".to_string()]
        );
        assert!(manager.contains_section("logging"));
        assert!(!manager.contains_section("metrics"));
    }
}

#[cfg(test)]
mod invalid_registration_tests {
    use super::*;

    #[tokio::test]
    async fn test_bare_integer_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        let err = manager
            .add_simple_section("retries", Record::new(3u32))
            .unwrap_err();
        assert!(matches!(
            err,
            SectionalError::InvalidSectionType { ref section, .. } if section == "retries"
        ));
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn test_list_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        let err = manager
            .add_simple_section("hosts", Record::new(vec!["a".to_string()]))
            .unwrap_err();
        assert!(matches!(err, SectionalError::InvalidSectionType { .. }));
        assert!(!manager.contains_section("hosts"));
    }

    #[tokio::test]
    async fn test_optional_record_rejected_whatever_it_holds() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        let err = manager
            .add_simple_section("server", Record::new(Some(WebServer { port: 80 })))
            .unwrap_err();
        assert!(matches!(err, SectionalError::InvalidSectionType { .. }));

        let err = manager
            .add_simple_section("server", Record::new(None::<WebServer>))
            .unwrap_err();
        assert!(matches!(err, SectionalError::InvalidSectionType { .. }));
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn test_map_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        let mut features = HashMap::new();
        features.insert("dark_mode".to_string(), true);
        manager
            .add_simple_section("features", Record::new(features))
            .unwrap();
        assert!(manager.contains_section("features"));
    }

    #[tokio::test]
    async fn test_failed_registration_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        for _ in 0..2 {
            let err = manager
                .add_simple_section("flag", Record::new(true))
                .unwrap_err();
            assert!(matches!(err, SectionalError::InvalidSectionType { .. }));
        }
        assert!(manager.is_empty());
    }
}
