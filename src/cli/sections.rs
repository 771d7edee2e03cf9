//! Demo sections registered by the CLI

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BoxError, Result};
use crate::manager::ManagerBuilder;
use crate::section::{Record, Section};

/// Web server component settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebServer {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub max_connections: u32,
    pub enable_https: bool,
    pub certificate_path: String,
}

impl Default for WebServer {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            max_connections: 1000,
            enable_https: false,
            certificate_path: "/etc/certs/server.pem".to_string(),
        }
    }
}

impl WebServer {
    pub fn validate(&self) -> std::result::Result<(), BoxError> {
        if self.port == 0 {
            return Err("port must be between 1 and 65535".into());
        }
        if self.max_connections == 0 {
            return Err("max_connections must be at least 1".into());
        }
        if self.enable_https && self.certificate_path.is_empty() {
            return Err("certificate_path is required when enable_https is set".into());
        }
        Ok(())
    }
}

/// Independent caching service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseCache {
    pub max_size: u64,
    pub ttl_secs: u64,
    pub enabled_tables: Vec<String>,
    pub strategy: String,
}

impl Default for DatabaseCache {
    fn default() -> Self {
        Self {
            max_size: 100 * 1024 * 1024,
            ttl_secs: 24 * 60 * 60,
            enabled_tables: vec!["users".to_string(), "sessions".to_string()],
            strategy: "lru".to_string(),
        }
    }
}

impl DatabaseCache {
    pub const STRATEGIES: [&'static str; 3] = ["lru", "lfu", "fifo"];

    pub fn validate(&self) -> std::result::Result<(), BoxError> {
        if !Self::STRATEGIES.contains(&self.strategy.as_str()) {
            return Err(format!(
                "unknown cache strategy '{}', expected one of {:?}",
                self.strategy,
                Self::STRATEGIES
            )
            .into());
        }
        Ok(())
    }
}

/// Records backing the demo sections
#[derive(Debug, Clone, Default)]
pub struct DemoSections {
    pub web_server: Record<WebServer>,
    pub database_cache: Record<DatabaseCache>,
}

impl DemoSections {
    /// Add both sections, with hooks, to a manager builder
    pub fn register(&self, builder: ManagerBuilder) -> Result<ManagerBuilder> {
        let server = self.web_server.clone();
        let loaded = self.web_server.clone();
        let web_server = Section::new(self.web_server.clone())?
            .with_name(|| "web_server".to_string())
            .with_validate(move || server.read().validate())
            .with_on_load(move || {
                let server = loaded.read();
                info!("Web server will listen on {}:{}", server.host, server.port);
                Ok(())
            });

        let cache = self.database_cache.clone();
        let database_cache = Section::new(self.database_cache.clone())?
            .with_name(|| "database_cache".to_string())
            .with_validate(move || cache.read().validate());

        Ok(builder.section(web_server).section(database_cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(WebServer::default().validate().is_ok());
        assert!(DatabaseCache::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let server = WebServer {
            port: 0,
            ..Default::default()
        };
        assert!(server.validate().is_err());

        let server = WebServer {
            enable_https: true,
            certificate_path: String::new(),
            ..Default::default()
        };
        assert!(server.validate().is_err());

        let cache = DatabaseCache {
            strategy: "random".to_string(),
            ..Default::default()
        };
        let err = cache.validate().unwrap_err();
        assert!(err.to_string().contains("random"));
    }
}
