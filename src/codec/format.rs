//! Encoding format selection
//!
//! The format is picked once when a manager is built and never changes.
//! It can be named explicitly (`json`, `yaml`/`yml`, `toml`) or inferred
//! from a file extension.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SectionalError};

/// Serialization format of the configuration file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    #[default]
    Json,
    #[serde(alias = "yml")]
    Yaml,
    Toml,
}

impl EncodingFormat {
    pub const ALL: [EncodingFormat; 3] = [Self::Json, Self::Yaml, Self::Toml];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    /// File extension used for default config paths
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                SectionalError::unsupported_format(format!(
                    "no file extension on '{}'",
                    path.display()
                ))
            })?;

        extension.parse()
    }
}

impl FromStr for EncodingFormat {
    type Err = SectionalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            other => Err(SectionalError::unsupported_format(other)),
        }
    }
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
