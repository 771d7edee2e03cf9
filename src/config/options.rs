//! Manager construction options
//!
//! Options can be built in code or layered from an optional options file and
//! `SECTIONAL_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Environment, File};
use serde::{Deserialize, Serialize};

use crate::codec::EncodingFormat;
use crate::error::{Result, SectionalError};

/// Prefix of the environment variables read by [`ManagerOptions::from_env`]
pub const ENV_PREFIX: &str = "SECTIONAL";

/// Environment variable naming an optional options file
pub const OPTIONS_FILE_ENV: &str = "SECTIONAL_OPTIONS_FILE";

/// Options used to build a [`ConfigManager`](crate::ConfigManager)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerOptions {
    /// Format of the configuration file
    pub format: EncodingFormat,
    /// Load the file while building the manager
    pub auto_load: bool,
    /// Save the file once on SIGINT or SIGTERM
    pub auto_save: bool,
    /// Run validate and on-load hooks during load
    pub use_callbacks: bool,
    /// Path of the configuration file, created empty if missing
    pub path: PathBuf,
}

/// Loosely typed form of the options as read from files and environment
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOptions {
    format: Option<String>,
    auto_load: Option<bool>,
    auto_save: Option<bool>,
    use_callbacks: Option<bool>,
    path: Option<String>,
}

impl ManagerOptions {
    pub fn new<P: Into<PathBuf>>(format: EncodingFormat, path: P) -> Self {
        Self {
            format,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Options for `path`, with the format taken from its extension
    pub fn for_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let format = EncodingFormat::from_path(&path)?;
        Ok(Self::new(format, path))
    }

    pub fn with_auto_load(mut self, enabled: bool) -> Self {
        self.auto_load = enabled;
        self
    }

    pub fn with_auto_save(mut self, enabled: bool) -> Self {
        self.auto_save = enabled;
        self
    }

    pub fn with_callbacks(mut self, enabled: bool) -> Self {
        self.use_callbacks = enabled;
        self
    }

    /// Load options with priority order:
    /// 1. `SECTIONAL_*` environment variables
    /// 2. Options file named by `SECTIONAL_OPTIONS_FILE`
    /// 3. Default values
    pub fn from_env() -> Result<Self> {
        let file = std::env::var_os(OPTIONS_FILE_ENV).map(PathBuf::from);
        let env = Environment::with_prefix(ENV_PREFIX).try_parsing(true);
        Self::from_sources(file.as_deref(), env)
    }

    /// Layer an optional options file under an environment source
    ///
    /// When no format is given but the path has a known extension, the
    /// format is inferred from it.
    pub fn from_sources(file: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(true));
        }
        builder = builder.add_source(env);

        let raw: RawOptions = builder.build()?.try_deserialize()?;
        let path = raw.path.map(PathBuf::from).unwrap_or_default();

        let format = match raw.format {
            Some(name) => name.parse()?,
            None => EncodingFormat::from_path(&path).unwrap_or_default(),
        };

        Ok(Self {
            format,
            auto_load: raw.auto_load.unwrap_or(false),
            auto_save: raw.auto_save.unwrap_or(false),
            use_callbacks: raw.use_callbacks.unwrap_or(false),
            path,
        })
    }

    /// Default configuration file location for an application
    ///
    /// `$XDG_CONFIG_HOME/<app>/config.<ext>` (or `~/.config/...`) on Linux
    /// and macOS, the platform config directory elsewhere.
    pub fn default_path(app: &str, format: EncodingFormat) -> Result<PathBuf> {
        let file_name = format!("config.{}", format.extension());

        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Some(xdg_config_home) = env::var_os("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var_os("HOME").ok_or_else(|| {
                    SectionalError::Options(config::ConfigError::Message(
                        "HOME environment variable not set".to_string(),
                    ))
                })?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join(app).join(file_name))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir().ok_or_else(|| {
                SectionalError::Options(config::ConfigError::Message(
                    "Unable to determine config directory".to_string(),
                ))
            })?;
            Ok(config_dir.join(app).join(file_name))
        }
    }
}
