//! sectional - typed configuration sections in one file
//!
//! Register independent, arbitrarily-typed configuration sections with a
//! [`ConfigManager`], then load all of them from, or save all of them to,
//! a single JSON, YAML or TOML file.

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod manager;
pub mod section;

// Re-export commonly used types
pub use codec::{Codec, EncodingFormat, FormatCodec};
pub use config::ManagerOptions;
pub use error::{BoxError, Result, SectionalError};
pub use manager::{AutosaveListener, ConfigManager, LoadReport, ManagerBuilder, Storage};
pub use section::{Record, Section, SectionData};
