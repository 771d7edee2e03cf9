use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Boxed error returned by user-supplied section hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for sectional operations
#[derive(Debug, Error)]
pub enum SectionalError {
    #[error("Unsupported encoding format: {0}")]
    UnsupportedFormat(String),

    #[error("Storage error on {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file not found: {path} does not exist")]
    FileNotFound { path: PathBuf },

    #[error("Error decoding configuration document: {0}")]
    Decode(#[source] CodecError),

    #[error("Error encoding configuration document: {0}")]
    Encode(#[source] CodecError),

    #[error("Error decoding section '{section}' into its record type: {source}")]
    SectionDecode {
        section: String,
        #[source]
        source: CodecError,
    },

    #[error("Error validating section '{section}': {source}")]
    SectionValidation {
        section: String,
        #[source]
        source: BoxError,
    },

    #[error("Error running on-load hook for section '{section}': {source}")]
    SectionOnLoad {
        section: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid section type: section '{section}' must hold a struct or map record, got {found}")]
    InvalidSectionType { section: String, found: String },

    #[error("Section name conflict: '{name}' is already registered. Each section must have a unique name")]
    DuplicateName { name: String },

    #[error(
        "Automatic configuration loading failed: {source}.\n\
         To resolve this:\n\
         1. Ensure the config file at '{}' is readable and well-formed\n\
         2. Disable the auto_load option\n\
         3. Check file permissions",
        path.display()
    )]
    AutoLoad {
        path: PathBuf,
        #[source]
        source: Box<SectionalError>,
    },

    #[error("Unable to install termination signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Options error: {0}")]
    Options(#[from] config::ConfigError),
}

impl SectionalError {
    pub fn unsupported_format<S: Into<String>>(value: S) -> Self {
        Self::UnsupportedFormat(value.into())
    }

    pub fn storage<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn file_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn section_decode<S: Into<String>>(section: S, source: CodecError) -> Self {
        Self::SectionDecode {
            section: section.into(),
            source,
        }
    }

    pub fn section_validation<S: Into<String>>(section: S, source: BoxError) -> Self {
        Self::SectionValidation {
            section: section.into(),
            source,
        }
    }

    pub fn section_on_load<S: Into<String>>(section: S, source: BoxError) -> Self {
        Self::SectionOnLoad {
            section: section.into(),
            source,
        }
    }

    pub fn invalid_section_type<S: Into<String>, F: Into<String>>(section: S, found: F) -> Self {
        Self::InvalidSectionType {
            section: section.into(),
            found: found.into(),
        }
    }

    pub fn duplicate_name<S: Into<String>>(name: S) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    pub fn auto_load<P: Into<PathBuf>>(path: P, source: SectionalError) -> Self {
        Self::AutoLoad {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Name of the section the error refers to, if any
    pub fn section(&self) -> Option<&str> {
        match self {
            Self::SectionDecode { section, .. }
            | Self::SectionValidation { section, .. }
            | Self::SectionOnLoad { section, .. }
            | Self::InvalidSectionType { section, .. } => Some(section),
            Self::DuplicateName { name } => Some(name),
            Self::AutoLoad { source, .. } => source.section(),
            _ => None,
        }
    }
}

/// Result type alias for sectional operations
pub type Result<T> = std::result::Result<T, SectionalError>;
