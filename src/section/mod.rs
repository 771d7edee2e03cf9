//! Configuration sections
//!
//! A [`Section`] binds one host-owned [`Record`] to a name and two optional
//! hooks. The name defaults to the record's type name; the validate and
//! on-load hooks default to no-ops.
//!
//! ```
//! use sectional::{Record, Section};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct WebServer {
//!     port: u16,
//! }
//!
//! let server = Record::new(WebServer { port: 8080 });
//! let check = server.clone();
//! let section = Section::new(server)
//!     .unwrap()
//!     .with_name(|| "web_server".to_string())
//!     .with_validate(move || {
//!         if check.read().port == 0 {
//!             return Err("port must be non-zero".into());
//!         }
//!         Ok(())
//!     });
//!
//! assert_eq!(section.name(), "web_server");
//! assert!(section.validate().is_ok());
//! ```

mod binding;
mod record;
mod shape;

pub(crate) use binding::SectionBinding;
pub use record::Record;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BoxError, Result, SectionalError};

/// Data that can back a section
pub trait SectionData: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> SectionData for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

type NameFn = Arc<dyn Fn() -> String + Send + Sync>;
type HookFn = Arc<dyn Fn() -> std::result::Result<(), BoxError> + Send + Sync>;

/// A named, independently validated unit of configuration
pub struct Section<T> {
    record: Record<T>,
    name_fn: Option<NameFn>,
    validate_fn: Option<HookFn>,
    on_load_fn: Option<HookFn>,
}

impl<T: SectionData> Section<T> {
    /// Create a section over a record
    ///
    /// Fails with `InvalidSectionType` unless the record type serializes as
    /// a struct or a map. `Option` records are rejected even when `Some`.
    pub fn new(record: Record<T>) -> Result<Self> {
        let section = Self {
            record,
            name_fn: None,
            validate_fn: None,
            on_load_fn: None,
        };

        section
            .check_shape()
            .map_err(|found| SectionalError::invalid_section_type(section.name(), found))?;

        Ok(section)
    }

    /// Check that the record type is a keyed aggregate
    ///
    /// Returns the kind that was found when it is not.
    pub(crate) fn check_shape(&self) -> std::result::Result<(), String> {
        shape::check_shape(&*self.record.read())
    }
}

impl<T> Section<T> {
    /// Override the section name
    pub fn with_name<F>(mut self, name: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.name_fn = Some(Arc::new(name));
        self
    }

    /// Override the validation hook
    pub fn with_validate<F>(mut self, check: F) -> Self
    where
        F: Fn() -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.validate_fn = Some(Arc::new(check));
        self
    }

    /// Override the post-load hook
    pub fn with_on_load<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on_load_fn = Some(Arc::new(hook));
        self
    }

    pub fn name(&self) -> String {
        match &self.name_fn {
            Some(name) => name(),
            None => type_name::<T>().to_string(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), BoxError> {
        match &self.validate_fn {
            Some(check) => check(),
            None => Ok(()),
        }
    }

    pub fn on_load(&self) -> std::result::Result<(), BoxError> {
        match &self.on_load_fn {
            Some(hook) => hook(),
            None => Ok(()),
        }
    }

    pub fn record(&self) -> &Record<T> {
        &self.record
    }
}

impl<T> fmt::Debug for Section<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("name", &self.name())
            .field("type", &std::any::type_name::<T>())
            .field("validate", &self.validate_fn.is_some())
            .field("on_load", &self.on_load_fn.is_some())
            .finish()
    }
}

/// Unqualified type name, e.g. `WebServer` for `my_app::config::WebServer`
pub(crate) fn type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
