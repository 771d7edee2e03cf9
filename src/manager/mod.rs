//! Section registry and load/save reconciliation
//!
//! A [`ConfigManager`] owns the registry of sections, one codec and the path
//! of the configuration file. `load` splits the file into per-section
//! sub-documents and decodes each into its record; `save` gathers every
//! record into one document and replaces the file.

pub mod autosave;
pub mod storage;

pub use autosave::{AutosaveListener, TerminationSignal};
pub use storage::{FileStorage, Storage};

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::codec::{Codec, Document, EncodingFormat, FormatCodec};
use crate::config::ManagerOptions;
use crate::error::{Result, SectionalError};
use crate::section::{Record, Section, SectionBinding, SectionData};

/// Outcome of a successful [`ConfigManager::load`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Sections decoded from the file
    pub loaded: Vec<String>,
    /// Registered sections with no entry in the file
    pub skipped: Vec<String>,
    /// Top-level keys in the file matching no registered section
    pub ignored: Vec<String>,
}

type Registry = HashMap<String, Arc<dyn SectionBinding>>;
type PendingSection = Box<dyn FnOnce(&ManagerCore) -> Result<()> + Send>;

/// State shared between the manager and its autosave task
pub(crate) struct ManagerCore {
    options: ManagerOptions,
    codec: FormatCodec,
    storage: Arc<dyn Storage>,
    sections: Mutex<Registry>,
}

impl ManagerCore {
    fn new(options: ManagerOptions, storage: Arc<dyn Storage>) -> Self {
        Self {
            codec: FormatCodec::for_format(options.format),
            options,
            storage,
            sections: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.options.path
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.sections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registered sections sorted by name, copied out of the lock
    fn registered(&self) -> Vec<(String, Arc<dyn SectionBinding>)> {
        let mut sections: Vec<_> = self
            .registry()
            .iter()
            .map(|(name, section)| (name.clone(), Arc::clone(section)))
            .collect();
        sections.sort_by(|a, b| a.0.cmp(&b.0));
        sections
    }

    fn register<T: SectionData>(&self, section: Section<T>) -> Result<()> {
        let name = section.name();

        section
            .check_shape()
            .map_err(|found| SectionalError::invalid_section_type(&name, found))?;

        let mut sections = self.registry();
        if sections.contains_key(&name) {
            return Err(SectionalError::duplicate_name(name));
        }

        debug!("Registered section '{}'", name);
        sections.insert(name, Arc::new(section));
        Ok(())
    }

    async fn ensure_file(&self) -> Result<()> {
        let path = self.path();
        if path.as_os_str().is_empty() {
            return Ok(());
        }

        let exists = self
            .storage
            .exists(path)
            .await
            .map_err(|e| SectionalError::storage(path, e))?;

        if !exists {
            self.storage
                .create(path)
                .await
                .map_err(|e| SectionalError::storage(path, e))?;
            info!("Created configuration file at {}", path.display());
        }

        Ok(())
    }

    async fn read_document(&self) -> Result<Document> {
        let path = self.path();
        let bytes = match self.storage.read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SectionalError::file_not_found(path));
            }
            Err(e) => return Err(SectionalError::storage(path, e)),
        };

        if bytes.is_empty() {
            debug!("Configuration file {} is empty", path.display());
            return Ok(Document::new());
        }

        self.codec
            .decode_document(&bytes)
            .map_err(SectionalError::Decode)
    }

    pub(crate) async fn load(&self) -> Result<LoadReport> {
        let document = self.read_document().await?;
        let sections = self.registered();
        let mut report = LoadReport::default();

        for (name, section) in &sections {
            let Some(node) = document.get(name) else {
                info!("Section {} not found in configuration file, skipping", name);
                report.skipped.push(name.clone());
                continue;
            };

            section
                .apply(&self.codec, node)
                .map_err(|e| SectionalError::section_decode(name, e))?;
            debug!("Decoded section '{}'", name);

            if self.options.use_callbacks {
                section
                    .validate()
                    .map_err(|e| SectionalError::section_validation(name, e))?;
                section
                    .on_load()
                    .map_err(|e| SectionalError::section_on_load(name, e))?;
            }

            report.loaded.push(name.clone());
        }

        report.ignored = document
            .keys()
            .filter(|key| !sections.iter().any(|(name, _)| name == key))
            .map(str::to_string)
            .collect();
        for key in &report.ignored {
            debug!("Ignoring unregistered section '{}' in configuration file", key);
        }

        info!(
            "Loaded {} of {} sections from {}",
            report.loaded.len(),
            sections.len(),
            self.path().display()
        );
        Ok(report)
    }

    pub(crate) async fn save(&self) -> Result<()> {
        let mut document = Document::new();
        for (name, section) in self.registered() {
            let node = section
                .snapshot(&self.codec)
                .map_err(SectionalError::Encode)?;
            document.insert(name, node);
        }

        let bytes = self
            .codec
            .encode(&document)
            .map_err(SectionalError::Encode)?;

        let path = self.path();
        self.storage
            .write(path, &bytes)
            .await
            .map_err(|e| SectionalError::storage(path, e))?;

        info!("Saved {} sections to {}", document.len(), path.display());
        Ok(())
    }
}

/// Registry of configuration sections backed by one file
pub struct ConfigManager {
    core: Arc<ManagerCore>,
    autosave: Option<AutosaveListener>,
}

impl ConfigManager {
    /// Build a manager over the local filesystem
    ///
    /// Creates the file if it is missing, loads it when `auto_load` is set
    /// and starts the autosave listener when `auto_save` is set. Must be
    /// called inside a tokio runtime.
    pub async fn new(options: ManagerOptions) -> Result<Self> {
        Self::builder(options).build().await
    }

    /// Build a manager from `SECTIONAL_*` environment variables
    pub async fn from_env() -> Result<Self> {
        Self::new(ManagerOptions::from_env()?).await
    }

    pub fn builder(options: ManagerOptions) -> ManagerBuilder {
        ManagerBuilder {
            options,
            storage: None,
            trigger: None,
            sections: Vec::new(),
        }
    }

    /// Register a section under its name
    ///
    /// Fails with `InvalidSectionType` if the record is not a struct or map,
    /// and with `DuplicateName` if the name is already taken. Names stay
    /// claimed for the lifetime of the manager.
    pub fn register_section<T: SectionData>(&self, section: Section<T>) -> Result<()> {
        self.core.register(section)
    }

    /// Register `record` under `name` with no hooks
    pub fn add_simple_section<T, S>(&self, name: S, record: Record<T>) -> Result<()>
    where
        T: SectionData,
        S: Into<String>,
    {
        let name = name.into();
        self.register_section(Section::new(record)?.with_name(move || name.clone()))
    }

    /// Read the file and decode every registered section found in it
    ///
    /// Sections missing from the file are skipped and keep their values.
    /// Keys that match no section are ignored. On error, sections decoded
    /// before the failing one keep their new values.
    pub async fn load(&self) -> Result<LoadReport> {
        self.core.load().await
    }

    /// Write every registered section to the file, replacing its contents
    pub async fn save(&self) -> Result<()> {
        self.core.save().await
    }

    /// Stop the autosave listener, if any, and wait for it to end
    pub async fn shutdown(mut self) {
        if let Some(listener) = self.autosave.take() {
            listener.cancel().await;
        }
    }

    /// Registered section names, sorted
    pub fn section_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.core.registry().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.core.registry().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.core.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.registry().is_empty()
    }

    pub fn format(&self) -> EncodingFormat {
        self.core.options.format
    }

    pub fn path(&self) -> &Path {
        self.core.path()
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.core.options
    }

    /// Whether an autosave listener is still waiting
    pub fn is_autosave_armed(&self) -> bool {
        self.autosave
            .as_ref()
            .is_some_and(|listener| !listener.is_finished())
    }

    /// Take ownership of the autosave listener, e.g. to await it
    pub fn take_autosave(&mut self) -> Option<AutosaveListener> {
        self.autosave.take()
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("options", &self.core.options)
            .field("sections", &self.section_names())
            .field("autosave", &self.autosave.is_some())
            .finish()
    }
}

/// Builder for a [`ConfigManager`] with a custom storage or autosave trigger
pub struct ManagerBuilder {
    options: ManagerOptions,
    storage: Option<Arc<dyn Storage>>,
    trigger: Option<BoxFuture<'static, ()>>,
    sections: Vec<PendingSection>,
}

impl ManagerBuilder {
    /// Use `storage` instead of the local filesystem
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Save when `trigger` resolves instead of on a termination signal
    ///
    /// Only used when `auto_save` is set.
    pub fn autosave_trigger<F>(mut self, trigger: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.trigger = Some(autosave::boxed_trigger(trigger));
        self
    }

    /// Register a section before the initial auto-load runs
    pub fn section<T: SectionData>(mut self, section: Section<T>) -> Self {
        self.sections
            .push(Box::new(move |core: &ManagerCore| core.register(section)));
        self
    }

    pub async fn build(self) -> Result<ConfigManager> {
        let storage = self.storage.unwrap_or_else(|| Arc::new(FileStorage));
        let core = Arc::new(ManagerCore::new(self.options, storage));

        core.ensure_file().await?;

        for register in self.sections {
            register(&core)?;
        }

        if core.options.auto_load {
            core.load()
                .await
                .map_err(|e| SectionalError::auto_load(core.path(), e))?;
        }

        let autosave = if core.options.auto_save {
            let trigger = match self.trigger {
                Some(trigger) => trigger,
                None => {
                    let signal = TerminationSignal::register().map_err(SectionalError::Signal)?;
                    autosave::boxed_trigger(signal.recv())
                }
            };
            debug!("Autosave armed for {}", core.path().display());
            Some(AutosaveListener::spawn(Arc::clone(&core), trigger))
        } else {
            None
        };

        Ok(ConfigManager { core, autosave })
    }
}
