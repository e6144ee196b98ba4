use super::api::{Database, DatabaseMetadata, PackageManifest, Record};
use super::discovery::{discover_candidates, Candidate, CandidateSource, DiscoveryOptions};
use super::error::LoadError;
use super::registry::{builtin_constructor, builtin_styles, DatabaseConstructor};
use crate::config::DatabasesConfig;
use libloading::{Library, Symbol};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Entry point every shared-library plugin exports
pub const PLUGIN_CREATE_SYMBOL: &[u8] = b"_database_create";

/// Function signature for the plugin entry point
pub type DatabaseCreate = unsafe fn() -> *mut dyn Database;

/// Turns a discovered candidate into a usable database
pub trait DatabaseImporter {
    /// Load one candidate
    ///
    /// # Errors
    /// Returns the reason the candidate could not be loaded.
    fn import(&self, candidate: &Candidate) -> Result<Box<dyn Database>, LoadError>;
}

/// Default importer: built-in styles for packages, `libloading` for libraries
pub struct StandardImporter {
    styles: HashMap<String, DatabaseConstructor>,
}

impl StandardImporter {
    /// Create an importer knowing every built-in style
    #[must_use]
    pub fn new() -> Self {
        let styles = builtin_styles()
            .into_iter()
            .filter_map(|style| builtin_constructor(style).map(|ctor| (style.to_string(), ctor)))
            .collect();

        Self { styles }
    }

    /// Register an additional package style, replacing any existing one
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>, constructor: DatabaseConstructor) -> Self {
        self.styles.insert(style.into(), constructor);
        self
    }

    /// Check if a package style is registered
    #[must_use]
    pub fn has_style(&self, style: &str) -> bool {
        self.styles.contains_key(style)
    }

    fn import_package(&self, name: &str, dir: &Path) -> Result<Box<dyn Database>, LoadError> {
        let manifest = read_manifest(dir)?;
        let style = manifest.style.clone().unwrap_or_else(|| name.to_string());

        let constructor = self
            .styles
            .get(&style)
            .ok_or_else(|| LoadError::UnknownStyle(style.clone()))?;

        constructor(name, dir, &manifest).map_err(|e| LoadError::Init(format!("{e:#}")))
    }

    fn import_library(&self, path: &Path) -> Result<Box<dyn Database>, LoadError> {
        unsafe {
            let library = Library::new(path).map_err(LoadError::Library)?;

            let constructor: Symbol<DatabaseCreate> =
                library
                    .get(PLUGIN_CREATE_SYMBOL)
                    .map_err(|source| LoadError::MissingSymbol {
                        symbol: "_database_create",
                        source,
                    })?;

            let database_ptr = constructor();
            if database_ptr.is_null() {
                return Err(LoadError::NullPlugin);
            }

            Ok(Box::new(LibraryDatabase {
                database: Box::from_raw(database_ptr),
                _library: library,
            }))
        }
    }
}

impl Default for StandardImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseImporter for StandardImporter {
    fn import(&self, candidate: &Candidate) -> Result<Box<dyn Database>, LoadError> {
        match &candidate.source {
            CandidateSource::Package(dir) => self.import_package(&candidate.name, dir),
            CandidateSource::Library(path) => self.import_library(path),
        }
    }
}

fn read_manifest(dir: &Path) -> Result<PackageManifest, LoadError> {
    let path = dir.join(PackageManifest::FILE_NAME);
    if !path.is_file() {
        return Ok(PackageManifest::default());
    }

    let contents = fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(PackageManifest::default());
    }

    serde_yaml::from_str(&contents).map_err(|source| LoadError::Manifest { path, source })
}

/// A database created by a shared-library plugin
///
/// Field order matters: the database is dropped before its library is
/// unloaded.
struct LibraryDatabase {
    database: Box<dyn Database>,
    _library: Library,
}

impl Database for LibraryDatabase {
    fn metadata(&self) -> DatabaseMetadata {
        self.database.metadata()
    }

    fn style(&self) -> &str {
        self.database.style()
    }

    fn list_records(&self, record_style: Option<&str>) -> anyhow::Result<Vec<Record>> {
        self.database.list_records(record_style)
    }

    fn get_record(&self, name: &str) -> anyhow::Result<Record> {
        self.database.get_record(name)
    }
}

/// A candidate that could not be loaded, with the reason
#[derive(Debug)]
pub struct FailedDatabase {
    pub name: String,
    pub error: LoadError,
}

/// Result of one load pass: loaded databases plus the ones that failed
///
/// Built once by [`DatabaseLoader::load`] and read-only afterwards.
#[derive(Default)]
pub struct DatabaseCatalog {
    loaded: BTreeMap<String, Box<dyn Database>>,
    failed: Vec<FailedDatabase>,
}

impl DatabaseCatalog {
    /// Get a loaded database by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Database> {
        self.loaded.get(name).map(|db| &**db)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Names of loaded databases, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.loaded.keys().map(String::as_str).collect()
    }

    /// Iterate over loaded databases in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Database)> {
        self.loaded
            .iter()
            .map(|(name, db)| (name.as_str(), &**db))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Failed candidates in the order they were attempted
    #[must_use]
    pub fn failed(&self) -> &[FailedDatabase] {
        &self.failed
    }

    #[must_use]
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.name.as_str()).collect()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl fmt::Debug for DatabaseCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCatalog")
            .field("loaded", &self.names())
            .field("failed", &self.failed)
            .finish()
    }
}

/// Discovers and loads every database under a root directory
///
/// Each call to [`load`](Self::load) re-scans the directory and re-imports
/// every candidate, so plugin constructors run again. Call it once at
/// start-up and keep the returned catalog.
pub struct DatabaseLoader<I = StandardImporter> {
    root: PathBuf,
    options: DiscoveryOptions,
    importer: I,
}

impl DatabaseLoader<StandardImporter> {
    /// Create a loader for `root` using the standard importer
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            options: DiscoveryOptions::default(),
            importer: StandardImporter::new(),
        }
    }

    /// Create a loader from the `databases` configuration section
    ///
    /// # Errors
    /// Returns an error if no root directory is configured and the
    /// executable's location cannot be determined.
    pub fn from_config(config: &DatabasesConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.root_dir()?).with_options(config.discovery_options()))
    }
}

impl<I: DatabaseImporter> DatabaseLoader<I> {
    /// Replace the importer
    #[must_use]
    pub fn with_importer<J: DatabaseImporter>(self, importer: J) -> DatabaseLoader<J> {
        DatabaseLoader {
            root: self.root,
            options: self.options,
            importer,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover and load all candidates
    ///
    /// Never fails: candidates that cannot be loaded, including ones whose
    /// constructor panics, are recorded in [`DatabaseCatalog::failed`].
    pub fn load(&self) -> DatabaseCatalog {
        let mut catalog = DatabaseCatalog::default();

        let candidates = match discover_candidates(&self.root, &self.options) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Failed to scan database root {}: {}", self.root.display(), e);
                return catalog;
            }
        };

        for candidate in candidates {
            debug!("Loading database `{}` from {}", candidate.name, candidate.path().display());

            let result = panic::catch_unwind(AssertUnwindSafe(|| self.importer.import(&candidate)))
                .unwrap_or_else(|payload| Err(LoadError::Panicked(panic_message(payload.as_ref()))));

            match result {
                Ok(database) => {
                    catalog.loaded.insert(candidate.name, database);
                }
                Err(error) => {
                    warn!("Database `{}` failed to load: {}", candidate.name, error);
                    catalog.failed.push(FailedDatabase {
                        name: candidate.name,
                        error,
                    });
                }
            }
        }

        info!(
            "Loaded {} database(s) from {} ({} failed)",
            catalog.len(),
            self.root.display(),
            catalog.failed.len()
        );
        catalog
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
