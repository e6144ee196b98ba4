// Database plugin system:
// - Candidate discovery from a root directory
// - Built-in styles for database packages
// - Dynamic loading with libloading for plugin libraries
// - Per-candidate failure isolation

pub mod api;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod local;
pub mod registry;

pub use api::{Database, DatabaseMetadata, PackageManifest, Record};
pub use discovery::{discover_candidates, Candidate, CandidateSource, DiscoveryOptions};
pub use error::LoadError;
pub use loader::{DatabaseCatalog, DatabaseImporter, DatabaseLoader, FailedDatabase, StandardImporter};
pub use local::LocalDatabase;
