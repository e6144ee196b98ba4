/// Database API definitions
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Database API trait that every loaded database implements
///
/// Built-in styles implement it directly; shared-library plugins return a
/// boxed implementation from their `_database_create` entry point.
pub trait Database: Send {
    /// Get database metadata
    fn metadata(&self) -> DatabaseMetadata;

    /// Style name this database was built from (e.g. `local`)
    fn style(&self) -> &str;

    /// List stored records, optionally restricted to one record style
    fn list_records(&self, record_style: Option<&str>) -> Result<Vec<Record>>;

    /// Fetch a single record by name
    fn get_record(&self, name: &str) -> Result<Record>;
}

/// Database metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMetadata {
    pub name: String,
    pub style: String,
    pub description: String,
}

/// A stored calculation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub style: String,
    pub content: serde_json::Value,
}

/// Optional `database.yaml` manifest found at the root of a database package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Style used to open the package. Falls back to the package name.
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PackageManifest {
    /// File name looked up inside each package directory
    pub const FILE_NAME: &'static str = "database.yaml";
}
