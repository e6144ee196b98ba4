//! `local` database style: records stored as JSON files on disk
//!
//! Layout of a package directory:
//!
//! ```text
//! <package>/database.yaml                (optional)
//! <package>/<record_style>/<name>.json
//! ```

use super::api::{Database, DatabaseMetadata, PackageManifest, Record};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-backed database
pub struct LocalDatabase {
    name: String,
    root: PathBuf,
    description: String,
}

impl LocalDatabase {
    /// Style name this implementation is registered under
    pub const STYLE: &'static str = "local";

    /// Open a local database rooted at `root`
    ///
    /// # Errors
    /// Returns an error if `root` is not a directory.
    pub fn open<P: AsRef<Path>>(name: &str, root: P, manifest: &PackageManifest) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            bail!("{} is not a directory", root.display());
        }

        Ok(Self {
            name: name.to_string(),
            root: root.to_path_buf(),
            description: manifest
                .description
                .clone()
                .unwrap_or_else(|| format!("Local records under {}", root.display())),
        })
    }

    /// Root directory of this database
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_record(path: &Path, style: &str) -> Result<Record> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .context("Record file has no name")?
            .to_string();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read record {}", path.display()))?;
        let content = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse record {}", path.display()))?;

        Ok(Record {
            name,
            style: style.to_string(),
            content,
        })
    }

    fn record_styles(&self) -> Result<Vec<String>> {
        let mut styles = Vec::new();

        for entry in fs::read_dir(&self.root).context("Failed to read database directory")? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(style) = path.file_name().and_then(|s| s.to_str()) {
                if !style.starts_with('.') {
                    styles.push(style.to_string());
                }
            }
        }

        styles.sort();
        Ok(styles)
    }

    fn record_paths(&self, style: &str) -> Result<Vec<PathBuf>> {
        let style_dir = self.root.join(style);
        if !style_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&style_dir)
            .with_context(|| format!("Failed to read {}", style_dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}

impl Database for LocalDatabase {
    fn metadata(&self) -> DatabaseMetadata {
        DatabaseMetadata {
            name: self.name.clone(),
            style: Self::STYLE.to_string(),
            description: self.description.clone(),
        }
    }

    fn style(&self) -> &str {
        Self::STYLE
    }

    fn list_records(&self, record_style: Option<&str>) -> Result<Vec<Record>> {
        let styles = match record_style {
            Some(style) => vec![style.to_string()],
            None => self.record_styles()?,
        };

        let mut records = Vec::new();
        for style in &styles {
            for path in self.record_paths(style)? {
                records.push(Self::read_record(&path, style)?);
            }
        }

        Ok(records)
    }

    fn get_record(&self, name: &str) -> Result<Record> {
        for style in self.record_styles()? {
            let path = self.root.join(&style).join(format!("{name}.json"));
            if path.is_file() {
                return Self::read_record(&path, &style);
            }
        }

        bail!("Record `{name}` not found in database `{}`", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_record(root: &Path, style: &str, name: &str, json: &str) {
        let dir = root.join(style);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.json")), json).unwrap();
    }

    #[test]
    fn test_open_requires_directory() {
        let dir = tempdir().unwrap();
        let result = LocalDatabase::open("x", dir.path().join("missing"), &PackageManifest::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_list_and_get_records() {
        let dir = tempdir().unwrap();
        write_record(dir.path(), "E_vs_r_scan", "Al--scan", r#"{"points": 100}"#);
        write_record(dir.path(), "crystal_space_group", "Al--fcc", r#"{"a": 4.05}"#);
        write_record(dir.path(), "crystal_space_group", "Cu--fcc", r#"{"a": 3.61}"#);

        let db = LocalDatabase::open("test", dir.path(), &PackageManifest::default()).unwrap();

        let all = db.list_records(None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].style, "E_vs_r_scan");

        let crystals = db.list_records(Some("crystal_space_group")).unwrap();
        let names: Vec<_> = crystals.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Al--fcc", "Cu--fcc"]);

        let record = db.get_record("Cu--fcc").unwrap();
        assert_eq!(record.content["a"], 3.61);
        assert!(db.get_record("Ni--fcc").is_err());
    }

    #[test]
    fn test_unknown_record_style_is_empty() {
        let dir = tempdir().unwrap();
        let db = LocalDatabase::open("test", dir.path(), &PackageManifest::default()).unwrap();
        assert!(db.list_records(Some("nothing")).unwrap().is_empty());
    }

    #[test]
    fn test_manifest_description() {
        let dir = tempdir().unwrap();
        let manifest = PackageManifest {
            style: None,
            description: Some("reference results".to_string()),
        };
        let db = LocalDatabase::open("refs", dir.path(), &manifest).unwrap();
        let meta = db.metadata();
        assert_eq!(meta.name, "refs");
        assert_eq!(meta.style, "local");
        assert_eq!(meta.description, "reference results");
    }
}
