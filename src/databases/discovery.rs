//! Candidate discovery
//!
//! Scans the database root directory and turns its entries into an ordered,
//! de-duplicated list of [`Candidate`]s. Nothing is loaded here.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a candidate comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// A sub-directory, opened through a registered database style
    Package(PathBuf),
    /// A shared library exporting `_database_create`
    Library(PathBuf),
}

/// A discovered database candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub source: CandidateSource,
}

impl Candidate {
    /// Path of the directory or file backing this candidate
    #[must_use]
    pub fn path(&self) -> &Path {
        match &self.source {
            CandidateSource::Package(path) | CandidateSource::Library(path) => path,
        }
    }

    #[must_use]
    pub fn is_package(&self) -> bool {
        matches!(self.source, CandidateSource::Package(_))
    }
}

/// Rules deciding which files become candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Recognized plugin file extensions, compared case-insensitively
    pub extensions: Vec<String>,
    /// Base name reserved for the loader itself; never a candidate
    pub reserved_name: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            reserved_name: default_reserved_name(),
        }
    }
}

impl DiscoveryOptions {
    fn recognizes(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

pub(crate) fn default_extensions() -> Vec<String> {
    vec!["so".to_string(), "dylib".to_string(), "dll".to_string()]
}

pub(crate) fn default_reserved_name() -> String {
    "mod".to_string()
}

/// List the candidates found directly under `root`
///
/// Entries are visited in file-name order so the result does not depend on
/// the filesystem's enumeration order. Directories always win over files
/// sharing their base name. A missing root yields no candidates.
///
/// # Errors
/// Returns an error if `root` exists but cannot be read.
pub fn discover_candidates(root: &Path, options: &DiscoveryOptions) -> io::Result<Vec<Candidate>> {
    if !root.exists() {
        debug!("Database root {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();

        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            debug!("Skipping non UTF-8 entry {}", path.display());
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            dirs.push((file_name.to_string(), path));
        } else if path.is_file() {
            files.push(path);
        }
    }

    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    files.sort();

    let mut seen: HashSet<String> = dirs.iter().map(|(name, _)| name.clone()).collect();
    let mut candidates: Vec<Candidate> = dirs
        .into_iter()
        .map(|(name, path)| Candidate {
            name,
            source: CandidateSource::Package(path),
        })
        .collect();

    for path in files {
        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|s| s.to_str()),
        ) else {
            continue;
        };

        if !options.recognizes(ext) || stem == options.reserved_name {
            continue;
        }
        let name = stem.to_string();
        if !seen.insert(name.clone()) {
            debug!("Skipping {}: name already taken", path.display());
            continue;
        }

        candidates.push(Candidate {
            name,
            source: CandidateSource::Library(path),
        });
    }

    debug!(
        "Discovered {} database candidate(s) in {}",
        candidates.len(),
        root.display()
    );
    Ok(candidates)
}
