//! Built-in database styles
//!
//! Package candidates are opened by looking their style up here. The table is
//! fixed at compile time; shared-library plugins cover everything else.

use super::api::{Database, PackageManifest};
use super::local::LocalDatabase;
use anyhow::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Opens a database package: `(name, package dir, manifest)`
pub type DatabaseConstructor = fn(&str, &Path, &PackageManifest) -> Result<Box<dyn Database>>;

fn open_local(name: &str, root: &Path, manifest: &PackageManifest) -> Result<Box<dyn Database>> {
    Ok(Box::new(LocalDatabase::open(name, root, manifest)?))
}

static BUILTIN_STYLES: Lazy<HashMap<&'static str, DatabaseConstructor>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, DatabaseConstructor> = HashMap::new();

    m.insert(LocalDatabase::STYLE, open_local);

    m
});

/// Look up a built-in style constructor
#[must_use]
pub fn builtin_constructor(style: &str) -> Option<DatabaseConstructor> {
    BUILTIN_STYLES.get(style).copied()
}

/// Names of all built-in styles, sorted
#[must_use]
pub fn builtin_styles() -> Vec<&'static str> {
    let mut styles: Vec<_> = BUILTIN_STYLES.keys().copied().collect();
    styles.sort_unstable();
    styles
}
