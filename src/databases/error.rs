use std::path::PathBuf;

/// Reason a single database candidate could not be loaded
///
/// These never escape [`DatabaseLoader::load`](super::DatabaseLoader::load);
/// they are collected in the catalog next to the candidate name.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no database style named `{0}` is registered")]
    UnknownStyle(String),

    #[error("database initialization failed: {0}")]
    Init(String),

    #[error("failed to open plugin library: {0}")]
    Library(#[source] libloading::Error),

    #[error("plugin library does not export `{symbol}`: {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("plugin constructor returned a null pointer")]
    NullPlugin,

    #[error("database constructor panicked: {0}")]
    Panicked(String),
}
