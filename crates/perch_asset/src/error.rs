use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while enumerating the bundled resource directory.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("resource directory {path:?} is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors a model load can settle with.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model file {path:?} not found")]
    NotFound { path: PathBuf },

    #[error("model file {path:?} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("failed to read model file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("load task for {path:?} ended without a result")]
    Abandoned { path: PathBuf },
}
