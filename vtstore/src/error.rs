//! Types d'erreurs pour vtstore

use std::path::PathBuf;

/// Erreurs d'accès aux documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Type Result spécialisé pour vtstore
pub type Result<T> = std::result::Result<T, Error>;
