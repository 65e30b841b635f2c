//! Types d'erreurs pour vtplaylist

use std::path::PathBuf;

/// Erreurs du moteur de playlist
///
/// Les situations attendues (répertoire média absent, extension inconnue,
/// document absent ou corrompu) ne produisent jamais d'erreur : elles sont
/// résolues sur place. Seuls les rejets de validation et les échecs
/// d'E/S remontent à l'appelant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Le document soumis n'a pas la forme attendue
    #[error("{0}")]
    InvalidPayload(String),

    /// Un élément de la playlist soumise est invalide
    #[error("Item {index} {reason}.")]
    InvalidItem { index: usize, reason: String },

    /// Un élément de la playlist soumise référence un fichier absent
    #[error("Item {index}: Media file '{filename}' not found.")]
    ItemMediaNotFound { index: usize, filename: String },

    /// Le média courant soumis référence un fichier absent
    #[error("Referenced media file '{0}' not found on server.")]
    MediaNotFound(String),

    #[error("Failed to scan media directory {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] vtstore::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Vrai pour les erreurs causées par le contenu soumis par l'appelant
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidPayload(_)
                | Error::InvalidItem { .. }
                | Error::ItemMediaNotFound { .. }
                | Error::MediaNotFound(_)
        )
    }
}

/// Type Result spécialisé pour vtplaylist
pub type Result<T> = std::result::Result<T, Error>;
