//! Types d'erreurs pour vtschedule

/// Erreurs du service d'emploi du temps
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// L'emploi du temps soumis est invalide
    #[error("{0}")]
    InvalidSchedule(String),

    #[error(transparent)]
    Store(#[from] vtstore::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour vtschedule
pub type Result<T> = std::result::Result<T, Error>;
