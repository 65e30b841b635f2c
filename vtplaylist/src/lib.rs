//! # vtplaylist - Génération et réconciliation de la playlist d'affichage
//!
//! Cette crate transforme un répertoire de médias en une playlist ordonnée,
//! la persiste, et la maintient cohérente avec le contenu réel du disque :
//! - Scan du répertoire média (fichiers réguliers non cachés, triés)
//! - Classification par extension et mots-clés (durée, mode muet)
//! - Construction avec élément de repli quand aucun média n'est trouvé
//! - Réconciliation à la lecture, régénération forcée, mise à jour validée
//!
//! # Architecture
//!
//! - **MediaScanner** : liste les fichiers candidats
//! - **Classifier** : `nom de fichier -> élément | ignoré`, fonction pure
//! - **PlaylistBuilder** : assemble les éléments dans l'ordre du scan
//! - **Reconciler** : cœur avec état, adossé à un `vtstore::JsonStore`
//!
//! Tous les composants reçoivent une [`PlaylistSettings`] explicite.
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use vtplaylist::{PlaylistSettings, Reconciler};
//!
//! # fn main() -> vtplaylist::Result<()> {
//! let reconciler = Reconciler::new(PlaylistSettings::new("media", "data"));
//!
//! // Lecture réconciliée (ne retourne jamais d'erreur)
//! let playlist = reconciler.get_playlist();
//! println!("{} items", playlist.len());
//!
//! // Régénération forcée
//! let report = reconciler.regenerate()?;
//! println!("{}", report.message);
//! # Ok(())
//! # }
//! ```

mod builder;
mod classifier;
mod current;
mod error;
mod item;
mod reconciler;
mod scanner;
mod settings;
mod update;

#[cfg(feature = "vtconfig")]
mod config_ext;

#[cfg(feature = "vtserver")]
pub mod api;
#[cfg(feature = "vtserver")]
mod files;
#[cfg(feature = "vtserver")]
mod openapi;
#[cfg(feature = "vtserver")]
mod server_ext;

// Réexports publics
pub use builder::PlaylistBuilder;
pub use classifier::{
    Classification, Classifier, DurationRule, MuteRule, DURATION_RULES, MUTE_RULES,
};
pub use current::{CurrentMedia, CurrentMediaService, DEFAULT_CURRENT_DURATION_MS};
pub use error::{Error, Result};
pub use item::{
    MediaKind, PlaylistDocument, PlaylistItem, DEFAULT_IMAGE_DURATION_MS, FULL_VIDEO_DURATION,
};
pub use reconciler::{
    Reconciled, Reconciler, Reconciliation, RegenerateReason, RegenerateReport,
};
pub use scanner::MediaScanner;
pub use settings::{
    PlaylistSettings, DEFAULT_IMAGE_EXTENSIONS, DEFAULT_MEDIA_FILENAME, DEFAULT_URL_PREFIX,
    DEFAULT_VIDEO_EXTENSIONS,
};
pub use update::validate_update;

#[cfg(feature = "vtconfig")]
pub use config_ext::PlaylistConfigExt;

#[cfg(feature = "vtserver")]
pub use files::{content_type_for, create_media_file_router};
#[cfg(feature = "vtserver")]
pub use openapi::ApiDoc;
#[cfg(feature = "vtserver")]
pub use server_ext::MediaApiExt;
