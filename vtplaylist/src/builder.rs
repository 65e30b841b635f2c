//! Construction d'une playlist à partir d'une liste de fichiers

use crate::classifier::{Classification, Classifier};
use crate::item::PlaylistDocument;
use crate::settings::PlaylistSettings;
use std::sync::Arc;
use tracing::{debug, warn};

/// Assemble les éléments classés dans l'ordre du scan
#[derive(Debug, Clone)]
pub struct PlaylistBuilder {
    settings: Arc<PlaylistSettings>,
    classifier: Classifier,
}

impl PlaylistBuilder {
    pub fn new(settings: Arc<PlaylistSettings>) -> Self {
        let classifier = Classifier::new(&settings);
        Self {
            settings,
            classifier,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Construit la playlist ; jamais vide
    ///
    /// Les fichiers d'extension inconnue sont ignorés. Sans aucun élément, la
    /// playlist contient le seul élément de repli (dont l'existence n'est
    /// pas vérifiée).
    pub fn build<S: AsRef<str>>(&self, filenames: &[S]) -> PlaylistDocument {
        let mut items = Vec::with_capacity(filenames.len());

        for filename in filenames {
            let filename = filename.as_ref();
            let classification = self.classifier.classify(filename);
            match &classification {
                Classification::Image { duration, .. } => {
                    debug!("Added image: {} ({}ms)", filename, duration)
                }
                Classification::Video { muted, .. } => {
                    debug!("Added video: {} (muted: {})", filename, muted)
                }
                Classification::Unsupported { extension } => {
                    warn!(file = %filename, %extension, "Unknown file type, skipping");
                }
            }
            if let Some(item) = classification.into_item(self.settings.url_for(filename)) {
                items.push(item);
            }
        }

        if items.is_empty() {
            debug!("No media files found, using fallback item");
            return PlaylistDocument::fallback(self.settings.default_url());
        }

        PlaylistDocument::new(items)
    }
}
