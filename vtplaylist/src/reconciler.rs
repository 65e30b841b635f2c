//! Réconciliation de la playlist persistée avec le répertoire média
//!
//! La playlist persistée est une vue matérialisée du répertoire média,
//! réparée paresseusement à la lecture :
//!
//! 1. document absent, corrompu ou vide : régénération complète ;
//! 2. chaque élément local (URL sous le préfixe média) est vérifié sur
//!    disque, les URL externes sont conservées sans vérification ;
//! 3. aucun élément invalide : le document est retourné tel quel, sans
//!    écriture ;
//! 4. une partie des éléments invalides : ils sont retirés et le document
//!    filtré est sauvegardé ;
//! 5. tous les éléments invalides : régénération complète.
//!
//! Le verrou du document est tenu de la lecture jusqu'à la sauvegarde : une
//! mise à jour acceptée pendant une réconciliation n'est jamais écrasée par
//! la version filtrée de l'ancien document.

use crate::builder::PlaylistBuilder;
use crate::item::{PlaylistDocument, PlaylistItem};
use crate::scanner::MediaScanner;
use crate::settings::PlaylistSettings;
use crate::update::validate_update;
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use vtstore::{JsonStore, Loaded, Locked};

/// Pourquoi une régénération complète a eu lieu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateReason {
    /// Document absent, corrompu ou sans élément
    Absent,
    /// Tous les éléments référencent des fichiers disparus
    AllInvalid,
}

/// Action effectuée par une réconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Unchanged,
    Pruned { removed: usize },
    Regenerated(RegenerateReason),
}

/// Résultat d'une réconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub document: PlaylistDocument,
    pub action: Reconciliation,
}

/// Résultat d'une régénération forcée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerateReport {
    pub message: String,
    pub playlist: PlaylistDocument,
}

/// Cœur du moteur : lecture réconciliée, régénération et mise à jour
#[derive(Debug, Clone)]
pub struct Reconciler {
    settings: Arc<PlaylistSettings>,
    scanner: MediaScanner,
    builder: PlaylistBuilder,
    store: JsonStore<PlaylistDocument>,
}

impl Reconciler {
    pub fn new(settings: PlaylistSettings) -> Self {
        let settings = Arc::new(settings);
        Self {
            scanner: MediaScanner::new(settings.media_dir.clone()),
            builder: PlaylistBuilder::new(settings.clone()),
            store: JsonStore::new(settings.playlist_file.clone()),
            settings,
        }
    }

    pub fn settings(&self) -> &PlaylistSettings {
        &self.settings
    }

    pub fn scanner(&self) -> &MediaScanner {
        &self.scanner
    }

    pub fn builder(&self) -> &PlaylistBuilder {
        &self.builder
    }

    /// Construit une playlist depuis le répertoire média, sans la sauvegarder
    pub fn generate(&self) -> Result<PlaylistDocument> {
        let files = self.scanner.scan()?;
        Ok(self.builder.build(&files))
    }

    /// Régénère et sauvegarde inconditionnellement
    pub fn regenerate(&self) -> Result<RegenerateReport> {
        let playlist = self.rebuild(&self.store.lock())?;
        Ok(RegenerateReport {
            message: format!("Playlist regenerated with {} items", playlist.len()),
            playlist,
        })
    }

    /// Lecture réconciliée ; les erreurs d'E/S remontent à l'appelant
    pub fn reconcile(&self) -> Result<Reconciled> {
        let locked = self.store.lock();
        let doc = match locked.read()? {
            Loaded::Found(doc) if !doc.is_empty() => doc,
            Loaded::Found(_) => {
                info!("Playlist is empty, generating from media directory");
                return self.regenerated(&locked, RegenerateReason::Absent);
            }
            Loaded::Missing => {
                info!(path = %self.store.path().display(), "Playlist not found, generating from media directory");
                return self.regenerated(&locked, RegenerateReason::Absent);
            }
            Loaded::Malformed(reason) => {
                error!(
                    path = %self.store.path().display(),
                    %reason,
                    "Playlist document is malformed, generating from media directory"
                );
                return self.regenerated(&locked, RegenerateReason::Absent);
            }
        };

        let total = doc.len();
        let valid: Vec<PlaylistItem> = doc
            .items
            .iter()
            .filter(|item| self.is_available(item))
            .cloned()
            .collect();

        if valid.len() == total {
            debug!(items = total, "Playlist is consistent with media directory");
            return Ok(Reconciled {
                document: doc,
                action: Reconciliation::Unchanged,
            });
        }

        if valid.is_empty() {
            info!("No valid items in playlist, regenerating from media directory");
            return self.regenerated(&locked, RegenerateReason::AllInvalid);
        }

        let removed = total - valid.len();
        let document = PlaylistDocument::new(valid);
        locked.save(&document)?;
        info!(removed, remaining = document.len(), "Updated playlist, removed invalid items");

        Ok(Reconciled {
            document,
            action: Reconciliation::Pruned { removed },
        })
    }

    /// Playlist à servir aux clients
    ///
    /// Ne retourne jamais d'erreur : toute panne inattendue est journalisée
    /// et remplacée par la playlist de repli.
    pub fn get_playlist(&self) -> PlaylistDocument {
        match self.reconcile() {
            Ok(reconciled) => reconciled.document,
            Err(e) => {
                error!(error = %e, "Unexpected failure while reconciling playlist, serving fallback");
                PlaylistDocument::fallback(self.settings.default_url())
            }
        }
    }

    /// Remplace la playlist par un contenu soumis, après validation complète
    pub fn apply_update(&self, payload: &Value) -> Result<PlaylistDocument> {
        let document = validate_update(&self.settings, payload)?;
        self.store.save(&document)?;
        info!(items = document.len(), "Playlist updated");
        Ok(document)
    }

    fn rebuild(&self, locked: &Locked<'_, PlaylistDocument>) -> Result<PlaylistDocument> {
        let document = self.generate()?;
        locked.save(&document)?;
        info!(items = document.len(), "Generated playlist");
        Ok(document)
    }

    fn regenerated(
        &self,
        locked: &Locked<'_, PlaylistDocument>,
        reason: RegenerateReason,
    ) -> Result<Reconciled> {
        Ok(Reconciled {
            document: self.rebuild(locked)?,
            action: Reconciliation::Regenerated(reason),
        })
    }

    fn is_available(&self, item: &PlaylistItem) -> bool {
        match self.settings.local_filename(&item.url) {
            Some(filename) => {
                let exists = self.settings.media_exists(filename);
                if !exists {
                    warn!(file = %filename, "Media file referenced in playlist but not found on disk");
                }
                exists
            }
            None => true,
        }
    }
}
