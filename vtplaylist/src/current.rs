//! Média affiché "en ce moment"
//!
//! Document indépendant de la playlist, utilisé par les clients pour
//! forcer l'affichage d'un média donné.

use crate::item::MediaKind;
use crate::settings::PlaylistSettings;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use vtstore::JsonStore;

/// Durée par défaut du média courant (ms)
pub const DEFAULT_CURRENT_DURATION_MS: i64 = 30000;

/// Document `{"type", "url", "duration"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "vtserver", derive(utoipa::ToSchema))]
pub struct CurrentMedia {
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default = "default_duration")]
    pub duration: i64,
}

fn default_duration() -> i64 {
    DEFAULT_CURRENT_DURATION_MS
}

impl CurrentMedia {
    pub fn fallback(default_url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            url: default_url.into(),
            duration: DEFAULT_CURRENT_DURATION_MS,
        }
    }
}

/// Lecture et remplacement du média courant
#[derive(Debug, Clone)]
pub struct CurrentMediaService {
    settings: Arc<PlaylistSettings>,
    store: JsonStore<CurrentMedia>,
}

impl CurrentMediaService {
    pub fn new(settings: Arc<PlaylistSettings>) -> Self {
        let store = JsonStore::new(settings.current_media_file.clone());
        Self { settings, store }
    }

    /// Document persisté, ou le média par défaut s'il est absent ou corrompu
    pub fn get(&self) -> Result<CurrentMedia> {
        Ok(self
            .store
            .load_or_else(|| CurrentMedia::fallback(self.settings.default_url()))?)
    }

    /// Remplace le média courant à partir d'un JSON brut
    pub fn apply_update(&self, payload: &Value) -> Result<CurrentMedia> {
        if payload.get("url").and_then(Value::as_str).is_none() {
            return Err(self.invalid_url());
        }
        let media: CurrentMedia = serde_json::from_value(payload.clone())
            .map_err(|e| Error::InvalidPayload(format!("Invalid current media format: {}", e)))?;
        self.set(media)
    }

    /// Remplace le média courant
    ///
    /// L'URL doit désigner un fichier existant du répertoire média ; une URL
    /// qui en sort (`..`) est refusée comme mal formée.
    pub fn set(&self, media: CurrentMedia) -> Result<CurrentMedia> {
        let filename = self
            .settings
            .local_filename(&media.url)
            .filter(|name| self.settings.media_path(name).is_some())
            .ok_or_else(|| self.invalid_url())?;

        if !self.settings.media_exists(filename) {
            return Err(Error::MediaNotFound(filename.to_string()));
        }

        self.store.save(&media)?;
        info!(url = %media.url, "Current media updated");
        Ok(media)
    }

    fn invalid_url(&self) -> Error {
        Error::InvalidPayload(format!(
            "Invalid media URL format. Must start with '{}/'.",
            self.settings.url_prefix
        ))
    }
}
