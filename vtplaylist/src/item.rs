//! Modèle de données : éléments et document de playlist

use serde::{Deserialize, Serialize};

/// Durée d'affichage par défaut d'une image (ms)
pub const DEFAULT_IMAGE_DURATION_MS: i64 = 5000;

/// Valeur sentinelle : la vidéo est lue jusqu'à sa fin naturelle
pub const FULL_VIDEO_DURATION: i64 = -1;

/// Type de média d'un élément
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "vtserver", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Durée appliquée quand aucune n'est précisée
    pub fn default_duration(self) -> i64 {
        match self {
            MediaKind::Image => DEFAULT_IMAGE_DURATION_MS,
            MediaKind::Video => FULL_VIDEO_DURATION,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Une entrée de la playlist
///
/// Sérialisée sous la forme `{"type", "url", "duration", "muted"}`.
/// Pour une image `duration` est un nombre de millisecondes ; pour une vidéo
/// générée automatiquement c'est [`FULL_VIDEO_DURATION`]. `muted` n'a de
/// sens que pour les vidéos mais est toujours présent.
///
/// À la lecture, `duration` et `muted` sont optionnels : une valeur absente
/// prend la valeur par défaut du type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "vtserver", derive(utoipa::ToSchema))]
#[serde(from = "RawPlaylistItem")]
pub struct PlaylistItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub duration: i64,
    pub muted: bool,
}

impl PlaylistItem {
    pub fn image(url: impl Into<String>, duration: i64) -> Self {
        Self {
            kind: MediaKind::Image,
            url: url.into(),
            duration,
            muted: false,
        }
    }

    pub fn video(url: impl Into<String>, muted: bool) -> Self {
        Self {
            kind: MediaKind::Video,
            url: url.into(),
            duration: FULL_VIDEO_DURATION,
            muted,
        }
    }
}

#[derive(Deserialize)]
struct RawPlaylistItem {
    #[serde(rename = "type")]
    kind: MediaKind,
    url: String,
    #[serde(default)]
    duration: Option<i64>,
    #[serde(default)]
    muted: Option<bool>,
}

impl From<RawPlaylistItem> for PlaylistItem {
    fn from(raw: RawPlaylistItem) -> Self {
        Self {
            duration: raw.duration.unwrap_or_else(|| raw.kind.default_duration()),
            muted: raw.muted.unwrap_or(false),
            kind: raw.kind,
            url: raw.url,
        }
    }
}

/// Le document playlist persisté : `{"items": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "vtserver", derive(utoipa::ToSchema))]
pub struct PlaylistDocument {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

impl PlaylistDocument {
    pub fn new(items: Vec<PlaylistItem>) -> Self {
        Self { items }
    }

    /// Playlist de repli : une seule image par défaut
    pub fn fallback(default_url: impl Into<String>) -> Self {
        Self {
            items: vec![PlaylistItem::image(default_url, DEFAULT_IMAGE_DURATION_MS)],
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_type_and_duration() {
        let item = PlaylistItem::video("/media/a.mp4", true);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "video", "url": "/media/a.mp4", "duration": -1, "muted": true})
        );
    }

    #[test]
    fn missing_timing_fields_take_kind_defaults() {
        let image: PlaylistItem =
            serde_json::from_str(r#"{"type": "image", "url": "/media/a.jpg"}"#).unwrap();
        assert_eq!(image.duration, DEFAULT_IMAGE_DURATION_MS);
        assert!(!image.muted);

        let video: PlaylistItem =
            serde_json::from_str(r#"{"type": "video", "url": "/media/a.mp4"}"#).unwrap();
        assert_eq!(video.duration, FULL_VIDEO_DURATION);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let res = serde_json::from_str::<PlaylistItem>(r#"{"type": "audio", "url": "x"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn document_without_items_is_empty() {
        let doc: PlaylistDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.is_empty());
    }
}
