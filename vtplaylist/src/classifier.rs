//! Classification des fichiers média
//!
//! Le type est déterminé par l'extension (insensible à la casse), puis une
//! chaîne ordonnée de règles par mots-clés, évaluée sur le nom complet en
//! minuscules, fixe la durée des images et le mode muet des vidéos. La
//! première règle qui correspond l'emporte.
//!
//! | Images                     | Durée   |
//! |----------------------------|---------|
//! | `quick`, `short`           | 2000 ms |
//! | `long`, `schedule`         | 10000 ms|
//! | `banner`, `logo`           | 3000 ms |
//! | sinon                      | 5000 ms |
//!
//! | Vidéos                          | Muet  |
//! |---------------------------------|-------|
//! | `mute`, `silent`, `background`  | oui   |
//! | `sound`, `audio`, `announcement`| non   |
//! | sinon                           | non   |

use crate::item::{PlaylistItem, DEFAULT_IMAGE_DURATION_MS};
use crate::settings::PlaylistSettings;
use std::collections::BTreeSet;
use std::path::Path;

/// Règle ayant fixé la durée d'une image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationRule {
    QuickShort,
    LongSchedule,
    BannerLogo,
    Default,
}

/// Règle ayant fixé le mode muet d'une vidéo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteRule {
    Muted,
    WithSound,
    Default,
}

/// Règles images, dans l'ordre d'évaluation
pub const DURATION_RULES: [(DurationRule, &[&str]); 3] = [
    (DurationRule::QuickShort, &["quick", "short"]),
    (DurationRule::LongSchedule, &["long", "schedule"]),
    (DurationRule::BannerLogo, &["banner", "logo"]),
];

/// Règles vidéos, dans l'ordre d'évaluation
pub const MUTE_RULES: [(MuteRule, &[&str]); 2] = [
    (MuteRule::Muted, &["mute", "silent", "background"]),
    // Même résultat que le défaut ; la branche reste explicite
    (MuteRule::WithSound, &["sound", "audio", "announcement"]),
];

impl DurationRule {
    pub fn duration_ms(self) -> i64 {
        match self {
            DurationRule::QuickShort => 2000,
            DurationRule::LongSchedule => 10000,
            DurationRule::BannerLogo => 3000,
            DurationRule::Default => DEFAULT_IMAGE_DURATION_MS,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            DurationRule::QuickShort => "quick/short keyword",
            DurationRule::LongSchedule => "long/schedule keyword",
            DurationRule::BannerLogo => "banner/logo keyword",
            DurationRule::Default => "default",
        }
    }
}

impl MuteRule {
    pub fn muted(self) -> bool {
        matches!(self, MuteRule::Muted)
    }

    pub fn describe(self) -> &'static str {
        match self {
            MuteRule::Muted => "mute/silent/background keyword",
            MuteRule::WithSound => "sound/audio/announcement keyword",
            MuteRule::Default => "default unmuted",
        }
    }
}

/// Résultat de la classification d'un nom de fichier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Image { duration: i64, rule: DurationRule },
    Video { muted: bool, rule: MuteRule },
    /// Extension non prise en charge (chaîne vide si aucune)
    Unsupported { extension: String },
}

impl Classification {
    /// Construit l'élément de playlist correspondant, `None` si ignoré
    pub fn into_item(self, url: String) -> Option<PlaylistItem> {
        match self {
            Classification::Image { duration, .. } => Some(PlaylistItem::image(url, duration)),
            Classification::Video { muted, .. } => Some(PlaylistItem::video(url, muted)),
            Classification::Unsupported { .. } => None,
        }
    }
}

/// Classifieur par extension et mots-clés
///
/// Fonction pure du nom de fichier : ni la taille ni le contenu ne sont lus.
#[derive(Debug, Clone)]
pub struct Classifier {
    image_extensions: BTreeSet<String>,
    video_extensions: BTreeSet<String>,
}

impl Classifier {
    pub fn new(settings: &PlaylistSettings) -> Self {
        Self {
            image_extensions: settings.image_extensions.clone(),
            video_extensions: settings.video_extensions.clone(),
        }
    }

    pub fn classify(&self, filename: &str) -> Classification {
        let extension = extension_of(filename);
        let lower = filename.to_lowercase();

        if self.image_extensions.contains(&extension) {
            let rule = first_match(&DURATION_RULES, &lower).unwrap_or(DurationRule::Default);
            Classification::Image {
                duration: rule.duration_ms(),
                rule,
            }
        } else if self.video_extensions.contains(&extension) {
            let rule = first_match(&MUTE_RULES, &lower).unwrap_or(MuteRule::Default);
            Classification::Video {
                muted: rule.muted(),
                rule,
            }
        } else {
            Classification::Unsupported { extension }
        }
    }

    pub fn image_extensions(&self) -> impl Iterator<Item = &str> {
        self.image_extensions.iter().map(String::as_str)
    }

    pub fn video_extensions(&self) -> impl Iterator<Item = &str> {
        self.video_extensions.iter().map(String::as_str)
    }
}

fn first_match<R: Copy>(rules: &[(R, &[&str])], lower_name: &str) -> Option<R> {
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower_name.contains(k)))
        .map(|(rule, _)| *rule)
}

/// Extension en minuscules avec le point (`"A.JPG"` donne `".jpg"`)
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}
