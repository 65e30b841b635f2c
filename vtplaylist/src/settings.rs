//! Paramètres explicites du moteur de playlist
//!
//! Tous les composants reçoivent une [`PlaylistSettings`] à la construction ;
//! aucun ne lit de configuration globale.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_URL_PREFIX: &str = "/media";
pub const DEFAULT_MEDIA_FILENAME: &str = "default.jpg";
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] =
    &[".mp4", ".avi", ".mov", ".wmv", ".flv", ".webm", ".mkv"];

/// Configuration du scanner, du classifieur, du builder et des stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSettings {
    /// Répertoire racine des médias (plat)
    pub media_dir: PathBuf,
    /// Document playlist persisté
    pub playlist_file: PathBuf,
    /// Document "média courant" persisté
    pub current_media_file: PathBuf,
    /// Préfixe d'URL des médias locaux, sans slash final (ex: `/media`)
    pub url_prefix: String,
    /// Nom du fichier utilisé par l'élément de repli
    pub default_filename: String,
    /// Extensions image, en minuscules avec le point
    pub image_extensions: BTreeSet<String>,
    /// Extensions vidéo, en minuscules avec le point
    pub video_extensions: BTreeSet<String>,
}

impl PlaylistSettings {
    /// Paramètres par défaut pour un répertoire média et un répertoire de données
    pub fn new(media_dir: impl Into<PathBuf>, data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            media_dir: media_dir.into(),
            playlist_file: data_dir.join("playlist.json"),
            current_media_file: data_dir.join("current_media.json"),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            default_filename: DEFAULT_MEDIA_FILENAME.to_string(),
            image_extensions: normalize_extensions(DEFAULT_IMAGE_EXTENSIONS),
            video_extensions: normalize_extensions(DEFAULT_VIDEO_EXTENSIONS),
        }
    }

    pub fn with_url_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.url_prefix = normalize_prefix(prefix.as_ref());
        self
    }

    pub fn with_default_filename(mut self, filename: impl Into<String>) -> Self {
        self.default_filename = filename.into();
        self
    }

    pub fn with_extensions<I, J, S, T>(mut self, images: I, videos: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        self.image_extensions = normalize_extensions(images);
        self.video_extensions = normalize_extensions(videos);
        self
    }

    /// URL publique d'un fichier du répertoire média
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.url_prefix, filename)
    }

    /// URL de l'élément de repli
    pub fn default_url(&self) -> String {
        self.url_for(&self.default_filename)
    }

    /// Partie relative d'une URL locale, `None` pour une URL externe
    ///
    /// Une URL est locale si elle commence par `<préfixe>/`.
    pub fn local_filename<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.url_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }

    /// Chemin disque d'un fichier média
    ///
    /// Retourne `None` si le nom n'est pas un chemin relatif simple
    /// (vide, absolu, ou contenant `..`).
    pub fn media_path(&self, filename: &str) -> Option<PathBuf> {
        let relative = Path::new(filename);
        let mut components = relative.components().peekable();
        components.peek()?;
        if components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
            Some(self.media_dir.join(relative))
        } else {
            None
        }
    }

    /// Vrai si le fichier référencé existe dans le répertoire média
    pub fn media_exists(&self, filename: &str) -> bool {
        self.media_path(filename).is_some_and(|p| p.is_file())
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn normalize_extensions<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|e| {
            let e = e.as_ref().trim().to_lowercase();
            if e.starts_with('.') {
                e
            } else {
                format!(".{}", e)
            }
        })
        .collect()
}
