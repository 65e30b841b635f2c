//! Extension de vtconfig pour le moteur de playlist

use crate::settings::{
    PlaylistSettings, DEFAULT_IMAGE_EXTENSIONS, DEFAULT_VIDEO_EXTENSIONS,
};

/// Trait d'extension pour vtconfig::Config
pub trait PlaylistConfigExt {
    /// Construit les paramètres du moteur depuis la configuration
    ///
    /// Les répertoires média et données sont créés s'ils n'existent pas.
    fn playlist_settings(&self) -> anyhow::Result<PlaylistSettings>;
}

impl PlaylistConfigExt for vtconfig::Config {
    fn playlist_settings(&self) -> anyhow::Result<PlaylistSettings> {
        let media_dir = self.get_media_dir()?;
        let data_dir = self.get_data_dir()?;

        let mut settings = PlaylistSettings::new(media_dir, &data_dir)
            .with_url_prefix(self.get_media_url_prefix())
            .with_default_filename(self.get_default_media_filename())
            .with_extensions(
                self.get_string_list(&["media", "image_extensions"], DEFAULT_IMAGE_EXTENSIONS),
                self.get_string_list(&["media", "video_extensions"], DEFAULT_VIDEO_EXTENSIONS),
            );

        settings.playlist_file = self.get_data_file("playlist_file", "playlist.json")?;
        settings.current_media_file =
            self.get_data_file("current_media_file", "current_media.json")?;

        Ok(settings)
    }
}
