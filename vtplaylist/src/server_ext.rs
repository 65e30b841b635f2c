//! Implémentation du trait MediaApiExt pour le serveur vtserver
//!
//! `vtplaylist` étend `vtserver::Server` sans que `vtserver` connaisse
//! `vtplaylist`.
//!
//! ```rust,no_run
//! use vtplaylist::MediaApiExt;
//! use vtserver::ServerBuilder;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut server = ServerBuilder::new_configured().build();
//! let reconciler = server.init_media_api_configured().await?;
//! server.start().await?;
//! # Ok(())
//! # }
//! ```

use crate::api::{media_api_router, MediaApiState};
use crate::config_ext::PlaylistConfigExt;
use crate::files::create_media_file_router;
use crate::reconciler::Reconciler;
use crate::settings::PlaylistSettings;
use crate::ApiDoc;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use vtserver::Server;

/// Trait d'extension pour ajouter l'API média à vtserver
#[async_trait::async_trait]
pub trait MediaApiExt {
    /// Enregistre l'API média et le service des fichiers
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /api/media/playlist` - Playlist réconciliée
    /// - `POST /api/media/playlist` - Remplacement validé de la playlist
    /// - `GET|POST /api/media/regenerate` - Régénération forcée
    /// - `GET|POST /api/media/current` - Média courant
    /// - `POST /api/media/upload` - Non implémenté (501)
    /// - `GET <préfixe>/{fichier}` - Contenu des fichiers média
    /// - `GET /swagger-ui/media` - Documentation interactive
    async fn init_media_api(&mut self, settings: PlaylistSettings) -> anyhow::Result<Reconciler>;

    /// Comme [`init_media_api`](Self::init_media_api), avec les paramètres
    /// issus de la configuration globale
    async fn init_media_api_configured(&mut self) -> anyhow::Result<Reconciler>;
}

#[async_trait::async_trait]
impl MediaApiExt for Server {
    async fn init_media_api(&mut self, settings: PlaylistSettings) -> anyhow::Result<Reconciler> {
        let prefix = settings.url_prefix.clone();
        let files = create_media_file_router(Arc::new(settings.clone()));
        let reconciler = Reconciler::new(settings);

        let state = Arc::new(MediaApiState::new(reconciler.clone()));
        self.add_openapi(media_api_router(state), ApiDoc::openapi(), "media")
            .await;
        self.add_router(&prefix, files).await;

        info!(
            media_dir = %reconciler.settings().media_dir.display(),
            prefix = %prefix,
            "Media API registered"
        );
        Ok(reconciler)
    }

    async fn init_media_api_configured(&mut self) -> anyhow::Result<Reconciler> {
        let settings = vtconfig::get_config().playlist_settings()?;
        self.init_media_api(settings).await
    }
}
