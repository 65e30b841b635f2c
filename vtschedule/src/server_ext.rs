//! Implémentation du trait ScheduleApiExt pour le serveur vtserver

use crate::api::schedule_api_router;
use crate::config_ext::ScheduleConfigExt;
use crate::service::ScheduleService;
use crate::ApiDoc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use vtserver::Server;

/// Trait d'extension pour ajouter l'API emploi du temps à vtserver
#[async_trait::async_trait]
pub trait ScheduleApiExt {
    /// Enregistre l'API emploi du temps
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /api/schedule` - Emploi du temps courant
    /// - `POST /api/schedule` - Remplacement validé
    /// - `GET /swagger-ui/schedule` - Documentation interactive
    async fn init_schedule_api(&mut self, schedule_file: PathBuf)
        -> anyhow::Result<Arc<ScheduleService>>;

    async fn init_schedule_api_configured(&mut self) -> anyhow::Result<Arc<ScheduleService>>;
}

#[async_trait::async_trait]
impl ScheduleApiExt for Server {
    async fn init_schedule_api(
        &mut self,
        schedule_file: PathBuf,
    ) -> anyhow::Result<Arc<ScheduleService>> {
        info!(path = %schedule_file.display(), "Schedule API registered");
        let service = Arc::new(ScheduleService::new(schedule_file));

        self.add_openapi(
            schedule_api_router(service.clone()),
            ApiDoc::openapi(),
            "schedule",
        )
        .await;

        Ok(service)
    }

    async fn init_schedule_api_configured(&mut self) -> anyhow::Result<Arc<ScheduleService>> {
        let path = vtconfig::get_config().schedule_file()?;
        self.init_schedule_api(path).await
    }
}
