//! Serveur HTTP du système d'affichage
//!
//! Le router est partagé derrière un `RwLock` : les crates métier y montent
//! leurs routes au démarrage, par traits d'extension, puis
//! [`Server::start`] fige une copie et la sert jusqu'à Ctrl+C.

use crate::logs::{self, LogState, LoggingOptions, log_dump};
use anyhow::Context;
use axum::handler::Handler;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::RwLock, task::JoinHandle};
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use vtconfig::get_config;

const SERVER_NAME: &str = "VideoTimeline-Server";

/// Identité d'écoute d'un serveur
///
/// `base_url` est le nom d'hôte affiché dans les logs, `http_port` le port
/// d'écoute (0 pour un port libre choisi par le système).
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

impl ServerInfo {
    fn from_config() -> Self {
        let config = get_config();
        ServerInfo {
            name: SERVER_NAME.to_owned(),
            base_url: config.get_base_url(),
            http_port: config.get_http_port(),
        }
    }

    fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.http_port))
    }
}

/// Serveur principal
pub struct Server {
    identity: ServerInfo,
    routes: Arc<RwLock<Router>>,
    task: Option<JoinHandle<()>>,
}

impl From<ServerInfo> for Server {
    fn from(identity: ServerInfo) -> Self {
        Server {
            identity,
            routes: Arc::default(),
            task: None,
        }
    }
}

impl Server {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        ServerInfo {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
        .into()
    }

    /// `GET path` répond le JSON produit par la closure
    ///
    /// ```rust,no_run
    /// # use vtserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "localhost", 3000);
    /// server.add_route("/api/status", || async {
    ///     serde_json::json!({"status": "online"})
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, produce: F)
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let json = move || {
            let produce = produce.clone();
            async move { Json(produce().await) }
        };
        self.mount(path, Router::new().route("/", get(json))).await;
    }

    /// `GET path` servi par un handler recevant `state`
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route("/", get(handler)).with_state(state);
        self.mount(path, route).await;
    }

    /// Monte une API REST et sa documentation
    ///
    /// Le router est monté sous `/api/{name}` ; la documentation est servie
    /// sur `/swagger-ui/{name}` et la spécification sur `/api-docs/{name}.json`.
    ///
    /// ```ignore
    /// let api_router = Router::new().route("/playlist", get(get_playlist));
    /// server.add_openapi(api_router, ApiDoc::openapi(), "media").await;
    /// // GET /api/media/playlist, /swagger-ui/media, /api-docs/media.json
    /// ```
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let api = Router::new()
            .nest(&format!("/api/{}", name), api_router)
            .merge(swagger_ui(name, openapi));
        self.merge(api).await;
    }

    /// Monte `sub_router` sous `path` (à la racine si `path` vaut `/`)
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        self.mount(path, sub_router).await;
    }

    /// Copie du router courant (utile pour les tests sans socket)
    pub async fn router(&self) -> Router {
        self.routes.read().await.clone()
    }

    /// Démarre le serveur HTTP
    ///
    /// Le port est réservé avant le retour : une erreur de bind est remontée
    /// à l'appelant. Le service tourne ensuite en tâche de fond jusqu'à Ctrl+C.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        let ServerInfo {
            name,
            base_url,
            http_port,
        } = &self.identity;
        let listener = tokio::net::TcpListener::bind(self.identity.listen_addr())
            .await
            .with_context(|| format!("Cannot bind HTTP port {}", http_port))?;
        info!("Server {} running at http://{}:{}", name, base_url, http_port);

        let router = self.router().await;
        self.task = Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                error!("HTTP server stopped with error: {}", e);
            }
        }));

        Ok(())
    }

    /// Bloque jusqu'à l'arrêt du service lancé par [`start`](Self::start)
    pub async fn wait(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(e) = task.await {
            error!("HTTP server task failed: {}", e);
        }
    }

    /// Nom, hôte et port, pour `/info` et les logs
    pub fn info(&self) -> &ServerInfo {
        &self.identity
    }

    /// Installe le subscriber tracing global et expose le buffer de logs
    ///
    /// Routes enregistrées :
    ///
    /// - `GET /log-dump` - contenu du buffer circulaire
    /// - `GET|POST /api/log_setup` - lecture et changement du niveau
    /// - `GET /swagger-ui/logs` - documentation interactive
    pub async fn init_logging(&mut self, options: LoggingOptions) {
        let log_state = logs::init_logging(options);
        self.register_log_routes(log_state).await;
    }

    /// Enregistre les routes de logs pour un état déjà initialisé
    pub async fn register_log_routes(&mut self, log_state: LogState) {
        self.add_handler_with_state("/log-dump", log_dump, log_state.clone())
            .await;
        self.add_router("/", logs::create_logs_router(log_state))
            .await;

        self.merge(swagger_ui("logs", logs::LogsApiDoc::openapi()).into())
            .await;
    }

    async fn mount(&mut self, path: &str, route: Router) {
        let path = path.trim_matches('/');
        if path.is_empty() {
            self.merge(route).await;
        } else {
            let mut current = self.routes.write().await;
            *current = std::mem::take(&mut *current).nest(&format!("/{}", path), route);
        }
    }

    async fn merge(&mut self, route: Router) {
        let mut current = self.routes.write().await;
        *current = std::mem::take(&mut *current).merge(route);
    }
}

fn swagger_ui(name: &str, openapi: utoipa::openapi::OpenApi) -> SwaggerUi {
    SwaggerUi::new(format!("/swagger-ui/{}", name)).url(format!("/api-docs/{}.json", name), openapi)
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C reçu, arrêt gracieux"),
        Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
    }
}

/// Construction d'un [`Server`] avec surcharge éventuelle du port
pub struct ServerBuilder(ServerInfo);

impl ServerBuilder {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        ServerBuilder(ServerInfo {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        })
    }

    pub fn new_configured() -> Self {
        ServerBuilder(ServerInfo::from_config())
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.0.http_port = port;
        self
    }

    pub fn build(self) -> Server {
        self.0.into()
    }
}
