//! # vtserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour exposer les API du
//! serveur d'affichage VideoTimeline.
//!
//! ## Fonctionnalités
//!
//! - **API de haut niveau** : routes, handlers avec état, sous-routers
//! - **Documentation OpenAPI** : Swagger UI par API avec `add_openapi()`
//! - **Logs en mémoire** : buffer circulaire consultable via `/log-dump`,
//!   niveau modifiable à chaud via `/api/log_setup`
//! - **Arrêt gracieux** : gestion propre de Ctrl+C
//!
//! ## Architecture
//!
//! - [`server`] : serveur principal et builder
//! - [`logs`] : initialisation du tracing et API de logs
//!
//! Les autres crates (`vtplaylist`, `vtschedule`) étendent [`Server`] par des
//! traits d'extension sans que `vtserver` les connaisse.
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use vtserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("MyServer", "localhost", 8080).build();
//!
//!     server.add_route("/info", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{init_logging, log_dump, LogState, LoggingOptions};
pub use server::{Server, ServerBuilder, ServerInfo};
