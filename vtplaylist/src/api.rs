//! API REST du moteur de playlist.
//!
//! Les opérations du moteur font des E/S synchrones ; les handlers les
//! exécutent via `spawn_blocking`.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::current::{CurrentMedia, CurrentMediaService};
use crate::item::PlaylistDocument;
use crate::reconciler::Reconciler;
use crate::{Error, Result};

/// État partagé par les handlers `/api/media`
#[derive(Debug, Clone)]
pub struct MediaApiState {
    pub reconciler: Reconciler,
    pub current: CurrentMediaService,
}

impl MediaApiState {
    pub fn new(reconciler: Reconciler) -> Self {
        let settings = Arc::new(reconciler.settings().clone());
        Self {
            current: CurrentMediaService::new(settings),
            reconciler,
        }
    }
}

/// Router `/api/media` combinant les différents endpoints REST.
pub fn media_api_router(state: Arc<MediaApiState>) -> Router {
    Router::new()
        .route("/playlist", get(get_playlist).post(update_playlist))
        .route("/regenerate", get(regenerate_playlist).post(regenerate_playlist))
        .route("/current", get(get_current_media).post(update_current_media))
        .route("/upload", post(upload_media))
        .with_state(state)
}

/// Réponse générique de succès.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Réponse d'une régénération forcée.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegenerateResponse {
    pub status: String,
    pub message: String,
    pub playlist: PlaylistDocument,
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/media/playlist",
    tag = "media",
    responses(
        (status = 200, description = "Playlist réconciliée avec le répertoire média", body = PlaylistDocument)
    )
)]
pub async fn get_playlist(State(state): State<Arc<MediaApiState>>) -> Response {
    let fallback = PlaylistDocument::fallback(state.reconciler.settings().default_url());
    let playlist = match tokio::task::spawn_blocking(move || state.reconciler.get_playlist()).await
    {
        Ok(playlist) => playlist,
        Err(e) => {
            error!(error = %e, "Playlist task failed, serving fallback");
            fallback
        }
    };
    (StatusCode::OK, Json(playlist)).into_response()
}

#[utoipa::path(
    post,
    path = "/api/media/playlist",
    tag = "media",
    request_body = PlaylistDocument,
    responses(
        (status = 200, description = "Playlist remplacée", body = StatusResponse),
        (status = 400, description = "Playlist invalide", body = ErrorResponse),
        (status = 404, description = "Fichier média référencé absent", body = ErrorResponse),
        (status = 500, description = "Échec de sauvegarde", body = ErrorResponse)
    )
)]
pub async fn update_playlist(State(state): State<Arc<MediaApiState>>, body: Bytes) -> Response {
    let payload = match parse_body(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match blocking(move || state.reconciler.apply_update(&payload)).await {
        Ok(_) => (StatusCode::OK, Json(StatusResponse::success("Playlist updated."))).into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/media/regenerate",
    tag = "media",
    responses(
        (status = 200, description = "Playlist régénérée depuis le répertoire média", body = RegenerateResponse),
        (status = 500, description = "Échec de la régénération", body = ErrorResponse)
    )
)]
pub async fn regenerate_playlist(State(state): State<Arc<MediaApiState>>) -> Response {
    match blocking(move || state.reconciler.regenerate()).await {
        Ok(report) => (
            StatusCode::OK,
            Json(RegenerateResponse {
                status: "success".to_string(),
                message: report.message,
                playlist: report.playlist,
            }),
        )
            .into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/media/current",
    tag = "media",
    responses(
        (status = 200, description = "Média courant", body = CurrentMedia),
        (status = 500, description = "Lecture impossible", body = ErrorResponse)
    )
)]
pub async fn get_current_media(State(state): State<Arc<MediaApiState>>) -> Response {
    match blocking(move || state.current.get()).await {
        Ok(media) => (StatusCode::OK, Json(media)).into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/media/current",
    tag = "media",
    request_body = CurrentMedia,
    responses(
        (status = 200, description = "Média courant remplacé", body = StatusResponse),
        (status = 400, description = "URL invalide", body = ErrorResponse),
        (status = 404, description = "Fichier média absent", body = ErrorResponse)
    )
)]
pub async fn update_current_media(
    State(state): State<Arc<MediaApiState>>,
    body: Bytes,
) -> Response {
    let payload = match parse_body(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match blocking(move || state.current.apply_update(&payload)).await {
        Ok(_) => (
            StatusCode::OK,
            Json(StatusResponse::success("Current media updated.")),
        )
            .into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/media/upload",
    tag = "media",
    responses(
        (status = 501, description = "Non implémenté", body = ErrorResponse)
    )
)]
pub async fn upload_media() -> Response {
    warn!("Attempted media upload, but it is not implemented");
    map_status(
        StatusCode::NOT_IMPLEMENTED,
        "NOT_IMPLEMENTED",
        "Media upload is not implemented.",
    )
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Other(e.into()))?
}

fn parse_body(body: &Bytes) -> std::result::Result<Value, Response> {
    if body.is_empty() {
        return Err(map_status(
            StatusCode::BAD_REQUEST,
            "EMPTY_BODY",
            "Request body is empty.",
        ));
    }
    serde_json::from_slice(body).map_err(|_| {
        map_status(
            StatusCode::BAD_REQUEST,
            "INVALID_JSON",
            "Invalid JSON format.",
        )
    })
}

fn map_status<S: Into<String>>(status: StatusCode, error: &str, message: S) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

fn map_error(error: Error) -> Response {
    let (status, code) = match &error {
        Error::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
        Error::InvalidItem { .. } => (StatusCode::BAD_REQUEST, "INVALID_ITEM"),
        Error::ItemMediaNotFound { .. } | Error::MediaNotFound(_) => {
            (StatusCode::NOT_FOUND, "MEDIA_NOT_FOUND")
        }
        Error::Scan { .. } | Error::Store(_) | Error::Other(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    if error.is_rejection() {
        warn!(status = status.as_u16(), "Request rejected: {}", error);
    } else {
        error!(status = status.as_u16(), "Request failed: {}", error);
    }

    map_status(status, code, error.to_string())
}
