//! API REST de l'emploi du temps.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::schedule::Schedule;
use crate::service::ScheduleService;
use crate::{Error, Result};

/// Router `/api/schedule`
pub fn schedule_api_router(service: Arc<ScheduleService>) -> Router {
    Router::new()
        .route("/", get(get_schedule).post(update_schedule))
        .with_state(service)
}

/// Réponse générique de succès.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/schedule",
    tag = "schedule",
    responses(
        (status = 200, description = "Emploi du temps courant", body = Schedule),
        (status = 500, description = "Lecture impossible", body = ErrorResponse)
    )
)]
pub async fn get_schedule(State(service): State<Arc<ScheduleService>>) -> Response {
    match blocking(move || service.get()).await {
        Ok(schedule) => (StatusCode::OK, Json(schedule)).into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/schedule",
    tag = "schedule",
    request_body = Schedule,
    responses(
        (status = 200, description = "Emploi du temps remplacé", body = StatusResponse),
        (status = 400, description = "Emploi du temps invalide", body = ErrorResponse),
        (status = 500, description = "Échec de sauvegarde", body = ErrorResponse)
    )
)]
pub async fn update_schedule(State(service): State<Arc<ScheduleService>>, body: Bytes) -> Response {
    if body.is_empty() {
        return map_status(StatusCode::BAD_REQUEST, "EMPTY_BODY", "Request body is empty.");
    }
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(_) => {
            return map_status(StatusCode::BAD_REQUEST, "INVALID_JSON", "Invalid JSON format.")
        }
    };

    match blocking(move || service.apply_update(&payload)).await {
        Ok(_) => (
            StatusCode::OK,
            Json(StatusResponse {
                status: "success".to_string(),
                message: "Schedule updated.".to_string(),
            }),
        )
            .into_response(),
        Err(err) => map_error(err),
    }
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
    match &error {
        Error::InvalidSchedule(_) => {
            warn!("Schedule rejected: {}", error);
            map_status(StatusCode::BAD_REQUEST, "INVALID_SCHEDULE", error.to_string())
        }
        Error::Store(_) | Error::Other(_) => {
            error!("Schedule request failed: {}", error);
            map_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                error.to_string(),
            )
        }
    }
}
