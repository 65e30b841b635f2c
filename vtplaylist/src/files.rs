//! Service des fichiers média (`GET <préfixe>/{fichier}`)

use crate::settings::PlaylistSettings;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::path::Path as FsPath;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::api::ErrorResponse;

/// Type MIME déduit de l'extension
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = FsPath::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("tiff") => "image/tiff",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg") => "video/ogg",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("wmv") => "video/x-ms-wmv",
        Some("flv") => "video/x-flv",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

/// Router à monter sous le préfixe média
pub fn create_media_file_router(settings: Arc<PlaylistSettings>) -> Router {
    Router::new()
        .route("/{*filename}", get(serve_media_file))
        .with_state(settings)
}

async fn serve_media_file(
    State(settings): State<Arc<PlaylistSettings>>,
    Path(filename): Path<String>,
) -> Response {
    let Some(path) = settings.media_path(&filename) else {
        warn!(file = %filename, "Attempted directory traversal");
        return status(StatusCode::FORBIDDEN, "FORBIDDEN", "Forbidden");
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(_) => return not_found(&path),
    };
    let len = match file.metadata().await {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => return not_found(&path),
    };

    debug!(file = %filename, bytes = len, "Serving media file");
    let body = Body::from_stream(ReaderStream::new(file));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        body,
    )
        .into_response()
}

fn not_found(path: &std::path::Path) -> Response {
    warn!(path = %path.display(), "Media file not found");
    status(StatusCode::NOT_FOUND, "NOT_FOUND", "Media file not found")
}

fn status(code: StatusCode, error: &str, message: &str) -> Response {
    (
        code,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_is_case_insensitive() {
        assert_eq!(content_type_for("A.JPG"), "image/jpeg");
        assert_eq!(content_type_for("clip.mp4"), "video/mp4");
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
    }
}
