//! Documentation OpenAPI pour les endpoints média.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API média (playlist et média courant).
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::get_playlist,
        crate::api::update_playlist,
        crate::api::regenerate_playlist,
        crate::api::get_current_media,
        crate::api::update_current_media,
        crate::api::upload_media,
    ),
    components(
        schemas(
            crate::item::MediaKind,
            crate::item::PlaylistItem,
            crate::item::PlaylistDocument,
            crate::current::CurrentMedia,
            crate::api::StatusResponse,
            crate::api::RegenerateResponse,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "media", description = "Playlist d'affichage et média courant")
    ),
    info(
        title = "VideoTimeline Media API",
        version = "0.1.0",
        description = r#"
# Playlist d'affichage

La playlist est une vue du répertoire média, réparée à chaque lecture :
- les éléments dont le fichier a disparu sont retirés
- si plus aucun élément n'est valide, la playlist est régénérée

Chaque élément a la forme `{"type", "url", "duration", "muted"}` ;
`duration` vaut `-1` pour une vidéo lue jusqu'à sa fin.
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
