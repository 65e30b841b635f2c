//! Documentation OpenAPI pour l'emploi du temps.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API emploi du temps.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::get_schedule,
        crate::api::update_schedule,
    ),
    components(
        schemas(
            crate::schedule::Schedule,
            crate::schedule::ScheduleBlock,
            crate::api::StatusResponse,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "schedule", description = "Emploi du temps affiché par les écrans")
    ),
    info(
        title = "VideoTimeline Schedule API",
        version = "0.1.0",
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
