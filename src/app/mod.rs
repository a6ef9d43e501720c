use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{handlers::rest, service::NoteService};

/// Builds the full HTTP surface: the notes API under `/api`, the OpenAPI
/// document with Swagger UI, and a plain-text root greeting.
pub fn router(service: Arc<NoteService>, cors_origins: &[String]) -> Router {
    let api_router = Router::new()
        .route(
            "/notes",
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route(
            "/notes/{id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .with_state(service)
        .layer(cors_layer(cors_origins));

    Router::new()
        .route("/", get(root))
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

async fn root() -> Response {
    (StatusCode::OK, "Notes API is up").into_response()
}
