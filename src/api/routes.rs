//! HTTP API route definitions.

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{get_flags, health, root, stream_flags, AppState};

/// Create the API router.
///
/// Every route, the stream included, answers with
/// `Access-Control-Allow-Origin: *` and
/// `Access-Control-Allow-Headers: Content-Type`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/flags", get(get_flags))
        .route("/api/flags/stream", get(stream_flags))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // preflight-only by default; the contract wants it on every response
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}
