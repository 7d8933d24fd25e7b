//! API router — all routes nested under `/api`.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the consultation API router.
///
/// CORS is fully permissive — the browser UI is served from a separate
/// origin during development.
pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/cases",
            post(endpoints::cases::create).get(endpoints::cases::list),
        )
        .route("/cases/:id", get(endpoints::cases::detail))
        .route("/conversations", post(endpoints::conversations::create))
        .route("/conversations/:id", get(endpoints::conversations::detail))
        .route(
            "/conversations/case/:case_id",
            get(endpoints::conversations::by_case),
        )
        .route(
            "/conversations/:id/start",
            post(endpoints::conversations::start),
        )
        .route(
            "/conversations/:id/message",
            post(endpoints::conversations::message),
        )
        .with_state(ctx);

    Router::new().nest("/api", routes).layer(CorsLayer::permissive())
}
