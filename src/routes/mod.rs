//! Router assembly.

mod common;
mod subscriptions;

pub use common::common_routes;
pub use subscriptions::subscription_routes;

use crate::openapi::ApiDoc;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Full application: common routes at the root, the API under `/api/v1`,
/// Swagger UI at `/api/v1/swagger/` backed by `/api/v1/openapi.json`.
pub fn build_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/v1", subscription_routes(state))
        .merge(SwaggerUi::new("/api/v1/swagger").url("/api/v1/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
