//! Subscription CRUD and sum routes.

use crate::handlers::subscriptions::{create, delete as delete_handler, list, read, sum, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn subscription_routes(state: AppState) -> Router {
    Router::new()
        .route("/subscriptions", get(list).post(create))
        .route("/subscriptions/sum", get(sum))
        .route(
            "/subscriptions/:id",
            get(read).put(update).delete(delete_handler),
        )
        .with_state(state)
}
