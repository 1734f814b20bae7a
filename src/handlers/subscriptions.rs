//! Subscription handlers: create, update, read, list, delete, sum.

use crate::error::{AppError, ErrorBody};
use crate::handlers::dto::{CreateSubscriptionRequest, SumQuery, UpdateSubscriptionRequest};
use crate::model::Subscription;
use crate::response::{self, StatusMessage, SumResponse};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::BadRequest("invalid id format".into()))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid request body: {}", e)))
}

#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = Subscription),
        (status = 400, description = "Malformed or incomplete body", body = ErrorBody),
        (status = 409, description = "Id already taken", body = ErrorBody),
        (status = 413, description = "Body over the size limit", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req: CreateSubscriptionRequest = parse_body(&body?)?;
    let input = req.into_new_subscription()?;
    let sub = state.subscriptions.create(input).await?;
    tracing::info!(id = %sub.id, "subscription created");
    Ok(response::created(sub))
}

#[utoipa::path(
    put,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id (UUID)")),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Updated record", body = Subscription),
        (status = 400, description = "Bad id, unknown key or invalid value", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody),
        (status = 413, description = "Body over the size limit", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let req: UpdateSubscriptionRequest = parse_body(&body?)?;
    let updates = req.into_updates()?;
    let sub = state.subscriptions.update_fields(id, updates).await?;
    tracing::info!(%id, "subscription updated");
    Ok(response::ok(sub))
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id (UUID)")),
    responses(
        (status = 200, description = "Subscription", body = Subscription),
        (status = 400, description = "Bad id", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody)
    )
)]
pub async fn read(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let sub = state.subscriptions.get_by_id(id).await?;
    Ok(response::ok(sub))
}

#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscriptions",
    responses(
        (status = 200, description = "All subscriptions", body = [Subscription]),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let subs = state.subscriptions.get_all().await?;
    Ok(response::ok(subs))
}

#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription id (UUID)")),
    responses(
        (status = 200, description = "Deleted", body = StatusMessage),
        (status = 400, description = "Bad id", body = ErrorBody),
        (status = 404, description = "No such subscription", body = ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.subscriptions.delete(id).await?;
    tracing::info!(%id, "subscription deleted");
    Ok(response::message("subscription deleted"))
}

/// Filters are optional and lenient: unparseable values are ignored rather than rejected.
/// A repeated key keeps its first value.
#[utoipa::path(
    get,
    path = "/subscriptions/sum",
    tag = "subscriptions",
    params(SumQuery),
    responses(
        (status = 200, description = "Sum of matching prices", body = SumResponse),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn sum(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let q = SumQuery::from_pairs(pairs);
    let sum = state
        .subscriptions
        .sum_prices(
            q.start_date.as_deref().unwrap_or(""),
            q.end_date.as_deref().unwrap_or(""),
            q.name.as_deref().unwrap_or(""),
            q.users_ids.as_deref().unwrap_or(""),
        )
        .await?;
    Ok(response::ok(SumResponse { sum }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "invalid id format"));
        assert!(parse_id(&Uuid::new_v4().to_string()).is_ok());
    }

    #[test]
    fn parse_body_maps_syntax_errors_to_bad_request() {
        let err = parse_body::<UpdateSubscriptionRequest>(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = parse_body::<UpdateSubscriptionRequest>(b"[1, 2]").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
