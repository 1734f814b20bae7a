//! Response helpers. Success payloads are returned as-is, without an envelope.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusMessage {
    pub msg: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SumResponse {
    pub sum: i64,
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn message(msg: &str) -> (StatusCode, Json<StatusMessage>) {
    ok(StatusMessage { msg: msg.to_string() })
}
