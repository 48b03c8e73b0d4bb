use axum::{extract::{rejection::JsonRejection, State}, Json};
use serde::Serialize;
use serde_json::Value;

use service::data::domain::Document;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

const READ_FAILED: &str = "Error reading data";
const UPDATE_FAILED: &str = "Error updating data";
const REPLACE_FAILED: &str = "Error replacing data";

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: &'static str,
    pub data: Document,
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, JsonApiError> {
    body.map(|Json(v)| v)
        .map_err(|rej| JsonApiError::bad_request(format!("Invalid JSON body: {}", rej.body_text())))
}

/// Return the stored document as-is
#[utoipa::path(get, path = "/data", tag = "data", responses(
    (status = 200, description = "Full document", body = crate::openapi::DocumentDoc),
    (status = 500, description = "Storage failure", body = crate::openapi::ErrorBody),
))]
pub async fn get_data(State(state): State<ServerState>) -> Result<Json<Document>, JsonApiError> {
    state
        .data
        .read()
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, READ_FAILED))
}

/// Add or edit one user (has `birthdate`) or part (has `userId`), matched by `id`
#[utoipa::path(post, path = "/data", tag = "data", request_body = crate::openapi::RecordDoc, responses(
    (status = 200, description = "Upserted; full document returned", body = crate::openapi::MutationResponseDoc),
    (status = 400, description = "Neither birthdate nor userId present", body = crate::openapi::ErrorBody),
    (status = 500, description = "Storage failure", body = crate::openapi::ErrorBody),
))]
pub async fn post_data(
    State(state): State<ServerState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MutationResponse>, JsonApiError> {
    let body = json_body(body)?;
    let res = state
        .data
        .upsert(body)
        .await
        .map_err(|e| JsonApiError::from_service(e, UPDATE_FAILED))?;
    Ok(Json(MutationResponse { message: "Data updated successfully", data: res.document }))
}

/// Replace the whole document
#[utoipa::path(put, path = "/data", tag = "data", request_body = crate::openapi::DocumentDoc, responses(
    (status = 200, description = "Replaced; submitted document returned", body = crate::openapi::MutationResponseDoc),
    (status = 400, description = "users/parts missing or not arrays", body = crate::openapi::ErrorBody),
    (status = 500, description = "Storage failure", body = crate::openapi::ErrorBody),
))]
pub async fn put_data(
    State(state): State<ServerState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MutationResponse>, JsonApiError> {
    let body = json_body(body)?;
    let document = state
        .data
        .replace(body)
        .await
        .map_err(|e| JsonApiError::from_service(e, REPLACE_FAILED))?;
    Ok(Json(MutationResponse { message: "Data replaced successfully", data: document }))
}
