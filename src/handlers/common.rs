use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

/// JSON result type shared by the read endpoints.
pub type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Acknowledgement body for writes that do not echo the record.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({"status_code": 201, "transaction": "Successful"}))]
pub struct TransactionStatus {
    pub status_code: u16,
    pub transaction: &'static str,
}

/// Body of a committed all-or-nothing upload.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({"status": "ok", "inserted": 42}))]
pub struct UploadSummary {
    pub status: &'static str,
    pub inserted: usize,
}

/// Standard acknowledgement response
pub fn transaction_response(status: StatusCode) -> Response {
    (
        status,
        Json(TransactionStatus {
            status_code: status.as_u16(),
            transaction: "Successful",
        }),
    )
        .into_response()
}

pub fn created_response() -> Response {
    transaction_response(StatusCode::CREATED)
}

pub fn success_response() -> Response {
    transaction_response(StatusCode::OK)
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input.validate().map_err(ServiceError::from)
}
