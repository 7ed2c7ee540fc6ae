use super::{
    common::{created_response, success_response, validate_input, ApiResult},
    upload::UploadedTable,
};
use crate::{
    errors::ServiceError,
    import::{ImportReport, StackListPipeline},
    services::stacks::{StackInput, StackView},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::Response,
};

#[utoipa::path(
    get,
    path = "/stack/",
    responses((status = 200, description = "All stacks with their warehouse names", body = [StackView])),
    tag = "stack"
)]
pub async fn list_stacks(State(state): State<AppState>) -> ApiResult<Vec<StackView>> {
    Ok(Json(state.services.stacks.list().await?))
}

#[utoipa::path(
    get,
    path = "/stack/{id}",
    params(("id" = i32, Path, description = "Stack id")),
    responses(
        (status = 200, description = "Stack", body = StackView),
        (status = 404, description = "Unknown stack", body = crate::errors::ErrorResponse)
    ),
    tag = "stack"
)]
pub async fn get_stack(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<StackView> {
    Ok(Json(state.services.stacks.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/stack/",
    request_body = StackInput,
    responses(
        (status = 201, description = "Stack created", body = super::common::TransactionStatus),
        (status = 400, description = "Warehouse not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stack"
)]
pub async fn create_stack(
    State(state): State<AppState>,
    Json(payload): Json<StackInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.stacks.create(payload).await?;
    Ok(created_response())
}

#[utoipa::path(
    put,
    path = "/stack/{id}",
    params(("id" = i32, Path, description = "Stack id")),
    request_body = StackInput,
    responses(
        (status = 200, description = "Stack updated", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown stack", body = crate::errors::ErrorResponse)
    ),
    tag = "stack"
)]
pub async fn update_stack(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<StackInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.stacks.update(id, payload).await?;
    Ok(success_response())
}

#[utoipa::path(
    delete,
    path = "/stack/{id}",
    params(("id" = i32, Path, description = "Stack id")),
    responses(
        (status = 200, description = "Stack deleted", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown stack", body = crate::errors::ErrorResponse)
    ),
    tag = "stack"
)]
pub async fn delete_stack(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.stacks.delete(id).await?;
    Ok(success_response())
}

/// Adds stacks by warehouse name. Rows naming an unknown warehouse are dropped.
#[utoipa::path(
    post,
    path = "/stack/upload",
    request_body(content = String, content_type = "text/csv", description = "CSV with `stack` and `warehouse_name` columns"),
    responses(
        (status = 201, description = "Stack list applied", body = super::common::TransactionStatus),
        (status = 400, description = "Missing columns", body = crate::errors::ErrorResponse)
    ),
    tag = "stack"
)]
pub async fn upload_stacks(
    State(state): State<AppState>,
    UploadedTable(body): UploadedTable,
) -> Result<ImportReport, ServiceError> {
    Ok(state.services.importer.import(&StackListPipeline, &body).await?)
}
