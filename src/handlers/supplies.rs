use super::{
    common::{created_response, success_response, ApiResult},
    upload::UploadedTable,
};
use crate::{
    entities::supplies,
    errors::ServiceError,
    import::{ImportReport, SuppliesPipeline},
    services::supplies::{CreateSupplies, UpdateSupplies},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::Response,
};

#[utoipa::path(
    get,
    path = "/supplies/",
    responses((status = 200, description = "Supplies records, oldest first, capped at the configured list limit", body = [supplies::Model])),
    tag = "supplies"
)]
pub async fn list_supplies(State(state): State<AppState>) -> ApiResult<Vec<supplies::Model>> {
    Ok(Json(state.services.supplies.list().await?))
}

#[utoipa::path(
    get,
    path = "/supplies/{id}",
    params(("id" = i32, Path, description = "Supplies record id")),
    responses(
        (status = 200, description = "Supplies record", body = supplies::Model),
        (status = 404, description = "Unknown record", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn get_supplies(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<supplies::Model> {
    Ok(Json(state.services.supplies.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/supplies/",
    request_body = CreateSupplies,
    responses(
        (status = 201, description = "Record stored", body = super::common::TransactionStatus),
        (status = 400, description = "Unknown brand or stack", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn create_supplies(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplies>,
) -> Result<Response, ServiceError> {
    state.services.supplies.create(payload).await?;
    Ok(created_response())
}

#[utoipa::path(
    put,
    path = "/supplies/update/{id}",
    params(("id" = i32, Path, description = "Supplies record id")),
    request_body = UpdateSupplies,
    responses(
        (status = 200, description = "Record updated", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown record", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn update_supplies(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSupplies>,
) -> Result<Response, ServiceError> {
    state.services.supplies.update(id, payload).await?;
    Ok(success_response())
}

#[utoipa::path(
    delete,
    path = "/supplies/delete/{id}",
    params(("id" = i32, Path, description = "Supplies record id")),
    responses(
        (status = 200, description = "Record deleted", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown record", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn delete_supplies(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.supplies.delete(id).await?;
    Ok(success_response())
}

/// Stores every row of a supplies export or none of them.
#[utoipa::path(
    post,
    path = "/supplies/upload-csv",
    request_body(content = String, content_type = "text/csv", description = "Supplies export"),
    responses(
        (status = 200, description = "All rows stored", body = super::common::UploadSummary),
        (status = 400, description = "Missing column, bad cell or unresolved name; nothing stored", body = crate::errors::ErrorResponse),
        (status = 500, description = "Unreadable table", body = crate::errors::ErrorResponse)
    ),
    tag = "supplies"
)]
pub async fn upload_supplies(
    State(state): State<AppState>,
    UploadedTable(body): UploadedTable,
) -> Result<ImportReport, ServiceError> {
    Ok(state.services.importer.import(&SuppliesPipeline, &body).await?)
}
