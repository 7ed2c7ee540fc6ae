use super::{
    common::{created_response, success_response, validate_input, ApiResult},
    upload::UploadedTable,
};
use crate::{
    entities::temperature,
    errors::ServiceError,
    import::{ImportReport, TemperaturePipeline},
    services::temperatures::{CreateTemperature, UpdateTemperature},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::Response,
};

#[utoipa::path(
    get,
    path = "/temperature/",
    responses((status = 200, description = "Temperature readings capped at the configured list limit", body = [temperature::Model])),
    tag = "temperature"
)]
pub async fn list_temperatures(State(state): State<AppState>) -> ApiResult<Vec<temperature::Model>> {
    Ok(Json(state.services.temperatures.list().await?))
}

#[utoipa::path(
    get,
    path = "/temperature/{id}",
    params(("id" = i32, Path, description = "Reading id")),
    responses(
        (status = 200, description = "Temperature reading", body = temperature::Model),
        (status = 404, description = "Unknown reading", body = crate::errors::ErrorResponse)
    ),
    tag = "temperature"
)]
pub async fn get_temperature(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<temperature::Model> {
    Ok(Json(state.services.temperatures.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/temperature/",
    request_body = CreateTemperature,
    responses(
        (status = 201, description = "Reading stored", body = super::common::TransactionStatus),
        (status = 400, description = "Unknown brand or stack", body = crate::errors::ErrorResponse)
    ),
    tag = "temperature"
)]
pub async fn create_temperature(
    State(state): State<AppState>,
    Json(payload): Json<CreateTemperature>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.temperatures.create(payload).await?;
    Ok(created_response())
}

#[utoipa::path(
    put,
    path = "/temperature/update/{id}",
    params(("id" = i32, Path, description = "Reading id")),
    request_body = UpdateTemperature,
    responses(
        (status = 200, description = "Reading updated", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown reading", body = crate::errors::ErrorResponse)
    ),
    tag = "temperature"
)]
pub async fn update_temperature(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTemperature>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.temperatures.update(id, payload).await?;
    Ok(success_response())
}

#[utoipa::path(
    delete,
    path = "/temperature/delete/{id}",
    params(("id" = i32, Path, description = "Reading id")),
    responses(
        (status = 200, description = "Reading deleted", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown reading", body = crate::errors::ErrorResponse)
    ),
    tag = "temperature"
)]
pub async fn delete_temperature(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.temperatures.delete(id).await?;
    Ok(success_response())
}

#[utoipa::path(
    post,
    path = "/temperature/upload-csv",
    request_body(content = String, content_type = "text/csv", description = "Temperature act export"),
    responses(
        (status = 200, description = "All rows stored", body = super::common::UploadSummary),
        (status = 400, description = "Missing column, bad cell or unresolved name; nothing stored", body = crate::errors::ErrorResponse),
        (status = 500, description = "Unreadable table", body = crate::errors::ErrorResponse)
    ),
    tag = "temperature"
)]
pub async fn upload_temperatures(
    State(state): State<AppState>,
    UploadedTable(body): UploadedTable,
) -> Result<ImportReport, ServiceError> {
    Ok(state.services.importer.import(&TemperaturePipeline, &body).await?)
}
