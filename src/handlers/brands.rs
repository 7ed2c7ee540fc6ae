use super::{
    common::{created_response, success_response, validate_input, ApiResult},
    upload::UploadedTable,
};
use crate::{
    entities::brand,
    errors::ServiceError,
    import::{BrandListPipeline, ImportReport},
    services::brands::BrandInput,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::Response,
};

#[utoipa::path(
    get,
    path = "/brand/",
    responses((status = 200, description = "All brands", body = [brand::Model])),
    tag = "brand"
)]
pub async fn list_brands(State(state): State<AppState>) -> ApiResult<Vec<brand::Model>> {
    Ok(Json(state.services.brands.list().await?))
}

#[utoipa::path(
    get,
    path = "/brand/{id}",
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand", body = brand::Model),
        (status = 404, description = "Unknown brand", body = crate::errors::ErrorResponse)
    ),
    tag = "brand"
)]
pub async fn get_brand(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<brand::Model> {
    Ok(Json(state.services.brands.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/brand/",
    request_body = BrandInput,
    responses(
        (status = 201, description = "Brand created", body = super::common::TransactionStatus),
        (status = 409, description = "Brand name already on file", body = crate::errors::ErrorResponse)
    ),
    tag = "brand"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    Json(payload): Json<BrandInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.brands.create(payload).await?;
    Ok(created_response())
}

#[utoipa::path(
    put,
    path = "/brand/update/{id}",
    params(("id" = i32, Path, description = "Brand id")),
    request_body = BrandInput,
    responses(
        (status = 200, description = "Brand renamed", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown brand", body = crate::errors::ErrorResponse)
    ),
    tag = "brand"
)]
pub async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BrandInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.brands.update(id, payload).await?;
    Ok(success_response())
}

#[utoipa::path(
    delete,
    path = "/brand/delete/{id}",
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand and its records deleted", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown brand", body = crate::errors::ErrorResponse)
    ),
    tag = "brand"
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.brands.delete(id).await?;
    Ok(success_response())
}

/// Adds every brand in the list that is not on file yet.
#[utoipa::path(
    post,
    path = "/brand/upload",
    request_body(content = String, content_type = "text/csv", description = "CSV with a `brand` column"),
    responses(
        (status = 201, description = "Brand list applied", body = super::common::TransactionStatus),
        (status = 400, description = "Missing `brand` column", body = crate::errors::ErrorResponse)
    ),
    tag = "brand"
)]
pub async fn upload_brands(
    State(state): State<AppState>,
    UploadedTable(body): UploadedTable,
) -> Result<ImportReport, ServiceError> {
    Ok(state.services.importer.import(&BrandListPipeline, &body).await?)
}
