use super::common::{created_response, success_response, validate_input, ApiResult};
use crate::{
    entities::warehouse,
    errors::ServiceError,
    services::warehouses::{CreateWarehouse, UpdateWarehouse},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::Response,
};

#[utoipa::path(
    get,
    path = "/warehouse/",
    responses((status = 200, description = "All warehouses", body = [warehouse::Model])),
    tag = "warehouse"
)]
pub async fn list_warehouses(State(state): State<AppState>) -> ApiResult<Vec<warehouse::Model>> {
    Ok(Json(state.services.warehouses.list().await?))
}

#[utoipa::path(
    get,
    path = "/warehouse/{id}",
    params(("id" = i32, Path, description = "Warehouse id")),
    responses(
        (status = 200, description = "Warehouse", body = warehouse::Model),
        (status = 404, description = "Unknown warehouse", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouse"
)]
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<warehouse::Model> {
    Ok(Json(state.services.warehouses.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/warehouse/",
    request_body = CreateWarehouse,
    responses((status = 201, description = "Warehouse created", body = super::common::TransactionStatus)),
    tag = "warehouse"
)]
pub async fn create_warehouse(
    State(state): State<AppState>,
    Json(payload): Json<CreateWarehouse>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.warehouses.create(payload).await?;
    Ok(created_response())
}

#[utoipa::path(
    put,
    path = "/warehouse/update/{id}",
    params(("id" = i32, Path, description = "Warehouse id")),
    request_body = UpdateWarehouse,
    responses(
        (status = 200, description = "Warehouse updated", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown warehouse", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouse"
)]
pub async fn update_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateWarehouse>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.warehouses.update(id, payload).await?;
    Ok(success_response())
}

/// Removes the warehouse together with its stacks and everything recorded against them.
#[utoipa::path(
    delete,
    path = "/warehouse/delete/{id}",
    params(("id" = i32, Path, description = "Warehouse id")),
    responses(
        (status = 200, description = "Warehouse deleted", body = super::common::TransactionStatus),
        (status = 404, description = "Unknown warehouse", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouse"
)]
pub async fn delete_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.warehouses.delete(id).await?;
    Ok(success_response())
}
