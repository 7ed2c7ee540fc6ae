use super::{common::ApiResult, upload::UploadedTable};
use crate::{
    entities::{current_predict, predict},
    errors::ServiceError,
    import::{ImportReport, PredictPipeline},
    services::predictions::{DateRange, PredictionView},
    AppState,
};
use axum::extract::{Json, Path, State};

#[utoipa::path(
    get,
    path = "/predict/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Predictions dated within the month", body = [PredictionView]),
        (status = 400, description = "Not a calendar month", body = crate::errors::ErrorResponse)
    ),
    tag = "predict"
)]
pub async fn predictions_for_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Vec<PredictionView>> {
    let range = DateRange::month(year, month)?;
    Ok(Json(state.services.predictions.in_range(range).await?))
}

#[utoipa::path(
    get,
    path = "/predict/{year}/{month}/{day}",
    params(
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12"),
        ("day" = u32, Path, description = "Day of month")
    ),
    responses(
        (status = 200, description = "Predictions dated on the day", body = [PredictionView]),
        (status = 400, description = "Not a calendar date", body = crate::errors::ErrorResponse)
    ),
    tag = "predict"
)]
pub async fn predictions_for_day(
    State(state): State<AppState>,
    Path((year, month, day)): Path<(i32, u32, u32)>,
) -> ApiResult<Vec<PredictionView>> {
    let range = DateRange::day(year, month, day)?;
    Ok(Json(state.services.predictions.in_range(range).await?))
}

#[utoipa::path(
    get,
    path = "/predict/stack/{stack_id}/{year}/{month}",
    params(
        ("stack_id" = i32, Path, description = "Stack id"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "The stack's predictions within the month", body = [PredictionView]),
        (status = 400, description = "Not a calendar month", body = crate::errors::ErrorResponse)
    ),
    tag = "predict"
)]
pub async fn stack_predictions_for_month(
    State(state): State<AppState>,
    Path((stack_id, year, month)): Path<(i32, i32, u32)>,
) -> ApiResult<Vec<PredictionView>> {
    let range = DateRange::month(year, month)?;
    Ok(Json(
        state
            .services
            .predictions
            .for_stack_in_range(stack_id, range)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/predict/{stack_id}",
    params(("stack_id" = i32, Path, description = "Stack id")),
    responses((status = 200, description = "Every prediction stored for the stack", body = [predict::Model])),
    tag = "predict"
)]
pub async fn stack_predictions(
    State(state): State<AppState>,
    Path(stack_id): Path<i32>,
) -> ApiResult<Vec<predict::Model>> {
    Ok(Json(state.services.predictions.for_stack(stack_id).await?))
}

/// Stores a forecast export in one transaction.
#[utoipa::path(
    post,
    path = "/predict/upload-csv",
    request_body(content = String, content_type = "text/csv", description = "Forecast export"),
    responses(
        (status = 200, description = "All rows stored", body = super::common::UploadSummary),
        (status = 400, description = "Missing column, bad cell or unresolved name; nothing stored", body = crate::errors::ErrorResponse),
        (status = 500, description = "Unreadable table", body = crate::errors::ErrorResponse)
    ),
    tag = "predict"
)]
pub async fn upload_predictions(
    State(state): State<AppState>,
    UploadedTable(body): UploadedTable,
) -> Result<ImportReport, ServiceError> {
    Ok(state.services.importer.import(&PredictPipeline, &body).await?)
}

#[utoipa::path(
    get,
    path = "/current_predict/",
    responses((status = 200, description = "Current forecast snapshot", body = [current_predict::Model])),
    tag = "current_predict"
)]
pub async fn current_predictions(
    State(state): State<AppState>,
) -> ApiResult<Vec<current_predict::Model>> {
    Ok(Json(state.services.predictions.current().await?))
}

#[utoipa::path(
    get,
    path = "/current_predict/{stack_id}",
    params(("stack_id" = i32, Path, description = "Stack id")),
    responses((status = 200, description = "Current forecast for one stack", body = [current_predict::Model])),
    tag = "current_predict"
)]
pub async fn current_stack_predictions(
    State(state): State<AppState>,
    Path(stack_id): Path<i32>,
) -> ApiResult<Vec<current_predict::Model>> {
    Ok(Json(
        state
            .services
            .predictions
            .current_for_stack(stack_id)
            .await?,
    ))
}
