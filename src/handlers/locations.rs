use super::common::{created_response, validate_input, ApiResult};
use crate::{
    entities::location,
    errors::ServiceError,
    services::{locations::LocationInput, weather::HourlyWeather},
    AppState,
};
use axum::{
    extract::{Json, Query, State},
    response::Response,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeatherQuery {
    /// First day, `YYYY-MM-DD`
    pub start_date: NaiveDate,
    /// Last day, inclusive
    pub end_date: NaiveDate,
}

#[utoipa::path(
    post,
    path = "/location/",
    request_body = LocationInput,
    responses(
        (status = 201, description = "Location replaced", body = super::common::TransactionStatus),
        (status = 400, description = "Coordinates out of range", body = crate::errors::ErrorResponse)
    ),
    tag = "location"
)]
pub async fn set_location(
    State(state): State<AppState>,
    Json(payload): Json<LocationInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    state.services.locations.set(payload).await?;
    Ok(created_response())
}

#[utoipa::path(
    get,
    path = "/location/",
    responses((status = 200, description = "Stored location, or null", body = location::Model)),
    tag = "location"
)]
pub async fn get_location(State(state): State<AppState>) -> ApiResult<Option<location::Model>> {
    Ok(Json(state.services.locations.get().await?))
}

/// Hourly weather at the stored location.
#[utoipa::path(
    get,
    path = "/weather",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Hourly records in time order", body = [HourlyWeather]),
        (status = 400, description = "No location stored or reversed range", body = crate::errors::ErrorResponse),
        (status = 502, description = "Weather service failed", body = crate::errors::ErrorResponse)
    ),
    tag = "weather"
)]
pub async fn weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> ApiResult<Vec<HourlyWeather>> {
    let site = state
        .services
        .locations
        .get()
        .await?
        .ok_or_else(|| ServiceError::BadRequest("no location on file".to_string()))?;
    let hours = state
        .services
        .weather
        .hourly(site.latitude, site.longitude, query.start_date, query.end_date)
        .await?;
    Ok(Json(hours))
}
