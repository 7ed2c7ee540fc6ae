use crate::errors::ServiceError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{instrument, warn};
use utoipa::ToSchema;

/// Hourly variables requested from the forecast API, in response order.
pub const HOURLY_VARIABLES: [&str; 10] = [
    "temperature_2m",
    "surface_pressure",
    "precipitation",
    "relative_humidity_2m",
    "wind_direction_10m",
    "wind_speed_10m",
    "wind_gusts_10m",
    "cloud_cover",
    "visibility",
    "weather_code",
];

/// One hour of weather at the stored site.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyWeather {
    pub time: String,
    pub temperature_2m: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub precipitation: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub wind_gusts_10m: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub visibility: Option<f64>,
    pub weather_code: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlySeries,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HourlySeries {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    surface_pressure: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    wind_direction_10m: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_gusts_10m: Vec<Option<f64>>,
    cloud_cover: Vec<Option<f64>>,
    visibility: Vec<Option<f64>>,
    weather_code: Vec<Option<f64>>,
}

impl HourlySeries {
    fn into_hours(self) -> Vec<HourlyWeather> {
        let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();
        self.time
            .iter()
            .enumerate()
            .map(|(i, time)| HourlyWeather {
                time: time.clone(),
                temperature_2m: at(&self.temperature_2m, i),
                surface_pressure: at(&self.surface_pressure, i),
                precipitation: at(&self.precipitation, i),
                relative_humidity_2m: at(&self.relative_humidity_2m, i),
                wind_direction_10m: at(&self.wind_direction_10m, i),
                wind_speed_10m: at(&self.wind_speed_10m, i),
                wind_gusts_10m: at(&self.wind_gusts_10m, i),
                cloud_cover: at(&self.cloud_cover, i),
                visibility: at(&self.visibility, i),
                weather_code: at(&self.weather_code, i),
            })
            .collect()
    }
}

/// Client for the Open-Meteo forecast endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InternalError(format!("weather client: {e}")))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn hourly(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<HourlyWeather>, ServiceError> {
        if end_date < start_date {
            return Err(ServiceError::BadRequest(format!(
                "end_date {end_date} is before start_date {start_date}"
            )));
        }

        let url = format!("{}/v1/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", HOURLY_VARIABLES.join(",")),
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                warn!(error = %e, "weather request failed");
                ServiceError::ExternalServiceError(format!("weather service: {e}"))
            })?;

        let forecast: ForecastResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "weather response unreadable");
            ServiceError::ExternalServiceError(format!("weather service: {e}"))
        })?;
        metrics::counter!("coalyard_weather.requests", 1);
        Ok(forecast.hourly.into_hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client(server: &MockServer) -> WeatherClient {
        WeatherClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn zips_hourly_series_into_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("start_date", "2024-03-01"))
            .and(query_param("end_date", "2024-03-01"))
            .and(query_param("hourly", HOURLY_VARIABLES.join(",").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 43.1,
                "longitude": 131.9,
                "hourly": {
                    "time": ["2024-03-01T00:00", "2024-03-01T01:00"],
                    "temperature_2m": [-3.5, null],
                    "weather_code": [3, 71]
                }
            })))
            .mount(&server)
            .await;

        let hours = client(&server)
            .hourly(43.1, 131.9, date(2024, 3, 1), date(2024, 3, 1))
            .await
            .unwrap();

        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].time, "2024-03-01T00:00");
        assert_eq!(hours[0].temperature_2m, Some(-3.5));
        assert_eq!(hours[1].temperature_2m, None);
        assert_eq!(hours[1].weather_code, Some(71.0));
        assert_eq!(hours[1].visibility, None);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server)
            .hourly(0.0, 0.0, date(2024, 3, 1), date(2024, 3, 2))
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::ExternalServiceError(_));
    }

    #[tokio::test]
    async fn reversed_range_never_reaches_upstream() {
        let server = MockServer::start().await;
        let err = client(&server)
            .hourly(0.0, 0.0, date(2024, 3, 2), date(2024, 3, 1))
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::BadRequest(_));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
