pub mod brands;
pub mod common;
pub mod health;
pub mod locations;
pub mod predictions;
pub mod stacks;
pub mod supplies;
pub mod temperatures;
pub mod upload;
pub mod warehouses;

use crate::{
    config::AppConfig,
    db::DbPool,
    errors::ServiceError,
    import::BatchImporter,
    services::{
        brands::BrandService, locations::LocationService, predictions::PredictionService,
        stacks::StackService, supplies::SuppliesService, temperatures::TemperatureService,
        warehouses::WarehouseService, weather::WeatherClient,
    },
    AppState,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub brands: BrandService,
    pub warehouses: WarehouseService,
    pub stacks: StackService,
    pub supplies: SuppliesService,
    pub temperatures: TemperatureService,
    pub predictions: PredictionService,
    pub locations: LocationService,
    pub weather: WeatherClient,
    pub importer: BatchImporter,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            brands: BrandService::new(db_pool.clone()),
            warehouses: WarehouseService::new(db_pool.clone()),
            stacks: StackService::new(db_pool.clone()),
            supplies: SuppliesService::new(db_pool.clone(), config.list_limit),
            temperatures: TemperatureService::new(db_pool.clone(), config.list_limit),
            predictions: PredictionService::new(db_pool.clone()),
            locations: LocationService::new(db_pool.clone()),
            weather: WeatherClient::new(config.weather_base_url.clone(), config.weather_timeout())?,
            importer: BatchImporter::new(db_pool, config.import_chunk_size),
        })
    }
}

// Routes carry their full paths. Collection roots keep the trailing slash
// clients already use (`/brand/`), which a nested "/" route would not match.

pub fn brand_routes() -> Router<AppState> {
    Router::new()
        .route("/brand/", get(brands::list_brands).post(brands::create_brand))
        .route("/brand/:id", get(brands::get_brand))
        .route("/brand/update/:id", put(brands::update_brand))
        .route("/brand/delete/:id", delete(brands::delete_brand))
        .route("/brand/upload", post(brands::upload_brands))
}

pub fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/warehouse/",
            get(warehouses::list_warehouses).post(warehouses::create_warehouse),
        )
        .route("/warehouse/:id", get(warehouses::get_warehouse))
        .route("/warehouse/update/:id", put(warehouses::update_warehouse))
        .route("/warehouse/delete/:id", delete(warehouses::delete_warehouse))
}

pub fn stack_routes() -> Router<AppState> {
    Router::new()
        .route("/stack/", get(stacks::list_stacks).post(stacks::create_stack))
        .route(
            "/stack/:id",
            get(stacks::get_stack)
                .put(stacks::update_stack)
                .delete(stacks::delete_stack),
        )
        .route("/stack/upload", post(stacks::upload_stacks))
}

pub fn supplies_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/supplies/",
            get(supplies::list_supplies).post(supplies::create_supplies),
        )
        .route("/supplies/:id", get(supplies::get_supplies))
        .route("/supplies/update/:id", put(supplies::update_supplies))
        .route("/supplies/delete/:id", delete(supplies::delete_supplies))
        .route("/supplies/upload-csv", post(supplies::upload_supplies))
}

pub fn temperature_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/temperature/",
            get(temperatures::list_temperatures).post(temperatures::create_temperature),
        )
        .route("/temperature/:id", get(temperatures::get_temperature))
        .route("/temperature/update/:id", put(temperatures::update_temperature))
        .route("/temperature/delete/:id", delete(temperatures::delete_temperature))
        .route("/temperature/upload-csv", post(temperatures::upload_temperatures))
}

pub fn predict_routes() -> Router<AppState> {
    // One parameter name per segment: the stack id route shares `:year`
    Router::new()
        .route("/predict/upload-csv", post(predictions::upload_predictions))
        .route("/predict/:year", get(predictions::stack_predictions))
        .route("/predict/:year/:month", get(predictions::predictions_for_month))
        .route(
            "/predict/:year/:month/:day",
            get(predictions::predictions_for_day),
        )
        .route(
            "/predict/stack/:stack_id/:year/:month",
            get(predictions::stack_predictions_for_month),
        )
        .route("/current_predict/", get(predictions::current_predictions))
        .route(
            "/current_predict/:stack_id",
            get(predictions::current_stack_predictions),
        )
}

pub fn location_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/location/",
            get(locations::get_location).post(locations::set_location),
        )
        .route("/weather", get(locations::weather))
}
