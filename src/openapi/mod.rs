use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coalyard API",
        version = "0.1.0",
        description = r#"
# Coal storage tracking

Reference data (brands, warehouses, stacks), supplies and temperature
records, and combustion-risk predictions for coal stacks.

## Uploads

CSV exports are posted either as `multipart/form-data` (field `file`) or as
the raw request body.

- Supplies, temperature and forecast uploads store every row or none. A row
  naming an unknown brand, warehouse or stack rejects the whole file.
- Brand and stack lists are applied row by row. Names already on file and
  stacks in unknown warehouses are skipped.

## Errors

```json
{
  "error": "Bad Request",
  "message": "stack '5' in warehouse 'W9' not found",
  "details": "row 2",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#
    ),
    tags(
        (name = "brand", description = "Coal brands"),
        (name = "warehouse", description = "Storage warehouses"),
        (name = "stack", description = "Stacks within warehouses"),
        (name = "supplies", description = "Deliveries to and shipments from stacks"),
        (name = "temperature", description = "Stack temperature acts"),
        (name = "predict", description = "Forecast weights"),
        (name = "current_predict", description = "Current forecast snapshot"),
        (name = "location", description = "Site coordinates"),
        (name = "weather", description = "Hourly weather at the site"),
        (name = "health", description = "Liveness")
    ),
    paths(
        crate::handlers::brands::list_brands,
        crate::handlers::brands::get_brand,
        crate::handlers::brands::create_brand,
        crate::handlers::brands::update_brand,
        crate::handlers::brands::delete_brand,
        crate::handlers::brands::upload_brands,

        crate::handlers::warehouses::list_warehouses,
        crate::handlers::warehouses::get_warehouse,
        crate::handlers::warehouses::create_warehouse,
        crate::handlers::warehouses::update_warehouse,
        crate::handlers::warehouses::delete_warehouse,

        crate::handlers::stacks::list_stacks,
        crate::handlers::stacks::get_stack,
        crate::handlers::stacks::create_stack,
        crate::handlers::stacks::update_stack,
        crate::handlers::stacks::delete_stack,
        crate::handlers::stacks::upload_stacks,

        crate::handlers::supplies::list_supplies,
        crate::handlers::supplies::get_supplies,
        crate::handlers::supplies::create_supplies,
        crate::handlers::supplies::update_supplies,
        crate::handlers::supplies::delete_supplies,
        crate::handlers::supplies::upload_supplies,

        crate::handlers::temperatures::list_temperatures,
        crate::handlers::temperatures::get_temperature,
        crate::handlers::temperatures::create_temperature,
        crate::handlers::temperatures::update_temperature,
        crate::handlers::temperatures::delete_temperature,
        crate::handlers::temperatures::upload_temperatures,

        crate::handlers::predictions::predictions_for_month,
        crate::handlers::predictions::predictions_for_day,
        crate::handlers::predictions::stack_predictions_for_month,
        crate::handlers::predictions::stack_predictions,
        crate::handlers::predictions::upload_predictions,
        crate::handlers::predictions::current_predictions,
        crate::handlers::predictions::current_stack_predictions,

        crate::handlers::locations::set_location,
        crate::handlers::locations::get_location,
        crate::handlers::locations::weather,

        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            crate::entities::brand::Model,
            crate::entities::warehouse::Model,
            crate::entities::supplies::Model,
            crate::entities::temperature::Model,
            crate::entities::predict::Model,
            crate::entities::current_predict::Model,
            crate::entities::location::Model,

            crate::services::brands::BrandInput,
            crate::services::warehouses::CreateWarehouse,
            crate::services::warehouses::UpdateWarehouse,
            crate::services::stacks::StackInput,
            crate::services::stacks::StackView,
            crate::services::supplies::CreateSupplies,
            crate::services::supplies::UpdateSupplies,
            crate::services::temperatures::CreateTemperature,
            crate::services::temperatures::UpdateTemperature,
            crate::services::predictions::PredictionView,
            crate::services::locations::LocationInput,
            crate::services::weather::HourlyWeather,

            crate::handlers::common::TransactionStatus,
            crate::handlers::common::UploadSummary,
            crate::handlers::health::HealthStatus,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
