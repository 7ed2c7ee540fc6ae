//! CSV ingestion for coal-yard records.
//!
//! An upload flows through four stages:
//!
//! 1. [`Table`] parses the body into a header row and data rows.
//! 2. A [`NormalizationProfile`] renames spreadsheet headers to canonical
//!    columns and checks the required ones are present.
//! 3. A [`RowPipeline`] coerces each row and, with the [`IdentityResolver`],
//!    turns brand, warehouse and stack names into ids.
//! 4. [`BatchImporter`] stores the rows under the pipeline's [`ImportPolicy`].
//!
//! Measurement uploads (supplies, temperature, predictions) are all-or-nothing.
//! Reference lists (brands, stacks) are applied row by row and skip duplicates.

mod error;
mod importer;
mod normalize;
mod pipelines;
mod resolver;
mod table;

pub use error::{ImportError, UnresolvedReference};
pub use importer::{BatchImporter, ImportPolicy, ImportReport, RowPipeline, RowTally};
pub use normalize::{
    parse_date, NormalizationProfile, NormalizedTable, RowView, BRAND_LIST_PROFILE,
    PREDICT_PROFILE, STACK_LIST_PROFILE, SUPPLIES_PROFILE, TEMPERATURE_PROFILE,
};
pub use pipelines::{
    BrandListPipeline, PredictPipeline, StackListPipeline, SuppliesPipeline, TemperaturePipeline,
};
pub use resolver::IdentityResolver;
pub use table::Table;
