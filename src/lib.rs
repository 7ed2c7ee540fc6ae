//! Coalyard API Library
//!
//! Storage tracking for coal yards: reference data, supplies and temperature
//! records, forecast weights, and CSV ingestion for all of them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod import;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Result<Self, errors::ServiceError> {
        let services = handlers::AppServices::new(db.clone(), &config)?;
        Ok(Self {
            db,
            config,
            services,
        })
    }
}

/// Every route the service exposes, with request ids, tracing and the
/// upload size limit applied. CORS and compression are left to the binary.
pub fn app_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::<AppState>::new()
        .route("/health", get(handlers::health::health_check))
        .merge(handlers::brand_routes())
        .merge(handlers::warehouse_routes())
        .merge(handlers::stack_routes())
        .merge(handlers::supplies_routes())
        .merge(handlers::temperature_routes())
        .merge(handlers::predict_routes())
        .merge(handlers::location_routes())
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http().make_span_with(middleware_helpers::request_id::RequestSpanMaker))
        // Outermost, so the trace span and handlers see the id
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
