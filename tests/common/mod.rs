#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header::CONTENT_TYPE, Method, Request},
    response::Response,
    Router,
};
use coalyard_api::{
    app_router,
    config::AppConfig,
    db,
    entities::{brand, stack, warehouse},
    AppState,
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "coalyard-test-boundary";

/// Helper harness for spinning up the router against an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Construct a test application after adjusting the default configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_000,
            "test".to_string(),
        );
        // One connection, so every query sees the same in-memory database
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg).expect("app state");
        let router = app_router(state.clone());
        Self { router, state }
    }

    pub fn db(&self) -> &sea_orm::DatabaseConnection {
        self.state.db.as_ref()
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Posts a CSV as the raw request body.
    pub async fn upload_csv(&self, uri: &str, csv: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "text/csv")
            .body(Body::from(csv.to_owned()))
            .expect("request");
        self.send(request).await
    }

    /// Posts a CSV the way a browser form does.
    pub async fn upload_multipart(&self, uri: &str, field: &str, csv: &str) -> Response {
        let payload = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"upload.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {csv}\r\n\
             --{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(payload))
            .expect("request");
        self.send(request).await
    }

    pub async fn seed_brand(&self, name: &str) -> i32 {
        brand::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("seed brand")
        .id
    }

    pub async fn seed_warehouse(&self, name: &str) -> i32 {
        warehouse::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("seed warehouse")
        .id
    }

    pub async fn seed_stack(&self, warehouse_id: i32, name: &str) -> i32 {
        stack::ActiveModel {
            name: Set(name.to_string()),
            warehouse_id: Set(warehouse_id),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("seed stack")
        .id
    }

    /// Warehouses W1 and W2, each with a stack named "5", and brand "A-1".
    /// Returns (brand, W1 stack, W2 stack) ids.
    pub async fn seed_yard(&self) -> (i32, i32, i32) {
        let brand = self.seed_brand("A-1").await;
        let w1 = self.seed_warehouse("W1").await;
        let w2 = self.seed_warehouse("W2").await;
        let s1 = self.seed_stack(w1, "5").await;
        let s2 = self.seed_stack(w2, "5").await;
        (brand, s1, s2)
    }

    pub async fn count<E: EntityTrait>(&self, _entity: E) -> u64
    where
        E::Model: Sync,
    {
        E::find().count(self.db()).await.expect("count rows")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
