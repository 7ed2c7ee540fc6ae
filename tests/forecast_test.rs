mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use coalyard_api::entities::{current_predict, location};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{response_json, TestApp};

const PREDICT_HEADER: &str = "Дата начала,Груз,\"Вес по акту, тн\",Склад,Штабель";

async fn seeded_forecast(app: &TestApp) -> (i32, i32) {
    let (_, w1_stack, w2_stack) = app.seed_yard().await;
    let csv = format!(
        "{PREDICT_HEADER}\n\
         2024-02-29,A-1,0.1,W1,5\n\
         2024-03-01,A-1,0.2,W1,5\n\
         2024-03-15 12:00,A-1,0.3,W2,5\n\
         2024-03-31,A-1,,W1,5\n\
         2024-04-01,A-1,0.5,W2,5\n"
    );
    let response = app.upload_csv("/predict/upload-csv", &csv).await;
    assert_eq!(response.status(), StatusCode::OK);
    (w1_stack, w2_stack)
}

#[tokio::test]
async fn month_view_is_bounded_and_enriched() {
    let app = TestApp::new().await;
    let (w1_stack, _) = seeded_forecast(&app).await;

    let body = response_json(app.request(Method::GET, "/predict/2024/3", None).await).await;
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["date"], "2024-03-01");
    assert_eq!(rows[0]["stack_id"], w1_stack);
    assert_eq!(rows[0]["stack_name"], "5");
    assert_eq!(rows[0]["warehouse_name"], "W1");
    assert_eq!(rows[0]["brand_name"], "A-1");
    assert_eq!(rows[1]["warehouse_name"], "W2");
    assert_eq!(rows[2]["weight"], serde_json::Value::Null);
}

#[tokio::test]
async fn day_and_stack_views() {
    let app = TestApp::new().await;
    let (w1_stack, w2_stack) = seeded_forecast(&app).await;

    let body = response_json(app.request(Method::GET, "/predict/2024/3/15", None).await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["stack_id"], w2_stack);

    let body = response_json(
        app.request(Method::GET, &format!("/predict/stack/{w1_stack}/2024/3"), None)
            .await,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let body = response_json(
        app.request(Method::GET, &format!("/predict/{w2_stack}"), None)
            .await,
    )
    .await;
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, ["2024-03-15", "2024-04-01"]);
}

#[tokio::test]
async fn impossible_dates_are_bad_requests() {
    let app = TestApp::new().await;

    for uri in ["/predict/2024/13", "/predict/2024/4/31", "/predict/stack/1/2024/0"] {
        let response = app.request(Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn current_snapshot_is_read_only_view() {
    let app = TestApp::new().await;
    let (brand_id, w1_stack, w2_stack) = app.seed_yard().await;
    for (stack_id, day) in [(w1_stack, 2), (w2_stack, 1), (w1_stack, 1)] {
        current_predict::ActiveModel {
            brand_id: Set(brand_id),
            stack_id: Set(stack_id),
            date: Set(chrono::NaiveDate::from_ymd_opt(2024, 5, day).unwrap()),
            weight: Set(Some(0.7)),
            ..Default::default()
        }
        .insert(app.db())
        .await
        .unwrap();
    }

    let body = response_json(app.request(Method::GET, "/current_predict/", None).await).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let body = response_json(
        app.request(Method::GET, &format!("/current_predict/{w1_stack}"), None)
            .await,
    )
    .await;
    assert_eq!(body[0]["date"], "2024-05-01");
    assert_eq!(body[1]["date"], "2024-05-02");
}

#[tokio::test]
async fn location_is_replaced_not_appended() {
    let app = TestApp::new().await;

    let body = response_json(app.request(Method::GET, "/location/", None).await).await;
    assert!(body.is_null());

    for (lat, lon) in [(43.1, 131.9), (59.9, 30.3)] {
        let response = app
            .request(
                Method::POST,
                "/location/",
                Some(json!({"latitude": lat, "longitude": lon})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body = response_json(app.request(Method::GET, "/location/", None).await).await;
    assert_eq!(body["latitude"], 59.9);
    assert_eq!(body["longitude"], 30.3);
    assert_eq!(app.count(location::Entity).await, 1);

    let response = app
        .request(
            Method::POST,
            "/location/",
            Some(json!({"latitude": 120.0, "longitude": 0.0})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weather_uses_the_stored_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "43.1"))
        .and(query_param("longitude", "131.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hourly": {
                "time": ["2024-03-01T00:00"],
                "temperature_2m": [-2.0],
                "surface_pressure": [1012.4],
                "wind_speed_10m": [4.3]
            }
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let app = TestApp::with_config(move |cfg| cfg.weather_base_url = uri).await;

    let query = "/weather?start_date=2024-03-01&end_date=2024-03-01";
    let response = app.request(Method::GET, query, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.request(
        Method::POST,
        "/location/",
        Some(json!({"latitude": 43.1, "longitude": 131.9})),
    )
    .await;

    let response = app.request(Method::GET, query, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body[0]["time"], "2024-03-01T00:00");
    assert_eq!(body[0]["temperature_2m"], -2.0);
    assert_eq!(body[0]["wind_speed_10m"], 4.3);
    assert!(body[0]["precipitation"].is_null());
}

#[tokio::test]
async fn weather_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let uri = server.uri();
    let app = TestApp::with_config(move |cfg| cfg.weather_base_url = uri).await;
    app.request(
        Method::POST,
        "/location/",
        Some(json!({"latitude": 1.0, "longitude": 2.0})),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/weather?start_date=2024-03-01&end_date=2024-03-02",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn health_reports_database_and_echoes_request_id() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "probe-1")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "probe-1");
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn errors_carry_the_request_id() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/brand/999")
        .header("x-request-id", "trace-404")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["request_id"], "trace-404");
    assert_eq!(body["error"], "Not Found");
}
