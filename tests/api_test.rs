use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use httpmock::prelude::*;
use serde_json::{Value, json};
use tower::ServiceExt;
use zcta_housing::{CensusClient, CensusConfig, build_app};

fn app_for(base_url: String) -> Router {
    let client = CensusClient::with_config(CensusConfig {
        base_url,
        ..Default::default()
    })
    .unwrap();
    build_app(Arc::new(client))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_housing_data_endpoint() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/2022/acs/acs5")
                .query_param("for", "zip code tabulation area:12345");
            then.status(200).json_body(json!([
                ["B25001_001E", "B25003_002E", "B25003_003E", "B25024_002E", "B25032_010E", "zip code tabulation area"],
                ["300", "100", "200", "120", "60", "12345"]
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/2022/cbp");
            then.status(200)
                .json_body(json!([["ESTAB", "zip code tabulation area"], ["17", "12345"]]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/2022/acs/acs5")
                .query_param("for", "zip code tabulation area:00001");
            then.status(204);
        })
        .await;

    let app = app_for(server.base_url());
    let (status, body) = get_json(
        app,
        "/api/housing-data/?zip_codes=12345&zip_codes=00001&zip_codes=abc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["zip_code"], "12345");
    assert_eq!(results[0]["percent_owner_occupied"], 33.33);
    assert_eq!(results[0]["business_establishments"], 17);
    assert_eq!(
        results[1],
        json!({"zip_code": "00001", "error": "No data found"})
    );
    assert_eq!(
        results[2],
        json!({"zip_code": "abc", "error": "Invalid ZIP code: abc"})
    );
}

#[tokio::test]
async fn test_threshold_via_query_string() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/2022/acs/acs5");
            then.status(200).json_body(json!([
                ["B25001_001E", "B25003_002E", "B25003_003E", "B25024_002E", "B25032_010E", "zip code tabulation area"],
                ["300", "100", "200", "120", "60", "12345"]
            ]));
        })
        .await;

    let app = app_for(server.base_url());
    let (status, body) = get_json(
        app,
        "/api/housing-data?zip_codes=12345,54321&min_owner_occupied=40",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": []}));
}

#[tokio::test]
async fn test_validation_errors() {
    let app = app_for("http://127.0.0.1:9".to_string());

    let (status, body) = get_json(app.clone(), "/api/housing-data/").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "zip_codes is required");

    let (status, body) = get_json(
        app,
        "/api/housing-data/?zip_codes=12345&min_owner_occupied=lots",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = app_for("http://127.0.0.1:9".to_string());

    let (status, body) = get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let (status, _) = get_json(app.clone(), "/api/housing-data/?zip_codes=bad").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(app, "/api/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_requests"], 1);
    assert_eq!(body["requests_in_flight"], 0);
    assert_eq!(body["zip_codes_processed"], 1);
}
