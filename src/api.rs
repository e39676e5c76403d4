use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::client::CensusClient;
use crate::housing::collect_housing_data;
use crate::types::HousingDataResponse;

/// Application state shared across all requests
#[derive(Clone)]
struct AppState {
    client: Arc<CensusClient>,
    metrics: Arc<Metrics>,
}

/// Server metrics
struct Metrics {
    total_requests: AtomicU64,
    requests_in_flight: AtomicU64,
    zip_codes_processed: AtomicU64,
    start_time: Instant,
}

/// RAII guard for tracking in-flight requests
struct RequestGuard<'a>(&'a AtomicU64);

impl<'a> Drop for RequestGuard<'a> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Build the Axum application with routes and middleware
pub fn build_app(client: Arc<CensusClient>) -> Router {
    let metrics = Arc::new(Metrics {
        total_requests: AtomicU64::new(0),
        requests_in_flight: AtomicU64::new(0),
        zip_codes_processed: AtomicU64::new(0),
        start_time: Instant::now(),
    });

    let state = AppState { client, metrics };

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .route("/api/housing-data", get(housing_data))
        .route("/api/housing-data/", get(housing_data))
        .route("/api/metrics", get(get_metrics))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Parsed query string of the housing data endpoint
#[derive(Debug, PartialEq)]
pub struct HousingQuery {
    pub zip_codes: Vec<String>,
    pub min_owner_occupied: Option<f64>,
}

impl HousingQuery {
    /// Parse raw query pairs.
    ///
    /// `zip_codes` may repeat and each value may hold a comma-separated list.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let mut zip_codes = Vec::new();
        let mut min_owner_occupied = None;

        for (key, value) in pairs {
            match key.as_str() {
                "zip_codes" => zip_codes.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                ),
                "min_owner_occupied" => {
                    let min = value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| {
                            ApiError::Validation(format!(
                                "min_owner_occupied must be a number, got {:?}",
                                value
                            ))
                        })?;
                    min_owner_occupied = Some(min);
                }
                _ => {}
            }
        }

        if zip_codes.is_empty() {
            return Err(ApiError::Validation("zip_codes is required".to_string()));
        }

        Ok(Self {
            zip_codes,
            min_owner_occupied,
        })
    }
}

/// Aggregate housing data for a list of ZIP codes
async fn housing_data(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<HousingDataResponse>, ApiError> {
    state.metrics.total_requests.fetch_add(1, Ordering::Relaxed);
    state
        .metrics
        .requests_in_flight
        .fetch_add(1, Ordering::Relaxed);
    let _guard = RequestGuard(&state.metrics.requests_in_flight);

    let query = HousingQuery::from_pairs(&pairs)?;

    tracing::info!(
        "Collecting housing data for {} ZIP code(s), min_owner_occupied={:?}",
        query.zip_codes.len(),
        query.min_owner_occupied
    );

    let results =
        collect_housing_data(&state.client, &query.zip_codes, query.min_owner_occupied).await;

    state
        .metrics
        .zip_codes_processed
        .fetch_add(query.zip_codes.len() as u64, Ordering::Relaxed);

    Ok(Json(HousingDataResponse { results }))
}

/// Get server metrics
async fn get_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        total_requests: state.metrics.total_requests.load(Ordering::Relaxed),
        requests_in_flight: state.metrics.requests_in_flight.load(Ordering::Relaxed),
        zip_codes_processed: state.metrics.zip_codes_processed.load(Ordering::Relaxed),
        uptime_seconds: state.metrics.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
struct MetricsResponse {
    total_requests: u64,
    requests_in_flight: u64,
    zip_codes_processed: u64,
    uptime_seconds: u64,
}

/// API error types
#[derive(Debug, PartialEq)]
pub enum ApiError {
    Validation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_repeated_and_comma_separated() {
        let query = HousingQuery::from_pairs(&pairs(&[
            ("zip_codes", "12345"),
            ("zip_codes", "54321, 02134,"),
            ("min_owner_occupied", "55.5"),
            ("unrelated", "x"),
        ]))
        .unwrap();
        assert_eq!(query.zip_codes, vec!["12345", "54321", "02134"]);
        assert_eq!(query.min_owner_occupied, Some(55.5));
    }

    #[test]
    fn test_query_requires_zip_codes() {
        assert!(matches!(
            HousingQuery::from_pairs(&pairs(&[("min_owner_occupied", "10")])),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            HousingQuery::from_pairs(&pairs(&[("zip_codes", " , ")])),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_query_rejects_bad_threshold() {
        for bad in ["abc", "", "NaN", "inf"] {
            assert!(
                HousingQuery::from_pairs(&pairs(&[
                    ("zip_codes", "12345"),
                    ("min_owner_occupied", bad)
                ]))
                .is_err(),
                "should reject {:?}",
                bad
            );
        }
    }
}
