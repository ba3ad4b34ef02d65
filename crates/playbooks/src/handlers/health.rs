//! Health check endpoints for the Playbooks API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::db::pool::health_check as db_health_check;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Health status ("ok" or "unhealthy")
    pub status: String,

    /// Service name
    pub service: String,

    /// Server version
    pub version: String,
}

/// Detailed health check response for the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealthResponse {
    /// Overall health status
    pub status: String,

    /// Database connectivity status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Server uptime in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,

    /// Server version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Basic health check endpoint.
///
/// `GET /health`
///
/// Returns quickly without touching any dependency, suitable for load
/// balancer liveness checks.
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        service: "quillspace-playbooks".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Detailed API health check endpoint.
///
/// `GET /api/health`
///
/// Returns readiness including database connectivity and uptime.
///
/// # Returns
///
/// - `200 OK` when the database responds
/// - `503 Service Unavailable` when it does not
pub async fn api_health(State(state): State<AppState>) -> (StatusCode, Json<ApiHealthResponse>) {
    let db_healthy = db_health_check(&state.db).await;

    let (status_code, overall_status) = if db_healthy {
        (StatusCode::OK, "ok".to_string())
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy".to_string())
    };

    let response = ApiHealthResponse {
        status: overall_status,
        database: Some(if db_healthy {
            "connected".to_string()
        } else {
            "disconnected".to_string()
        }),
        uptime_seconds: Some(state.uptime_seconds()),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.service, "quillspace-playbooks");
    }

    #[tokio::test]
    async fn test_api_health_reports_unreachable_database() {
        let config = crate::config::DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: "1".to_string(),
            acquire_timeout: 1,
            ..Default::default()
        };
        let pool = crate::db::create_pool(&config);
        let state = AppState::new(pool, crate::config::AppConfig::default());

        let (status, Json(response)) = api_health(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.status, "unhealthy");
        assert_eq!(response.database.as_deref(), Some("disconnected"));
    }
}
