//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is running.
//! Used by Kubernetes, ECS, systemd, and load balancers to verify the service is alive.

use axum::Json;
use serde::Serialize;

/// Body of every health response. `status` is always `"ok"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

impl HealthStatus {
    pub const OK: Self = Self { status: "ok" };
}

/// Health check handler.
///
/// This is a liveness probe - it only checks that the process can respond to HTTP.
/// Query string, headers and body are ignored.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_ok_status() {
        let Json(body) = health().await;
        assert_eq!(body, HealthStatus::OK);
    }

    #[test]
    fn serializes_to_single_status_field() {
        let json = serde_json::to_string(&HealthStatus::OK).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }
}
