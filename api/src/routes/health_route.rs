//! GET /health — liveness probe.

use axum::Json;
use serde::Serialize;

/// Response payload for /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_body_is_the_fixed_ok_object() {
        let body = serde_json::to_value(HealthResponse { status: "ok" }).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "ok" }));
    }
}
