//! Probe endpoints used by the orchestrator.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Probe response body: `{"Status":"ok"}`.
#[derive(Debug, Serialize)]
pub struct ProbeStatus {
    #[serde(rename = "Status")]
    pub status: &'static str,
}

impl ProbeStatus {
    const OK: ProbeStatus = ProbeStatus { status: "ok" };
}

async fn liveness() -> Json<ProbeStatus> {
    Json(ProbeStatus::OK)
}

async fn readiness() -> Json<ProbeStatus> {
    Json(ProbeStatus::OK)
}

/// Route table hosted by the server.
pub fn web_api() -> Router {
    Router::new()
        .route("/liveness", get(liveness))
        .route("/readiness", get(readiness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn call(path: &str) -> (StatusCode, serde_json::Value) {
        let response = web_api()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn liveness_reports_ok() {
        let (status, body) = call("/liveness").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "Status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_reports_ok() {
        let (status, body) = call("/readiness").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "Status": "ok" }));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = web_api()
            .oneshot(Request::get("/webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
