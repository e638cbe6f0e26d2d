use axum::Json;
use serde_json::{Value, json};

/// Handler for `GET /healthz`: the process is up and serving requests.
/// Answers `{"status":"ok"}` without touching any backing service.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
