use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

/// Drain a response body and parse it as JSON.
///
/// Panics if the body is not valid JSON.
pub async fn json_body(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("response body is not JSON ({e}): {bytes:?}"))
}
