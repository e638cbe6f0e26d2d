use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Plain-text liveness banner served at `GET /`.
pub const LIVENESS_MESSAGE: &str = "Backend de Daehan Shipping activo";

pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

/// Handler for `GET /readyz`: ready when the profile store answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "profile store ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
