use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use daehan_core::error::error_response;

/// Admin service error variants.
///
/// Rejections carry the collaborator's message and map to 400; unexpected failures
/// keep their cause for the log but render a generic message with 500.
#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    ProviderRejected(String),
    #[error("identity provider unavailable")]
    Provider(#[source] anyhow::Error),
    #[error("{0}")]
    StoreRejected(String),
    #[error("profile store unavailable")]
    Store(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AdminServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Message including the hidden cause of unexpected failures, for logs and observers.
    pub fn detail(&self) -> String {
        match self {
            Self::Provider(e) | Self::Store(e) | Self::Internal(e) => format!("{self}: {e:#}"),
            _ => self.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::ProviderRejected(_) => "PROVIDER_REJECTED",
            Self::Provider(_) => "PROVIDER_UNAVAILABLE",
            Self::StoreRejected(_) => "STORE_REJECTED",
            Self::Store(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Identity provider failure, rejection or unexpected.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::ProviderRejected(_) | Self::Provider(_))
    }

    /// Profile store failure, rejection or unexpected.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::StoreRejected(_) | Self::Store(_))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::ProviderRejected(_) | Self::StoreRejected(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Provider(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for AdminServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AdminServiceError {
    fn into_response(self) -> Response {
        // The body hides the cause of unexpected failures, so the chain goes to the log.
        match &self {
            Self::Provider(e) | Self::Store(e) | Self::Internal(e) => {
                tracing::error!(error = ?e, kind = self.kind(), "unexpected failure");
            }
            _ => {}
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}
