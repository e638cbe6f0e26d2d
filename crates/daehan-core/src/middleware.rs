use std::any::Any;
use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

use crate::error::{AppError, error_response};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header carrying the administrative shared secret.
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build the request-id layer. Apply with `.layer(request_id_layer())` in router.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), MakeUuidRequestId)
}

/// Copy the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER))
}

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Turn handler panics into the generic JSON 500 body.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(kind = "INTERNAL", "handler panicked");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL",
        "internal server error",
    )
}

/// Configured administrative shared secret.
#[derive(Clone)]
pub struct AdminKey(Arc<[u8]>);

impl AdminKey {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self(Arc::from(secret.as_ref()))
    }

    /// Byte-for-byte comparison against the configured secret.
    pub fn matches(&self, presented: &[u8]) -> bool {
        self.0.as_ref() == presented
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminKey(<redacted>)")
    }
}

/// Reject the request with 403 unless `x-api-key` equals the configured secret.
///
/// Apply with `.route_layer(axum::middleware::from_fn_with_state(key, require_admin_key))`
/// so the check runs before any extractor or handler.
pub async fn require_admin_key(
    State(key): State<AdminKey>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .is_some_and(|value| key.matches(value.as_bytes()));
    if !authorized {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
