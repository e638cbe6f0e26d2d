//! Admin shared-secret headers for tests that go through the router.

use http::{HeaderMap, HeaderName, HeaderValue};

use daehan_core::middleware::ADMIN_KEY_HEADER;

/// Configurable `x-api-key` injected into test requests.
pub struct MockAdminKey {
    pub key: String,
}

impl MockAdminKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn header_name() -> HeaderName {
        HeaderName::from_static(ADMIN_KEY_HEADER)
    }

    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.key).unwrap()
    }

    /// Return headers as an administrative client would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(Self::header_name(), self.header_value());
        map
    }
}
