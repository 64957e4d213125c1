//! Per-request context passed explicitly through services and data stores

use uuid::Uuid;

/// Header carrying the caller-supplied request identifier
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request-scoped values threaded through every service and store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Context with a freshly generated request id
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::generate()
    }
}
