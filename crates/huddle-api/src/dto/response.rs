//! Response body definitions.

use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Always true for success responses.
    pub success: bool,
    /// The payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A bare count.
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    /// The count.
    pub count: i64,
}

/// Rows affected by a bulk operation.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedResponse {
    /// Rows affected.
    pub affected: u64,
}

/// Outcome of a session-start reminder sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    /// Past-due rows marked sent.
    pub marked_sent: u64,
    /// Cancelled rows cleaned up.
    pub cleaned: u64,
}

/// Authorization URL handed to the client for the OAuth flow.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeUrlResponse {
    /// URL to open in the system browser.
    pub url: String,
    /// Opaque state to echo back on the callback.
    pub state: String,
}
