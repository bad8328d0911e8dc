//! Shared error mapping for outbound HTTP calls.

use huddle_core::error::{AppError, ErrorKind};

/// Map a transport-level failure. Timeouts and connect errors are
/// transient so the retry layer will take another attempt.
pub(crate) fn transport_error(context: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() || e.is_connect() {
        AppError::with_source(
            ErrorKind::ServiceUnavailable,
            format!("{context}: transport failure"),
            e,
        )
    } else {
        AppError::with_source(
            ErrorKind::ExternalService,
            format!("{context}: request failed"),
            e,
        )
    }
}

/// Map a non-success HTTP status. Server-side failures and throttling
/// are transient; everything else is a hard failure of `kind`.
pub(crate) fn status_error(context: &str, kind: ErrorKind, status: reqwest::StatusCode) -> AppError {
    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        AppError::new(
            ErrorKind::ServiceUnavailable,
            format!("{context}: upstream returned {status}"),
        )
    } else {
        AppError::new(kind, format!("{context}: upstream returned {status}"))
    }
}
