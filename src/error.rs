//! Shared error classification.
//!
//! Every error enum in the crate implements [`ErrorCode`] so the HTTP layer
//! can emit a grepable code next to the human-readable message without
//! matching on message text.

/// Grepable error code and retryable flag for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    /// Whether a caller could reasonably re-submit the same request.
    /// Informational only; nothing in this crate retries.
    fn retryable(&self) -> bool {
        false
    }
}
