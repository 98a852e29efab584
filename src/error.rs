//! Error code trait shared by every error type in the crate.
//!
//! Failures in this crate are user-facing states, not programming errors.
//! Each error type carries a grepable code so the host can show feedback
//! (a "border reached" indicator, a "zoom to 100% first" hint) without
//! matching on display strings.

/// Grepable error code and retryable flag for host-facing feedback.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
