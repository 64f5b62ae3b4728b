//! Error types for data operations.
//!
//! This module defines [`ReservesError`] which covers all error cases that can occur
//! when fetching or parsing institution data.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum ReservesError {
    /// The remote API answered with a non-success HTTP status.
    #[error("FDIC request failed: {status} {status_text}{}", body_suffix(.body))]
    RemoteRequest {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status, if known.
        status_text: String,
        /// Response body text, if any could be read.
        body: Option<String>,
    },

    /// Network-related errors (connection failures, DNS, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ReservesError {
    /// Returns the HTTP status for [`ReservesError::RemoteRequest`] errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    match body.as_deref() {
        Some(text) if !text.is_empty() => format!(": {text}"),
        _ => String::new(),
    }
}

/// Result type alias using [`ReservesError`].
pub type Result<T> = std::result::Result<T, ReservesError>;
