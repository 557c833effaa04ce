// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The recognized API-call failure.
//!
//! This is the one failure kind whose HTTP code is translated into a span
//! status. Callers that wrap their own transport errors should convert them
//! into [`ApiError`] (or keep one in their source chain) to get status
//! annotation.

use crate::status::StatusCode;

/// A failed BigQuery API call.
///
/// # Examples
///
/// ```rust
/// use bigquery_tracing::{ApiError, StatusCode, StatusSource};
///
/// let error = ApiError::not_found("Not found: Table my-project:dataset.missing");
/// assert_eq!(error.code(), Some(404));
/// assert_eq!(error.status_code(), Some(StatusCode::NotFound));
/// ```
#[derive(Debug, thiserror::Error)]
#[error("API call failed: {message}")]
pub struct ApiError {
    /// HTTP status code returned by the API, if the call got that far
    code: Option<u16>,
    /// Human-readable message from the API or transport
    message: String,
    /// Machine-readable reason (e.g. `notFound`, `rateLimitExceeded`)
    reason: Option<String>,
    /// The underlying transport error
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Create an error without an HTTP code.
    ///
    /// Such errors propagate without a status being recorded.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            reason: None,
            source: None,
        }
    }

    /// Create an error carrying an HTTP status code.
    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            ..Self::new(message)
        }
    }

    /// Helper for the common 404 case.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(404, message).with_reason("notFound")
    }

    /// Attach a machine-readable reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attach the underlying error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> Option<u16> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Canonical status for [`code`](Self::code), if any.
    pub fn canonical_code(&self) -> Option<StatusCode> {
        self.code.map(StatusCode::from_http_status)
    }
}
