// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the bigquery-tracing library.
//!
//! The span creator itself never fails: instrumentation problems degrade to a
//! no-op. The types here describe the failures it *observes*:
//!
//! - [`ApiError`] - A failed API call; its HTTP code becomes the span status
//! - [`ConfigError`] - Errors from loading [`TracingConfig`](crate::TracingConfig)
//!
//! [`StatusSource`] is the seam between the two worlds. Any error type
//! returned from an instrumented block must implement it; the default
//! implementation reports no status, so the error propagates unannotated.

mod api;
mod config;

pub use api::ApiError;
pub use config::ConfigError;

use crate::status::StatusCode;

/// Reports the canonical status an error should leave on its span.
///
/// Returning `None` means "not a recognized API failure": the error is passed
/// through and no status is recorded.
///
/// # Examples
///
/// ```rust
/// use bigquery_tracing::{StatusCode, StatusSource};
///
/// #[derive(Debug)]
/// enum LoadError {
///     Quota,
///     Local(String),
/// }
///
/// impl StatusSource for LoadError {
///     fn status_code(&self) -> Option<StatusCode> {
///         match self {
///             LoadError::Quota => Some(StatusCode::from_http_status(429)),
///             LoadError::Local(_) => None,
///         }
///     }
/// }
///
/// assert_eq!(LoadError::Quota.status_code(), Some(StatusCode::ResourceExhausted));
/// assert_eq!(LoadError::Local("disk".into()).status_code(), None);
/// ```
pub trait StatusSource {
    fn status_code(&self) -> Option<StatusCode> {
        None
    }
}

impl StatusSource for ApiError {
    fn status_code(&self) -> Option<StatusCode> {
        self.canonical_code()
    }
}

impl<T: StatusSource + ?Sized> StatusSource for &T {
    fn status_code(&self) -> Option<StatusCode> {
        (**self).status_code()
    }
}

/// Walks the source chain looking for an [`ApiError`].
impl StatusSource for Box<dyn std::error::Error + Send + Sync> {
    fn status_code(&self) -> Option<StatusCode> {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self.as_ref());
        while let Some(error) = current {
            if let Some(api) = error.downcast_ref::<ApiError>() {
                return api.status_code();
            }
            current = error.source();
        }
        None
    }
}

impl StatusSource for std::io::Error {}
impl StatusSource for std::fmt::Error {}
impl StatusSource for std::convert::Infallible {}
impl StatusSource for serde_json::Error {}
impl StatusSource for String {}
impl StatusSource for ConfigError {}
