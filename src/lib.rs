// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Optional span instrumentation for BigQuery API calls.
//!
//! Wrap an API call in [`SpanCreator::in_span`] (or
//! [`in_span_async`](SpanCreator::in_span_async)) and it runs inside a span
//! carrying the client's or job's metadata. On success the span gets
//! [`StatusCode::Ok`]; on an [`ApiError`] the HTTP code is translated into a
//! canonical [`StatusCode`]. The error itself always reaches the caller
//! unchanged.
//!
//! Instrumentation is optional: without a backend every span is a no-op and
//! no attributes are computed.
//!
//! # Example
//!
//! ```rust
//! use bigquery_tracing::{
//!     ApiError, InMemoryBackend, JobRef, SpanCreator, SpanOptions, StatusCode,
//! };
//!
//! let backend = InMemoryBackend::new();
//! let spans = SpanCreator::enabled(backend.clone());
//!
//! let job = JobRef::new("my-project", "abc").with_state("DONE");
//! let result: Result<(), ApiError> = spans.in_span(
//!     "job.get",
//!     SpanOptions::new().job(&job),
//!     |_| Err(ApiError::not_found("Not found: Job my-project:abc")),
//! );
//! assert!(result.is_err());
//!
//! let finished = backend.finished_spans();
//! assert_eq!(finished[0].status, Some(StatusCode::NotFound));
//! ```
//!
//! In production, use [`SpanCreator::detect`], which picks the `tracing`
//! backend when a subscriber is installed.

mod attributes;
pub mod backend;
pub mod config;
mod errors;
mod resource;
mod spans;
mod status;
pub mod transport;

pub use attributes::{AttributeValue, Attributes};
pub use backend::{
    FinishedSpan, InMemoryBackend, InMemorySpan, SpanHandle, TraceBackend, TracingBackend,
    TracingSpan,
};
pub use config::{TracingConfig, TracingConfigBuilder};
pub use errors::{ApiError, ConfigError, StatusSource};
pub use resource::{
    client_attributes, job_attributes, ClientInfo, ClientRef, ErrorProto, JobInfo, JobRef,
};
pub use spans::{ScopedSpan, SpanCreator, SpanOptions};
pub use status::{InvalidStatusCode, StatusCode};
pub use transport::{TraceLayer, TraceService, TracedRequest};
