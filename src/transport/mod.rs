// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport middleware for API clients.
//!
//! This module provides a Tower-based layer that traces every request an API
//! client sends, so call sites don't need to wrap each call by hand.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bigquery_tracing::transport::{TraceLayer, TracedRequest};
//! use bigquery_tracing::SpanCreator;
//! use std::borrow::Cow;
//!
//! impl TracedRequest for GetJobRequest {
//!     fn span_name(&self) -> Cow<'_, str> {
//!         Cow::Borrowed("BigQuery.getJob")
//!     }
//!
//!     fn job(&self) -> Option<&dyn JobInfo> {
//!         Some(&self.job)
//!     }
//! }
//!
//! let service = tower::ServiceBuilder::new()
//!     .layer(TraceLayer::new(SpanCreator::detect()))
//!     .service(client);
//! ```

mod layer;

pub use layer::{TraceLayer, TraceService, TracedRequest};
