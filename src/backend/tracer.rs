// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! `tracing`-based backend.
//!
//! Spans are emitted under the `bigquery_tracing` target with the fixed name
//! `bigquery.api`; the operation name goes into `otel.name`, which
//! `tracing-opentelemetry` uses as the exported span name. Status is written
//! to `otel.status_code` / `otel.status_message` and, with the full canonical
//! code, to `rpc.canonical_code`.
//!
//! `tracing` needs field names up front, so the well-known attribute keys are
//! declared as span fields. Any other key is collected into a single
//! `attributes` field holding a JSON object.

use std::sync::Once;

use tracing::field;
use tracing::subscriber::NoSubscriber;

use super::{SpanHandle, TraceBackend};
use crate::attributes::{AttributeValue, Attributes};
use crate::config::constants::{keys, TRACING_TARGET};
use crate::status::StatusCode;

static UNAVAILABLE_NOTICE: Once = Once::new();

/// Backend emitting `tracing` spans
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBackend;

impl TracingBackend {
    pub fn new() -> Self {
        Self
    }

    /// Returns a backend if a subscriber is installed for the current
    /// thread (scoped or global), otherwise `None`.
    ///
    /// The first miss logs an informational notice.
    pub fn detect() -> Option<Self> {
        let installed = tracing::dispatcher::get_default(|dispatch| !dispatch.is::<NoSubscriber>());
        if installed {
            Some(Self)
        } else {
            UNAVAILABLE_NOTICE.call_once(|| {
                tracing::info!(
                    target: TRACING_TARGET,
                    "No tracing subscriber installed; BigQuery API calls will not be traced. \
                     Install a subscriber (e.g. tracing-opentelemetry) to get tracing data"
                );
            });
            None
        }
    }
}

impl TraceBackend for TracingBackend {
    type Span = TracingSpan;

    fn start_span(&self, name: &str, attributes: Attributes) -> Self::Span {
        let span = tracing::info_span!(
            target: TRACING_TARGET,
            "bigquery.api",
            otel.name = name,
            otel.kind = "client",
            otel.status_code = field::Empty,
            otel.status_message = field::Empty,
            rpc.canonical_code = field::Empty,
            db.system = field::Empty,
            db.name = field::Empty,
            location = field::Empty,
            num_child_jobs = field::Empty,
            job_id = field::Empty,
            parent_job_id = field::Empty,
            timeCreated = field::Empty,
            timeStarted = field::Empty,
            timeEnded = field::Empty,
            errors = field::Empty,
            errorResult = field::Empty,
            state = field::Empty,
            attributes = field::Empty,
        );

        let mut handle = TracingSpan {
            span,
            extra: Attributes::new(),
        };
        for (key, value) in attributes {
            handle.record(&key, value);
        }
        handle.flush_extra();
        handle
    }
}

/// Span handle for [`TracingBackend`]
#[derive(Debug)]
pub struct TracingSpan {
    span: tracing::Span,
    /// Attributes without a dedicated field
    extra: Attributes,
}

impl TracingSpan {
    fn record(&mut self, key: &str, value: AttributeValue) {
        if !keys::ALL.contains(&key) {
            self.extra.insert(key, value);
            return;
        }

        match value {
            AttributeValue::Bool(b) => self.span.record(key, b),
            AttributeValue::Int(i) => self.span.record(key, i),
            AttributeValue::Float(x) => self.span.record(key, x),
            AttributeValue::String(s) => self.span.record(key, s.as_str()),
            AttributeValue::Timestamp(ts) => {
                self.span.record(key, field::display(AttributeValue::Timestamp(ts)))
            }
        };
    }

    fn flush_extra(&self) {
        if self.extra.is_empty() {
            return;
        }
        match serde_json::to_string(&self.extra) {
            Ok(json) => {
                self.span.record("attributes", json.as_str());
            }
            Err(e) => {
                tracing::debug!(target: TRACING_TARGET, error = %e, "Failed to encode span attributes");
            }
        }
    }
}

impl SpanHandle for TracingSpan {
    fn set_attribute(&mut self, key: &str, value: AttributeValue) {
        let extra = !keys::ALL.contains(&key);
        self.record(key, value);
        if extra {
            self.flush_extra();
        }
    }

    fn set_status(&mut self, status: StatusCode) {
        if status.is_ok() {
            self.span.record("otel.status_code", "OK");
        } else {
            self.span.record("otel.status_code", "ERROR");
            self.span.record("otel.status_message", status.as_str());
        }
        self.span.record("rpc.canonical_code", status.as_str());
    }

    fn tracing_span(&self) -> Option<&tracing::Span> {
        Some(&self.span)
    }
}
