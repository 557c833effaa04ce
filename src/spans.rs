// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Scoped spans around BigQuery API calls.
//!
//! [`SpanCreator`] is the single entry point. It holds an optional backend
//! and an immutable base attribute map; every call copies the base map,
//! layers client or job metadata and call-site attributes on top, and hands
//! the result to the backend.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub fn get_job(&self, job: &JobRef) -> Result<Job, ApiError> {
//!     self.spans.in_span("job.get", SpanOptions::new().job(job), |_| {
//!         // API call here
//!     })
//! }
//! ```
//!
//! Attribute precedence, lowest to highest:
//!
//! 1. defaults (`db.system` plus configured defaults)
//! 2. client-derived, or job-derived when no client is given
//! 3. call-site `attributes`

use std::future::Future;
use std::sync::Arc;

use tracing::Instrument;

use crate::attributes::{AttributeValue, Attributes};
use crate::backend::{SpanHandle, TraceBackend, TracingBackend};
use crate::config::constants::TRACING_TARGET;
use crate::config::TracingConfig;
use crate::errors::StatusSource;
use crate::resource::{client_attributes, job_attributes, ClientInfo, JobInfo};
use crate::status::StatusCode;

/// Optional metadata sources for one span
///
/// When both a client and a job are set, only the client is used.
#[derive(Default)]
pub struct SpanOptions<'a> {
    attributes: Option<Attributes>,
    client: Option<&'a dyn ClientInfo>,
    job: Option<&'a dyn JobInfo>,
}

impl<'a> SpanOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call-site attributes; these override every other source
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .merge(attributes);
        self
    }

    /// Add a single call-site attribute
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key, value);
        self
    }

    pub fn client(mut self, client: &'a dyn ClientInfo) -> Self {
        self.client = Some(client);
        self
    }

    pub fn job(mut self, job: &'a dyn JobInfo) -> Self {
        self.job = Some(job);
        self
    }
}

impl std::fmt::Debug for SpanOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanOptions")
            .field("attributes", &self.attributes)
            .field("client", &self.client.map(|c| c.project()))
            .field("job", &self.job.map(|j| j.job_id()))
            .finish()
    }
}

/// Creates scoped spans, or no-ops when no backend is available
///
/// Cloning is cheap; the base attribute map is shared and never mutated.
#[derive(Debug, Clone)]
pub struct SpanCreator<B> {
    backend: Option<B>,
    defaults: Arc<Attributes>,
}

impl<B: TraceBackend> SpanCreator<B> {
    /// Creator with the default config; `None` disables instrumentation
    pub fn new(backend: Option<B>) -> Self {
        Self::from_config(&TracingConfig::default(), backend)
    }

    pub fn enabled(backend: B) -> Self {
        Self::new(Some(backend))
    }

    /// A creator whose spans are all no-ops
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Apply a config; a disabled config drops the backend
    pub fn from_config(config: &TracingConfig, backend: Option<B>) -> Self {
        Self {
            backend: backend.filter(|_| config.enabled),
            defaults: Arc::new(config.base_attributes()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// The base map every span starts from
    pub fn default_attributes(&self) -> &Attributes {
        &self.defaults
    }

    /// Merge the attribute sources for one span
    pub fn build_attributes(&self, options: SpanOptions<'_>) -> Attributes {
        let mut attributes = Attributes::clone(&self.defaults);

        if let Some(client) = options.client {
            attributes.merge(client_attributes(client));
        } else if let Some(job) = options.job {
            attributes.merge(job_attributes(job));
        }

        if let Some(overrides) = options.attributes {
            attributes.merge(overrides);
        }

        attributes
    }

    /// Start a span named `name`
    ///
    /// Without a backend this returns a disabled handle and does nothing else.
    /// The span ends when the returned guard drops.
    pub fn create(&self, name: &str, options: SpanOptions<'_>) -> ScopedSpan<B::Span> {
        let Some(backend) = &self.backend else {
            return ScopedSpan::disabled();
        };

        let attributes = self.build_attributes(options);
        tracing::trace!(
            target: TRACING_TARGET,
            span = name,
            attributes = attributes.len(),
            "Starting span"
        );
        ScopedSpan::new(name, backend.start_span(name, attributes))
    }

    /// Run `f` inside a span and record its outcome
    ///
    /// `Ok` records [`StatusCode::Ok`]. An `Err` whose [`StatusSource`]
    /// reports a code records that code; any other `Err` leaves the status
    /// unset. The result is returned unchanged either way.
    pub fn in_span<T, E, F>(&self, name: &str, options: SpanOptions<'_>, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut ScopedSpan<B::Span>) -> Result<T, E>,
        E: StatusSource,
    {
        let mut scope = self.create(name, options);
        let current = scope.tracing_span().cloned();
        let _entered = current.as_ref().map(tracing::Span::enter);

        let result = f(&mut scope);
        scope.record_result(&result);
        result
    }

    /// Async form of [`in_span`](Self::in_span)
    ///
    /// The span is created eagerly, so `options` need not outlive the call.
    /// Dropping the returned future ends the span without a status.
    pub fn in_span_async<T, E, Fut>(
        &self,
        name: &str,
        options: SpanOptions<'_>,
        fut: Fut,
    ) -> impl Future<Output = Result<T, E>>
    where
        Fut: Future<Output = Result<T, E>>,
        E: StatusSource,
    {
        self.create(name, options).run(fut)
    }
}

impl SpanCreator<TracingBackend> {
    /// Creator backed by `tracing` if a subscriber is installed
    pub fn detect() -> Self {
        Self::new(TracingBackend::detect())
    }

    /// [`detect`](Self::detect) with an explicit config
    pub fn detect_with_config(config: &TracingConfig) -> Self {
        Self::from_config(config, TracingBackend::detect())
    }
}

/// Guard for one span
///
/// The status is set at most once. The span ends when the guard drops,
/// including during unwinding.
#[derive(Debug)]
pub struct ScopedSpan<S: SpanHandle> {
    span: Option<S>,
    name: String,
    status: Option<StatusCode>,
}

impl<S: SpanHandle> ScopedSpan<S> {
    fn new(name: &str, span: S) -> Self {
        Self {
            span: Some(span),
            name: name.to_string(),
            status: None,
        }
    }

    fn disabled() -> Self {
        Self {
            span: None,
            name: String::new(),
            status: None,
        }
    }

    /// `false` for the no-op handle
    pub fn is_recording(&self) -> bool {
        self.span.is_some()
    }

    pub fn span(&self) -> Option<&S> {
        self.span.as_ref()
    }

    /// Status recorded so far
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<AttributeValue>) {
        if let Some(span) = self.span.as_mut() {
            span.set_attribute(key, value.into());
        }
    }

    /// Record the terminal status; later calls are ignored
    pub fn set_status(&mut self, status: StatusCode) {
        let Some(span) = self.span.as_mut() else {
            return;
        };
        if let Some(existing) = self.status {
            tracing::trace!(
                target: TRACING_TARGET,
                span = %self.name,
                existing = %existing,
                ignored = %status,
                "Span status already set"
            );
            return;
        }
        span.set_status(status);
        self.status = Some(status);
    }

    /// Record the status implied by `result`
    pub fn record_result<T, E: StatusSource>(&mut self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.set_status(StatusCode::Ok),
            Err(e) => match e.status_code() {
                Some(code) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        span = %self.name,
                        status = %code,
                        "API call failed"
                    );
                    self.set_status(code);
                }
                None => {
                    tracing::trace!(
                        target: TRACING_TARGET,
                        span = %self.name,
                        "Unrecognized failure; leaving span status unset"
                    );
                }
            },
        }
    }

    pub fn tracing_span(&self) -> Option<&tracing::Span> {
        self.span.as_ref().and_then(SpanHandle::tracing_span)
    }

    /// Drive `fut` inside this span and record its outcome
    pub async fn run<T, E, Fut>(mut self, fut: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: StatusSource,
    {
        let current = self.tracing_span().cloned();
        let result = match current {
            Some(span) => fut.instrument(span).await,
            None => fut.await,
        };
        self.record_result(&result);
        result
    }
}

impl<S: SpanHandle> Drop for ScopedSpan<S> {
    fn drop(&mut self) {
        if let Some(span) = self.span.take() {
            span.end();
        }
    }
}
