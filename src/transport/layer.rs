// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower layer that wraps every request of an API client in a span.
//!
//! Requests describe themselves through [`TracedRequest`]; service errors
//! report their status through [`StatusSource`].

use std::borrow::Cow;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tower::{Layer, Service};

use crate::attributes::Attributes;
use crate::backend::TraceBackend;
use crate::errors::StatusSource;
use crate::resource::{ClientInfo, JobInfo};
use crate::spans::{SpanCreator, SpanOptions};

/// A request that knows how to name and describe its span
pub trait TracedRequest {
    /// Span name, e.g. `BigQuery.getJob`
    fn span_name(&self) -> Cow<'_, str>;

    /// Call-site attributes
    fn span_attributes(&self) -> Option<Attributes> {
        None
    }

    fn client(&self) -> Option<&dyn ClientInfo> {
        None
    }

    fn job(&self) -> Option<&dyn JobInfo> {
        None
    }
}

/// A Tower layer that traces requests.
///
/// # Example
///
/// ```rust,ignore
/// use bigquery_tracing::{SpanCreator, TraceLayer};
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(TraceLayer::new(SpanCreator::detect()))
///     .service(api_client);
/// ```
#[derive(Clone, Debug)]
pub struct TraceLayer<B> {
    spans: SpanCreator<B>,
}

impl<B> TraceLayer<B> {
    pub fn new(spans: SpanCreator<B>) -> Self {
        Self { spans }
    }
}

impl<S, B: Clone> Layer<S> for TraceLayer<B> {
    type Service = TraceService<S, B>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceService {
            inner,
            spans: self.spans.clone(),
        }
    }
}

/// A Tower service that runs each call inside a span.
#[derive(Clone, Debug)]
pub struct TraceService<S, B> {
    inner: S,
    spans: SpanCreator<B>,
}

impl<S, B> TraceService<S, B> {
    pub fn new(inner: S, spans: SpanCreator<B>) -> Self {
        Self { inner, spans }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B, Request> Service<Request> for TraceService<S, B>
where
    Request: TracedRequest,
    S: Service<Request>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: StatusSource + Send + 'static,
    B: TraceBackend,
    B::Span: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let scope = {
            let name = request.span_name();
            let mut options = SpanOptions::new();
            if let Some(attributes) = request.span_attributes() {
                options = options.attributes(attributes);
            }
            if let Some(client) = request.client() {
                options = options.client(client);
            }
            if let Some(job) = request.job() {
                options = options.job(job);
            }
            self.spans.create(&name, options)
        };

        Box::pin(scope.run(self.inner.call(request)))
    }
}
