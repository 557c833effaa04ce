// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tracing backends
//!
//! A backend is the tracing capability the span creator is handed. It is
//! injected as `Option<B>`: `None` means "no tracing available" and every
//! span becomes a no-op.
//!
//! Two backends ship with the crate:
//!
//! - [`TracingBackend`] - Emits `tracing` spans using the field conventions
//!   understood by `tracing-opentelemetry`
//! - [`InMemoryBackend`] - Collects finished spans for assertions in tests

use std::sync::Arc;

use crate::attributes::{AttributeValue, Attributes};
use crate::status::StatusCode;

mod memory;
mod tracer;

pub use memory::{FinishedSpan, InMemoryBackend, InMemorySpan};
pub use tracer::{TracingBackend, TracingSpan};

/// A live span owned by a backend
pub trait SpanHandle {
    /// Add or replace an attribute after creation
    fn set_attribute(&mut self, key: &str, value: AttributeValue);

    /// Record the terminal status
    fn set_status(&mut self, status: StatusCode);

    /// Release the span. Dropping the handle has the same effect.
    fn end(self)
    where
        Self: Sized,
    {
    }

    /// The `tracing` span to enter while the wrapped operation runs, if the
    /// backend has one
    fn tracing_span(&self) -> Option<&tracing::Span> {
        None
    }
}

/// Creates spans
pub trait TraceBackend {
    type Span: SpanHandle;

    fn start_span(&self, name: &str, attributes: Attributes) -> Self::Span;
}

impl<B: TraceBackend + ?Sized> TraceBackend for Arc<B> {
    type Span = B::Span;

    fn start_span(&self, name: &str, attributes: Attributes) -> Self::Span {
        (**self).start_span(name, attributes)
    }
}

impl<B: TraceBackend + ?Sized> TraceBackend for &B {
    type Span = B::Span;

    fn start_span(&self, name: &str, attributes: Attributes) -> Self::Span {
        (**self).start_span(name, attributes)
    }
}
