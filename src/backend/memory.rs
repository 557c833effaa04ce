// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory backend that collects finished spans.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{SpanHandle, TraceBackend};
use crate::attributes::{AttributeValue, Attributes};
use crate::status::StatusCode;

/// A span as it looked when it ended
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinishedSpan {
    pub name: String,
    pub attributes: Attributes,
    /// `None` if the span ended without a status
    pub status: Option<StatusCode>,
}

/// Backend that keeps every finished span in memory
///
/// Clones share the same storage.
///
/// # Examples
///
/// ```rust
/// use bigquery_tracing::{InMemoryBackend, SpanCreator, SpanOptions, StatusCode};
///
/// let backend = InMemoryBackend::new();
/// let creator = SpanCreator::enabled(backend.clone());
///
/// let rows: Result<u64, std::io::Error> =
///     creator.in_span("table.list", SpanOptions::new(), |_| Ok(3));
/// assert_eq!(rows.unwrap(), 3);
///
/// let spans = backend.finished_spans();
/// assert_eq!(spans[0].name, "table.list");
/// assert_eq!(spans[0].status, Some(StatusCode::Ok));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    finished: Arc<Mutex<Vec<FinishedSpan>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all spans ended so far, in end order
    pub fn finished_spans(&self) -> Vec<FinishedSpan> {
        lock(&self.finished).clone()
    }

    /// Drop all collected spans
    pub fn reset(&self) {
        lock(&self.finished).clear();
    }
}

fn lock(storage: &Mutex<Vec<FinishedSpan>>) -> MutexGuard<'_, Vec<FinishedSpan>> {
    storage.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TraceBackend for InMemoryBackend {
    type Span = InMemorySpan;

    fn start_span(&self, name: &str, attributes: Attributes) -> Self::Span {
        InMemorySpan {
            data: FinishedSpan {
                name: name.to_string(),
                attributes,
                status: None,
            },
            sink: Arc::clone(&self.finished),
        }
    }
}

/// Span handle for [`InMemoryBackend`]; pushed to storage on drop
#[derive(Debug)]
pub struct InMemorySpan {
    data: FinishedSpan,
    sink: Arc<Mutex<Vec<FinishedSpan>>>,
}

impl InMemorySpan {
    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.data.attributes
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.data.status
    }
}

impl SpanHandle for InMemorySpan {
    fn set_attribute(&mut self, key: &str, value: AttributeValue) {
        self.data.attributes.insert(key, value);
    }

    fn set_status(&mut self, status: StatusCode) {
        self.data.status = Some(status);
    }
}

impl Drop for InMemorySpan {
    fn drop(&mut self) {
        let data = std::mem::take(&mut self.data);
        lock(&self.sink).push(data);
    }
}
