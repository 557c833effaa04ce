// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for bigquery-tracing integration tests
//!
//! Provides a collecting `tracing_subscriber::Layer` so spans emitted by the
//! `tracing` backend can be asserted on, plus fake client/job types that
//! implement the capability traits by hand.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use bigquery_tracing::{ClientInfo, ErrorProto, JobInfo};
use chrono::{DateTime, Utc};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

/// A span as seen by the collector
#[derive(Debug, Clone, Default)]
pub struct CapturedSpan {
    pub name: String,
    pub target: String,
    pub fields: HashMap<String, String>,
    pub closed: bool,
}

impl CapturedSpan {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// An event together with the name of the span it was emitted in
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub message: String,
    pub span: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    spans: Vec<CapturedSpan>,
    /// Span ids are reused by the registry, so map each id to its latest span
    index: HashMap<u64, usize>,
    events: Vec<CapturedEvent>,
}

/// Shared storage for everything a [`CollectingLayer`] saw
#[derive(Debug, Clone, Default)]
pub struct Collected(Arc<Mutex<Inner>>);

impl Collected {
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.0.lock().unwrap().spans.clone()
    }

    pub fn spans_named(&self, otel_name: &str) -> Vec<CapturedSpan> {
        self.spans()
            .into_iter()
            .filter(|s| s.field("otel.name") == Some(otel_name))
            .collect()
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().unwrap().events.clone()
    }
}

/// Layer that records span fields (including later `record` calls) and events
#[derive(Debug, Default)]
pub struct CollectingLayer(Collected);

impl CollectingLayer {
    pub fn new(collected: Collected) -> Self {
        Self(collected)
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S> Layer<S> for CollectingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));

        let mut inner = self.0 .0.lock().unwrap();
        let position = inner.spans.len();
        inner.spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            target: attrs.metadata().target().to_string(),
            fields,
            closed: false,
        });
        inner.index.insert(id.into_u64(), position);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut inner = self.0 .0.lock().unwrap();
        let position = inner.index.get(&id.into_u64()).copied();
        if let Some(position) = position {
            values.record(&mut FieldVisitor(&mut inner.spans[position].fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let span = ctx.lookup_current().and_then(|current| {
            let inner = self.0 .0.lock().unwrap();
            let name = inner
                .index
                .get(&current.id().into_u64())
                .and_then(|&position| inner.spans[position].field("otel.name"))
                .map(str::to_string);
            name
        });

        self.0 .0.lock().unwrap().events.push(CapturedEvent {
            message: fields.remove("message").unwrap_or_default(),
            span,
        });
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        let mut inner = self.0 .0.lock().unwrap();
        let position = inner.index.get(&id.into_u64()).copied();
        if let Some(position) = position {
            inner.spans[position].closed = true;
        }
    }
}

/// A subscriber that collects into the returned storage
pub fn collecting_subscriber() -> (impl Subscriber + Send + Sync, Collected) {
    let collected = Collected::default();
    let subscriber = Registry::default().with(CollectingLayer::new(collected.clone()));
    (subscriber, collected)
}

/// Client type implementing [`ClientInfo`] by hand
pub struct FakeClient {
    pub project: String,
    pub location: String,
}

impl FakeClient {
    pub fn new(project: &str, location: &str) -> Self {
        Self {
            project: project.to_string(),
            location: location.to_string(),
        }
    }
}

impl ClientInfo for FakeClient {
    fn project(&self) -> &str {
        &self.project
    }

    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
}

/// Job type implementing only the required parts of [`JobInfo`]
pub struct FakeJob {
    pub project: String,
    pub location: String,
    pub job_id: String,
    pub state: Option<String>,
}

impl FakeJob {
    pub fn new(project: &str, location: &str, job_id: &str) -> Self {
        Self {
            project: project.to_string(),
            location: location.to_string(),
            job_id: job_id.to_string(),
            state: None,
        }
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }
}

impl ClientInfo for FakeJob {
    fn project(&self) -> &str {
        &self.project
    }

    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
}

impl JobInfo for FakeJob {
    fn job_id(&self) -> &str {
        &self.job_id
    }

    fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}

/// Client and job that counts every metadata read
///
/// Used to check that a disabled creator never reads metadata.
#[derive(Default)]
pub struct CountingResource {
    reads: Cell<usize>,
}

impl CountingResource {
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    fn read(&self) {
        self.reads.set(self.reads.get() + 1);
    }
}

impl ClientInfo for CountingResource {
    fn project(&self) -> &str {
        self.read();
        "counted_project"
    }

    fn location(&self) -> Option<&str> {
        self.read();
        Some("US")
    }
}

impl JobInfo for CountingResource {
    fn job_id(&self) -> &str {
        self.read();
        "counted_job"
    }

    fn num_child_jobs(&self) -> u64 {
        self.read();
        0
    }

    fn parent_job_id(&self) -> Option<&str> {
        self.read();
        None
    }

    fn created(&self) -> Option<DateTime<Utc>> {
        self.read();
        None
    }

    fn started(&self) -> Option<DateTime<Utc>> {
        self.read();
        None
    }

    fn ended(&self) -> Option<DateTime<Utc>> {
        self.read();
        None
    }

    fn errors(&self) -> Option<&[ErrorProto]> {
        self.read();
        None
    }

    fn error_result(&self) -> Option<&ErrorProto> {
        self.read();
        None
    }

    fn state(&self) -> Option<&str> {
        self.read();
        None
    }
}
