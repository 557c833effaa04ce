// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for SpanCreator against the in-memory backend
//!
//! Tests focus on:
//! - No-op behavior when no backend is available
//! - Attribute precedence (defaults < client/job < call site)
//! - Status recording for success, recognized and unrecognized failures
//! - Errors always reaching the caller unchanged

mod helpers;

use std::panic::{catch_unwind, AssertUnwindSafe};

use bigquery_tracing::{
    ApiError, AttributeValue, Attributes, ClientRef, FinishedSpan, InMemoryBackend, JobRef,
    SpanCreator, SpanOptions, StatusCode, TracingConfig,
};
use helpers::{CountingResource, FakeClient, FakeJob};

const TEST_SPAN_NAME: &str = "bar";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn test_span_attributes() -> Attributes {
    [("foo", "baz")].into_iter().collect()
}

fn setup() -> (InMemoryBackend, SpanCreator<InMemoryBackend>) {
    let backend = InMemoryBackend::new();
    (backend.clone(), SpanCreator::enabled(backend))
}

fn only_span(backend: &InMemoryBackend) -> FinishedSpan {
    let mut spans = backend.finished_spans();
    assert_eq!(spans.len(), 1, "Expected exactly one finished span");
    spans.remove(0)
}

#[test]
fn test_tracing_unavailable_yields_noop() {
    let creator = SpanCreator::<InMemoryBackend>::new(None);
    let client = ClientRef::new("p").with_location("US");
    let job = JobRef::new("p", "j");

    let combinations = [
        SpanOptions::new(),
        SpanOptions::new().attributes(test_span_attributes()),
        SpanOptions::new().client(&client),
        SpanOptions::new().job(&job),
        SpanOptions::new().client(&client).job(&job),
    ];

    for options in combinations {
        let scope = creator.create("No-op for tracing", options);
        assert!(!scope.is_recording());
        assert!(scope.span().is_none());
        assert_eq!(scope.status(), None);
    }
}

#[test]
fn test_unavailable_tracing_reads_no_metadata() {
    let creators = [
        SpanCreator::<InMemoryBackend>::disabled(),
        SpanCreator::from_config(&TracingConfig::disabled(), Some(InMemoryBackend::new())),
    ];

    for creator in creators {
        let client = CountingResource::default();
        let job = CountingResource::default();

        drop(creator.create("noop", SpanOptions::new().client(&client)));
        drop(creator.create("noop", SpanOptions::new().job(&job)));
        drop(creator.create("noop", SpanOptions::new().client(&client).job(&job)));

        let result: Result<(), ApiError> = creator.in_span(
            "noop",
            SpanOptions::new().client(&client).job(&job),
            |_| Ok(()),
        );
        assert!(result.is_ok());

        assert_eq!(client.reads(), 0);
        assert_eq!(job.reads(), 0);
    }
}

#[test]
fn test_enabled_tracing_reads_metadata() {
    let (_, creator) = setup();
    let job = CountingResource::default();

    drop(creator.create("job.get", SpanOptions::new().job(&job)));

    assert!(job.reads() > 0);
}

#[test]
fn test_noop_in_span_still_returns_result() {
    let creator = SpanCreator::<InMemoryBackend>::disabled();

    let ok: Result<u32, ApiError> = creator.in_span("op", SpanOptions::new(), |_| Ok(7));
    assert_eq!(ok.unwrap(), 7);

    let err: Result<u32, ApiError> =
        creator.in_span("op", SpanOptions::new(), |_| Err(ApiError::not_found("gone")));
    assert_eq!(err.unwrap_err().code(), Some(404));
}

#[test]
fn test_success() {
    let (backend, creator) = setup();

    let result: Result<(), ApiError> = creator.in_span(
        TEST_SPAN_NAME,
        SpanOptions::new().attributes(test_span_attributes()),
        |scope| {
            assert!(scope.is_recording());
            Ok(())
        },
    );
    assert!(result.is_ok());

    let expected: Attributes = [("foo", "baz"), ("db.system", "bigquery")]
        .into_iter()
        .collect();
    let span = only_span(&backend);
    assert_eq!(span.name, TEST_SPAN_NAME);
    assert_eq!(span.attributes, expected);
    assert_eq!(span.status, Some(StatusCode::Ok));
}

#[test]
fn test_default_client_attributes() {
    let (backend, creator) = setup();
    let client = FakeClient::new("test_project", "test_location");

    let _: Result<(), ApiError> = creator.in_span(
        TEST_SPAN_NAME,
        SpanOptions::new()
            .attributes(test_span_attributes())
            .client(&client),
        |_| Ok(()),
    );

    let expected: Attributes = [
        ("foo", "baz"),
        ("db.system", "bigquery"),
        ("db.name", "test_project"),
        ("location", "test_location"),
    ]
    .into_iter()
    .collect();
    assert_eq!(only_span(&backend).attributes, expected);
}

#[test]
fn test_default_job_attributes() {
    let (backend, creator) = setup();
    let job = FakeJob::new("test_project_id", "test_location", "test_job_id");

    let _: Result<(), ApiError> = creator.in_span(
        TEST_SPAN_NAME,
        SpanOptions::new()
            .attributes(test_span_attributes())
            .job(&job),
        |_| Ok(()),
    );

    let expected: Attributes = [
        ("db.system", "bigquery"),
        ("db.name", "test_project_id"),
        ("location", "test_location"),
        ("num_child_jobs", "0"),
        ("job_id", "test_job_id"),
        ("foo", "baz"),
    ]
    .into_iter()
    .collect();
    assert_eq!(only_span(&backend).attributes, expected);
}

#[test]
fn test_job_get_scenario() {
    let (backend, creator) = setup();
    let job = JobRef::new("my-project", "abc").with_state("DONE");

    let result: Result<&str, ApiError> =
        creator.in_span("job.get", SpanOptions::new().job(&job), |_| Ok("done"));
    assert_eq!(result.unwrap(), "done");

    let span = only_span(&backend);
    assert_eq!(span.name, "job.get");
    assert_eq!(span.attributes.get("job_id"), Some(&AttributeValue::from("abc")));
    assert_eq!(span.attributes.get("state"), Some(&AttributeValue::from("DONE")));
    assert_eq!(
        span.attributes.get("db.system"),
        Some(&AttributeValue::from("bigquery"))
    );
    assert_eq!(span.status, Some(StatusCode::Ok));
}

#[test]
fn test_client_and_job_uses_client_only() {
    let (backend, creator) = setup();
    let client = FakeClient::new("client_project", "US");
    let job = FakeJob::new("job_project", "EU", "job_1").with_state("RUNNING");

    let _: Result<(), ApiError> = creator.in_span(
        TEST_SPAN_NAME,
        SpanOptions::new().client(&client).job(&job),
        |_| Ok(()),
    );

    let expected: Attributes = [
        ("db.system", "bigquery"),
        ("db.name", "client_project"),
        ("location", "US"),
    ]
    .into_iter()
    .collect();
    assert_eq!(only_span(&backend).attributes, expected);
}

#[test]
fn test_call_site_attributes_override_everything() {
    let (backend, creator) = setup();
    let job = FakeJob::new("job_project", "EU", "job_1").with_state("RUNNING");

    let _: Result<(), ApiError> = creator.in_span(
        TEST_SPAN_NAME,
        SpanOptions::new()
            .job(&job)
            .attribute("db.system", "other")
            .attribute("state", "DONE")
            .attribute("location", "US"),
        |_| Ok(()),
    );

    let span = only_span(&backend);
    assert_eq!(span.attributes.get("db.system"), Some(&AttributeValue::from("other")));
    assert_eq!(span.attributes.get("state"), Some(&AttributeValue::from("DONE")));
    assert_eq!(span.attributes.get("location"), Some(&AttributeValue::from("US")));
    assert_eq!(span.attributes.get("job_id"), Some(&AttributeValue::from("job_1")));
}

#[test]
fn test_attributes_do_not_leak_between_calls() {
    let (backend, creator) = setup();
    let client = FakeClient::new("first_project", "US");

    let _: Result<(), ApiError> = creator.in_span(
        "first",
        SpanOptions::new()
            .client(&client)
            .attributes(test_span_attributes()),
        |_| Ok(()),
    );
    let _: Result<(), ApiError> = creator.in_span("second", SpanOptions::new(), |_| Ok(()));

    let spans = backend.finished_spans();
    assert_eq!(spans.len(), 2);
    let expected: Attributes = [("db.system", "bigquery")].into_iter().collect();
    assert_eq!(spans[1].name, "second");
    assert_eq!(spans[1].attributes, expected);
}

#[test]
fn test_not_found_records_status_and_propagates() {
    let (backend, creator) = setup();

    let result: Result<(), ApiError> = creator.in_span(TEST_SPAN_NAME, SpanOptions::new(), |_| {
        Err(ApiError::with_code(404, "Not found: Dataset p:d"))
    });

    let error = result.unwrap_err();
    assert_eq!(error.code(), Some(404));
    assert_eq!(error.message(), "Not found: Dataset p:d");
    assert_eq!(only_span(&backend).status, Some(StatusCode::NotFound));
}

#[test]
fn test_server_error_maps_to_internal() {
    let (backend, creator) = setup();

    let result: Result<(), ApiError> = creator.in_span(TEST_SPAN_NAME, SpanOptions::new(), |_| {
        Err(ApiError::with_code(500, "backendError"))
    });

    assert!(result.is_err());
    assert_eq!(only_span(&backend).status, Some(StatusCode::Internal));
}

#[test]
fn test_boxed_api_error_is_recognized() {
    let (backend, creator) = setup();

    let result: Result<(), BoxError> = creator.in_span(TEST_SPAN_NAME, SpanOptions::new(), |_| {
        Err(Box::new(ApiError::with_code(429, "rateLimitExceeded")) as BoxError)
    });

    assert!(result.is_err());
    assert_eq!(only_span(&backend).status, Some(StatusCode::ResourceExhausted));
}

#[test]
fn test_unrecognized_failure_propagates_without_status() {
    let (backend, creator) = setup();

    let result: Result<(), std::io::Error> = creator.in_span(TEST_SPAN_NAME, SpanOptions::new(), |_| {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
    });

    let error = result.unwrap_err();
    assert_eq!(error.kind(), std::io::ErrorKind::BrokenPipe);
    assert_eq!(error.to_string(), "pipe closed");
    assert_eq!(only_span(&backend).status, None);
}

#[test]
fn test_panic_still_ends_span() {
    let (backend, creator) = setup();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _: Result<(), ApiError> =
            creator.in_span(TEST_SPAN_NAME, SpanOptions::new(), |_| panic!("boom"));
    }));

    assert!(outcome.is_err());
    let span = only_span(&backend);
    assert_eq!(span.name, TEST_SPAN_NAME);
    assert_eq!(span.status, None);
}

#[test]
fn test_attribute_added_inside_block() {
    let (backend, creator) = setup();

    let _: Result<(), ApiError> = creator.in_span(TEST_SPAN_NAME, SpanOptions::new(), |scope| {
        scope.set_attribute("rows", 42i64);
        Ok(())
    });

    assert_eq!(
        only_span(&backend).attributes.get("rows"),
        Some(&AttributeValue::Int(42))
    );
}

#[tokio::test]
async fn test_async_success_and_failure() {
    let (backend, creator) = setup();
    let job = JobRef::new("p", "async_job");

    let ok: Result<u64, ApiError> = creator
        .in_span_async("job.result", SpanOptions::new().job(&job), async { Ok(10) })
        .await;
    assert_eq!(ok.unwrap(), 10);

    let err: Result<u64, ApiError> = creator
        .in_span_async("job.result", SpanOptions::new().job(&job), async {
            Err(ApiError::with_code(403, "accessDenied"))
        })
        .await;
    assert_eq!(err.unwrap_err().code(), Some(403));

    let spans = backend.finished_spans();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].status, Some(StatusCode::Ok));
    assert_eq!(spans[1].status, Some(StatusCode::PermissionDenied));
    assert_eq!(
        spans[1].attributes.get("job_id"),
        Some(&AttributeValue::from("async_job"))
    );
}

#[tokio::test]
async fn test_dropped_future_ends_span_without_status() {
    let (backend, creator) = setup();

    let fut = creator.in_span_async(TEST_SPAN_NAME, SpanOptions::new(), async {
        Ok::<(), ApiError>(())
    });
    drop(fut);

    assert_eq!(only_span(&backend).status, None);
}
