// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known attribute keys and constants
//!
//! This module centralizes the attribute keys written onto spans and the
//! environment variables read by [`TracingConfig::from_env`](super::TracingConfig::from_env).

/// Default value of the `db.system` attribute
pub const DEFAULT_SYSTEM: &str = "bigquery";

/// `tracing` target used for spans and log events emitted by this crate
pub const TRACING_TARGET: &str = "bigquery_tracing";

/// Environment variable toggling instrumentation (`true`/`false`, `1`/`0`)
pub const ENV_ENABLED: &str = "BIGQUERY_TRACING_ENABLED";

/// Environment variable overriding the `db.system` attribute
pub const ENV_SYSTEM: &str = "BIGQUERY_TRACING_SYSTEM";

/// Attribute keys written by the span creator
///
/// The mixed casing (`timeCreated`, `errorResult`) mirrors the field names of
/// the BigQuery job resource.
pub mod keys {
    /// Database system tag, always present on enabled spans
    pub const DB_SYSTEM: &str = "db.system";

    /// Project that owns the client or job
    pub const DB_NAME: &str = "db.name";

    /// Geographic location of the dataset or job
    pub const LOCATION: &str = "location";

    /// Number of child jobs spawned by a script job
    pub const NUM_CHILD_JOBS: &str = "num_child_jobs";

    pub const JOB_ID: &str = "job_id";

    pub const PARENT_JOB_ID: &str = "parent_job_id";

    pub const TIME_CREATED: &str = "timeCreated";

    pub const TIME_STARTED: &str = "timeStarted";

    pub const TIME_ENDED: &str = "timeEnded";

    /// JSON array of non-fatal job errors
    pub const ERRORS: &str = "errors";

    /// JSON object describing the fatal job error, if any
    pub const ERROR_RESULT: &str = "errorResult";

    pub const STATE: &str = "state";

    /// Every key above, in the order they are derived
    pub const ALL: [&str; 12] = [
        DB_SYSTEM,
        DB_NAME,
        LOCATION,
        NUM_CHILD_JOBS,
        JOB_ID,
        PARENT_JOB_ID,
        TIME_CREATED,
        TIME_STARTED,
        TIME_ENDED,
        ERRORS,
        ERROR_RESULT,
        STATE,
    ];
}
