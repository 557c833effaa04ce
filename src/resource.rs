// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Client and job metadata sources
//!
//! The span creator reads metadata through two small capability traits,
//! [`ClientInfo`] and [`JobInfo`], so any client or job type can be traced
//! without depending on a concrete BigQuery SDK. [`ClientRef`] and
//! [`JobRef`] are plain carriers for callers that don't have their own types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::config::constants::{keys, TRACING_TARGET};

/// Anything that knows which project and location it talks to
pub trait ClientInfo {
    fn project(&self) -> &str;

    fn location(&self) -> Option<&str> {
        None
    }
}

/// A job reference with its execution statistics
///
/// Optional accessors default to "absent"; absent values are left out of the
/// attribute map rather than recorded as empty strings.
pub trait JobInfo: ClientInfo {
    fn job_id(&self) -> &str;

    fn num_child_jobs(&self) -> u64 {
        0
    }

    fn parent_job_id(&self) -> Option<&str> {
        None
    }

    fn created(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn started(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn ended(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn errors(&self) -> Option<&[ErrorProto]> {
        None
    }

    fn error_result(&self) -> Option<&ErrorProto> {
        None
    }

    fn state(&self) -> Option<&str> {
        None
    }
}

/// Error detail as reported in a job's status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorProto {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            location: None,
            message: Some(message.into()),
        }
    }
}

/// Attributes derived from a client: `db.name` and `location`
pub fn client_attributes(client: &(impl ClientInfo + ?Sized)) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(keys::DB_NAME, client.project());
    attributes.insert_opt(keys::LOCATION, client.location());
    attributes
}

/// Attributes derived from a job: the client keys plus job statistics
///
/// `num_child_jobs` is recorded as a string; `errors` and `errorResult` as
/// compact JSON.
pub fn job_attributes(job: &(impl JobInfo + ?Sized)) -> Attributes {
    let mut attributes = client_attributes(job);
    attributes.insert(keys::NUM_CHILD_JOBS, job.num_child_jobs().to_string());
    attributes.insert(keys::JOB_ID, job.job_id());
    attributes.insert_opt(keys::PARENT_JOB_ID, job.parent_job_id());
    attributes.insert_opt(keys::TIME_CREATED, job.created());
    attributes.insert_opt(keys::TIME_STARTED, job.started());
    attributes.insert_opt(keys::TIME_ENDED, job.ended());
    attributes.insert_opt(keys::ERRORS, job.errors().and_then(to_json));
    attributes.insert_opt(keys::ERROR_RESULT, job.error_result().and_then(to_json));
    attributes.insert_opt(keys::STATE, job.state());
    attributes
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::debug!(
                target: TRACING_TARGET,
                error = %e,
                "Dropping attribute that failed to serialize"
            );
            None
        }
    }
}

/// Minimal client description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    pub project: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl ClientRef {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl ClientInfo for ClientRef {
    fn project(&self) -> &str {
        &self.project
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Minimal job description
///
/// Field names follow the job resource's JSON so a `jobReference` +
/// `statistics` + `status` blob can be flattened into it with serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRef {
    pub project_id: String,
    pub job_id: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub num_child_jobs: u64,
    #[serde(default)]
    pub parent_job_id: Option<String>,
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub errors: Option<Vec<ErrorProto>>,
    #[serde(default)]
    pub error_result: Option<ErrorProto>,
    #[serde(default)]
    pub state: Option<String>,
}

impl JobRef {
    pub fn new(project_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            job_id: job_id.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_parent(mut self, parent_job_id: impl Into<String>) -> Self {
        self.parent_job_id = Some(parent_job_id.into());
        self
    }

    pub fn with_child_jobs(mut self, count: u64) -> Self {
        self.num_child_jobs = count;
        self
    }

    pub fn with_times(
        mut self,
        created: Option<DateTime<Utc>>,
        started: Option<DateTime<Utc>>,
        ended: Option<DateTime<Utc>>,
    ) -> Self {
        self.creation_time = created;
        self.start_time = started;
        self.end_time = ended;
        self
    }

    pub fn with_errors(mut self, errors: Vec<ErrorProto>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_error_result(mut self, error: ErrorProto) -> Self {
        self.error_result = Some(error);
        self
    }
}

impl ClientInfo for JobRef {
    fn project(&self) -> &str {
        &self.project_id
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl JobInfo for JobRef {
    fn job_id(&self) -> &str {
        &self.job_id
    }

    fn num_child_jobs(&self) -> u64 {
        self.num_child_jobs
    }

    fn parent_job_id(&self) -> Option<&str> {
        self.parent_job_id.as_deref()
    }

    fn created(&self) -> Option<DateTime<Utc>> {
        self.creation_time
    }

    fn started(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    fn ended(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    fn errors(&self) -> Option<&[ErrorProto]> {
        self.errors.as_deref()
    }

    fn error_result(&self) -> Option<&ErrorProto> {
        self.error_result.as_ref()
    }

    fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}
