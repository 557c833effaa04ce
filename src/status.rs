// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical call-outcome status codes
//!
//! BigQuery reports failures with HTTP status codes. Traces carry the
//! canonical (gRPC-style) code instead, translated with the same table the
//! OpenTelemetry HTTP instrumentations use.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical status code recorded on a finished span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl StatusCode {
    /// Translate an HTTP status code into a canonical code
    ///
    /// Redirects (3xx) count as success.
    ///
    /// # Examples
    ///
    /// ```
    /// use bigquery_tracing::StatusCode;
    ///
    /// assert_eq!(StatusCode::from_http_status(200), StatusCode::Ok);
    /// assert_eq!(StatusCode::from_http_status(404), StatusCode::NotFound);
    /// assert_eq!(StatusCode::from_http_status(418), StatusCode::InvalidArgument);
    /// assert_eq!(StatusCode::from_http_status(502), StatusCode::Internal);
    /// ```
    pub const fn from_http_status(status: u16) -> Self {
        match status {
            0..=99 => StatusCode::Unknown,
            100..=399 => StatusCode::Ok,
            401 => StatusCode::Unauthenticated,
            403 => StatusCode::PermissionDenied,
            404 => StatusCode::NotFound,
            429 => StatusCode::ResourceExhausted,
            400..=499 => StatusCode::InvalidArgument,
            501 => StatusCode::Unimplemented,
            503 => StatusCode::Unavailable,
            504 => StatusCode::DeadlineExceeded,
            500..=599 => StatusCode::Internal,
            _ => StatusCode::Unknown,
        }
    }

    /// Canonical numeric value (`OK` = 0 ... `UNAUTHENTICATED` = 16)
    pub const fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Canonical name, e.g. `NOT_FOUND`
    pub const fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Cancelled => "CANCELLED",
            StatusCode::Unknown => "UNKNOWN",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::AlreadyExists => "ALREADY_EXISTS",
            StatusCode::PermissionDenied => "PERMISSION_DENIED",
            StatusCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
            StatusCode::FailedPrecondition => "FAILED_PRECONDITION",
            StatusCode::Aborted => "ABORTED",
            StatusCode::OutOfRange => "OUT_OF_RANGE",
            StatusCode::Unimplemented => "UNIMPLEMENTED",
            StatusCode::Internal => "INTERNAL",
            StatusCode::Unavailable => "UNAVAILABLE",
            StatusCode::DataLoss => "DATA_LOSS",
            StatusCode::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    pub const fn is_ok(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an integer is outside the canonical range 0..=16
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid canonical status code: {0}")]
pub struct InvalidStatusCode(pub i32);

impl TryFrom<i32> for StatusCode {
    type Error = InvalidStatusCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        const ALL: [StatusCode; 17] = [
            StatusCode::Ok,
            StatusCode::Cancelled,
            StatusCode::Unknown,
            StatusCode::InvalidArgument,
            StatusCode::DeadlineExceeded,
            StatusCode::NotFound,
            StatusCode::AlreadyExists,
            StatusCode::PermissionDenied,
            StatusCode::ResourceExhausted,
            StatusCode::FailedPrecondition,
            StatusCode::Aborted,
            StatusCode::OutOfRange,
            StatusCode::Unimplemented,
            StatusCode::Internal,
            StatusCode::Unavailable,
            StatusCode::DataLoss,
            StatusCode::Unauthenticated,
        ];

        usize::try_from(value)
            .ok()
            .and_then(|i| ALL.get(i).copied())
            .ok_or(InvalidStatusCode(value))
    }
}
