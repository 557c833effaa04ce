// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for loading [`TracingConfig`](crate::TracingConfig).

use std::path::PathBuf;

/// Errors that can occur while loading tracing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but cannot be parsed.
    #[error("Invalid value {value:?} for environment variable {key}")]
    InvalidEnvValue {
        /// Name of the variable
        key: &'static str,
        /// The raw value found
        value: String,
    },

    /// The config file could not be read.
    #[error("Failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`TracingConfig`](crate::TracingConfig).
    #[error("Failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
