// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for span instrumentation
//!
//! This module controls whether instrumentation is active and which default
//! attributes every span starts from.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use bigquery_tracing::TracingConfig;
//!
//! // Enabled, `db.system = "bigquery"`
//! let config = TracingConfig::default();
//! assert!(config.enabled);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use bigquery_tracing::TracingConfigBuilder;
//!
//! let config = TracingConfigBuilder::new()
//!     .system("bigquery-omni")
//!     .attribute("service.name", "billing-exporter")
//!     .build();
//! ```
//!
//! # Example: From the environment
//!
//! ```rust,no_run
//! use bigquery_tracing::TracingConfig;
//!
//! // Reads BIGQUERY_TRACING_ENABLED and BIGQUERY_TRACING_SYSTEM
//! let config = TracingConfig::from_env()?;
//! # Ok::<(), bigquery_tracing::ConfigError>(())
//! ```

use std::env::VarError;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeValue, Attributes};
use crate::errors::ConfigError;

pub mod constants;

use constants::{keys, DEFAULT_SYSTEM, ENV_ENABLED, ENV_SYSTEM};

/// Configuration for span instrumentation
///
/// Use [`TracingConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Whether spans are created at all
    /// Default: true
    pub enabled: bool,

    /// Value of the `db.system` attribute
    /// Default: "bigquery"
    pub system: String,

    /// Extra attributes added to every span, after `db.system`
    pub default_attributes: Attributes,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            system: DEFAULT_SYSTEM.to_string(),
            default_attributes: Attributes::new(),
        }
    }
}

impl TracingConfig {
    /// Config with instrumentation switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Load overrides from the process environment
    ///
    /// Variables are read through `dotenvy`, so the first call also loads a
    /// `.env` file from the working directory (or its nearest ancestor) into
    /// the process environment. Unset variables keep their defaults; a set
    /// but unreadable or unparsable value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key))
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, dotenvy::Error>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = read_var(&lookup, ENV_ENABLED)? {
            config.enabled = parse_bool(&raw).ok_or(ConfigError::InvalidEnvValue {
                key: ENV_ENABLED,
                value: raw,
            })?;
        }

        if let Some(system) = read_var(&lookup, ENV_SYSTEM)? {
            let system = system.trim();
            if system.is_empty() {
                return Err(ConfigError::InvalidEnvValue {
                    key: ENV_SYSTEM,
                    value: system.to_string(),
                });
            }
            config.system = system.to_string();
        }

        Ok(config)
    }

    /// Load a JSON config file
    ///
    /// Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The base attribute map every span starts from
    ///
    /// `db.system` first, then [`default_attributes`](Self::default_attributes),
    /// which may override it.
    pub fn base_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(keys::DB_SYSTEM, self.system.as_str());
        attributes.merge(self.default_attributes.clone());
        attributes
    }
}

/// `Ok(None)` only when the variable is not set at all
fn read_var(
    lookup: &impl Fn(&str) -> Result<String, dotenvy::Error>,
    key: &'static str,
) -> Result<Option<String>, ConfigError> {
    match lookup(key) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(dotenvy::Error::EnvVar(VarError::NotUnicode(raw))) => {
            Err(ConfigError::InvalidEnvValue {
                key,
                value: raw.to_string_lossy().into_owned(),
            })
        }
        Err(other) => Err(ConfigError::InvalidEnvValue {
            key,
            value: other.to_string(),
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for [`TracingConfig`]
///
/// # Example
///
/// ```rust
/// use bigquery_tracing::TracingConfigBuilder;
///
/// let config = TracingConfigBuilder::new()
///     .enabled(false)
///     .build();
/// assert!(!config.enabled);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingConfigBuilder {
    config: TracingConfig,
}

impl TracingConfigBuilder {
    /// Start from [`TracingConfig::default`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing config, e.g. one loaded with
    /// [`TracingConfig::from_env`]
    pub fn from_config(config: TracingConfig) -> Self {
        Self { config }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the `db.system` attribute value
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.config.system = system.into();
        self
    }

    /// Add one default attribute
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.config.default_attributes.insert(key, value);
        self
    }

    /// Merge a set of default attributes (later wins)
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.config.default_attributes.merge(attributes);
        self
    }

    pub fn build(self) -> TracingConfig {
        self.config
    }
}
