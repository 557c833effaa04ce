// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span attribute values and the attribute map
//!
//! [`Attributes`] is an ordered key/value map. Merging is last-writer-wins,
//! which is how defaults, client/job metadata and call-site overrides are
//! layered on top of each other.
//!
//! # Examples
//!
//! ```
//! use bigquery_tracing::{AttributeValue, Attributes};
//!
//! let mut attributes = Attributes::new();
//! attributes.insert("db.system", "bigquery");
//! attributes.merge([("db.system", "custom")].into_iter().collect());
//!
//! assert_eq!(
//!     attributes.get("db.system"),
//!     Some(&AttributeValue::from("custom"))
//! );
//! ```

use std::collections::{btree_map, BTreeMap};
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single attribute value
///
/// Serialized as a plain JSON literal, so a JSON config can use literals
/// directly. Timestamps serialize as their [`Display`](fmt::Display) text and
/// come back as strings; strings are never reinterpreted as timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireValue", into = "WireValue")]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Point in time, rendered as RFC 3339 with millisecond precision
    Timestamp(DateTime<Utc>),
    String(String),
}

impl AttributeValue {
    /// Returns the value as a string slice if it is a [`AttributeValue::String`]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(x) => write!(f, "{x}"),
            AttributeValue::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            AttributeValue::String(s) => f.write_str(s),
        }
    }
}

/// Serde representation of [`AttributeValue`]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireValue {
    Bool(bool),
    Int(i64),
    /// Only reached for integers above `i64::MAX`, which are rejected
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl TryFrom<WireValue> for AttributeValue {
    type Error = String;

    fn try_from(value: WireValue) -> Result<Self, Self::Error> {
        match value {
            WireValue::Bool(b) => Ok(AttributeValue::Bool(b)),
            WireValue::Int(i) => Ok(AttributeValue::Int(i)),
            WireValue::Unsigned(u) => Err(format!(
                "Integer attribute {u} does not fit in a signed 64-bit value"
            )),
            WireValue::Float(x) => Ok(AttributeValue::Float(x)),
            WireValue::String(s) => Ok(AttributeValue::String(s)),
        }
    }
}

impl From<AttributeValue> for WireValue {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Bool(b) => WireValue::Bool(b),
            AttributeValue::Int(i) => WireValue::Int(i),
            AttributeValue::Float(x) => WireValue::Float(x),
            timestamp @ AttributeValue::Timestamp(_) => WireValue::String(timestamp.to_string()),
            AttributeValue::String(s) => WireValue::String(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value.into())
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(value.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::Timestamp(value)
    }
}

/// Ordered attribute map
///
/// Keys are kept sorted so that rendered spans are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Insert a value only when it is present
    pub fn insert_opt<V: Into<AttributeValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.0.remove(key)
    }

    /// Merge `other` into `self`; entries from `other` win on collision
    pub fn merge(&mut self, other: Attributes) {
        self.0.extend(other.0);
    }

    /// Builder-style [`merge`](Self::merge)
    pub fn merged(mut self, other: Attributes) -> Self {
        self.merge(other);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttributeValue);
    type IntoIter = btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
