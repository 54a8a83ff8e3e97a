//! Per-entity metadata supplied when an adapter is built.
//!
//! The category arrives as a raw string from the platform tables and is
//! validated here, once; adapters only ever see the parsed enum.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumString;

use crate::error::Error;
use crate::error::Result;

/// Classification of a non-primary entity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    /// Changes the configuration of a device.
    Config,
    /// Exposes configuration or diagnostics of a device without allowing changes.
    Diagnostic,
}

/// Scalar value of an extra state attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

pub type Attributes = BTreeMap<String, AttrValue>;

/// Metadata record ("meta") attached to an entity adapter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub category: Option<EntityCategory>,
    #[serde(default)]
    pub attrs: Attributes,
}

impl Meta {
    /// Build a record from a raw category string, failing fast on values the
    /// host does not recognise.
    pub fn new(category: Option<&str>, attrs: Attributes) -> Result<Self> {
        let category = category
            .map(|raw| {
                EntityCategory::from_str(raw).map_err(|_| Error::InvalidCategory(raw.to_string()))
            })
            .transpose()?;
        Ok(Self { category, attrs })
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}
