//! Façade over a reseller/customer tier setup document.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::capabilities::{
    BusinessObject, DocumentSource, HasConfiguration, HasConnection, HasMarketplace,
    HasParameters, HasProduct,
};
use crate::error::{DocumentError, DocumentResult, json_type_name};
use crate::fixtures::write_party;
use crate::merge::object_at;
use crate::{Document, TierSource};

/// A reseller/customer tier setup document, analogous in shape to an
/// asset: product, marketplace, connection, parameters and configuration
/// parameters, plus the account being set up and its tier level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierConfiguration {
    document: Document,
}

// Decoding accepts the same shapes as `TryFrom<Value>`: an object, or null
// for an empty configuration.
impl<'de> Deserialize<'de> for TierConfiguration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = Option::<Document>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self { document })
    }
}

impl TierConfiguration {
    /// Creates an empty tier configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the façade, returning the underlying document.
    #[must_use]
    pub fn into_inner(self) -> Document {
        self.document
    }

    /// Returns this configuration's id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.document.get("id").and_then(Value::as_str)
    }

    /// Sets this configuration's id.
    pub fn with_id(&mut self, id: &str) -> &mut Self {
        self.with_field("id", id)
    }

    /// Returns the configuration status.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.document.get("status").and_then(Value::as_str)
    }

    /// Sets the configuration status.
    pub fn with_status(&mut self, status: &str) -> &mut Self {
        self.with_field("status", status)
    }

    /// Returns the tier level being configured.
    #[must_use]
    pub fn tier_level(&self) -> Option<i64> {
        self.document.get("tier_level").and_then(Value::as_i64)
    }

    /// Sets the tier level being configured.
    pub fn with_tier_level(&mut self, level: i64) -> &mut Self {
        self.with_field("tier_level", level)
    }

    /// Returns the account sub-object, `None` when absent.
    #[must_use]
    pub fn account(&self) -> Option<&Document> {
        object_at(&self.document, "account")
    }

    /// Writes the account following [`TierSource`] semantics; a random
    /// source synthesizes reseller placeholder data.
    pub fn with_account(&mut self, source: impl Into<TierSource>) -> &mut Self {
        write_party(&mut self.document, "account", source.into(), "reseller");
        self
    }
}

impl DocumentSource for TierConfiguration {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

impl BusinessObject for TierConfiguration {}
impl HasProduct for TierConfiguration {}
impl HasMarketplace for TierConfiguration {}
impl HasConnection for TierConfiguration {}
impl HasParameters for TierConfiguration {}
impl HasConfiguration for TierConfiguration {}

impl From<Document> for TierConfiguration {
    fn from(document: Document) -> Self {
        Self { document }
    }
}

impl TryFrom<Value> for TierConfiguration {
    type Error = DocumentError;

    /// Accepts a JSON object (or null, yielding an empty configuration);
    /// any other value is rejected.
    fn try_from(value: Value) -> DocumentResult<Self> {
        match value {
            Value::Object(document) => Ok(Self { document }),
            Value::Null => Ok(Self::default()),
            other => Err(DocumentError::InvalidDocument {
                found: json_type_name(&other),
            }),
        }
    }
}

impl fmt::Display for TierConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.document).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
