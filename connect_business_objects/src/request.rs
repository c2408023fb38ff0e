//! Façade over the top-level change/order document.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::Document;
use crate::asset::Asset;
use crate::capabilities::{
    BusinessObject, DocumentSource, HasContract, HasEvents, HasMarketplace, HasParameters,
    format_timestamp,
};
use crate::error::{DocumentError, DocumentResult, json_type_name};
use crate::merge::{merge_at, object_at};
use crate::model::{RequestModel, request_model};
use crate::tier_config::TierConfiguration;

/// The top-level change/order document submitted against a subscription.
///
/// A request is classified as an asset request (purchase, change, cancel,
/// ...) or a tier-config request (setup); see [`Request::request_model`].
/// All builder methods return `&mut Self` so calls chain. Statuses and
/// types are opaque platform vocabulary; no transition is enforced.
///
/// ```rust
/// use connect_business_objects::{HasParameters, ParamUpdate, Request};
///
/// let mut request = Request::new();
/// request
///     .with_id("PR-001")
///     .with_request_type("purchase")
///     .with_status("pending")
///     .with_param(ParamUpdate::new("P_001").value("V1"));
///
/// assert!(request.is_asset_request());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Request {
    document: Document,
}

// Decoding accepts the same shapes as `TryFrom<Value>`: an object, or null
// for an empty request.
impl<'de> Deserialize<'de> for Request {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = Option::<Document>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self { document })
    }
}

impl Request {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the façade, returning the underlying document.
    #[must_use]
    pub fn into_inner(self) -> Document {
        self.document
    }

    /// Returns this request's id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.document.get("id").and_then(Value::as_str)
    }

    /// Sets this request's id.
    pub fn with_id(&mut self, id: &str) -> &mut Self {
        self.with_field("id", id)
    }

    /// Returns the request type (purchase, change, cancel, setup, ...).
    #[must_use]
    pub fn request_type(&self) -> Option<&str> {
        self.document.get("type").and_then(Value::as_str)
    }

    /// Sets the request type.
    pub fn with_request_type(&mut self, request_type: &str) -> &mut Self {
        self.with_field("type", request_type)
    }

    /// Returns the request status (pending, approved, failed, ...).
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.document.get("status").and_then(Value::as_str)
    }

    /// Sets the request status.
    pub fn with_status(&mut self, status: &str) -> &mut Self {
        self.with_field("status", status)
    }

    /// Returns the note attached to the request.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.document.get("note").and_then(Value::as_str)
    }

    /// Sets the note attached to the request.
    pub fn with_note(&mut self, note: &str) -> &mut Self {
        self.with_field("note", note)
    }

    /// Returns the reason attached to the request.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.document.get("reason").and_then(Value::as_str)
    }

    /// Sets the reason attached to the request.
    pub fn with_reason(&mut self, reason: &str) -> &mut Self {
        self.with_field("reason", reason)
    }

    /// Returns the creation timestamp, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidTimestamp`] when the field holds
    /// anything but a valid RFC 3339 string.
    pub fn created(&self) -> DocumentResult<Option<OffsetDateTime>> {
        self.timestamp("created")
    }

    /// Sets the creation timestamp, stored as RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::TimestampFormat`] when the timestamp
    /// cannot be rendered.
    pub fn with_created(&mut self, created: OffsetDateTime) -> DocumentResult<&mut Self> {
        let rendered = format_timestamp("created", created)?;
        Ok(self.with_field("created", rendered))
    }

    /// Returns the last-update timestamp, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidTimestamp`] when the field holds
    /// anything but a valid RFC 3339 string.
    pub fn updated(&self) -> DocumentResult<Option<OffsetDateTime>> {
        self.timestamp("updated")
    }

    /// Sets the last-update timestamp, stored as RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::TimestampFormat`] when the timestamp
    /// cannot be rendered.
    pub fn with_updated(&mut self, updated: OffsetDateTime) -> DocumentResult<&mut Self> {
        let rendered = format_timestamp("updated", updated)?;
        Ok(self.with_field("updated", rendered))
    }

    fn timestamp(&self, field: &'static str) -> DocumentResult<Option<OffsetDateTime>> {
        let Some(value) = self.document.get(field) else {
            return Ok(None);
        };
        if value.is_null() {
            return Ok(None);
        }
        let text = value
            .as_str()
            .ok_or(DocumentError::InvalidTimestamp { field, source: None })?;
        OffsetDateTime::parse(text, &Rfc3339)
            .map(Some)
            .map_err(|source| DocumentError::InvalidTimestamp {
                field,
                source: Some(source),
            })
    }

    /// Returns the assignee sub-object, `None` when absent.
    #[must_use]
    pub fn assignee(&self) -> Option<&Document> {
        object_at(&self.document, "assignee")
    }

    /// Deep-merges the assignee's id, name and email into the document.
    pub fn with_assignee(&mut self, id: &str, name: &str, email: &str) -> &mut Self {
        let mut patch = Document::new();
        patch.insert("id".to_owned(), Value::String(id.to_owned()));
        patch.insert("name".to_owned(), Value::String(name.to_owned()));
        patch.insert("email".to_owned(), Value::String(email.to_owned()));
        merge_at(&mut self.document, "assignee", &patch);
        self
    }

    /// Classifies this request (see [`request_model`]).
    #[must_use]
    pub fn request_model(&self) -> RequestModel {
        request_model(&self.document)
    }

    /// Whether this request addresses a subscription asset.
    #[must_use]
    pub fn is_asset_request(&self) -> bool {
        self.request_model() == RequestModel::Asset
    }

    /// Whether this request addresses a tier configuration.
    #[must_use]
    pub fn is_tier_config_request(&self) -> bool {
        self.request_model() == RequestModel::TierConfig
    }

    /// Returns a façade over a copy of the embedded asset, empty when the
    /// request carries none. Write it back with [`Request::with_asset`].
    #[must_use]
    pub fn asset(&self) -> Asset {
        object_at(&self.document, "asset")
            .cloned()
            .map(Asset::from)
            .unwrap_or_default()
    }

    /// Replaces the embedded asset document.
    pub fn with_asset(&mut self, asset: impl Into<Asset>) -> &mut Self {
        self.with_field("asset", Value::Object(asset.into().into_inner()))
    }

    /// Returns a façade over a copy of the embedded tier configuration
    /// (stored under `configuration`), empty when the request carries
    /// none. Write it back with [`Request::with_tier_configuration`].
    #[must_use]
    pub fn tier_configuration(&self) -> TierConfiguration {
        object_at(&self.document, "configuration")
            .cloned()
            .map(TierConfiguration::from)
            .unwrap_or_default()
    }

    /// Replaces the embedded tier configuration document.
    pub fn with_tier_configuration(
        &mut self,
        configuration: impl Into<TierConfiguration>,
    ) -> &mut Self {
        self.with_field(
            "configuration",
            Value::Object(configuration.into().into_inner()),
        )
    }
}

impl DocumentSource for Request {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

impl BusinessObject for Request {}
impl HasMarketplace for Request {}
impl HasParameters for Request {}
impl HasContract for Request {}
impl HasEvents for Request {}

impl From<Document> for Request {
    fn from(document: Document) -> Self {
        Self { document }
    }
}

impl TryFrom<Value> for Request {
    type Error = DocumentError;

    /// Accepts a JSON object (or null, yielding an empty request); any
    /// other value is rejected.
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

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.document).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
