//! Façade over a subscription asset document.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::capabilities::{
    BusinessObject, DocumentSource, HasConfiguration, HasConnection, HasContract, HasMarketplace,
    HasParameters, HasProduct,
};
use crate::error::{DocumentError, DocumentResult, json_type_name};
use crate::fixtures::write_party;
use crate::items::ItemUpdate;
use crate::merge::{find_by_id, find_by_id_mut, object_at, with_array, with_object};
use crate::params::{self, ParamUpdate};
use crate::{Document, TierSource};

/// A subscription instance with items, tiers and parameters.
///
/// Tiers live under a `tiers` sub-object keyed by role name (`customer`,
/// `tier1`, `tier2`); items are an ordered collection, each owning its own
/// scoped parameter list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Asset {
    document: Document,
}

// Decoding accepts the same shapes as `TryFrom<Value>`: an object, or null
// for an empty asset.
impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = Option::<Document>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self { document })
    }
}

impl Asset {
    /// Creates an empty asset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the façade, returning the underlying document.
    #[must_use]
    pub fn into_inner(self) -> Document {
        self.document
    }

    /// Returns this asset's id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.document.get("id").and_then(Value::as_str)
    }

    /// Sets this asset's id.
    pub fn with_id(&mut self, id: &str) -> &mut Self {
        self.with_field("id", id)
    }

    /// Returns the external id assigned by the commerce system.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.document.get("external_id").and_then(Value::as_str)
    }

    /// Sets the external id.
    pub fn with_external_id(&mut self, external_id: &str) -> &mut Self {
        self.with_field("external_id", external_id)
    }

    /// Returns the external uid assigned by the commerce system.
    #[must_use]
    pub fn external_uid(&self) -> Option<&str> {
        self.document.get("external_uid").and_then(Value::as_str)
    }

    /// Sets the external uid.
    pub fn with_external_uid(&mut self, external_uid: &str) -> &mut Self {
        self.with_field("external_uid", external_uid)
    }

    /// Returns the asset status (active, suspended, terminated, ...).
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.document.get("status").and_then(Value::as_str)
    }

    /// Sets the asset status.
    pub fn with_status(&mut self, status: &str) -> &mut Self {
        self.with_field("status", status)
    }

    /// Returns the tier sub-object for the given role name, `None` when
    /// the `tiers` object or the role is absent.
    #[must_use]
    pub fn tier(&self, name: &str) -> Option<&Document> {
        object_at(&self.document, "tiers")
            .and_then(|tiers| tiers.get(name))
            .and_then(Value::as_object)
    }

    /// Writes the named tier following [`TierSource`] semantics: an id or
    /// a random fixture resets the tier, an object deep-merges into it.
    pub fn with_tier(&mut self, name: &str, source: impl Into<TierSource>) -> &mut Self {
        let source = source.into();
        with_object(&mut self.document, "tiers", |tiers| {
            write_party(tiers, name, source, name);
        });
        self
    }

    /// Returns the customer tier.
    #[must_use]
    pub fn tier_customer(&self) -> Option<&Document> {
        self.tier("customer")
    }

    /// Writes the customer tier.
    pub fn with_tier_customer(&mut self, source: impl Into<TierSource>) -> &mut Self {
        self.with_tier("customer", source)
    }

    /// Returns the tier1 reseller tier.
    #[must_use]
    pub fn tier_tier1(&self) -> Option<&Document> {
        self.tier("tier1")
    }

    /// Writes the tier1 reseller tier.
    pub fn with_tier_tier1(&mut self, source: impl Into<TierSource>) -> &mut Self {
        self.with_tier("tier1", source)
    }

    /// Returns the tier2 reseller tier.
    #[must_use]
    pub fn tier_tier2(&self) -> Option<&Document> {
        self.tier("tier2")
    }

    /// Writes the tier2 reseller tier.
    pub fn with_tier_tier2(&mut self, source: impl Into<TierSource>) -> &mut Self {
        self.with_tier("tier2", source)
    }

    /// Returns the ordered item list, empty when absent.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        self.document
            .get("items")
            .and_then(Value::as_array)
            .map_or(&[][..], |list| list.as_slice())
    }

    /// Returns the item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingItem`] when no item matches.
    pub fn item(&self, id: &str) -> DocumentResult<&Document> {
        find_by_id(self.items(), id)
            .and_then(Value::as_object)
            .ok_or_else(|| DocumentError::MissingItem { id: id.to_owned() })
    }

    /// Upserts one item: patches the matching entry in place or appends a
    /// new one, then applies any parameter updates attached to the
    /// description (see [`ItemUpdate`]).
    pub fn with_item(&mut self, update: ItemUpdate) -> &mut Self {
        with_array(&mut self.document, "items", |items| {
            if find_by_id_mut(items, update.id()).is_none() {
                tracing::debug!(id = update.id(), "appending new item");
                let mut seed = Document::new();
                seed.insert("id".to_owned(), Value::String(update.id().to_owned()));
                items.push(Value::Object(seed));
            }
            if let Some(Value::Object(item)) = find_by_id_mut(items, update.id()) {
                update.apply(item);
                for param in update.param_updates() {
                    with_array(item, "params", |list| {
                        params::upsert(list, &param.clone().with_item_defaults());
                    });
                }
            }
        });
        self
    }

    /// Applies the updates in order; later entries win for a shared id.
    pub fn with_items(&mut self, updates: impl IntoIterator<Item = ItemUpdate>) -> &mut Self {
        for update in updates {
            self.with_item(update);
        }
        self
    }

    /// Returns the ordered parameter list of an existing item, empty when
    /// the item has no parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingItem`] when no item matches.
    pub fn item_params(&self, item_id: &str) -> DocumentResult<&[Value]> {
        let item = self.item(item_id)?;
        Ok(item
            .get("params")
            .and_then(Value::as_array)
            .map_or(&[][..], |list| list.as_slice()))
    }

    /// Returns one parameter of an existing item.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingItem`] when no item matches and
    /// [`DocumentError::MissingParameter`] when the item exists but the
    /// parameter does not.
    pub fn item_param(&self, item_id: &str, param_id: &str) -> DocumentResult<&Document> {
        find_by_id(self.item_params(item_id)?, param_id)
            .and_then(Value::as_object)
            .ok_or_else(|| DocumentError::MissingParameter {
                id: param_id.to_owned(),
            })
    }

    /// Upserts a parameter scoped to an existing item. Created parameters
    /// default their scope to `item` and their phase to `configuration`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingItem`] when no item matches; the
    /// document is left untouched.
    pub fn with_item_param(
        &mut self,
        item_id: &str,
        update: ParamUpdate,
    ) -> DocumentResult<&mut Self> {
        self.item(item_id)?;
        with_array(&mut self.document, "items", |items| {
            if let Some(Value::Object(item)) = find_by_id_mut(items, item_id) {
                with_array(item, "params", |list| {
                    params::upsert(list, &update.with_item_defaults());
                });
            }
        });
        Ok(self)
    }

    /// Applies the updates in order against one existing item.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingItem`] when no item matches.
    pub fn with_item_params(
        &mut self,
        item_id: &str,
        updates: impl IntoIterator<Item = ParamUpdate>,
    ) -> DocumentResult<&mut Self> {
        for update in updates {
            self.with_item_param(item_id, update)?;
        }
        Ok(self)
    }
}

impl DocumentSource for Asset {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

impl BusinessObject for Asset {}
impl HasProduct for Asset {}
impl HasMarketplace for Asset {}
impl HasConnection for Asset {}
impl HasParameters for Asset {}
impl HasConfiguration for Asset {}
impl HasContract for Asset {}

impl From<Document> for Asset {
    fn from(document: Document) -> Self {
        Self { document }
    }
}

impl TryFrom<Value> for Asset {
    type Error = DocumentError;

    /// Accepts a JSON object (or null, yielding an empty asset); any other
    /// value is rejected.
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

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.document).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
