//! Capability traits composed into the document façades.
//!
//! Each trait captures one independent field group (marketplace, product,
//! connection, parameters, ...) and operates over the wrapped document
//! injected through [`DocumentSource`]. The façades opt into the groups
//! their document kind carries by implementing the marker impls; the
//! behavior itself lives in the default method bodies, so no logic is
//! duplicated across document kinds.

use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::Document;
use crate::error::{DocumentError, DocumentResult};
use crate::merge::{find_by_id, merge_at, object_at, with_array, with_object};
use crate::params::{self, ParamUpdate};

/// Access to the underlying document wrapped by a façade.
pub trait DocumentSource {
    /// Borrows the wrapped document.
    fn document(&self) -> &Document;

    /// Mutably borrows the wrapped document.
    fn document_mut(&mut self) -> &mut Document;
}

/// Generic read/write operations shared by every document kind.
pub trait BusinessObject: DocumentSource {
    /// Borrows the raw underlying document.
    #[must_use]
    fn raw(&self) -> &Document {
        self.document()
    }

    /// Returns an independent deep copy of the underlying document.
    #[must_use]
    fn raw_owned(&self) -> Document {
        self.document().clone()
    }

    /// Reads a single top-level field, `None` when absent.
    #[must_use]
    fn get(&self, key: &str) -> Option<&Value> {
        self.document().get(key)
    }

    /// Writes a single top-level field.
    fn with_field(&mut self, key: &str, value: impl Into<Value>) -> &mut Self
    where
        Self: Sized,
    {
        self.document_mut().insert(key.to_owned(), value.into());
        self
    }

    /// Removes a single top-level field; absent keys are ignored.
    fn without(&mut self, key: &str) -> &mut Self
    where
        Self: Sized,
    {
        self.document_mut().remove(key);
        self
    }
}

/// Documents carrying a `marketplace` sub-object.
pub trait HasMarketplace: DocumentSource {
    /// Returns the marketplace sub-object, `None` when absent.
    #[must_use]
    fn marketplace(&self) -> Option<&Document> {
        object_at(self.document(), "marketplace")
    }

    /// Deep-merges the marketplace id (and optional name) into the
    /// document, creating the sub-object when absent.
    fn with_marketplace(&mut self, id: &str, name: Option<&str>) -> &mut Self
    where
        Self: Sized,
    {
        merge_at(self.document_mut(), "marketplace", &labelled(id, name));
        self
    }
}

/// Documents carrying a `product` sub-object.
pub trait HasProduct: DocumentSource {
    /// Returns the product sub-object, `None` when absent.
    #[must_use]
    fn product(&self) -> Option<&Document> {
        object_at(self.document(), "product")
    }

    /// Deep-merges the product id and status into the document; a missing
    /// status defaults to `published`.
    fn with_product(&mut self, id: &str, status: Option<&str>) -> &mut Self
    where
        Self: Sized,
    {
        let mut patch = Document::new();
        patch.insert("id".to_owned(), Value::String(id.to_owned()));
        patch.insert(
            "status".to_owned(),
            Value::String(status.unwrap_or("published").to_owned()),
        );
        merge_at(self.document_mut(), "product", &patch);
        self
    }
}

/// Documents carrying a `contract` sub-object.
pub trait HasContract: DocumentSource {
    /// Returns the contract sub-object, `None` when absent.
    #[must_use]
    fn contract(&self) -> Option<&Document> {
        object_at(self.document(), "contract")
    }

    /// Deep-merges the contract id (and optional name) into the document.
    fn with_contract(&mut self, id: &str, name: Option<&str>) -> &mut Self
    where
        Self: Sized,
    {
        merge_at(self.document_mut(), "contract", &labelled(id, name));
        self
    }
}

/// Documents carrying an `events` sub-object.
pub trait HasEvents: DocumentSource {
    /// Returns the events sub-object, `None` when absent.
    #[must_use]
    fn events(&self) -> Option<&Document> {
        object_at(self.document(), "events")
    }

    /// Records the created/updated event timestamps under
    /// `events.created.at` / `events.updated.at`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::TimestampFormat`] when a timestamp cannot
    /// be rendered as RFC 3339.
    fn with_events(
        &mut self,
        created: OffsetDateTime,
        updated: OffsetDateTime,
    ) -> DocumentResult<&mut Self>
    where
        Self: Sized,
    {
        let mut created_at = Document::new();
        created_at.insert(
            "at".to_owned(),
            Value::String(format_timestamp("created", created)?),
        );
        let mut updated_at = Document::new();
        updated_at.insert(
            "at".to_owned(),
            Value::String(format_timestamp("updated", updated)?),
        );

        let mut patch = Document::new();
        patch.insert("created".to_owned(), Value::Object(created_at));
        patch.insert("updated".to_owned(), Value::Object(updated_at));
        merge_at(self.document_mut(), "events", &patch);
        Ok(self)
    }
}

/// Documents carrying a `connection` sub-object with provider, vendor and
/// hub roles.
pub trait HasConnection: DocumentSource {
    /// Returns the connection sub-object, `None` when absent.
    #[must_use]
    fn connection(&self) -> Option<&Document> {
        object_at(self.document(), "connection")
    }

    /// Deep-merges the connection id and type into the document.
    fn with_connection(&mut self, id: &str, connection_type: &str) -> &mut Self
    where
        Self: Sized,
    {
        let mut patch = Document::new();
        patch.insert("id".to_owned(), Value::String(id.to_owned()));
        patch.insert(
            "type".to_owned(),
            Value::String(connection_type.to_owned()),
        );
        merge_at(self.document_mut(), "connection", &patch);
        self
    }

    /// Returns the connection's provider role, `None` when absent.
    #[must_use]
    fn connection_provider(&self) -> Option<&Document> {
        self.connection_role("provider")
    }

    /// Deep-merges the provider role into the connection sub-object.
    fn with_connection_provider(&mut self, id: &str, name: Option<&str>) -> &mut Self
    where
        Self: Sized,
    {
        self.with_connection_role("provider", id, name)
    }

    /// Returns the connection's vendor role, `None` when absent.
    #[must_use]
    fn connection_vendor(&self) -> Option<&Document> {
        self.connection_role("vendor")
    }

    /// Deep-merges the vendor role into the connection sub-object.
    fn with_connection_vendor(&mut self, id: &str, name: Option<&str>) -> &mut Self
    where
        Self: Sized,
    {
        self.with_connection_role("vendor", id, name)
    }

    /// Returns the connection's hub role, `None` when absent.
    #[must_use]
    fn connection_hub(&self) -> Option<&Document> {
        self.connection_role("hub")
    }

    /// Deep-merges the hub role into the connection sub-object.
    fn with_connection_hub(&mut self, id: &str, name: Option<&str>) -> &mut Self
    where
        Self: Sized,
    {
        self.with_connection_role("hub", id, name)
    }

    /// Returns one named role of the connection, `None` when either level
    /// is absent.
    #[must_use]
    fn connection_role(&self, role: &str) -> Option<&Document> {
        self.connection()
            .and_then(|connection| connection.get(role))
            .and_then(Value::as_object)
    }

    /// Deep-merges one named role into the connection sub-object, creating
    /// both levels when absent.
    fn with_connection_role(&mut self, role: &str, id: &str, name: Option<&str>) -> &mut Self
    where
        Self: Sized,
    {
        let mut patch = Document::new();
        patch.insert(role.to_owned(), Value::Object(labelled(id, name)));
        merge_at(self.document_mut(), "connection", &patch);
        self
    }
}

/// Documents carrying a top-level ordered `params` collection.
pub trait HasParameters: DocumentSource {
    /// Returns the ordered parameter list, empty when absent.
    #[must_use]
    fn params(&self) -> &[Value] {
        self.document()
            .get("params")
            .and_then(Value::as_array)
            .map_or(&[][..], |list| list.as_slice())
    }

    /// Returns the parameter with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingParameter`] when no parameter
    /// matches.
    fn param(&self, id: &str) -> DocumentResult<&Document> {
        find_by_id(self.params(), id)
            .and_then(Value::as_object)
            .ok_or_else(|| DocumentError::MissingParameter { id: id.to_owned() })
    }

    /// Upserts one parameter: patches the matching entry in place or
    /// appends a new one seeded with the id (see [`ParamUpdate`]).
    fn with_param(&mut self, update: ParamUpdate) -> &mut Self
    where
        Self: Sized,
    {
        with_array(self.document_mut(), "params", |list| {
            params::upsert(list, &update);
        });
        self
    }

    /// Applies the updates in order; later entries win for a shared id.
    fn with_params(&mut self, updates: impl IntoIterator<Item = ParamUpdate>) -> &mut Self
    where
        Self: Sized,
    {
        for update in updates {
            self.with_param(update);
        }
        self
    }

    /// Patches an existing parameter, refusing to create a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingParameter`] when no parameter
    /// matches the update's id; the document is left untouched.
    fn update_param(&mut self, update: ParamUpdate) -> DocumentResult<&mut Self>
    where
        Self: Sized,
    {
        let list = self
            .document_mut()
            .get_mut("params")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| DocumentError::MissingParameter {
                id: update.id().to_owned(),
            })?;
        params::update_existing(list, &update)?;
        Ok(self)
    }
}

/// Documents carrying parameters nested under a `configuration` sub-object.
pub trait HasConfiguration: DocumentSource {
    /// Returns the ordered configuration parameter list, empty when the
    /// `configuration` sub-object or its `params` key is absent.
    #[must_use]
    fn configuration_params(&self) -> &[Value] {
        object_at(self.document(), "configuration")
            .and_then(|configuration| configuration.get("params"))
            .and_then(Value::as_array)
            .map_or(&[][..], |list| list.as_slice())
    }

    /// Returns the configuration parameter with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingParameter`] when no configuration
    /// parameter matches.
    fn configuration_param(&self, id: &str) -> DocumentResult<&Document> {
        find_by_id(self.configuration_params(), id)
            .and_then(Value::as_object)
            .ok_or_else(|| DocumentError::MissingParameter { id: id.to_owned() })
    }

    /// Upserts one configuration parameter, lazily creating the
    /// `configuration` sub-object and its `params` list.
    fn with_configuration_param(&mut self, update: ParamUpdate) -> &mut Self
    where
        Self: Sized,
    {
        with_object(self.document_mut(), "configuration", |configuration| {
            with_array(configuration, "params", |list| {
                params::upsert(list, &update);
            });
        });
        self
    }

    /// Applies the updates in order; later entries win for a shared id.
    fn with_configuration_params(
        &mut self,
        updates: impl IntoIterator<Item = ParamUpdate>,
    ) -> &mut Self
    where
        Self: Sized,
    {
        for update in updates {
            self.with_configuration_param(update);
        }
        self
    }
}

/// Builds an `{id, name?}` object, skipping an unsupplied name so no JSON
/// null is written.
pub(crate) fn labelled(id: &str, name: Option<&str>) -> Document {
    let mut object = Document::new();
    object.insert("id".to_owned(), Value::String(id.to_owned()));
    if let Some(name) = name {
        object.insert("name".to_owned(), Value::String(name.to_owned()));
    }
    object
}

/// Renders a timestamp as RFC 3339 for storage under `field`.
pub(crate) fn format_timestamp(
    field: &'static str,
    timestamp: OffsetDateTime,
) -> DocumentResult<String> {
    timestamp
        .format(&Rfc3339)
        .map_err(|source| DocumentError::TimestampFormat { field, source })
}
