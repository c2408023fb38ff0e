//! Parameter descriptions and the keyed-collection upsert they drive.

use serde_json::Value;

use crate::Document;
use crate::error::{DocumentError, DocumentResult};
use crate::merge::find_by_id_mut;

/// Partial description of a parameter, applied as an upsert.
///
/// Only the fields explicitly set on the update are written; everything
/// else on an existing parameter is left untouched. When no parameter with
/// the given id exists, a new one seeded with the id is appended to the end
/// of the collection, preserving the relative order of existing entries.
///
/// ```rust
/// use connect_business_objects::{HasParameters, Request, ParamUpdate};
///
/// let mut request = Request::new();
/// request
///     .with_param(ParamUpdate::new("P1").value("A"))
///     .with_param(ParamUpdate::new("P1").value("B"));
///
/// assert_eq!(request.params().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamUpdate {
    id: String,
    value: Option<Value>,
    value_error: Option<String>,
    value_type: Option<String>,
    title: Option<String>,
    description: Option<String>,
    scope: Option<String>,
    phase: Option<String>,
}

impl ParamUpdate {
    /// Starts a description for the parameter with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Returns the id this update addresses.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sets the parameter value.
    ///
    /// Objects and arrays are stored under `structured_value`, scalars
    /// under `value`; the two fields are mutually exclusive, so writing one
    /// removes the other.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the validation error message attached to the parameter.
    #[must_use]
    pub fn value_error(mut self, value_error: impl Into<String>) -> Self {
        self.value_error = Some(value_error.into());
        self
    }

    /// Sets the parameter type (stored under the `type` key).
    #[must_use]
    pub fn value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    /// Sets the human-readable title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the parameter scope (`asset`, `item`, `tier1`, ...).
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the ordering phase the parameter belongs to.
    #[must_use]
    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    /// Fills scope and phase with the item-parameter defaults when unset.
    pub(crate) fn with_item_defaults(mut self) -> Self {
        if self.scope.is_none() {
            self.scope = Some("item".to_owned());
        }
        if self.phase.is_none() {
            self.phase = Some("configuration".to_owned());
        }
        self
    }

    /// Patches `param` with the fields set on this update.
    pub(crate) fn apply(&self, param: &mut Document) {
        if let Some(value) = &self.value {
            if value.is_object() || value.is_array() {
                param.insert("structured_value".to_owned(), value.clone());
                param.remove("value");
            } else {
                param.insert("value".to_owned(), value.clone());
                param.remove("structured_value");
            }
        }
        let texts = [
            ("value_error", &self.value_error),
            ("type", &self.value_type),
            ("title", &self.title),
            ("description", &self.description),
            ("scope", &self.scope),
            ("phase", &self.phase),
        ];
        for (key, field) in texts {
            if let Some(text) = field {
                param.insert(key.to_owned(), Value::String(text.clone()));
            }
        }
    }
}

/// Applies `update` by id, appending a seed `{"id": ...}` object first when
/// no element matches.
pub(crate) fn upsert(list: &mut Vec<Value>, update: &ParamUpdate) {
    if find_by_id_mut(list, update.id()).is_none() {
        tracing::debug!(id = update.id(), "appending new parameter");
        let mut seed = Document::new();
        seed.insert("id".to_owned(), Value::String(update.id().to_owned()));
        list.push(Value::Object(seed));
    }
    if let Some(Value::Object(param)) = find_by_id_mut(list, update.id()) {
        update.apply(param);
    }
}

/// Applies `update` to an existing element only.
///
/// # Errors
///
/// Returns [`DocumentError::MissingParameter`] when no element matches the
/// update's id.
pub(crate) fn update_existing(list: &mut [Value], update: &ParamUpdate) -> DocumentResult<()> {
    match find_by_id_mut(list, update.id()) {
        Some(Value::Object(param)) => {
            update.apply(param);
            Ok(())
        }
        _ => Err(DocumentError::MissingParameter {
            id: update.id().to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn upsert_appends_missing_parameter_at_the_end() {
        let mut list = vec![json!({"id": "P1", "value": "a"})];
        upsert(&mut list, &ParamUpdate::new("P2").value("b"));

        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], "P1");
        assert_eq!(list[1]["id"], "P2");
        assert_eq!(list[1]["value"], "b");
    }

    #[test]
    fn upsert_patches_in_place_and_keeps_position() {
        let mut list = vec![
            json!({"id": "P1", "value": "a", "title": "first"}),
            json!({"id": "P2"}),
        ];
        upsert(&mut list, &ParamUpdate::new("P1").value("b"));

        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], "P1");
        assert_eq!(list[0]["value"], "b");
        // Unsupplied fields stay untouched.
        assert_eq!(list[0]["title"], "first");
    }

    #[test]
    fn structured_values_land_in_structured_value() {
        let mut list = Vec::new();
        upsert(&mut list, &ParamUpdate::new("P1").value(json!({"nested": 1})));

        assert_eq!(list[0]["structured_value"]["nested"], 1);
        assert!(list[0].get("value").is_none());
    }

    #[test]
    fn scalar_write_clears_stale_structured_value() {
        let mut list = vec![json!({"id": "P1", "structured_value": {"nested": 1}})];
        upsert(&mut list, &ParamUpdate::new("P1").value("plain"));

        assert_eq!(list[0]["value"], "plain");
        assert!(list[0].get("structured_value").is_none());
    }

    #[test]
    fn update_existing_refuses_to_create() {
        let mut list = vec![json!({"id": "P1"})];
        let missing = update_existing(&mut list, &ParamUpdate::new("P2").value("x"));
        assert!(matches!(
            missing,
            Err(DocumentError::MissingParameter { id }) if id == "P2"
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn all_fields_apply_under_their_wire_keys() {
        let mut list = Vec::new();
        let update = ParamUpdate::new("P1")
            .value("v")
            .value_error("boom")
            .value_type("text")
            .title("Title")
            .description("Description")
            .scope("asset")
            .phase("ordering");
        upsert(&mut list, &update);

        assert_eq!(list[0]["value_error"], "boom");
        assert_eq!(list[0]["type"], "text");
        assert_eq!(list[0]["title"], "Title");
        assert_eq!(list[0]["description"], "Description");
        assert_eq!(list[0]["scope"], "asset");
        assert_eq!(list[0]["phase"], "ordering");
    }
}
