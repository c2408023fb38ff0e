//! Purchasable line-item descriptions.

use serde_json::Value;

use crate::Document;
use crate::params::ParamUpdate;

/// Partial description of a purchasable line item, applied as an upsert.
///
/// Follows the same semantics as [`ParamUpdate`]: an existing item with
/// the same id is patched in place, a missing one is appended. The id and
/// MPN are always written; `quantity` defaults to `"1"` and is always
/// written too, matching the platform's payloads. The remaining fields are
/// written only when supplied.
///
/// Nested parameter updates attached through [`ItemUpdate::param`] are
/// applied through the item-parameter upsert, which defaults their scope to
/// `item` and their phase to `configuration`.
#[derive(Debug, Clone)]
pub struct ItemUpdate {
    id: String,
    mpn: String,
    quantity: String,
    old_quantity: Option<String>,
    item_type: Option<String>,
    period: Option<String>,
    unit: Option<String>,
    display_name: Option<String>,
    global_id: Option<String>,
    params: Vec<ParamUpdate>,
}

impl ItemUpdate {
    /// Starts a description for the item with the given id and MPN.
    #[must_use]
    pub fn new(id: impl Into<String>, mpn: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mpn: mpn.into(),
            quantity: "1".to_owned(),
            old_quantity: None,
            item_type: None,
            period: None,
            unit: None,
            display_name: None,
            global_id: None,
            params: Vec::new(),
        }
    }

    /// Returns the id this update addresses.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sets the ordered quantity.
    #[must_use]
    pub fn quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    /// Sets the quantity before the change this item belongs to.
    #[must_use]
    pub fn old_quantity(mut self, old_quantity: impl Into<String>) -> Self {
        self.old_quantity = Some(old_quantity.into());
        self
    }

    /// Sets the item type.
    #[must_use]
    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Sets the billing period.
    #[must_use]
    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Sets the billing unit.
    ///
    /// The platform stores the unit under the item's `type` key, distinct
    /// from `item_type`; that wire quirk is preserved here.
    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the global id.
    #[must_use]
    pub fn global_id(mut self, global_id: impl Into<String>) -> Self {
        self.global_id = Some(global_id.into());
        self
    }

    /// Attaches a parameter update scoped to this item.
    #[must_use]
    pub fn param(mut self, param: ParamUpdate) -> Self {
        self.params.push(param);
        self
    }

    /// Attaches several parameter updates scoped to this item.
    #[must_use]
    pub fn params(mut self, params: impl IntoIterator<Item = ParamUpdate>) -> Self {
        self.params.extend(params);
        self
    }

    /// Returns the parameter updates attached to this item.
    pub(crate) fn param_updates(&self) -> &[ParamUpdate] {
        &self.params
    }

    /// Patches `item` with the fields set on this update.
    pub(crate) fn apply(&self, item: &mut Document) {
        item.insert("mpn".to_owned(), Value::String(self.mpn.clone()));
        item.insert("quantity".to_owned(), Value::String(self.quantity.clone()));
        let texts = [
            ("old_quantity", &self.old_quantity),
            ("item_type", &self.item_type),
            ("period", &self.period),
            ("type", &self.unit),
            ("display_name", &self.display_name),
            ("global_id", &self.global_id),
        ];
        for (key, field) in texts {
            if let Some(text) = field {
                item.insert(key.to_owned(), Value::String(text.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn apply_writes_mpn_and_default_quantity() {
        let mut item = Document::new();
        ItemUpdate::new("I1", "MPN-1").apply(&mut item);

        assert_eq!(item["mpn"], "MPN-1");
        assert_eq!(item["quantity"], "1");
        assert!(item.get("period").is_none());
    }

    #[test]
    fn apply_leaves_unsupplied_fields_untouched() {
        let mut item = json!({"id": "I1", "period": "monthly"})
            .as_object()
            .cloned()
            .expect("object literal");
        ItemUpdate::new("I1", "MPN-2").quantity("5").apply(&mut item);

        assert_eq!(item["mpn"], "MPN-2");
        assert_eq!(item["quantity"], "5");
        assert_eq!(item["period"], "monthly");
    }

    #[test]
    fn unit_is_stored_under_the_type_key() {
        let mut item = Document::new();
        ItemUpdate::new("I1", "MPN-1")
            .unit("licenses")
            .item_type("reservation")
            .apply(&mut item);

        assert_eq!(item["type"], "licenses");
        assert_eq!(item["item_type"], "reservation");
    }
}
