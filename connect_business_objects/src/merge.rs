//! Deep-merge and id-lookup plumbing for semi-structured documents.

use serde_json::Value;

use crate::Document;

/// Deep-merges `patch` into `base`, returning a new document.
///
/// Neither input is mutated. For each key in `patch`: a key absent from
/// `base` is copied in; two objects are merged recursively; two arrays are
/// concatenated (`base` first, no deduplication); anything else is replaced
/// by the patch value.
///
/// Note the asymmetry: scalars replace, but arrays concatenate. Repeated
/// merges of the same list-bearing patch therefore accumulate duplicate
/// entries. Callers patching keyed collections should go through the upsert
/// operations instead.
///
/// ```rust
/// use connect_business_objects::{Document, merge};
/// use serde_json::json;
///
/// let base: Document = json!({"connection": {"provider": {"id": "PA-1"}}})
///     .as_object()
///     .cloned()
///     .unwrap_or_default();
/// let patch: Document = json!({"connection": {"vendor": {"id": "VA-1"}}})
///     .as_object()
///     .cloned()
///     .unwrap_or_default();
///
/// let merged = merge(&base, &patch);
/// assert_eq!(merged["connection"]["provider"]["id"], "PA-1");
/// assert_eq!(merged["connection"]["vendor"]["id"], "VA-1");
/// ```
#[must_use]
pub fn merge(base: &Document, patch: &Document) -> Document {
    let mut merged = base.clone();
    for (key, incoming) in patch {
        let Some(slot) = merged.get_mut(key) else {
            merged.insert(key.clone(), incoming.clone());
            continue;
        };
        match (slot, incoming) {
            (Value::Object(existing), Value::Object(nested)) => {
                *existing = merge(existing, nested);
            }
            (Value::Array(existing), Value::Array(extra)) => {
                existing.extend(extra.iter().cloned());
            }
            (other, value) => *other = value.clone(),
        }
    }
    merged
}

/// Finds the first element of `elements` whose `id` field equals `id`.
///
/// Elements without a string `id` never match. Upserts assume ids are
/// unique within a collection, so the first match is the only match in
/// well-formed documents.
#[must_use]
pub fn find_by_id<'a>(elements: &'a [Value], id: &str) -> Option<&'a Value> {
    elements
        .iter()
        .find(|element| element.get("id").and_then(Value::as_str) == Some(id))
}

/// Mutable counterpart of [`find_by_id`].
pub(crate) fn find_by_id_mut<'a>(elements: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    elements
        .iter_mut()
        .find(|element| element.get("id").and_then(Value::as_str) == Some(id))
}

/// Borrows the object stored under `key`, `None` when absent or non-object.
pub(crate) fn object_at<'a>(document: &'a Document, key: &str) -> Option<&'a Document> {
    document.get(key).and_then(Value::as_object)
}

/// Deep-merges `patch` into the object stored at `key`, creating it when
/// absent and replacing any non-object value found there.
pub(crate) fn merge_at(document: &mut Document, key: &str, patch: &Document) {
    let merged = match object_at(document, key) {
        Some(existing) => merge(existing, patch),
        None => patch.clone(),
    };
    document.insert(key.to_owned(), Value::Object(merged));
}

/// Runs `operation` over the array stored under `key`, creating it when
/// absent and replacing any non-array value found there. The array is
/// written back afterwards.
pub(crate) fn with_array<R>(
    document: &mut Document,
    key: &str,
    operation: impl FnOnce(&mut Vec<Value>) -> R,
) -> R {
    let mut list = match document.remove(key) {
        Some(Value::Array(list)) => list,
        _ => Vec::new(),
    };
    let result = operation(&mut list);
    document.insert(key.to_owned(), Value::Array(list));
    result
}

/// Runs `operation` over the object stored under `key`, creating it when
/// absent and replacing any non-object value found there.
pub(crate) fn with_object<R>(
    document: &mut Document,
    key: &str,
    operation: impl FnOnce(&mut Document) -> R,
) -> R {
    let mut object = match document.remove(key) {
        Some(Value::Object(object)) => object,
        _ => Document::new(),
    };
    let result = operation(&mut object);
    document.insert(key.to_owned(), Value::Object(object));
    result
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn merge_with_empty_patch_is_identity() {
        let base = doc(json!({"id": "PR-1", "asset": {"status": "active"}}));
        assert_eq!(merge(&base, &Document::new()), base);
    }

    #[test]
    fn merge_into_empty_base_is_identity() {
        let patch = doc(json!({"id": "PR-1", "params": [{"id": "P1"}]}));
        assert_eq!(merge(&Document::new(), &patch), patch);
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let base = doc(json!({"asset": {"status": "active"}}));
        let patch = doc(json!({"asset": {"status": "suspended"}}));
        let base_before = base.clone();
        let patch_before = patch.clone();

        let merged = merge(&base, &patch);

        assert_eq!(base, base_before);
        assert_eq!(patch, patch_before);
        assert_eq!(merged["asset"]["status"], "suspended");
    }

    #[test]
    fn merge_recurses_into_objects_and_keeps_siblings() {
        let base = doc(json!({
            "id": 1,
            "status": "pending",
            "asset": {"status": "active", "params": [{"id": 1}]},
        }));
        let patch = doc(json!({
            "asset": {"status": "suspended", "params": [{"id": 2}]},
        }));

        let merged = merge(&base, &patch);

        assert_eq!(merged["id"], 1);
        assert_eq!(merged["status"], "pending");
        assert_eq!(merged["asset"]["status"], "suspended");
        assert_eq!(merged["asset"]["params"][0]["id"], 1);
        assert_eq!(merged["asset"]["params"][1]["id"], 2);
    }

    #[test]
    fn merge_concatenates_arrays_without_dedup() {
        let base = doc(json!({"items": [{"id": "a"}]}));
        let patch = doc(json!({"items": [{"id": "a"}, {"id": "b"}]}));

        let merged = merge(&base, &patch);
        let items = merged["items"].as_array().expect("array");
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn merge_replaces_scalars_and_mismatched_kinds() {
        let base = doc(json!({"note": "old", "tiers": {"customer": {}}}));
        let patch = doc(json!({"note": "new", "tiers": "gone"}));

        let merged = merge(&base, &patch);
        assert_eq!(merged["note"], "new");
        assert_eq!(merged["tiers"], "gone");
    }

    #[test]
    fn find_by_id_returns_first_match() {
        let elements = vec![json!({"id": "P1", "value": "a"}), json!({"id": "P2"})];
        let found = find_by_id(&elements, "P1").expect("present");
        assert_eq!(found["value"], "a");
        assert!(find_by_id(&elements, "P3").is_none());
    }

    #[test]
    fn with_array_creates_and_writes_back() {
        let mut document = Document::new();
        with_array(&mut document, "params", |list| list.push(json!({"id": "P1"})));
        assert_eq!(document["params"][0]["id"], "P1");
    }

    #[test]
    fn with_array_replaces_non_array_values() {
        let mut document = doc(json!({"params": "bogus"}));
        with_array(&mut document, "params", |list| assert!(list.is_empty()));
        assert!(document["params"].is_array());
    }
}
