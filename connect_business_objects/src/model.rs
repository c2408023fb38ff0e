//! Request-model classification.
//!
//! A request document addresses either a subscription asset or a tier
//! configuration. The platform encodes this redundantly, through the
//! request `type` vocabulary and through which sub-object (`asset` or
//! `configuration`) is embedded, so classification checks both.

use std::fmt;

use serde_json::Value;

use crate::Document;

/// Request types that address a subscription asset.
const ASSET_TYPES: [&str; 6] = [
    "adjustment",
    "purchase",
    "change",
    "suspend",
    "resume",
    "cancel",
];

/// Request types that address a tier configuration.
const TIER_CONFIG_TYPES: [&str; 1] = ["setup"];

/// Classification of a request document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestModel {
    /// The request targets a subscription asset.
    Asset,
    /// The request targets a tier configuration.
    TierConfig,
    /// The request matches neither rule.
    Undefined,
}

impl RequestModel {
    /// Returns the wire-format label for this model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::TierConfig => "tier-config",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for RequestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a request document; the first matching rule wins.
///
/// A request is an asset request when it embeds an `asset` sub-object or
/// its `type` belongs to the asset vocabulary, a tier-config request when
/// it embeds a `configuration` sub-object or its `type` is `setup`, and
/// [`RequestModel::Undefined`] otherwise.
///
/// ```rust
/// use connect_business_objects::{RequestModel, request_model};
/// use serde_json::json;
///
/// let document = json!({"type": "purchase", "asset": {}})
///     .as_object()
///     .cloned()
///     .unwrap_or_default();
/// assert_eq!(request_model(&document), RequestModel::Asset);
/// ```
#[must_use]
pub fn request_model(document: &Document) -> RequestModel {
    let request_type = document.get("type").and_then(Value::as_str);
    let rule_matches = |object: &str, types: &[&str]| {
        document.contains_key(object) || request_type.is_some_and(|t| types.contains(&t))
    };

    if rule_matches("asset", &ASSET_TYPES) {
        RequestModel::Asset
    } else if rule_matches("configuration", &TIER_CONFIG_TYPES) {
        RequestModel::TierConfig
    } else {
        RequestModel::Undefined
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().expect("object literal")
    }

    #[rstest]
    #[case(json!({"type": "purchase", "asset": {}}), RequestModel::Asset)]
    #[case(json!({"type": "setup", "configuration": {}}), RequestModel::TierConfig)]
    #[case(json!({}), RequestModel::Undefined)]
    #[case(json!({"asset": {}}), RequestModel::Asset)]
    #[case(json!({"type": "cancel"}), RequestModel::Asset)]
    #[case(json!({"type": "setup"}), RequestModel::TierConfig)]
    #[case(json!({"configuration": {}}), RequestModel::TierConfig)]
    #[case(json!({"type": "unknown"}), RequestModel::Undefined)]
    fn classifies_documents(#[case] document: Value, #[case] expected: RequestModel) {
        assert_eq!(request_model(&doc(document)), expected);
    }

    #[test]
    fn asset_rule_wins_over_tier_config() {
        // Both rules match; the asset rule is evaluated first.
        let document = doc(json!({"type": "purchase", "configuration": {}, "asset": {}}));
        assert_eq!(request_model(&document), RequestModel::Asset);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(RequestModel::Asset.as_str(), "asset");
        assert_eq!(RequestModel::TierConfig.as_str(), "tier-config");
        assert_eq!(RequestModel::Undefined.to_string(), "undefined");
    }
}
