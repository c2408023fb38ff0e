//! Fluent business-object façades over subscription-commerce documents.
//!
//! Integration code that talks to a subscription-commerce platform receives
//! loosely-structured JSON documents: a [`Request`] (the top-level
//! change/order submitted against a subscription), an [`Asset`] (a
//! subscription instance with items, tiers and parameters) and a
//! [`TierConfiguration`] (a reseller/customer tier setup document). This
//! crate wraps those documents in typed façades so callers chain accessor
//! and builder calls instead of hand-rolling key lookups and nested-map
//! mutation, while tolerating the missing or partially-populated fields
//! typical of real API payloads.
//!
//! The non-trivial pieces are the deep-merge used for nested updates
//! ([`merge`]), the upsert semantics for keyed sub-collections
//! ([`ParamUpdate`], [`ItemUpdate`]) and the request-model classification
//! rule ([`request_model`]). Everything else is a thin façade over one
//! owned [`Document`].
//!
//! ```rust
//! use connect_business_objects::{Asset, ItemUpdate, ParamUpdate};
//!
//! # fn main() -> connect_business_objects::DocumentResult<()> {
//! let mut asset = Asset::new();
//! asset
//!     .with_id("AS-001")
//!     .with_status("active")
//!     .with_item(ItemUpdate::new("I1", "MPN-1"));
//! asset.with_item_param("I1", ParamUpdate::new("P1").value("V1"))?;
//!
//! let value = asset.item_param("I1", "P1")?.get("value");
//! assert_eq!(value.and_then(|v| v.as_str()), Some("V1"));
//! # Ok(())
//! # }
//! ```

mod asset;
mod capabilities;
mod error;
mod fixtures;
mod items;
mod merge;
mod model;
mod params;
mod request;
mod tier_config;

pub use asset::Asset;
pub use capabilities::{
    BusinessObject, DocumentSource, HasConfiguration, HasConnection, HasContract, HasEvents,
    HasMarketplace, HasParameters, HasProduct,
};
pub use error::{DocumentError, DocumentResult};
pub use fixtures::tier_fixture;
pub use items::ItemUpdate;
pub use merge::{find_by_id, merge};
pub use model::{RequestModel, request_model};
pub use params::ParamUpdate;
pub use request::Request;
pub use tier_config::TierConfiguration;

/// A loosely-structured business document: a JSON object mapping string
/// keys to scalars, nested objects or arrays of objects.
///
/// The three document kinds ([`Request`], [`Asset`], [`TierConfiguration`])
/// all share this shape; the façades own exactly one `Document` each.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Source of tier or account data for builder writes.
///
/// The platform's tier sub-objects (customer, tier1, tier2, and the tier
/// configuration's account) accept three kinds of input: a bare id, a
/// request for synthesized placeholder data, or an object to deep-merge
/// into whatever is already stored.
#[derive(Debug, Clone, PartialEq)]
pub enum TierSource {
    /// Reset the tier to an object holding just this id.
    Id(String),
    /// Reset the tier to randomly synthesized placeholder data, a
    /// convenience for test fixtures rather than production payloads.
    Random,
    /// Deep-merge this object into the existing tier, creating it when
    /// absent.
    Data(Document),
}

impl From<&str> for TierSource {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for TierSource {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<Document> for TierSource {
    fn from(data: Document) -> Self {
        Self::Data(data)
    }
}
