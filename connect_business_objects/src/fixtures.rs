//! Random placeholder data for tiers and accounts.
//!
//! Backing for [`TierSource::Random`]: synthesizes a plausible-looking
//! company with address and contact data. This is a convenience for test
//! fixtures, not production logic; none of the generated identifiers are
//! registered anywhere.

use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::Value;

use crate::merge::merge;
use crate::{Document, TierSource};

const COMPANY_STEMS: &[&str] = &[
    "Gamma", "Vertex", "Northwind", "Bluepeak", "Solara", "Quantic", "Harbor", "Atlas",
];
const COMPANY_SUFFIXES: &[&str] = &["Systems", "Labs", "Group", "Software", "Partners", "Networks"];
const STREETS: &[&str] = &[
    "Oak Street",
    "Maple Avenue",
    "Harbor Road",
    "Station Lane",
    "Mill Court",
    "Sunset Boulevard",
];
const CITIES: &[&str] = &["Springfield", "Riverton", "Fairview", "Brookside", "Lakewood"];
const STATES: &[&str] = &["CA", "NY", "TX", "WA", "IL"];
const COUNTRIES: &[&str] = &["US", "ES", "DE", "NL", "GB"];
const FIRST_NAMES: &[&str] = &["Vincent", "Mia", "Jules", "Ada", "Marco", "Nora"];
const LAST_NAMES: &[&str] = &["Vega", "Wallace", "Winnfield", "Lovelace", "Rossi", "Jansen"];

fn pick<'a>(rng: &mut ThreadRng, options: &'a [&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or("")
}

/// UUID-shaped random identifier (not a registered UUID).
fn random_uid(rng: &mut ThreadRng) -> String {
    format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        rng.next_u32(),
        rng.next_u32() & 0xffff,
        rng.next_u32() & 0xffff,
        rng.next_u32() & 0xffff,
        rng.next_u64() & 0xffff_ffff_ffff,
    )
}

/// Synthesizes a placeholder tier document of the given type.
///
/// The document carries a company name, a seven-digit external id, a
/// UUID-shaped external uid and nested `contact_info` with address and
/// contact data, mirroring the shape of real tier payloads.
#[must_use]
pub fn tier_fixture(tier_type: &str) -> Document {
    let mut rng = rand::thread_rng();
    let first_name = pick(&mut rng, FIRST_NAMES);
    let last_name = pick(&mut rng, LAST_NAMES);
    let company = format!(
        "{} {}",
        pick(&mut rng, COMPANY_STEMS),
        pick(&mut rng, COMPANY_SUFFIXES),
    );
    let email = format!(
        "{}.{}@{}.example.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        company.to_lowercase().replace(' ', "-"),
    );

    let value = serde_json::json!({
        "name": company,
        "type": tier_type,
        "external_id": format!("{}", rng.gen_range(1_000_000u32..10_000_000)),
        "external_uid": random_uid(&mut rng),
        "contact_info": {
            "address_line1": format!(
                "{}, {}",
                rng.gen_range(100u32..1000),
                pick(&mut rng, STREETS),
            ),
            "address_line2": format!("Suite {}", rng.gen_range(1u32..500)),
            "city": pick(&mut rng, CITIES),
            "state": pick(&mut rng, STATES),
            "postal_code": format!("{:05}", rng.gen_range(10000u32..100_000)),
            "country": pick(&mut rng, COUNTRIES),
            "contact": {
                "first_name": first_name,
                "last_name": last_name,
                "email": email,
                "phone_number": {
                    "country_code": format!("+{}", rng.gen_range(1u32..100)),
                    "area_code": format!("{}", rng.gen_range(1u32..100)),
                    "phone_number": format!("{}", rng.gen_range(1u32..1_000_000)),
                    "extension": format!("{}", rng.gen_range(1u32..101)),
                },
            },
        },
    });

    match value {
        Value::Object(document) => document,
        _ => Document::new(),
    }
}

/// Writes a tier or account object under `key` following [`TierSource`]
/// semantics: ids and random fixtures reset the object, data deep-merges
/// into it.
pub(crate) fn write_party(parent: &mut Document, key: &str, source: TierSource, tier_type: &str) {
    let object = match source {
        TierSource::Id(id) => {
            let mut seed = Document::new();
            seed.insert("id".to_owned(), Value::String(id));
            seed
        }
        TierSource::Random => {
            tracing::debug!(key, tier_type, "synthesizing placeholder tier data");
            tier_fixture(tier_type)
        }
        TierSource::Data(data) => match parent.get(key).and_then(Value::as_object) {
            Some(existing) => merge(existing, &data),
            None => data,
        },
    };
    parent.insert(key.to_owned(), Value::Object(object));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_has_the_expected_shape() {
        let tier = tier_fixture("customer");

        assert_eq!(tier["type"], "customer");
        assert_eq!(tier["external_id"].as_str().map(str::len), Some(7));
        assert_eq!(tier["external_uid"].as_str().map(str::len), Some(36));
        let contact = tier["contact_info"]["contact"]
            .as_object()
            .expect("contact object");
        assert!(contact["email"].as_str().is_some_and(|e| e.contains('@')));
    }

    #[test]
    fn write_party_resets_on_id_and_merges_on_data() {
        let mut parent = Document::new();
        write_party(&mut parent, "customer", TierSource::Random, "customer");
        assert!(parent["customer"].get("name").is_some());

        write_party(&mut parent, "customer", TierSource::from("TA-1"), "customer");
        let customer = parent["customer"].as_object().expect("customer object");
        assert_eq!(customer.len(), 1, "id source resets the tier");

        let patch = serde_json::json!({"contact_info": {"country": "ES"}})
            .as_object()
            .cloned()
            .expect("object literal");
        write_party(&mut parent, "customer", TierSource::Data(patch), "customer");
        assert_eq!(parent["customer"]["id"], "TA-1");
        assert_eq!(parent["customer"]["contact_info"]["country"], "ES");
    }
}
