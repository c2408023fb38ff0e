//! Behavioural tests for the request façade.

use connect_business_objects::{
    BusinessObject, Document, DocumentError, HasContract, HasEvents, HasMarketplace,
    HasParameters, ParamUpdate, Request, RequestModel,
};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::datetime;

const NOTE: &str = "A note";
const REASON: &str = "A reason";
const USER_ID: &str = "US-123-123-123";
const USER_NAME: &str = "Vincent Vega";
const USER_EMAIL: &str = "vincent.vega@pulp.com";

fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("object literal")
}

fn shared_request_assertions(request: &Request) {
    let raw = request.raw();

    assert_eq!(request.note(), Some(NOTE));
    assert_eq!(request.reason(), Some(REASON));

    let marketplace = request.marketplace().expect("marketplace");
    assert_eq!(marketplace["id"], "MP-12345");

    let assignee = request.assignee().expect("assignee");
    assert_eq!(assignee["id"], USER_ID);
    assert_eq!(assignee["name"], USER_NAME);
    assert_eq!(assignee["email"], USER_EMAIL);

    assert_eq!(request.params().len(), 2);
    let first = request.param("P_001").expect("P_001");
    assert_eq!(first["value"], "P_001-Value-UPD");
    assert_eq!(first["value_error"], "P_001-Error-UPD");
    let second = request.param("P_002").expect("P_002");
    assert_eq!(second["value"], "P_002-Value");

    // Raw storage matches the accessors, in insertion order.
    assert_eq!(raw["params"][0]["id"], "P_001");
    assert_eq!(raw["params"][1]["id"], "P_002");
}

#[test]
fn construction_rejects_non_object_values() {
    let rejected = Request::try_from(json!([]));
    assert!(matches!(
        rejected,
        Err(DocumentError::InvalidDocument { found: "array" })
    ));

    let from_null = Request::try_from(Value::Null).expect("null yields an empty request");
    assert!(from_null.raw().is_empty());
}

#[test]
fn uninitialized_members_read_as_none() {
    let request = Request::new();

    assert!(request.marketplace().is_none());
    assert!(request.assignee().is_none());
    assert!(request.id().is_none());
    assert_eq!(request.created().expect("absent is fine"), None);
}

#[test]
fn without_removes_a_member_and_rewriting_restores_it() {
    let mut request = Request::new();
    request.with_id("PR-0000-0000-0000-100");
    request.without("id");

    assert!(request.id().is_none());

    request.with_id("PR-0000-0000-0000-101");
    assert_eq!(request.id(), Some("PR-0000-0000-0000-101"));
}

#[test]
fn unmutated_facade_round_trips_its_input() {
    let document = doc(json!({
        "id": "PR-001",
        "type": "purchase",
        "asset": {"id": "AS-001"},
        "params": [{"id": "P1", "value": "v"}],
    }));

    let request = Request::from(document.clone());
    assert_eq!(request.raw(), &document);
    assert_eq!(request.raw_owned(), document);
}

#[test]
fn builds_a_valid_request() {
    let created = datetime!(2022-03-25 13:12:22 +00:00);
    let updated = datetime!(2022-03-25 13:20:22 +00:00);

    let mut request = Request::new();
    request
        .with_id("PR-001")
        .with_request_type("purchase")
        .with_status("pending");
    request.with_created(created).expect("created");
    request.with_updated(updated).expect("updated");
    request
        .with_marketplace("MP-12345", None)
        // duplicate call to ensure the member is not duplicated
        .with_marketplace("MP-12345", None)
        .with_note(NOTE)
        .with_reason(REASON)
        .with_assignee(USER_ID, USER_NAME, USER_EMAIL)
        .with_assignee(USER_ID, USER_NAME, USER_EMAIL)
        .with_param(ParamUpdate::new("P_001").value("P_001-Value").value_error("P_001-Error"))
        .with_param(
            ParamUpdate::new("P_001")
                .value("P_001-Value-UPD")
                .value_error("P_001-Error-UPD"),
        )
        .with_param(ParamUpdate::new("P_002").value("P_002-Value").value_error("P_002-Error"));

    assert_eq!(request.id(), Some("PR-001"));
    assert_eq!(request.request_type(), Some("purchase"));
    assert_eq!(request.status(), Some("pending"));
    assert_eq!(request.created().expect("parses"), Some(created));
    assert_eq!(request.updated().expect("parses"), Some(updated));
    shared_request_assertions(&request);
}

#[test]
fn builds_a_valid_asset_request() {
    let mut request = Request::new();

    let mut asset = request.asset();
    asset.with_id("AS-001");

    request
        .with_asset(asset)
        .with_id("PR-001")
        .with_request_type("purchase")
        .with_status("pending")
        .with_marketplace("MP-12345", None)
        .with_note(NOTE)
        .with_reason(REASON)
        .with_assignee(USER_ID, USER_NAME, USER_EMAIL)
        .with_param(ParamUpdate::new("P_001").value("P_001-Value").value_error("P_001-Error"))
        .with_param(
            ParamUpdate::new("P_001")
                .value("P_001-Value-UPD")
                .value_error("P_001-Error-UPD"),
        )
        .with_param(ParamUpdate::new("P_002").value("P_002-Value").value_error("P_002-Error"));

    assert!(request.is_asset_request());
    assert!(!request.is_tier_config_request());
    assert_eq!(request.request_model(), RequestModel::Asset);

    assert_eq!(request.raw()["asset"]["id"], "AS-001");
    assert_eq!(request.asset().id(), Some("AS-001"));
    shared_request_assertions(&request);
}

#[test]
fn builds_a_valid_tier_configuration_request() {
    let mut request = Request::new();

    let mut configuration = request.tier_configuration();
    configuration.with_id("TC-001");

    request
        .with_tier_configuration(configuration)
        .with_id("TCR-001")
        .with_request_type("setup")
        .with_status("pending")
        .with_marketplace("MP-12345", None)
        .with_note(NOTE)
        .with_reason(REASON)
        .with_assignee(USER_ID, USER_NAME, USER_EMAIL)
        .with_params([
            ParamUpdate::new("P_001").value("P_001-Value").value_error("P_001-Error"),
            ParamUpdate::new("P_001")
                .value("P_001-Value-UPD")
                .value_error("P_001-Error-UPD"),
            ParamUpdate::new("P_002").value("P_002-Value").value_error("P_002-Error"),
        ]);

    assert!(request.is_tier_config_request());
    assert!(!request.is_asset_request());

    assert_eq!(request.raw()["configuration"]["id"], "TC-001");
    assert_eq!(request.tier_configuration().id(), Some("TC-001"));
    shared_request_assertions(&request);
}

#[test]
fn records_contract_and_event_timestamps() {
    let created = datetime!(2022-03-25 13:12:22 +00:00);
    let updated = datetime!(2022-03-25 13:20:22 +00:00);

    let mut request = Request::new();
    request.with_contract("CRD-00000-00000-00000", Some("ACME Distribution Contract"));
    request.with_events(created, updated).expect("events");

    let contract = request.contract().expect("contract");
    assert_eq!(contract["id"], "CRD-00000-00000-00000");
    assert_eq!(contract["name"], "ACME Distribution Contract");

    let events = request.events().expect("events");
    let stored = events["created"]["at"].as_str().expect("created.at");
    let parsed = OffsetDateTime::parse(stored, &Rfc3339).expect("round-trips");
    assert_eq!(parsed, created);
    assert!(events["updated"]["at"].is_string());
}

#[test]
fn serde_round_trips_and_rejects_non_objects() {
    let payload = json!({
        "id": "PR-001",
        "type": "purchase",
        "asset": {"id": "AS-001"},
        "params": [{"id": "P1", "value": "v"}],
    });

    let decoded: Request = serde_json::from_value(payload.clone()).expect("decodes");
    assert_eq!(decoded, Request::from(doc(payload.clone())));
    assert_eq!(serde_json::to_value(&decoded).expect("encodes"), payload);

    assert!(serde_json::from_value::<Request>(json!([])).is_err());
    assert!(serde_json::from_value::<Request>(json!("PR-001")).is_err());
}

#[test]
fn serde_and_construction_agree_on_null() {
    let decoded: Request = serde_json::from_value(Value::Null).expect("null decodes");
    let constructed = Request::try_from(Value::Null).expect("null constructs");

    assert_eq!(decoded, constructed);
    assert!(decoded.raw().is_empty());
}

#[test]
fn display_renders_the_underlying_json() {
    let request = Request::from(doc(json!({"id": "PR-001"})));
    assert_eq!(request.to_string(), r#"{"id":"PR-001"}"#);
}

#[test]
fn generic_field_access_reads_what_it_wrote() {
    let mut request = Request::new();
    request.with_field("id", "PR-000-000-002");

    assert_eq!(
        request.get("id").and_then(Value::as_str),
        Some("PR-000-000-002")
    );
    assert!(request.get("missing").is_none());
}

#[test]
fn strict_param_update_refuses_to_create() {
    let mut request = Request::new();
    request.with_param(ParamUpdate::new("P_001").value("A"));

    let missing = request.update_param(ParamUpdate::new("P_404").value("B"));
    assert!(matches!(
        missing.err(),
        Some(DocumentError::MissingParameter { id }) if id == "P_404"
    ));

    request
        .update_param(ParamUpdate::new("P_001").value("B"))
        .expect("P_001 exists");
    assert_eq!(request.param("P_001").expect("P_001")["value"], "B");
}

#[test]
fn invalid_timestamps_surface_as_errors() {
    let mut request = Request::new();
    request.with_field("created", "not-a-date");
    assert!(matches!(
        request.created(),
        Err(DocumentError::InvalidTimestamp { field: "created", .. })
    ));

    request.with_field("updated", 42);
    assert!(matches!(
        request.updated(),
        Err(DocumentError::InvalidTimestamp { field: "updated", source: None })
    ));
}
