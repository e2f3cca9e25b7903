use keyfit_map::{
    Ident, MapError, MapOptions, ResolveError, RestMode, TextMap, Transformation, TypeRegistry,
    record_into, record_to_record, record_to_record_or_panic,
};
use keyfit_schema::StaticSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Account {
    username: String,
    email: String,
    login_count: u32,
    plan: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct AccountCopy {
    username: String,
    email: String,
    login_count: u32,
    plan: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Contact {
    username: String,
    email: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyAccount {
    user_name: String,
    email: String,
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_record::<Account>("Billing::Account").unwrap();
    registry.register_record::<AccountCopy>("Archive::Account").unwrap();
    registry.register_record::<Contact>("Crm::Contact").unwrap();
    registry.register_record::<LegacyAccount>("Legacy::Account").unwrap();
    registry
}

fn account() -> Account {
    Account {
        username: "john".to_string(),
        email: "john@example.com".to_string(),
        login_count: 7,
        plan: Some("pro".to_string()),
    }
}

#[test]
fn round_trip_between_identical_field_sets_is_lossless() -> anyhow::Result<()> {
    let registry = registry();
    let original = account();

    let (copy, _): (AccountCopy, _) = record_into(&original, &MapOptions::new(), &registry)?;
    let (back, _): (Account, _) = record_into(&copy, &MapOptions::new(), &registry)?;

    assert_eq!(back, original);
    Ok(())
}

#[test]
fn residual_fields_come_back_as_source_identifiers() -> anyhow::Result<()> {
    let registry = registry();
    let source = registry.record_from_typed(&account())?;
    let options = MapOptions::new().with_rest(RestMode::Separate);

    let converted = record_to_record(&source, "Crm::Contact", &options, &registry)?;

    assert_eq!(converted.record.get("username"), Some(&json!("john")));
    let rest = converted.rest.unwrap();
    let keys: Vec<&str> = rest.keys().map(Ident::as_str).collect();
    assert_eq!(keys, vec!["login_count", "plan"]);
    assert_eq!(rest.get("login_count"), Some(&json!(7)));
    Ok(())
}

#[test]
fn transformations_apply_to_record_fields() {
    let registry = registry();
    let legacy = LegacyAccount {
        user_name: "jane".to_string(),
        email: "jane@example.com".to_string(),
    };
    let options = MapOptions::new()
        .with_transformation(Transformation::SnakeCase)
        .with_rest(RestMode::Separate);

    let source = registry.record_from_typed(&legacy).unwrap();
    let converted = record_to_record(&source, "Billing::Account", &options, &registry).unwrap();

    // `userName` snake-cases to `user_name`, which Account does not declare.
    assert_eq!(converted.record.get("username"), Some(&json!("")));
    assert_eq!(converted.record.get("email"), Some(&json!("jane@example.com")));
    let rest = converted.rest.unwrap();
    assert_eq!(rest.get("userName"), Some(&json!("jane")));
}

#[test]
fn merge_mode_keeps_residual_inside_record() {
    let registry = registry();
    let source = registry.record_from_typed(&account()).unwrap();
    let options = MapOptions::new().with_rest(RestMode::Merge);

    let converted = record_to_record_or_panic(&source, "Crm::Contact", &options, &registry);

    assert!(converted.rest.is_none());
    assert_eq!(
        converted.record.get(keyfit_map::REST_FIELD),
        Some(&json!({"login_count": 7, "plan": "pro"}))
    );
}

#[test]
#[should_panic(expected = r#"not a valid type name: "crm.contact""#)]
fn panicking_record_conversion_reports_bad_type_name() {
    let registry = registry();
    let source = registry.record_from_typed(&account()).unwrap();
    record_to_record_or_panic(&source, "crm.contact", &MapOptions::new(), &registry);
}

#[test]
fn residual_identifier_unknown_to_destination_registry_fails() {
    let mut origin = TypeRegistry::new();
    let source_type = origin
        .register_schema("Src", StaticSchema::with_fields(["shared", "only_in_origin"]))
        .unwrap();
    let mut fields = TextMap::new();
    fields.insert("shared".to_string(), json!(1));
    fields.insert("only_in_origin".to_string(), json!(2));
    let (source, _) = origin.build_record(&source_type, fields);

    let mut destination = TypeRegistry::new();
    destination
        .register_schema("Dst", StaticSchema::with_fields(["shared"]))
        .unwrap();
    let options = MapOptions::new().with_rest(RestMode::Separate);

    let err = record_to_record(&source, "Dst", &options, &destination).unwrap_err();

    assert!(matches!(
        &err,
        MapError::Resolve(ResolveError::UnknownIdentifierText { text }) if text == "only_in_origin"
    ));
    assert_eq!(err.to_string(), r#"identifier does not exist: "only_in_origin""#);
}

#[test]
fn discarding_residual_skips_identifier_check() {
    let mut origin = TypeRegistry::new();
    let source_type = origin
        .register_schema("Src", StaticSchema::with_fields(["shared", "only_in_origin"]))
        .unwrap();
    let (source, _) = origin.build_record(&source_type, TextMap::new());

    let mut destination = TypeRegistry::new();
    destination
        .register_schema("Dst", StaticSchema::with_fields(["shared"]))
        .unwrap();

    let converted = record_to_record(&source, "Dst", &MapOptions::new(), &destination).unwrap();

    assert!(converted.rest.is_none());
    assert_eq!(converted.record.get("shared"), Some(&json!(null)));
}
