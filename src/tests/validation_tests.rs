use crate::core::errors::{FieldError, UserSphereError};
use crate::core::models::user::{CreateUserInput, UpdateUserInput};
use crate::core::validation::{check_email, check_phone, parse_user_id, validate_create, validate_update};
use crate::tests::{address_input, user_input};
use serde_json::json;

fn fields(err: UserSphereError) -> Vec<String> {
    match err {
        UserSphereError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_valid_create_is_trimmed_and_normalized() {
    let mut input = user_input("  Ada Lovelace  ", "  Ada@Example.COM ");
    input.company = Some("   ".into());
    let user = validate_create(&input).unwrap();
    assert_eq!(user.name, "Ada Lovelace");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.company, None);
    assert_eq!(user.address.city, "Pune");
    assert_eq!(user.address.geo.unwrap().lat.as_deref(), Some("12.9716"));
}

#[test]
fn test_empty_create_reports_fields_in_rule_order() {
    let err = validate_create(&CreateUserInput::default()).unwrap_err();
    assert_eq!(fields(err), vec!["name", "email", "phone", "address"]);
}

#[test]
fn test_blank_street_is_cited() {
    let mut input = user_input("Ada Lovelace", "ada@example.com");
    input.address = Some(address_input("", "X", "1"));
    let err = validate_create(&input).unwrap_err();
    assert_eq!(
        err.field_errors().unwrap(),
        &[FieldError::new("address.street", "Street is required")]
    );
}

#[test]
fn test_every_missing_address_part_is_reported() {
    let mut input = user_input("Ada Lovelace", "ada@example.com");
    input.address = Some(json!({}));
    let err = validate_create(&input).unwrap_err();
    assert_eq!(fields(err), vec!["address.street", "address.city", "address.zip"]);
}

#[test]
fn test_name_length_bounds() {
    let short = user_input(" A ", "ada@example.com");
    assert_eq!(fields(validate_create(&short).unwrap_err()), vec!["name"]);

    let long = user_input(&"a".repeat(101), "ada@example.com");
    assert_eq!(fields(validate_create(&long).unwrap_err()), vec!["name"]);

    let max = user_input(&"é".repeat(100), "ada@example.com");
    assert!(validate_create(&max).is_ok());
}

#[test]
fn test_email_syntax() {
    assert_eq!(check_email(Some("user.name+tag@mail.example.org")).unwrap(), "user.name+tag@mail.example.org");
    for bad in ["invalid", "a@b", "a@b.c", "a@@b.com", "@example.com", "a b@example.com"] {
        assert!(check_email(Some(bad)).is_err(), "{bad} should be rejected");
    }
    assert_eq!(
        check_email(Some("   ")).unwrap_err(),
        vec![FieldError::new("email", "Email is required")]
    );
}

#[test]
fn test_phone_pattern() {
    for good in ["+91-9876543210", "(555) 123-4567", "555.123.4567", "12345", "+44 20 79460958"] {
        assert!(check_phone(Some(good)).is_ok(), "{good} should be accepted");
    }
    for bad in ["abc-defg", "+1 234 567 890 123", "555_123_4567", ""] {
        assert!(check_phone(Some(bad)).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn test_update_only_checks_supplied_fields() {
    let changes = validate_update(&UpdateUserInput::default()).unwrap();
    assert_eq!(changes, Default::default());

    let input = UpdateUserInput {
        name: Some("X".into()),
        phone: Some("not a phone".into()),
        ..Default::default()
    };
    assert_eq!(fields(validate_update(&input).unwrap_err()), vec!["name", "phone"]);
}

#[test]
fn test_update_address_must_be_complete() {
    let input = UpdateUserInput {
        address: Some(json!({ "street": "1 Main St", "city": "Springfield" })),
        ..Default::default()
    };
    assert_eq!(fields(validate_update(&input).unwrap_err()), vec!["address.zip"]);
}

#[test]
fn test_update_company_is_tri_state() {
    let absent: UpdateUserInput = serde_json::from_str(r#"{"name":"Grace Hopper"}"#).unwrap();
    assert_eq!(validate_update(&absent).unwrap().company, None);

    let null: UpdateUserInput = serde_json::from_str(r#"{"company":null}"#).unwrap();
    assert_eq!(validate_update(&null).unwrap().company, Some(None));

    let blank: UpdateUserInput = serde_json::from_str(r#"{"company":"  "}"#).unwrap();
    assert_eq!(validate_update(&blank).unwrap().company, Some(None));

    let value: UpdateUserInput = serde_json::from_str(r#"{"company":" Navy "}"#).unwrap();
    assert_eq!(validate_update(&value).unwrap().company, Some(Some("Navy".to_string())));
}

#[test]
fn test_user_id_must_be_positive_integer() {
    assert_eq!(parse_user_id("42").unwrap(), 42);
    for bad in ["0", "-3", "+5", " 5", "5 ", "abc", "1.5", "", "99999999999999999999"] {
        assert!(
            matches!(parse_user_id(bad), Err(UserSphereError::InvalidIdentifier(_))),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn test_address_must_be_an_object() {
    let mut input = user_input("Ada Lovelace", "ada@example.com");
    input.address = Some(json!("221B Baker Street"));
    assert_eq!(
        validate_create(&input).unwrap_err().field_errors().unwrap(),
        &[FieldError::new("address", "Address must be an object")]
    );

    input.address = Some(json!(["221B", "Baker Street"]));
    assert_eq!(fields(validate_create(&input).unwrap_err()), vec!["address"]);
}

#[test]
fn test_geo_must_be_an_object_when_present() {
    let mut input = user_input("Ada Lovelace", "ada@example.com");
    input.address = Some(json!({
        "street": "1 Main St",
        "city": "Springfield",
        "zip": "12345",
        "geo": "51.5,-0.1"
    }));
    assert_eq!(
        validate_create(&input).unwrap_err().field_errors().unwrap(),
        &[FieldError::new("address.geo", "Geo must be an object")]
    );

    input.address = Some(json!({
        "street": "1 Main St",
        "city": "Springfield",
        "zip": "12345",
        "geo": null
    }));
    assert_eq!(validate_create(&input).unwrap().address.geo, None);
}

#[test]
fn test_scalar_fields_accept_numbers_and_reject_structures() {
    let mut input = user_input("Ada Lovelace", "ada@example.com");
    input.phone = Some(json!(5551234567_u64));
    input.address = Some(json!({
        "street": "1 Main St",
        "city": "Springfield",
        "zip": 12345,
        "geo": { "lat": 51.5, "lng": -0.1 }
    }));
    let user = validate_create(&input).unwrap();
    assert_eq!(user.phone, "5551234567");
    assert_eq!(user.address.zip, "12345");
    assert_eq!(user.address.geo.unwrap().lat.as_deref(), Some("51.5"));

    input.name = Some(json!({ "first": "Ada" }));
    input.company = Some(json!(["Analytical", "Engines"]));
    assert_eq!(
        validate_create(&input).unwrap_err().field_errors().unwrap(),
        &[
            FieldError::new("name", "Must be a text value"),
            FieldError::new("company", "Must be a text value"),
        ]
    );
}
