//! Validation gate for user payloads.
//!
//! Each field rule is a pure function from raw input to either a normalised
//! value or field errors. The gate runs every rule in declaration order and
//! concatenates the failures, so a request is either accepted whole or
//! rejected with the complete, ordered error list.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::constants::{NAME_MAX_CHARS, NAME_MIN_CHARS};
use crate::core::errors::{FieldError, UserSphereError};
use crate::core::models::user::{
    Address, CreateUserInput, Geo, NewUser, UpdateUserInput, UserChanges,
};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern compiles")
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$")
        .expect("phone pattern compiles")
});

type FieldResult<T> = Result<T, Vec<FieldError>>;

fn fail<T>(field: &str, message: &str) -> FieldResult<T> {
    Err(vec![FieldError::new(field, message)])
}

fn required<'a>(value: Option<&'a str>, field: &str, message: &str) -> FieldResult<&'a str> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
        _ => fail(field, message),
    }
}

pub fn check_name(value: Option<&str>) -> FieldResult<String> {
    let name = required(value, "name", "Name is required")?;
    let chars = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        return fail("name", "Name must be between 2 and 100 characters");
    }
    Ok(name.to_string())
}

/// Trims and lower-cases; the stored form is the comparison form.
pub fn check_email(value: Option<&str>) -> FieldResult<String> {
    let email = required(value, "email", "Email is required")?;
    if !EMAIL_PATTERN.is_match(email) {
        return fail("email", "Must be a valid email address");
    }
    Ok(email.to_lowercase())
}

pub fn check_phone(value: Option<&str>) -> FieldResult<String> {
    let phone = required(value, "phone", "Phone number is required")?;
    if !PHONE_PATTERN.is_match(phone) {
        return fail("phone", "Must be a valid phone number");
    }
    Ok(phone.to_string())
}

/// Blank companies are stored as absent.
pub fn normalize_company(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|company| !company.is_empty())
        .map(str::to_string)
}

/// Reads a scalar body field the way form input is read: strings as given,
/// numbers and booleans as their text. `null` counts as missing.
fn scalar<'a>(value: Option<&'a Value>, field: &str) -> FieldResult<Option<Cow<'a, str>>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(Cow::Borrowed(text.as_str()))),
        Some(Value::Number(number)) => Ok(Some(Cow::Owned(number.to_string()))),
        Some(Value::Bool(flag)) => Ok(Some(Cow::Owned(flag.to_string()))),
        Some(_) => fail(field, "Must be a text value"),
    }
}

fn text_rule<T>(
    value: Option<&Value>,
    field: &str,
    rule: fn(Option<&str>) -> FieldResult<T>,
) -> FieldResult<T> {
    let text = scalar(value, field)?;
    rule(text.as_deref())
}

fn check_company(value: Option<&Value>) -> FieldResult<Option<String>> {
    Ok(normalize_company(scalar(value, "company")?.as_deref()))
}

fn check_geo(value: Option<&Value>) -> FieldResult<Option<Geo>> {
    let geo = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(geo)) => geo,
        Some(_) => return fail("address.geo", "Geo must be an object"),
    };

    let mut errors = Vec::new();
    let lat = keep(&mut errors, scalar(geo.get("lat"), "address.geo.lat"));
    let lng = keep(&mut errors, scalar(geo.get("lng"), "address.geo.lng"));
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(Some(Geo {
        lat: lat.flatten().map(|lat| lat.trim().to_string()),
        lng: lng.flatten().map(|lng| lng.trim().to_string()),
    }))
}

pub fn check_address(value: Option<&Value>) -> FieldResult<Address> {
    let address = match value {
        None | Some(Value::Null) => return fail("address", "Address is required"),
        Some(Value::String(text)) if text.trim().is_empty() => {
            return fail("address", "Address is required");
        }
        Some(Value::Object(address)) => address,
        Some(_) => return fail("address", "Address must be an object"),
    };

    let part = |key: &str, field: &str, message: &str| -> FieldResult<String> {
        let text = scalar(address.get(key), field)?;
        required(text.as_deref(), field, message).map(str::to_string)
    };

    let mut errors = Vec::new();
    let street = keep(&mut errors, part("street", "address.street", "Street is required"));
    let city = keep(&mut errors, part("city", "address.city", "City is required"));
    let zip = keep(&mut errors, part("zip", "address.zip", "ZIP code is required"));
    let geo = keep(&mut errors, check_geo(address.get("geo")));

    match (street, city, zip, geo) {
        (Some(street), Some(city), Some(zip), Some(geo)) => Ok(Address {
            street,
            city,
            zip,
            geo,
        }),
        _ => Err(errors),
    }
}

fn keep<T>(errors: &mut Vec<FieldError>, result: FieldResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(failures) => {
            errors.extend(failures);
            None
        }
    }
}

// Update bodies skip absent and `null` fields.
fn supplied(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

pub fn validate_create(input: &CreateUserInput) -> Result<NewUser, UserSphereError> {
    let mut errors = Vec::new();
    let name = keep(&mut errors, text_rule(input.name.as_ref(), "name", check_name));
    let email = keep(&mut errors, text_rule(input.email.as_ref(), "email", check_email));
    let phone = keep(&mut errors, text_rule(input.phone.as_ref(), "phone", check_phone));
    let company = keep(&mut errors, check_company(input.company.as_ref()));
    let address = keep(&mut errors, check_address(input.address.as_ref()));

    match (name, email, phone, company, address) {
        (Some(name), Some(email), Some(phone), Some(company), Some(address)) if errors.is_empty() => {
            Ok(NewUser {
                name,
                email,
                phone,
                company,
                address,
            })
        }
        _ => Err(UserSphereError::Validation(errors)),
    }
}

/// Same rules as [`validate_create`], applied only to the supplied fields.
pub fn validate_update(input: &UpdateUserInput) -> Result<UserChanges, UserSphereError> {
    let mut errors = Vec::new();
    let changes = UserChanges {
        name: supplied(input.name.as_ref())
            .and_then(|name| keep(&mut errors, text_rule(Some(name), "name", check_name))),
        email: supplied(input.email.as_ref())
            .and_then(|email| keep(&mut errors, text_rule(Some(email), "email", check_email))),
        phone: supplied(input.phone.as_ref())
            .and_then(|phone| keep(&mut errors, text_rule(Some(phone), "phone", check_phone))),
        company: input
            .company
            .as_ref()
            .and_then(|company| keep(&mut errors, check_company(Some(company)))),
        address: supplied(input.address.as_ref())
            .and_then(|address| keep(&mut errors, check_address(Some(address)))),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(UserSphereError::Validation(errors))
    }
}

/// Digits only: signs, whitespace and fractions are rejected.
pub fn parse_user_id(raw: &str) -> Result<i64, UserSphereError> {
    let digits_only = !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit());
    match raw.parse::<i64>() {
        Ok(id) if digits_only && id > 0 => Ok(id),
        _ => Err(UserSphereError::InvalidIdentifier(raw.to_string())),
    }
}
