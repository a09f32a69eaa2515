use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Geo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub address: Address,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated, normalised fields for an insert. Id and timestamps come from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub address: Address,
}

/// Validated partial update. `None` keeps the stored value.
///
/// `company` is tri-state: `None` keeps it, `Some(None)` clears it,
/// `Some(Some(_))` replaces it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<Option<String>>,
    pub address: Option<Address>,
}

impl UserChanges {
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(company) = self.company {
            user.company = company;
        }
        if let Some(address) = self.address {
            user.address = address;
        }
    }
}

/// Documented shape of `address.geo` in request bodies.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct GeoInput {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Documented shape of `address` in request bodies.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub geo: Option<GeoInput>,
}

/// Raw body of `POST /users`. Fields are kept as the JSON that arrived so that
/// missing or mistyped values surface as field errors from the validation gate
/// rather than as deserialisation failures.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct CreateUserInput {
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub phone: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub company: Option<Value>,
    #[schema(value_type = Option<AddressInput>)]
    pub address: Option<Value>,
}

/// Raw body of `PUT /users/{id}`.
///
/// `company` keeps an explicit `null` as `Some(Value::Null)` so it can clear
/// the stored value; an absent key is `None`.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserInput {
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub phone: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub company: Option<Value>,
    #[schema(value_type = Option<AddressInput>)]
    pub address: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Listing request after defaults are applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserQuery {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
}

impl UserQuery {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Pagination {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}
