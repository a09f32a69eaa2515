mod user_tests;
mod validation_tests;

use crate::core::models::user::CreateUserInput;
use crate::core::services::UserService;
use crate::infrastructure::storage::in_memory::InMemoryUserStore;
use serde_json::{Value, json};
use std::sync::Arc;

pub fn create_test_service() -> UserService {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    UserService::new(Arc::new(InMemoryUserStore::new()))
}

pub fn address_input(street: &str, city: &str, zip: &str) -> Value {
    json!({ "street": street, "city": city, "zip": zip })
}

pub fn user_input(name: &str, email: &str) -> CreateUserInput {
    CreateUserInput {
        name: Some(name.into()),
        email: Some(email.into()),
        phone: Some("+91-9876543210".into()),
        company: Some("Acme Corp".into()),
        address: Some(json!({
            "street": "11 MG Road",
            "city": "Pune",
            "zip": "411001",
            "geo": { "lat": "12.9716", "lng": "77.5946" }
        })),
    }
}
