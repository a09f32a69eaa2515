use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// One failed constraint, addressed by the (dotted) field path the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum UserSphereError {
    /// Request payload failed the validation gate
    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Path identifier is not a positive integer
    #[error("Invalid user id: {0}")]
    InvalidIdentifier(String),

    #[error("User {0} not found")]
    UserNotFound(i64),

    /// Another row already owns this email (case-insensitive)
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl UserSphereError {
    pub fn field(field: &str, message: &str) -> Self {
        UserSphereError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            UserSphereError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
