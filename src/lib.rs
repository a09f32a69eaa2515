pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::api::routes::{AppState, build_router};
pub use crate::config::Config;
pub use crate::core::errors::{FieldError, UserSphereError};
pub use crate::core::services::UserService;
pub use crate::infrastructure::storage::{UserStore, in_memory::InMemoryUserStore, postgres::PostgresUserStore};

#[cfg(test)]
mod tests; // Include integration tests
