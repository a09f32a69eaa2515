use crate::constants::{DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::core::errors::UserSphereError;
use crate::core::models::user::{CreateUserInput, UpdateUserInput, User, UserPage, UserQuery};
use crate::core::validation::{parse_user_id, validate_create, validate_update};
use crate::infrastructure::storage::UserStore;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Listing parameters as they arrive, before defaults.
#[derive(Clone, Debug, Default)]
pub struct ListUsersParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

/// Runs the validation gate in front of the store and logs the outcome.
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        UserService { store }
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    fn build_query(params: ListUsersParams) -> Result<UserQuery, UserSphereError> {
        let page = params.page.unwrap_or(DEFAULT_PAGE);
        if page == 0 {
            return Err(UserSphereError::field("page", "Page must be a positive integer"));
        }
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(UserSphereError::field("limit", "Limit must be a positive integer"));
        }
        // Whitespace-only means no filter; any other term is matched as given.
        let search = params.search.filter(|search| !search.trim().is_empty());
        Ok(UserQuery { page, limit, search })
    }

    pub async fn list_users(&self, params: ListUsersParams) -> Result<UserPage, UserSphereError> {
        let query = Self::build_query(params)?;
        self.store
            .list_users(&query)
            .await
            .inspect_err(|e| error!("Failed to list users: {}", e))
    }

    pub async fn get_user(&self, raw_id: &str) -> Result<User, UserSphereError> {
        let user_id = parse_user_id(raw_id)?;
        self.store
            .get_user(user_id)
            .await
            .inspect_err(|e| error!("Failed to get user {}: {}", user_id, e))?
            .ok_or(UserSphereError::UserNotFound(user_id))
    }

    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, UserSphereError> {
        let new_user = validate_create(&input)?;
        match self.store.create_user(new_user).await {
            Ok(user) => {
                info!(user_id = user.id, "User created");
                Ok(user)
            }
            Err(e) => Err(Self::log_write_failure("create", e)),
        }
    }

    pub async fn update_user(&self, raw_id: &str, input: UpdateUserInput) -> Result<User, UserSphereError> {
        let user_id = parse_user_id(raw_id)?;
        let changes = validate_update(&input)?;
        match self.store.update_user(user_id, changes).await {
            Ok(user) => {
                info!(user_id, "User updated");
                Ok(user)
            }
            Err(e) => Err(Self::log_write_failure("update", e)),
        }
    }

    pub async fn delete_user(&self, raw_id: &str) -> Result<(), UserSphereError> {
        let user_id = parse_user_id(raw_id)?;
        match self.store.delete_user(user_id).await {
            Ok(()) => {
                info!(user_id, "User deleted");
                Ok(())
            }
            Err(e) => Err(Self::log_write_failure("delete", e)),
        }
    }

    fn log_write_failure(operation: &str, e: UserSphereError) -> UserSphereError {
        match &e {
            UserSphereError::EmailAlreadyRegistered(email) => {
                warn!(operation, email = %email, "Duplicate email rejected");
            }
            UserSphereError::UserNotFound(user_id) => {
                info!(operation, user_id, "User not found");
            }
            UserSphereError::StorageError(_) | UserSphereError::DatabaseError(_) => {
                error!(operation, "Storage failure: {}", e);
            }
            UserSphereError::Validation(_) | UserSphereError::InvalidIdentifier(_) => {}
        }
        e
    }
}
