use crate::core::errors::UserSphereError;
use crate::core::models::user::{NewUser, Pagination, User, UserChanges, UserPage, UserQuery};
use crate::infrastructure::storage::{UserStore, matches_search};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct UserTable {
    users: BTreeMap<i64, User>,
    ids_by_email: HashMap<String, i64>, // lower-cased email -> user id
    last_id: i64,
}

impl UserTable {
    fn email_owner(&self, email: &str) -> Option<i64> {
        self.ids_by_email.get(&email.to_lowercase()).copied()
    }
}

/// Process-local store. Rows, the email index and the id sequence share one
/// lock, so every check-and-write happens under a single write guard.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        InMemoryUserStore::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list_users(&self, query: &UserQuery) -> Result<UserPage, UserSphereError> {
        let table = self.table.read().await;
        let mut matching: Vec<&User> = table
            .users
            .values()
            .filter(|user| match query.search.as_deref() {
                Some(needle) if !needle.is_empty() => matches_search(user, needle),
                _ => true,
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let users = matching.into_iter().skip(offset).take(limit).cloned().collect();

        Ok(UserPage {
            users,
            pagination: Pagination::new(total, query.page, query.limit),
        })
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, UserSphereError> {
        let table = self.table.read().await;
        Ok(table.users.get(&user_id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, UserSphereError> {
        let mut table = self.table.write().await;
        if table.email_owner(&user.email).is_some() {
            return Err(UserSphereError::EmailAlreadyRegistered(user.email));
        }

        table.last_id += 1;
        let now = Utc::now();
        let created = User {
            id: table.last_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            company: user.company,
            address: user.address,
            created_at: now,
            updated_at: now,
        };
        table.ids_by_email.insert(created.email.to_lowercase(), created.id);
        table.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_user(&self, user_id: i64, changes: UserChanges) -> Result<User, UserSphereError> {
        let mut table = self.table.write().await;
        let Some(existing) = table.users.get(&user_id) else {
            return Err(UserSphereError::UserNotFound(user_id));
        };
        let previous_email = existing.email.to_lowercase();

        if let Some(email) = changes.email.as_deref() {
            if table.email_owner(email).is_some_and(|owner| owner != user_id) {
                return Err(UserSphereError::EmailAlreadyRegistered(email.to_string()));
            }
        }

        let mut updated = existing.clone();
        changes.apply_to(&mut updated);
        updated.updated_at = Utc::now();

        let email_key = updated.email.to_lowercase();
        if email_key != previous_email {
            table.ids_by_email.remove(&previous_email);
            table.ids_by_email.insert(email_key, user_id);
        }
        table.users.insert(user_id, updated.clone());
        Ok(updated)
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), UserSphereError> {
        let mut table = self.table.write().await;
        let removed = table
            .users
            .remove(&user_id)
            .ok_or(UserSphereError::UserNotFound(user_id))?;
        table.ids_by_email.remove(&removed.email.to_lowercase());
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, UserSphereError> {
        Ok(self.table.read().await.users.len() as u64)
    }

    async fn ping(&self) -> Result<(), UserSphereError> {
        Ok(())
    }
}
