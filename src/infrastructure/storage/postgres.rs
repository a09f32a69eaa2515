use crate::constants::{EMAIL_UNIQUE_INDEX, UNIQUE_VIOLATION};
use crate::core::errors::UserSphereError;
use crate::core::models::user::{Address, NewUser, Pagination, User, UserChanges, UserPage, UserQuery};
use crate::infrastructure::storage::UserStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::info;

const USER_COLUMNS: &str = "id, name, email, phone, company, address, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    phone: String,
    company: Option<String>,
    address: Json<Address>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            address: row.address.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed user table. Every operation is one statement; the
/// unique index on `LOWER(email)` is what rejects duplicate emails.
#[derive(Clone, Debug)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, UserSphereError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| UserSphereError::DatabaseError(format!("Failed to connect: {}", e)))?;
        info!("Database connection established");
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), UserSphereError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| UserSphereError::DatabaseError(format!("Migration failed: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }
}

/// Escapes LIKE metacharacters so the search term matches literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn map_write_error(e: sqlx::Error, email: &str, context: &str) -> UserSphereError {
    if let Some(db_err) = e.as_database_error() {
        let unique = db_err.code().as_deref() == Some(UNIQUE_VIOLATION);
        if unique && db_err.constraint().is_none_or(|name| name == EMAIL_UNIQUE_INDEX) {
            return UserSphereError::EmailAlreadyRegistered(email.to_string());
        }
    }
    UserSphereError::DatabaseError(format!("{}: {}", context, e))
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn list_users(&self, query: &UserQuery) -> Result<UserPage, UserSphereError> {
        let pattern = query
            .search
            .as_deref()
            .filter(|search| !search.is_empty())
            .map(like_pattern);
        let filter = "($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1 OR company ILIKE $1)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {}", filter))
            .bind(pattern.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserSphereError::DatabaseError(format!("Failed to count users: {}", e)))?;

        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE {} ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
            USER_COLUMNS, filter
        ))
        .bind(pattern.as_deref())
        .bind(to_i64(query.limit))
        .bind(to_i64(query.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserSphereError::DatabaseError(format!("Failed to list users: {}", e)))?;

        Ok(UserPage {
            users: rows.into_iter().map(User::from).collect(),
            pagination: Pagination::new(u64::try_from(total).unwrap_or(0), query.page, query.limit),
        })
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, UserSphereError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserSphereError::DatabaseError(format!("Failed to get user by id: {}", e)))?;
        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, UserSphereError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (name, email, phone, company, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.company.as_deref())
        .bind(Json(&user.address))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email, "Failed to create user"))?;
        Ok(row.into())
    }

    async fn update_user(&self, user_id: i64, changes: UserChanges) -> Result<User, UserSphereError> {
        let email = changes.email.clone().unwrap_or_default();
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2::text, name),
                email = COALESCE($3::text, email),
                phone = COALESCE($4::text, phone),
                company = CASE WHEN $5::boolean THEN $6::text ELSE company END,
                address = COALESCE($7::jsonb, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.company.is_some())
        .bind(changes.company.clone().flatten())
        .bind(changes.address.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &email, "Failed to update user"))?;

        row.map(User::from).ok_or(UserSphereError::UserNotFound(user_id))
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), UserSphereError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserSphereError::DatabaseError(format!("Failed to delete user: {}", e)))?;
        if result.rows_affected() == 0 {
            return Err(UserSphereError::UserNotFound(user_id));
        }
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, UserSphereError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserSphereError::DatabaseError(format!("Failed to count users: {}", e)))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), UserSphereError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| UserSphereError::StorageError(format!("Database unreachable: {}", e)))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }
}
