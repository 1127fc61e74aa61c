use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::ports::users::UsersRepository;
use crate::error::{Result, StoreError};
use crate::user::User;
use crate::watch_history::WatchHistory;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, is_admin, watch_history, created_at, updated_at";

/// PostgreSQL-backed implementation of the `UsersRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresUsersRepository {
    pool: PgPool,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Raw row shape; the JSONB history column is decoded separately because
/// `WatchHistory` rebuilds its key index on deserialize.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    is_admin: bool,
    watch_history: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            watch_history: serde_json::from_value(row.watch_history).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn map_email_conflict(e: sqlx::Error, context: &str) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.constraint() == Some("users_email_key") {
            return StoreError::Conflict("Email already exists".to_string());
        }
    }
    StoreError::Internal(format!("{context}: {e}"))
}

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn create_user(&self, user: &User) -> Result<()> {
        let history = serde_json::to_value(&user.watch_history)?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, email, password_hash,
                is_admin, watch_history, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(history)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| map_email_conflict(e, "Failed to create user"))?;

        info!("Created user: {} ({})", user.email, user.id);
        Ok(())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to get user by id: {e}")))?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to get user by email: {e}")))?;

        Ok(row.map(User::from))
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to list users: {e}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_email_conflict(e, "Failed to update profile"))?;

        row.map(User::from)
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }

    async fn save_watch_history(&self, id: Uuid, history: &WatchHistory) -> Result<()> {
        let history = serde_json::to_value(history)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET watch_history = $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(history)
        .execute(self.pool())
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to save watch history: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
