pub mod users;
pub mod videos;

use std::fmt;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error::{Result, StoreError};

pub use users::PostgresUsersRepository;
pub use videos::PostgresVideosRepository;

/// Connection pool plus the repositories backed by it.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    users: PostgresUsersRepository,
    videos: PostgresVideosRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get() as u32)
                    .unwrap_or(8)
            });

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(connection_string)
            .await
            .map_err(|e| StoreError::Internal(format!("Database connection failed: {e}")))?;

        info!(
            "Database pool initialized with max_connections={}",
            max_connections
        );

        let users = PostgresUsersRepository::new(pool.clone());
        let videos = PostgresVideosRepository::new(pool.clone());

        Ok(PostgresDatabase {
            pool,
            users,
            videos,
        })
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Internal(format!("Migration failed: {e}")))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn users(&self) -> &PostgresUsersRepository {
        &self.users
    }

    pub fn videos(&self) -> &PostgresVideosRepository {
        &self.videos
    }
}
