use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::ports::videos::VideosRepository;
use crate::error::{Result, StoreError};
use crate::video::{Video, VideoUpdateRequest};

/// PostgreSQL-backed implementation of the `VideosRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresVideosRepository {
    pool: PgPool,
}

impl PostgresVideosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VideosRepository for PostgresVideosRepository {
    async fn get_all_videos(&self) -> Result<Vec<Video>> {
        sqlx::query_as::<_, Video>(
            "SELECT id, title, description, file_path FROM videos ORDER BY title, file_path",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to list videos: {e}")))
    }

    async fn get_video_by_id(&self, id: Uuid) -> Result<Option<Video>> {
        sqlx::query_as::<_, Video>(
            "SELECT id, title, description, file_path FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to get video: {e}")))
    }

    async fn insert_video(&self, video: &Video) -> Result<()> {
        // file_path is the dedup key; a concurrent reconcile inserting the
        // same file is a no-op rather than an error.
        let result = sqlx::query(
            r#"
            INSERT INTO videos (id, title, description, file_path)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (file_path) DO NOTHING
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.file_path)
        .execute(self.pool())
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to insert video: {e}")))?;

        if result.rows_affected() == 1 {
            info!("Cataloged video: {} ({})", video.file_path, video.id);
        } else {
            debug!("Video already cataloged: {}", video.file_path);
        }

        Ok(())
    }

    async fn update_video_details(&self, id: Uuid, update: &VideoUpdateRequest) -> Result<Video> {
        let row = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET title = COALESCE($2, title),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, title, description, file_path
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to update video: {e}")))?;

        row.ok_or_else(|| StoreError::NotFound("Video not found".to_string()))
    }

    async fn delete_cascading(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| StoreError::Internal(format!("Failed to start transaction: {e}")))?;

        // Pull every entry referencing a deleted video from every user's
        // history. Unconditional across the whole table; order within the
        // rebuilt array is preserved.
        sqlx::query(
            r#"
            UPDATE users
            SET watch_history = COALESCE(
                (
                    SELECT jsonb_agg(entry ORDER BY ord)
                    FROM jsonb_array_elements(users.watch_history)
                         WITH ORDINALITY AS history(entry, ord)
                    WHERE NOT ((entry->>'video_id')::uuid = ANY($1))
                ),
                '[]'::jsonb
            ),
                updated_at = now()
            "#,
        )
        .bind(ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Internal(format!("Failed to cascade watch histories: {e}")))?;

        let deleted = sqlx::query("DELETE FROM videos WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Internal(format!("Failed to delete videos: {e}")))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| StoreError::Internal(format!("Failed to commit transaction: {e}")))?;

        info!("Deleted {} stale video record(s)", deleted);
        Ok(deleted)
    }
}
