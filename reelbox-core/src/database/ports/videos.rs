use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::video::{Video, VideoUpdateRequest};

// Catalog records and their lifecycle
#[async_trait]
pub trait VideosRepository: Send + Sync {
    async fn get_all_videos(&self) -> Result<Vec<Video>>;
    async fn get_video_by_id(&self, id: Uuid) -> Result<Option<Video>>;

    /// Insert a catalog record. Idempotent on `file_path`: a record that
    /// already catalogs the same file is left untouched.
    async fn insert_video(&self, video: &Video) -> Result<()>;

    /// Edit title/description. `StoreError::NotFound` if the record does not
    /// exist.
    async fn update_video_details(&self, id: Uuid, update: &VideoUpdateRequest) -> Result<Video>;

    /// Delete the given records and every watch-history entry referencing
    /// them, across all users, in one transaction. Returns the number of
    /// records deleted.
    ///
    /// The cascade is what keeps watch entries from dangling; running both
    /// statements in one transaction means no reader ever observes a deleted
    /// video that still has a history entry pointing at it.
    async fn delete_cascading(&self, ids: &[Uuid]) -> Result<u64>;
}
