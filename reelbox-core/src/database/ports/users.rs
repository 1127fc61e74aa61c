use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::user::User;
use crate::watch_history::WatchHistory;

// Account management and the embedded watch-history document
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Insert a new account. A duplicate email yields `StoreError::Conflict`.
    async fn create_user(&self, user: &User) -> Result<()>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Update name and/or email, returning the updated account.
    /// `StoreError::NotFound` if the user does not exist.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User>;

    /// Replace the user's watch history in one document write. Concurrent
    /// writers race with last-writer-wins semantics.
    async fn save_watch_history(&self, id: Uuid, history: &WatchHistory) -> Result<()>;
}
