use std::{fmt, sync::Arc};

use reelbox_core::database::PostgresDatabase;
use reelbox_core::library::LibraryReconciler;

use crate::infra::config::Config;

/// Shared, clone-cheap application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PostgresDatabase>,
    pub config: Arc<Config>,
    pub reconciler: Arc<LibraryReconciler>,
}

impl AppState {
    pub fn new(db: PostgresDatabase, config: Config) -> Self {
        let reconciler = LibraryReconciler::with_extensions(config.video_extensions.clone());
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            reconciler: Arc::new(reconciler),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
