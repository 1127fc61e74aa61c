//! Video library reconciliation
//!
//! The catalog is the meeting point of two sources of truth: the files on
//! disk and the records in the store. Neither is synced on read; an operator
//! triggers [`LibraryReconciler::reconcile`], which makes the store match the
//! directory:
//!
//! 1. list the directory (filtered to the supported extensions),
//! 2. load all persisted records,
//! 3. delete records whose file is gone, cascading the deletion into every
//!    user's watch history in the same transaction,
//! 4. insert records for files that have none (title = file stem),
//! 5. return the reconciled catalog.
//!
//! A filesystem failure aborts the whole run before any store mutation.
//! Partial application after that point is acceptable (deletions committed,
//! inserts failed); the transactional cascade keeps the no-dangling-entries
//! invariant either way.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;
use uuid::Uuid;

use crate::database::ports::videos::VideosRepository;
use crate::error::Result;
use crate::video::Video;

/// Extensions treated as video assets when no override is configured.
pub fn default_video_extensions() -> Vec<String> {
    vec!["mp4".to_string()]
}

/// Outcome of diffing a directory listing against the persisted catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDiff {
    /// Ids of records whose file no longer exists
    pub stale_ids: Vec<Uuid>,
    /// File names present on disk with no catalog record
    pub new_files: Vec<String>,
}

impl LibraryDiff {
    /// Pure set diff: `file_names` is the ground truth of what should exist.
    ///
    /// Stale records are matched by the base name of their `file_path`; new
    /// files by the absence of an exact `file_path` match for the path the
    /// file would be stored under.
    pub fn compute(file_names: &[String], existing: &[Video]) -> Self {
        let on_disk: HashSet<&str> = file_names.iter().map(String::as_str).collect();

        let stale_ids = existing
            .iter()
            .filter(|video| {
                let base = video
                    .file_path
                    .rsplit('/')
                    .next()
                    .unwrap_or(video.file_path.as_str());
                !on_disk.contains(base)
            })
            .map(|video| video.id)
            .collect();

        let known_paths: HashSet<&str> =
            existing.iter().map(|video| video.file_path.as_str()).collect();

        let new_files = file_names
            .iter()
            .filter(|name| !known_paths.contains(store_path(name).as_str()))
            .cloned()
            .collect();

        Self {
            stale_ids,
            new_files,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.stale_ids.is_empty() && self.new_files.is_empty()
    }
}

/// Store-relative path a directory entry is cataloged under.
fn store_path(file_name: &str) -> String {
    format!("videos/{file_name}")
}

/// List video file names (not paths) in `dir`, filtered by extension and
/// sorted for deterministic processing.
pub async fn list_video_files(dir: &Path, extensions: &[String]) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        std::io::Error::new(e.kind(), format!("read_dir failed for {}: {e}", dir.display()))
    })?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        // Non-UTF-8 names can't round-trip through the catalog; skip them.
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };

        let matches = name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(name);
        }
    }

    files.sort();
    Ok(files)
}

/// Reconciles the persisted catalog with a directory of video files.
#[derive(Debug, Clone)]
pub struct LibraryReconciler {
    extensions: Vec<String>,
}

impl Default for LibraryReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryReconciler {
    pub fn new() -> Self {
        Self {
            extensions: default_video_extensions(),
        }
    }

    pub fn with_extensions(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Run a full reconcile pass and return the resulting catalog.
    pub async fn reconcile(
        &self,
        dir: &Path,
        videos: &dyn VideosRepository,
    ) -> Result<Vec<Video>> {
        let files = list_video_files(dir, &self.extensions).await?;

        let existing = videos.get_all_videos().await?;
        let diff = LibraryDiff::compute(&files, &existing);

        if diff.is_noop() {
            return Ok(existing);
        }

        // Stale records first. delete_cascading removes the records and
        // every watch-history entry referencing them in one transaction, so
        // no reader observes a deleted video with a live history entry.
        if !diff.stale_ids.is_empty() {
            videos.delete_cascading(&diff.stale_ids).await?;
        }

        for file_name in &diff.new_files {
            let video = Video::from_file_name(file_name, store_path(file_name));
            videos.insert_video(&video).await?;
        }

        info!(
            removed = diff.stale_ids.len(),
            added = diff.new_files.len(),
            "video library reconciled"
        );

        videos.get_all_videos().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn video(id: u128, file_path: &str) -> Video {
        Video {
            id: Uuid::from_u128(id),
            title: "t".to_string(),
            description: None,
            file_path: file_path.to_string(),
        }
    }

    #[test]
    fn test_diff_spec_example() {
        // Disk: a.mp4, b.mp4. Store: a.mp4, stale.mp4.
        let files = vec!["a.mp4".to_string(), "b.mp4".to_string()];
        let existing = vec![video(1, "videos/a.mp4"), video(2, "videos/stale.mp4")];

        let diff = LibraryDiff::compute(&files, &existing);

        assert_eq!(diff.stale_ids, vec![Uuid::from_u128(2)]);
        assert_eq!(diff.new_files, vec!["b.mp4".to_string()]);
    }

    #[test]
    fn test_diff_empty_directory_marks_everything_stale() {
        let existing = vec![video(1, "videos/a.mp4"), video(2, "videos/b.mp4")];
        let diff = LibraryDiff::compute(&[], &existing);

        assert_eq!(diff.stale_ids.len(), 2);
        assert!(diff.new_files.is_empty());
    }

    #[test]
    fn test_diff_in_sync_is_noop() {
        let files = vec!["a.mp4".to_string()];
        let existing = vec![video(1, "videos/a.mp4")];

        assert!(LibraryDiff::compute(&files, &existing).is_noop());
    }

    #[tokio::test]
    async fn test_list_video_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp4", "a.mp4", "upper.MP4", "notes.txt", "noext"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.mp4")).unwrap();

        let files = list_video_files(dir.path(), &default_video_extensions())
            .await
            .unwrap();

        assert_eq!(files, vec!["a.mp4", "b.mp4", "upper.MP4"]);
    }

    #[tokio::test]
    async fn test_list_video_files_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = list_video_files(&missing, &default_video_extensions()).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
