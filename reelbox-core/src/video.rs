//! Catalog records for on-disk video files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry in the video catalog.
///
/// `file_path` is store-relative (e.g. `videos/intro.mp4`) and doubles as the
/// dedup key against the filesystem: the reconciler never creates two records
/// for the same path.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    /// Unique video identifier
    pub id: Uuid,
    /// Display title; defaults to the file stem when created by a scan
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Store-relative path to the video file
    pub file_path: String,
}

impl Video {
    /// Build a catalog record for a newly discovered file.
    ///
    /// `title` defaults to the file name without extension; the description
    /// starts out absent and is only ever set through an edit.
    pub fn from_file_name(file_name: &str, file_path: String) -> Self {
        let title = match file_name.rsplit_once('.') {
            Some((stem, _ext)) => stem.to_string(),
            None => file_name.to_string(),
        };

        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            file_path,
        }
    }
}

/// Request to edit catalog metadata (title/description only; the file path
/// is owned by the reconciler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_defaults_to_file_stem() {
        let video = Video::from_file_name("intro.mp4", "videos/intro.mp4".to_string());
        assert_eq!(video.title, "intro");
        assert_eq!(video.file_path, "videos/intro.mp4");
        assert!(video.description.is_none());
    }

    #[test]
    fn test_title_keeps_inner_dots() {
        let video = Video::from_file_name("season.1.episode.2.mp4", "videos/season.1.episode.2.mp4".to_string());
        assert_eq!(video.title, "season.1.episode.2");
    }
}
