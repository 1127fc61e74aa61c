use axum::{
    Extension, Json,
    extract::{Path, State},
};
use reelbox_core::{
    api_types::ApiResponse,
    database::ports::{UsersRepository, VideosRepository},
    user::User,
    watch_history::WatchEntry,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct UpdateWatchHistoryRequest {
    pub video_id: Uuid,
    /// Playback position in seconds
    pub last_position: f32,
    /// Client-side recency key (epoch-like)
    pub timestamp: i64,
}

/// Most recent watch entry joined with its catalog record.
#[derive(Debug, Serialize)]
pub struct LastViewedResponse {
    pub video_id: Uuid,
    pub title: String,
    pub file_path: String,
    pub description: Option<String>,
    pub last_position: f32,
}

/// Record playback progress for a video.
///
/// An entry the user already has is updated in place (its slot in the
/// history sequence never moves); otherwise one is appended. The whole
/// history is persisted in a single document write, so two racing updates
/// resolve to last-writer-wins.
pub async fn update_watch_history_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateWatchHistoryRequest>,
) -> AppResult<Json<ApiResponse<WatchEntry>>> {
    if request.last_position < 0.0 {
        return Err(AppError::bad_request("Invalid position"));
    }

    let mut history = user.watch_history;
    history.upsert(request.video_id, request.last_position, request.timestamp);

    state
        .db
        .users()
        .save_watch_history(user.id, &history)
        .await?;

    // The upsert can't miss: it just inserted or updated this id.
    let entry = history
        .get(&request.video_id)
        .cloned()
        .ok_or_else(|| AppError::internal("History entry vanished after upsert"))?;

    Ok(Json(
        ApiResponse::success(entry).with_message("Watch history updated successfully"),
    ))
}

/// The user's most recently watched video, denormalized against the catalog.
///
/// An empty history is a normal outcome, answered with an empty success
/// envelope rather than an error. A history entry whose video is missing
/// from the catalog should be impossible (deletions cascade), but is
/// answered defensively with 404 instead of a partial record.
pub async fn last_viewed_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<ApiResponse<LastViewedResponse>>> {
    let Some(entry) = user.watch_history.most_recent() else {
        return Ok(Json(
            ApiResponse::empty().with_message("No watch history available"),
        ));
    };

    let video = state
        .db
        .videos()
        .get_video_by_id(entry.video_id)
        .await?
        .ok_or_else(|| AppError::not_found("Video not found"))?;

    Ok(Json(ApiResponse::success(LastViewedResponse {
        video_id: video.id,
        title: video.title,
        file_path: video.file_path,
        description: video.description,
        last_position: entry.last_position,
    })))
}

/// Look up the user's watch entry for one specific video.
pub async fn watch_history_by_video_handler(
    Extension(user): Extension<User>,
    Path(video_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WatchEntry>>> {
    let entry = user
        .watch_history
        .get(&video_id)
        .cloned()
        .ok_or_else(|| AppError::not_found("No watch history for this video"))?;

    Ok(Json(ApiResponse::success(entry)))
}
