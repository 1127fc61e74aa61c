use axum::{
    Json,
    extract::{Path, State},
};
use reelbox_core::{
    api_types::ApiResponse,
    database::ports::VideosRepository,
    video::{Video, VideoUpdateRequest},
};
use uuid::Uuid;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// List the catalog as last reconciled. Reads never touch the filesystem,
/// so the listing can lag the directory until the next refresh.
pub async fn list_videos_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Video>>>> {
    let videos = state.db.videos().get_all_videos().await?;
    Ok(Json(ApiResponse::success(videos)))
}

pub async fn get_video_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Video>>> {
    let video = state
        .db
        .videos()
        .get_video_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Video not found"))?;

    Ok(Json(ApiResponse::success(video)))
}

pub async fn update_video_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<VideoUpdateRequest>,
) -> AppResult<Json<ApiResponse<Video>>> {
    let video = state.db.videos().update_video_details(id, &request).await?;

    Ok(Json(
        ApiResponse::success(video).with_message("Video details updated successfully"),
    ))
}

/// Reconcile the catalog against the media directory: drop records whose
/// file is gone (cascading into watch histories), add records for new files,
/// and return the refreshed catalog.
pub async fn refresh_library_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Video>>>> {
    let videos = state
        .reconciler
        .reconcile(&state.config.media_root, state.db.videos())
        .await?;

    Ok(Json(
        ApiResponse::success(videos).with_message("Video library refreshed successfully"),
    ))
}
