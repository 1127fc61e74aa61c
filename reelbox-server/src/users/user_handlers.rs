use axum::{Extension, Json, extract::State};
use reelbox_core::{
    api_types::ApiResponse,
    database::ports::UsersRepository,
    user::{ProfileUpdateRequest, User},
};

use crate::infra::{app_state::AppState, errors::AppResult};

/// List every account. Admin-gated; password hashes never serialize.
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let users = state.db.users().get_all_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// Update the authenticated user's name and/or email.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<ProfileUpdateRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    request.validate()?;

    let updated = state
        .db
        .users()
        .update_profile(user.id, request.name.as_deref(), request.email.as_deref())
        .await?;

    Ok(Json(
        ApiResponse::success(updated).with_message("Profile updated successfully"),
    ))
}
