use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use reelbox_core::database::ports::UsersRepository;
use reelbox_core::user::User;

use super::jwt::validate_token;
use crate::infra::{app_state::AppState, errors::AppError};

/// Authenticate the request and attach the account as an extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let user = validate_and_get_user(&state, &token).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Requires `is_admin` on the authenticated account.
/// Must be layered AFTER `auth_middleware`.
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    if !user.is_admin {
        return Err(AppError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::unauthorized("Invalid authorization header"));
    }

    Ok(auth_header[7..].to_string())
}

async fn validate_and_get_user(state: &AppState, token: &str) -> Result<User, AppError> {
    let claims = validate_token(&state.config.jwt_secret, token)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    state
        .db
        .users()
        .get_user_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))
}
