use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode};
use reelbox_core::{
    api_types::ApiResponse,
    database::ports::UsersRepository,
    user::{AuthToken, LoginRequest, LoginResponse, SignupRequest, User},
};

use super::jwt::{TOKEN_TTL_SECONDS, generate_token};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthToken>>)> {
    request.validate()?;

    // Reject duplicates up front; the unique constraint still backstops a
    // racing signup, so no account or token is ever produced twice.
    if state
        .db
        .users()
        .get_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("User already exists"));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(request.password.as_bytes(), &salt)
        .map_err(|_| AppError::internal("Failed to hash password"))?
        .to_string();

    let user = User::new(request.name, request.email, password_hash);
    state.db.users().create_user(&user).await?;

    let token = generate_token(&state.config.jwt_secret, &user)
        .map_err(|_| AppError::internal("Failed to generate token"))?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::success(AuthToken {
                token,
                expires_in: TOKEN_TTL_SECONDS,
            })
            .with_message("User created successfully"),
        ),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    // Unknown email and wrong password answer identically.
    let user = state
        .db
        .users()
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::internal("Invalid password hash"))?;

    Argon2::default()
        .verify_password(request.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::unauthorized("Invalid credentials"))?;

    let token = generate_token(&state.config.jwt_secret, &user)
        .map_err(|_| AppError::internal("Failed to generate token"))?;

    Ok(Json(
        ApiResponse::success(LoginResponse { token, user }).with_message("Login successful"),
    ))
}
