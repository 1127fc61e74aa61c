//! User accounts and authentication payloads
//!
//! A user owns an embedded watch history: an ordered list of per-video
//! playback positions, at most one entry per video. The history is persisted
//! as part of the user document and rewritten in a single write on every
//! update (last-writer-wins under concurrent submissions).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::watch_history::WatchHistory;

/// A registered account.
///
/// The password hash is never serialized, so API responses carrying a `User`
/// cannot leak credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Unique email address, used as the login identifier
    pub email: String,
    /// Argon2id password hash (never serialized)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Whether the account may call admin endpoints
    pub is_admin: bool,
    /// Embedded per-video playback history
    #[serde(default)]
    pub watch_history: WatchHistory,
    /// Timestamp of account creation
    pub created_at: DateTime<Utc>,
    /// Timestamp of last profile or history update
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh, non-admin account with an empty history.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            is_admin: false,
            watch_history: WatchHistory::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Signup request payload
///
/// # Example
///
/// ```json
/// {
///   "name": "Alice",
///   "email": "alice@example.com",
///   "password": "secure_password"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Display name (1-100 chars)
    pub name: String,
    /// Email address, must be unique across accounts
    pub email: String,
    /// Plain text password (hashed before storage)
    pub password: String,
}

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    /// Plain text password (verified against the stored hash)
    pub password: String,
}

/// Request to update name and/or email of the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Issued bearer credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Successful login payload: the credential plus the account (the password
/// hash is skipped by `User`'s serialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// JWT claims carried by the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // User ID
    pub admin: bool, // Admin flag snapshot at issue time
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Validation errors for user input
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid name: must be 1-100 characters")]
    InvalidName,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password too short: minimum 8 characters required")]
    PasswordTooShort,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() || name.len() > 100 {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    // Shape check only; deliverability is not our problem.
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.len() > 254 {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;

        if self.password.len() < 8 {
            return Err(ValidationError::PasswordTooShort);
        }

        Ok(())
    }
}

impl ProfileUpdateRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}
