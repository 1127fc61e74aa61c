use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use reelbox_core::user::{Claims, User};

/// Tokens are valid for one day from issue.
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

pub fn generate_token(
    secret: &str,
    user: &User,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::seconds(TOKEN_TTL_SECONDS);

    let claims = Claims {
        sub: user.id,
        admin: user.is_admin,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn test_user(is_admin: bool) -> User {
        let mut user = User::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        user.is_admin = is_admin;
        user
    }

    #[test]
    fn test_generate_and_validate_token() {
        let user = test_user(false);
        let token = generate_token(SECRET, &user).expect("Failed to generate token");

        let claims = validate_token(SECRET, &token).expect("Failed to validate token");
        assert_eq!(claims.sub, user.id);
        assert!(!claims.admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_admin_flag_round_trips() {
        let user = test_user(true);
        let token = generate_token(SECRET, &user).unwrap();

        let claims = validate_token(SECRET, &token).unwrap();
        assert!(claims.admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_token(SECRET, &test_user(false)).unwrap();
        assert!(validate_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let user = test_user(false);
        let now = Utc::now();

        let claims = Claims {
            sub: user.id,
            admin: false,
            exp: (now - Duration::seconds(100)).timestamp(), // Expired
            iat: (now - Duration::seconds(1000)).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        let result = validate_token(SECRET, &token);
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(validate_token(SECRET, "not-a-jwt").is_err());
    }
}
