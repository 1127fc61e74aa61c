use anyhow::Context;
use std::{env, path::PathBuf};

use reelbox_core::library::default_video_extensions;

/// Server configuration loaded from environment variables (a `.env` file is
/// honored when present).
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Database settings
    pub database_url: String,

    // Media settings
    pub media_root: PathBuf,
    /// File extensions treated as video assets by the reconciler.
    pub video_extensions: Vec<String>,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,

    // Authentication
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3201".to_string())
                .parse()
                .unwrap_or(3201),

            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set (postgres://...)")?,

            media_root: env::var("MEDIA_ROOT")
                .unwrap_or_else(|_| "./videos".to_string())
                .into(),

            video_extensions: env::var("VIDEO_EXTENSIONS")
                .map(|raw| parse_extension_list(&raw))
                .unwrap_or_else(|_| default_video_extensions()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),

            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-jwt-secret".to_string()),
        })
    }

    /// Create the media directory if it doesn't exist, so a fresh install
    /// can reconcile an empty library instead of erroring.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.media_root)
            .with_context(|| format!("failed to create {}", self.media_root.display()))?;
        Ok(())
    }
}

/// `"mp4, .mkv"` -> `["mp4", "mkv"]`; a leading dot is tolerated.
fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_list_parsing() {
        assert_eq!(
            parse_extension_list(" mp4, .mkv ,webm,,"),
            vec!["mp4", "mkv", "webm"]
        );
        assert!(parse_extension_list("").is_empty());
    }
}
