//! # Reelbox Server
//!
//! Local video-streaming backend.
//!
//! Serves a video catalog reconciled from a media directory, tracks per-user
//! watch progress, and exposes the raw files for playback. PostgreSQL holds
//! users and catalog records; authentication is a 1-day bearer JWT.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use reelbox_core::database::PostgresDatabase;
use reelbox_server::{AppState, Config, routes};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "reelbox-server")]
#[command(about = "Local video streaming backend with watch-history tracking")]
struct Cli {
    /// Bind address (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Video directory (overrides MEDIA_ROOT)
    #[arg(long)]
    media_root: Option<PathBuf>,
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<axum::http::HeaderValue> = allowed_origins
        .iter()
        .filter_map(|s| axum::http::HeaderValue::from_str(s).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new().allow_origin(allow_origin)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.server_host = host;
    }
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    if let Some(media_root) = cli.media_root {
        config.media_root = media_root;
    }
    config.ensure_directories()?;

    let db = PostgresDatabase::new(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    db.migrate().await.context("failed to run migrations")?;

    let cors_layer = build_cors_layer(&config.cors_allowed_origins);
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("invalid SERVER_HOST/SERVER_PORT")?;

    let state = AppState::new(db, config);
    let app = routes::create_router(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Server is running on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
