//! # Reelbox Server
//!
//! HTTP surface for the Reelbox local video-streaming backend:
//!
//! - **Accounts**: signup/login with Argon2id hashing and a 1-day JWT
//! - **Catalog**: list/fetch/edit videos, operator-triggered library refresh
//! - **Watch history**: per-user playback progress and "last viewed" lookup
//! - **Playback**: raw video files served statically under `/videos`
//!
//! Built on Axum with PostgreSQL (via `reelbox-core`) for persistent storage.

pub mod infra;
pub mod media;
pub mod routes;
pub mod users;

pub use infra::app_state::AppState;
pub use infra::config::Config;
