//! # Reelbox Core
//!
//! Core library for the Reelbox local video-streaming backend: domain types,
//! database abstractions, and the business logic that keeps the catalog and
//! per-user watch histories consistent.
//!
//! ## Overview
//!
//! - **Catalog**: video records mirroring the files in a media directory
//! - **Library reconciliation**: on-demand sync of the catalog against the
//!   directory, with cascading cleanup of watch histories
//! - **Watch history**: per-user, per-video playback positions with recency
//!   lookup
//! - **Database abstraction**: trait ports with a PostgreSQL implementation
//!
//! ## Architecture
//!
//! - [`video`] / [`user`] / [`watch_history`]: domain model
//! - [`library`]: the reconciler
//! - [`database`]: repository ports and the PostgreSQL backend
//! - [`api_types`]: response envelope shared with the HTTP surface
//! - [`error`]: the error taxonomy ([`StoreError`])

/// Common response types used across API boundaries
pub mod api_types;

/// Database abstraction layer and implementations
pub mod database;

/// Error types
pub mod error;

/// Video library reconciliation
pub mod library;

/// User accounts and authentication payloads
pub mod user;

/// Catalog records
pub mod video;

/// Per-user watch history
pub mod watch_history;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{Result, StoreError};
pub use user::User;
pub use video::Video;
pub use watch_history::{WatchEntry, WatchHistory};
