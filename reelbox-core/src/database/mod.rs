//! Database abstraction layer: trait ports and the PostgreSQL backend.

pub mod ports;
pub mod postgres;

pub use postgres::PostgresDatabase;
