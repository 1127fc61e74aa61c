//! Repository contracts. Callers depend on these traits, never on the
//! concrete driver.

pub mod users;
pub mod videos;

pub use users::UsersRepository;
pub use videos::VideosRepository;
