//! # luxmon-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using `sqlx`.
//!
//! ## Responsibilities
//! - Implement the storage port traits defined in `luxmon-app`:
//!   `SiteRepository`, `ReadingRepository`, `JobRepository`, `EventStore`
//! - Own the connection pool and the embedded migrations
//!
//! ## Dependency rule
//! Depends on `luxmon-app` (port traits) and `luxmon-domain` only.

mod error;
mod event_store;
mod job_repo;
mod pool;
mod reading_repo;
mod site_repo;

pub use error::StorageError;
pub use event_store::SqliteEventStore;
pub use job_repo::SqliteJobRepository;
pub use pool::{Config, Database};
pub use reading_repo::SqliteReadingRepository;
pub use site_repo::SqliteSiteRepository;
