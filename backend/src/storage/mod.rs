//! # Storage Module
//!
//! Persistence for BloomBuhay on SQLite through SQLx.
//!
//! Every user-owned table starts with the same four columns
//! (`id`, `user_id`, `created_at`, `updated_at`) and every query is scoped by
//! `user_id`, so a record owned by someone else reads as missing.
//!
//! ## Layout
//!
//! - [`connection`]: pool lifecycle and schema setup
//! - [`record`]: the [`Record`] mapping trait and the generic [`RecordRepository`]
//! - [`records`]: table mappings for the tracker, baby-care and journal records
//! - [`user_repository`], [`profile_repository`], [`photo_repository`]: tables
//!   with their own access patterns
//!
//! Timestamps are stored as RFC 3339 UTC text with microseconds and a `Z`
//! suffix, so text order is time order. Client-supplied times are rewritten
//! into that form by `Resource::build` and `Resource::apply` before they get
//! here.

pub mod connection;
pub mod photo_repository;
pub mod profile_repository;
pub mod record;
pub mod records;
pub mod user_repository;

pub use connection::DbConnection;
pub use photo_repository::PhotoRepository;
pub use profile_repository::ProfileRepository;
pub use record::{Record, RecordRepository};
pub use user_repository::{StoredUser, UserRepository};

/// True when a storage error came from a UNIQUE constraint.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}
