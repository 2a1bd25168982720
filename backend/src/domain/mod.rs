//! # Domain Module
//!
//! Business rules for BloomBuhay, independent of HTTP.
//!
//! ## Module Organization
//!
//! - **record_service**: generic list/get/create/update/delete for every
//!   per-user record type (trackers, baby-care logs, journal notes and albums)
//! - **metric_service**: health metric creation, which needs the user's
//!   previous reading of the same kind to compute a trend
//! - **album_service**: albums with their photos
//! - **profile_service**: the one-per-user mother profile and its dashboard summary
//! - **user_service**: registration, login and session tokens
//!
//! ## Business Rules
//!
//! - Every operation is scoped to the authenticated user; another user's
//!   record is reported as not found
//! - Inputs are validated before anything is written
//! - Patches only touch the fields they carry
//! - Ids are uuid v4 strings, timestamps RFC 3339 UTC with microseconds

use chrono::{SecondsFormat, Utc};
use shared::RecordMeta;

pub mod album_service;
pub mod metric_service;
pub mod profile_service;
pub mod record_service;
pub mod user_service;

pub use album_service::AlbumService;
pub use metric_service::MetricService;
pub use profile_service::ProfileService;
pub use record_service::RecordService;
pub use user_service::UserService;

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Fresh id and timestamps for a record owned by `user_id`.
pub fn new_meta(user_id: &str) -> RecordMeta {
    let now = now_timestamp();
    RecordMeta {
        id: new_id(),
        user_id: user_id.to_string(),
        created_at: now.clone(),
        updated_at: now,
    }
}
