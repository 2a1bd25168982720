//! # IO Module
//!
//! Translates HTTP requests into domain operations and domain results into
//! the `{success, data?, error?, message?}` envelope.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: one handler per route, all scoped to the caller
//! - **Authentication**: the [`crate::auth::AuthUser`] extractor resolves the
//!   bearer token before any handler runs
//! - **Error Translation**: [`crate::error::ServiceError`] picks the status code
//!   and the handler logs the failure

pub mod rest;

pub use rest::*;
