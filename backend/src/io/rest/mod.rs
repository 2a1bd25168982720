//! # REST API Interface Layer
//!
//! HTTP endpoints for BloomBuhay. Every response, success or failure, is the
//! `{success, data?, error?, message?}` envelope from [`shared::ApiResponse`].
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: one handler per route; per-user record types share the
//!   generic handlers in [`resource_apis`]
//! - **Error Handling**: domain errors become status codes through
//!   [`crate::error::ServiceError`]
//! - **Request Logging**: every handler logs the route it serves
//!
//! ## Design Principles
//!
//! - **Domain Separation**: pure translation, no business rules here
//! - **Caller Scoping**: handlers only ever pass the authenticated user's id down

pub mod extract;
pub mod journal_apis;
pub mod metric_apis;
pub mod profile_apis;
pub mod resource_apis;
pub mod status_apis;
pub mod user_apis;

use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::error::ServiceError;

/// Logs a failed operation and renders the error envelope.
pub(crate) fn failure(action: &str, e: ServiceError) -> Response {
    if e.status().is_server_error() {
        error!("Failed to {}: {}", action, e);
    } else {
        warn!("Failed to {}: {}", action, e);
    }
    e.into_response()
}
