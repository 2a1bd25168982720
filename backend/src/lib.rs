//! # BloomBuhay Backend
//!
//! REST backend for the BloomBuhay pregnancy, postpartum and childcare
//! companion.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, auth extractor)
//!     ↓
//! Domain Layer (services, validation, business rules)
//!     ↓
//! Storage Layer (SQLite via sqlx)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize the database and the application state
//! - Set up the router with CORS and request tracing
//! - Keep every record scoped to the authenticated user

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use shared::{
    DiaperLog, DoctorVisitLog, FeedingLog, GrowthRecord, HealthMetric, JournalAlbum, JournalNote,
    MoodLog, Resource, SleepLog, SymptomLog, VaccinationLog,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::domain::{AlbumService, MetricService, ProfileService, RecordService, UserService};
use crate::io::rest::resource_apis::{
    create_record, delete_record, get_record, list_records, update_record,
};
use crate::io::rest::{journal_apis, metric_apis, profile_apis, status_apis, user_apis};
use crate::storage::{DbConnection, Record};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DbConnection,
    pub user_service: UserService,
    pub profile_service: ProfileService,
    pub metric_service: MetricService,
    pub album_service: AlbumService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            user_service: UserService::new(db.clone()),
            profile_service: ProfileService::new(db.clone()),
            metric_service: MetricService::new(db.clone()),
            album_service: AlbumService::new(db.clone()),
            db,
        }
    }

    /// Replaces the user service with one issuing sessions of `ttl`.
    pub fn with_session_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.user_service = UserService::with_session_ttl(self.db.clone(), ttl);
        self
    }

    /// Generic CRUD service for one record type.
    pub fn records<R: Record>(&self) -> RecordService<R> {
        RecordService::new(self.db.clone())
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!(
        "Setting up application state (sessions last {}h)",
        config.session_ttl_hours
    );
    Ok(AppState::new(db).with_session_ttl(chrono::Duration::hours(config.session_ttl_hours)))
}

/// Routes for a record type served entirely by the generic handlers.
fn record_routes<R: Record>(router: Router<AppState>) -> Router<AppState> {
    router
        .route(R::PATH, get(list_records::<R>).post(create_record::<R>))
        .route(
            &format!("{}/:id", R::PATH),
            get(get_record::<R>)
                .patch(update_record::<R>)
                .delete(delete_record::<R>),
        )
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/api/health", get(status_apis::health))
        .route("/api/users/register", post(user_apis::register))
        .route("/api/users/login", post(user_apis::login))
        .route("/api/users/me", get(user_apis::me))
        .route("/api/users/logout", post(user_apis::logout))
        .route("/api/mother-profiles", post(profile_apis::create_profile))
        .route(
            "/api/mother-profiles/me",
            get(profile_apis::get_my_profile).patch(profile_apis::update_my_profile),
        )
        .route("/api/mother-profiles/me/summary", get(profile_apis::get_my_summary));

    // Metric creation classifies the reading and needs the previous one.
    router = router
        .route(
            HealthMetric::PATH,
            get(list_records::<HealthMetric>).post(metric_apis::create_metric),
        )
        .route(
            &format!("{}/:id", HealthMetric::PATH),
            get(get_record::<HealthMetric>)
                .patch(update_record::<HealthMetric>)
                .delete(delete_record::<HealthMetric>),
        );

    router = record_routes::<MoodLog>(router);
    router = record_routes::<SymptomLog>(router);
    router = record_routes::<FeedingLog>(router);
    router = record_routes::<SleepLog>(router);
    router = record_routes::<DiaperLog>(router);
    router = record_routes::<GrowthRecord>(router);
    router = record_routes::<VaccinationLog>(router);
    router = record_routes::<DoctorVisitLog>(router);
    router = record_routes::<JournalNote>(router);

    // Albums carry their photos on GET and take them along on DELETE.
    router = router
        .route(
            JournalAlbum::PATH,
            get(list_records::<JournalAlbum>).post(create_record::<JournalAlbum>),
        )
        .route(
            &format!("{}/:id", JournalAlbum::PATH),
            get(journal_apis::get_album)
                .patch(update_record::<JournalAlbum>)
                .delete(journal_apis::delete_album),
        )
        .route(
            &format!("{}/:id/photos", JournalAlbum::PATH),
            get(journal_apis::list_photos).post(journal_apis::add_photo),
        )
        .route("/api/journal/photos/:id", delete(journal_apis::delete_photo));

    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
