//! HTTP surface.
//!
//! Every route under `/api` needs an authenticated user (see [`auth`]). Handlers
//! are thin: they read the request, call into [`crate::core`], and map the
//! outcome through [`ApiError`].

pub mod auth;
pub mod error;
pub mod plants;
pub mod remarks;
pub mod reminders;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{delete, get, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the application router.
///
/// `max_body_bytes` caps request bodies, which in practice means photo uploads.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/plants", get(plants::list).post(plants::add))
        .route(
            "/plants/:id",
            get(plants::get).put(plants::update).delete(plants::delete),
        )
        .route(
            "/plants/:id/reminders",
            get(reminders::list_for_plant).post(reminders::save),
        )
        .route(
            "/plants/:id/health",
            get(remarks::list).post(remarks::add),
        )
        .route("/plants/:id/health/latest", get(remarks::latest))
        .route("/reminders/upcoming", get(reminders::upcoming))
        .route("/reminders/:id", delete(reminders::delete))
        .route("/reminders/:id/complete", put(reminders::complete))
        .route(
            "/health/:id",
            put(remarks::update).delete(remarks::delete),
        )
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(auth::USER_ID_HEADER)])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
