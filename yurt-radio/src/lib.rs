//! Yurt Radio - personal web radio server
//!
//! Catalogs a music directory by content hash and serves random tracks over
//! HTTP, avoiding recent repeats.

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use yurt_common::config::RadioConfig;
use yurt_common::Catalog;

pub mod api;
pub mod cli;
pub mod error;
pub mod services;

pub use error::{ApiError, ApiResult};
use services::{LibrarySynchronizer, TrackSelector};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub selector: Arc<TrackSelector>,
    pub synchronizer: Arc<LibrarySynchronizer>,
    pub config: Arc<RadioConfig>,
}

impl AppState {
    /// Wire the services around one catalog and configuration
    pub fn new(catalog: Catalog, config: RadioConfig) -> Self {
        let config = Arc::new(config);
        let selector = Arc::new(TrackSelector::new(catalog.clone(), config.max_recent_tracks));
        let synchronizer = Arc::new(LibrarySynchronizer::new(catalog.clone(), config.clone()));

        Self {
            catalog,
            selector,
            synchronizer,
            config,
        }
    }
}

/// Build application router
///
/// JSON API under `/api`, static pages for everything else.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let static_pages = ServeDir::new(&state.config.static_directory);

    Router::new()
        .route("/api/track/random", get(api::random_track))
        .route("/api/track/recent/clear", post(api::clear_recent))
        .route("/api/track/:id", get(api::get_track))
        .route("/api/tracks", get(api::list_tracks))
        .route("/api/stats", get(api::get_stats))
        .route("/api/stream/:id", get(api::stream_track))
        .route("/api/library/rescan", post(api::rescan))
        .merge(api::health_routes())
        .fallback_service(static_pages)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
