//! Administrative library rescan

use axum::{extract::State, Json};
use tracing::info;

use crate::error::ApiResult;
use crate::services::SyncReport;
use crate::AppState;

/// POST /api/library/rescan
///
/// Runs a synchronization pass in the request; answers 409 if one is already running.
pub async fn rescan(State(state): State<AppState>) -> ApiResult<Json<SyncReport>> {
    info!("Rescan requested over HTTP");
    let report = state
        .synchronizer
        .try_synchronize(&state.config.music_directory)
        .await?;
    Ok(Json(report))
}
