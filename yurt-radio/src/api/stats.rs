//! Collection statistics

use axum::{extract::State, Json};
use serde::Serialize;
use yurt_common::human_time::format_duration;
use yurt_common::Track;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_tracks: i64,
    /// Sum of track durations in seconds
    pub total_duration: i64,
    pub total_duration_human: String,
    pub most_played: Track,
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.catalog.stats().await?;

    Ok(Json(StatsResponse {
        total_tracks: stats.total_tracks,
        total_duration: stats.total_duration_seconds,
        total_duration_human: format_duration(stats.total_duration_seconds),
        most_played: stats.most_played,
    }))
}
