use axum::{
    extract::{State, Path},
    Json,
};
use serde::Serialize;

use crate::{
    error::Result,
    models::{ApiResponse, LeaderboardEntry},
    services::leaderboard::LeaderboardCategory,
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard_type: String,
    pub entries: Vec<LeaderboardEntry>,
    pub your_entry: Option<LeaderboardEntry>,
    pub total_users: usize,
}

/// GET /api/v1/leaderboard/:type
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(leaderboard_type): Path<String>,
) -> Result<Json<ApiResponse<LeaderboardResponse>>> {
    let category = LeaderboardCategory::parse(&leaderboard_type)?;
    let entries = state.leaderboard.entries(category).to_vec();

    let response = LeaderboardResponse {
        leaderboard_type: category.as_str().to_string(),
        your_entry: state.leaderboard.your_entry(category).cloned(),
        total_users: entries.len(),
        entries,
    };

    Ok(Json(ApiResponse::success(response)))
}
