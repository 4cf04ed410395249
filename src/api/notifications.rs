use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, Notification, PaginatedResponse},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

/// Empty or missing `notification_ids` marks everything as read.
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default)]
    pub notification_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    #[serde(flatten)]
    pub page: PaginatedResponse<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub updated: usize,
}

/// GET /api/v1/notifications/list
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ApiResponse<NotificationListResponse>>> {
    let notifications = state.notifications.list().await;
    let page = PaginatedResponse::from_items(
        &notifications,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(20),
    );

    Ok(Json(ApiResponse::success(NotificationListResponse {
        page,
        unread_count: state.notifications.unread_count().await,
    })))
}

/// POST /api/v1/notifications/mark-read
pub async fn mark_read(
    State(state): State<AppState>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<ApiResponse<UpdatedResponse>>> {
    let updated = if req.notification_ids.is_empty() {
        state.notifications.mark_all_as_read().await
    } else {
        let mut updated = 0;
        for id in &req.notification_ids {
            if state.notifications.mark_as_read(id).await {
                updated += 1;
            }
        }
        updated
    };

    Ok(Json(ApiResponse::success(UpdatedResponse { updated })))
}

/// DELETE /api/v1/notifications/:id
pub async fn clear(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>> {
    if !state.notifications.clear(&id).await {
        return Err(AppError::NotFound(format!("Notification {}", id)));
    }
    Ok(Json(ApiResponse::success(format!("Notification {} cleared", id))))
}

/// DELETE /api/v1/notifications
pub async fn clear_all(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UpdatedResponse>>> {
    let updated = state.notifications.clear_all().await;
    Ok(Json(ApiResponse::success(UpdatedResponse { updated })))
}
