use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::{dto::admin_dto::NotificationsResponse, AppState};

#[utoipa::path(
    get,
    path = "/admin/notifications",
    responses(
        (status = 200, description = "Notices raised since the last poll", body = Json<NotificationsResponse>)
    )
)]
#[axum::debug_handler]
pub async fn poll_notifications(State(state): State<AppState>) -> impl IntoResponse {
    Json(NotificationsResponse {
        items: state.notifications.drain(),
    })
}

#[utoipa::path(
    post,
    path = "/admin/cancel",
    responses((status = 204, description = "Outstanding requests cancelled"))
)]
#[axum::debug_handler]
pub async fn cancel_pending(State(state): State<AppState>) -> impl IntoResponse {
    state.job_list.cancel_pending().await;
    state.job_post.cancel_pending().await;
    info!("Outstanding jobs API requests cancelled");
    StatusCode::NO_CONTENT
}
