use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::admin_dto::{
        DeletionDecisionPayload, DeletionResultResponse, JobDetailResponse, JobListQuery,
        JobListResponse, PageSizePayload,
    },
    error::{Error, Result},
    services::job_list::{DeletionOutcome, DELETE_SUCCESS_MESSAGE},
    AppState,
};

#[utoipa::path(
    get,
    path = "/admin/jobs",
    params(
        ("refresh" = Option<bool>, Query, description = "Refetch the collection before answering")
    ),
    responses(
        (status = 200, description = "Current page of jobs", body = Json<JobListResponse>),
        (status = 502, description = "Jobs API unavailable")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let list = &state.job_list;
    if query.refresh.unwrap_or(false) || !list.is_loaded().await {
        list.load_jobs().await?;
    }
    let window = list.window().await;
    Ok(Json(JobListResponse::from_window(window, list.images())))
}

#[utoipa::path(
    put,
    path = "/admin/jobs/page-size",
    request_body = PageSizePayload,
    responses(
        (status = 200, description = "Page size updated", body = Json<JobListResponse>),
        (status = 400, description = "Unsupported page size")
    )
)]
#[axum::debug_handler]
pub async fn set_page_size(
    State(state): State<AppState>,
    Json(payload): Json<PageSizePayload>,
) -> Result<impl IntoResponse> {
    let list = &state.job_list;
    list.set_page_size(payload.entries_per_page).await?;
    let window = list.window().await;
    Ok(Json(JobListResponse::from_window(window, list.images())))
}

#[utoipa::path(
    post,
    path = "/admin/jobs/{id}/view",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job selected", body = Json<JobDetailResponse>),
        (status = 404, description = "Job not in the current list")
    )
)]
#[axum::debug_handler]
pub async fn view_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let record = state.job_list.view_detail_by_id(&id).await?;
    Ok(Json(JobDetailResponse::from_record(
        &record,
        state.job_list.images(),
    )))
}

#[utoipa::path(
    get,
    path = "/admin/jobs/selected",
    responses(
        (status = 200, description = "Job being viewed", body = Json<JobDetailResponse>),
        (status = 404, description = "No job selected")
    )
)]
#[axum::debug_handler]
pub async fn get_selected_job(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let record = state
        .job_list
        .selected()
        .await
        .ok_or_else(|| Error::NotFound("No job selected".to_string()))?;
    Ok(Json(JobDetailResponse::from_record(
        &record,
        state.job_list.images(),
    )))
}

#[utoipa::path(
    delete,
    path = "/admin/jobs/selected",
    responses((status = 204, description = "Detail view closed"))
)]
#[axum::debug_handler]
pub async fn close_selected_job(State(state): State<AppState>) -> impl IntoResponse {
    state.job_list.close_detail().await;
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    post,
    path = "/admin/jobs/{id}/delete",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 202, description = "Confirmation required"),
        (status = 404, description = "Job not in the current list")
    )
)]
#[axum::debug_handler]
pub async fn request_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let prompt = state.job_list.request_delete(&id).await?;
    Ok((StatusCode::ACCEPTED, Json(prompt)))
}

#[utoipa::path(
    post,
    path = "/admin/deletions/{ticket}",
    params(("ticket" = Uuid, Path, description = "Confirmation ticket")),
    request_body = DeletionDecisionPayload,
    responses(
        (status = 200, description = "Deletion resolved", body = Json<DeletionResultResponse>),
        (status = 404, description = "Unknown ticket"),
        (status = 502, description = "Jobs API rejected the deletion")
    )
)]
#[axum::debug_handler]
pub async fn resolve_delete(
    State(state): State<AppState>,
    Path(ticket): Path<Uuid>,
    Json(payload): Json<DeletionDecisionPayload>,
) -> Result<impl IntoResponse> {
    let response = match state
        .job_list
        .resolve_delete(ticket, payload.confirm)
        .await?
    {
        DeletionOutcome::Cancelled { job_id } => DeletionResultResponse {
            job_id,
            deleted: false,
            message: None,
        },
        DeletionOutcome::Deleted { job_id } => DeletionResultResponse {
            job_id,
            deleted: true,
            message: Some(DELETE_SUCCESS_MESSAGE.to_string()),
        },
    };
    Ok(Json(response))
}
