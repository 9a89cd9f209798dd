use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        admin_dto::{
            DraftOptionsResponse, DraftResponse, SetFieldPayload, SubmitResponse,
            ValidationResponse,
        },
        job_api_dto::IMAGE_PART_NAME,
    },
    error::{Error, Result},
    models::job::ImageAttachment,
    AppState,
};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

async fn draft_response(state: &AppState) -> DraftResponse {
    let post = &state.job_post;
    DraftResponse::new(&post.draft().await, post.submission_state())
}

#[utoipa::path(
    get,
    path = "/admin/draft",
    responses((status = 200, description = "Current draft", body = Json<DraftResponse>))
)]
#[axum::debug_handler]
pub async fn get_draft(State(state): State<AppState>) -> impl IntoResponse {
    Json(draft_response(&state).await)
}

#[utoipa::path(
    get,
    path = "/admin/draft/options",
    responses((status = 200, description = "Select options for the draft form"))
)]
#[axum::debug_handler]
pub async fn get_draft_options() -> impl IntoResponse {
    Json(DraftOptionsResponse::default())
}

#[utoipa::path(
    put,
    path = "/admin/draft/fields/{name}",
    params(("name" = String, Path, description = "Field name")),
    request_body = SetFieldPayload,
    responses(
        (status = 200, description = "Field updated", body = Json<DraftResponse>),
        (status = 400, description = "Unknown field")
    )
)]
#[axum::debug_handler]
pub async fn set_field(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<SetFieldPayload>,
) -> Result<impl IntoResponse> {
    state
        .job_post
        .set_field_by_name(&name, payload.value)
        .await?;
    Ok(Json(draft_response(&state).await))
}

#[utoipa::path(
    put,
    path = "/admin/draft/image",
    responses(
        (status = 200, description = "Image attached", body = Json<DraftResponse>),
        (status = 400, description = "No image part in the upload")
    )
)]
#[axum::debug_handler]
pub async fn set_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut attachment = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_PART_NAME) || attachment.is_some() {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let image = ImageAttachment::new(file_name, content_type, field.bytes().await?);
        if !image.is_empty() {
            attachment = Some(image);
        }
    }

    let attachment =
        attachment.ok_or_else(|| Error::BadRequest("No image file provided".to_string()))?;
    state.job_post.set_image(attachment).await;
    Ok(Json(draft_response(&state).await))
}

#[utoipa::path(
    delete,
    path = "/admin/draft/image",
    responses((status = 200, description = "Image removed", body = Json<DraftResponse>))
)]
#[axum::debug_handler]
pub async fn clear_image(State(state): State<AppState>) -> impl IntoResponse {
    state.job_post.clear_image().await;
    Json(draft_response(&state).await)
}

#[utoipa::path(
    get,
    path = "/admin/draft/validation",
    responses((status = 200, description = "Validation result", body = Json<ValidationResponse>))
)]
#[axum::debug_handler]
pub async fn validate_draft(State(state): State<AppState>) -> impl IntoResponse {
    Json(ValidationResponse::from(state.job_post.validate().await))
}

#[utoipa::path(
    post,
    path = "/admin/draft/submit",
    responses(
        (status = 201, description = "Job posted", body = Json<SubmitResponse>),
        (status = 409, description = "Submission already in progress"),
        (status = 422, description = "Draft failed validation"),
        (status = 502, description = "Jobs API rejected the job")
    )
)]
#[axum::debug_handler]
pub async fn submit_draft(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let outcome = state.job_post.submit().await?;
    Ok((StatusCode::CREATED, Json(SubmitResponse::from(outcome))))
}
