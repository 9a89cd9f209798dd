pub mod console;
pub mod draft;
pub mod health;
pub mod jobs;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    let jobs_api = Router::new()
        .route("/admin/jobs", get(jobs::list_jobs))
        .route("/admin/jobs/page-size", put(jobs::set_page_size))
        .route(
            "/admin/jobs/selected",
            get(jobs::get_selected_job).delete(jobs::close_selected_job),
        )
        .route("/admin/jobs/:id/view", post(jobs::view_job))
        .route("/admin/jobs/:id/delete", post(jobs::request_delete))
        .route("/admin/deletions/:ticket", post(jobs::resolve_delete));

    let draft_api = Router::new()
        .route("/admin/draft", get(draft::get_draft))
        .route("/admin/draft/options", get(draft::get_draft_options))
        .route("/admin/draft/fields/:name", put(draft::set_field))
        .route(
            "/admin/draft/image",
            put(draft::set_image).delete(draft::clear_image),
        )
        .route("/admin/draft/validation", get(draft::validate_draft))
        .route("/admin/draft/submit", post(draft::submit_draft));

    let console_api = Router::new()
        .route("/admin/notifications", get(console::poll_notifications))
        .route("/admin/cancel", post(console::cancel_pending));

    Router::new()
        .route("/health", get(health::health))
        .merge(jobs_api)
        .merge(draft_api)
        .merge(console_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
