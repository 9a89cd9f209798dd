use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::job::JobRecord;
use crate::services::jobs_api::JobsApi;
use crate::services::notification_service::{NoticeLevel, Notifier};
use crate::utils::image_url::ImageResolver;

pub const FETCH_ERROR_MESSAGE: &str = "Error fetching jobs!";
pub const DELETE_SUCCESS_MESSAGE: &str = "Job deleted successfully!";
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete job.";
/// Console page that edits one job, followed by its id.
pub const JOB_EDIT_PATH: &str = "/jobEidite";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    Fifteen,
}

impl PageSize {
    pub const OPTIONS: [usize; 3] = [5, 10, 15];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Fifteen => 15,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            5 => Ok(PageSize::Five),
            10 => Ok(PageSize::Ten),
            15 => Ok(PageSize::Fifteen),
            other => Err(Error::BadRequest(format!(
                "Entries per page must be one of 5, 10 or 15, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Failed(String),
    Ready,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletionPrompt {
    pub ticket: Uuid,
    pub job_id: String,
    pub title: &'static str,
    pub content: &'static str,
    pub ok_text: &'static str,
    pub cancel_text: &'static str,
}

impl DeletionPrompt {
    fn new(ticket: Uuid, job_id: String) -> Self {
        Self {
            ticket,
            job_id,
            title: "Are you sure you want to delete this job?",
            content: "This action cannot be undone.",
            ok_text: "Yes, Delete",
            cancel_text: "Cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Cancelled { job_id: String },
    Deleted { job_id: String },
}

/// Snapshot of what the list currently shows.
#[derive(Debug, Clone)]
pub struct ListWindow {
    pub status: ListStatus,
    pub page_size: PageSize,
    pub total: usize,
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Default)]
struct ListViewState {
    status: ListStatus,
    jobs: Vec<JobRecord>,
    page_size: PageSize,
    selected: Option<JobRecord>,
    pending_deletions: HashMap<Uuid, String>,
}

#[derive(Clone)]
pub struct JobListController {
    api: Arc<dyn JobsApi>,
    notifier: Arc<dyn Notifier>,
    images: ImageResolver,
    state: Arc<RwLock<ListViewState>>,
    cancel: Arc<Mutex<CancellationToken>>,
}

impl JobListController {
    pub fn new(api: Arc<dyn JobsApi>, notifier: Arc<dyn Notifier>, images: ImageResolver) -> Self {
        Self {
            api,
            notifier,
            images,
            state: Arc::new(RwLock::new(ListViewState::default())),
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    async fn current_token(&self) -> CancellationToken {
        self.cancel.lock().await.clone()
    }

    /// Aborts every request this controller has in flight.
    pub async fn cancel_pending(&self) {
        let mut token = self.cancel.lock().await;
        token.cancel();
        *token = CancellationToken::new();
    }

    #[instrument(skip(self))]
    pub async fn load_jobs(&self) -> Result<Vec<JobRecord>> {
        self.state.write().await.status = ListStatus::Loading;

        let token = self.current_token().await;
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = self.api.list_jobs() => result,
        };

        let mut state = self.state.write().await;
        match result {
            Ok(jobs) => {
                info!(count = jobs.len(), "Fetched job collection");
                state
                    .pending_deletions
                    .retain(|_, job_id| jobs.iter().any(|job| job.id == *job_id));
                state.jobs = jobs.clone();
                state.status = ListStatus::Ready;
                Ok(jobs)
            }
            Err(err) => {
                error!(error = %err, "Failed to fetch jobs");
                state.jobs.clear();
                state.pending_deletions.clear();
                state.status = ListStatus::Failed(FETCH_ERROR_MESSAGE.to_string());
                Err(match err {
                    Error::Cancelled => Error::Cancelled,
                    other => Error::Fetch(other.to_string()),
                })
            }
        }
    }

    pub async fn status(&self) -> ListStatus {
        self.state.read().await.status.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.status == ListStatus::Ready
    }

    pub async fn set_page_size(&self, entries: usize) -> Result<PageSize> {
        let page_size = PageSize::try_from(entries)?;
        self.state.write().await.page_size = page_size;
        Ok(page_size)
    }

    pub async fn page_size(&self) -> PageSize {
        self.state.read().await.page_size
    }

    /// The first `entries_per_page` records of the last fetch.
    pub async fn visible_jobs(&self) -> Vec<JobRecord> {
        let state = self.state.read().await;
        state
            .jobs
            .iter()
            .take(state.page_size.get())
            .cloned()
            .collect()
    }

    pub async fn window(&self) -> ListWindow {
        let state = self.state.read().await;
        ListWindow {
            status: state.status.clone(),
            page_size: state.page_size,
            total: state.jobs.len(),
            jobs: state
                .jobs
                .iter()
                .take(state.page_size.get())
                .cloned()
                .collect(),
        }
    }

    pub fn resolve_image(&self, path: Option<&str>) -> String {
        self.images.resolve(path)
    }

    pub fn images(&self) -> &ImageResolver {
        &self.images
    }

    /// Selects the current collection's copy of `record`.
    pub async fn view_detail(&self, record: &JobRecord) -> Result<JobRecord> {
        self.view_detail_by_id(&record.id).await
    }

    /// Selects a record from the current collection by id.
    pub async fn view_detail_by_id(&self, id: &str) -> Result<JobRecord> {
        let mut state = self.state.write().await;
        let record = state
            .jobs
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Job {} is not in the current list", id)))?;
        state.selected = Some(record.clone());
        Ok(record)
    }

    pub async fn selected(&self) -> Option<JobRecord> {
        self.state.read().await.selected.clone()
    }

    pub async fn close_detail(&self) {
        self.state.write().await.selected = None;
    }

    /// First step of a deletion: hands back the confirmation prompt. Asking
    /// again for the same job replaces the earlier ticket.
    pub async fn request_delete(&self, id: &str) -> Result<DeletionPrompt> {
        let mut state = self.state.write().await;
        if !state.jobs.iter().any(|job| job.id == id) {
            return Err(Error::NotFound(format!("Job {} is not in the current list", id)));
        }
        state.pending_deletions.retain(|_, job_id| job_id.as_str() != id);
        let ticket = Uuid::new_v4();
        state.pending_deletions.insert(ticket, id.to_string());
        info!(job_id = %id, %ticket, "Deletion awaiting confirmation");
        Ok(DeletionPrompt::new(ticket, id.to_string()))
    }

    /// Second step of a deletion. Nothing reaches the API unless `confirmed`.
    #[instrument(skip(self))]
    pub async fn resolve_delete(&self, ticket: Uuid, confirmed: bool) -> Result<DeletionOutcome> {
        let job_id = self
            .state
            .write()
            .await
            .pending_deletions
            .remove(&ticket)
            .ok_or_else(|| Error::NotFound(format!("No pending deletion for ticket {}", ticket)))?;

        if !confirmed {
            info!(job_id = %job_id, "Deletion cancelled");
            return Ok(DeletionOutcome::Cancelled { job_id });
        }

        let token = self.current_token().await;
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = self.api.delete_job(job_id.clone()) => result,
        };

        match result {
            Ok(()) => {
                info!(job_id = %job_id, "Job deleted");
                if let Err(err) = self.load_jobs().await {
                    warn!(error = %err, "Refetch after deletion failed");
                }
                self.notifier
                    .notify(NoticeLevel::Success, DELETE_SUCCESS_MESSAGE);
                Ok(DeletionOutcome::Deleted { job_id })
            }
            Err(err) => {
                error!(job_id = %job_id, error = %err, "Failed to delete job");
                self.notifier.notify(NoticeLevel::Error, DELETE_FAILURE_MESSAGE);
                Err(match err {
                    Error::Cancelled => Error::Cancelled,
                    other => Error::Delete(other.to_string()),
                })
            }
        }
    }

    /// Convenience for callers that already hold the operator's answer.
    pub async fn delete_job(&self, id: &str, confirmed: bool) -> Result<DeletionOutcome> {
        let prompt = self.request_delete(id).await?;
        self.resolve_delete(prompt.ticket, confirmed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::jobs_api::MockJobsApi;
    use crate::services::notification_service::NotificationService;
    use mockall::Sequence;

    fn job(id: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: format!("Job {}", id),
            ..Default::default()
        }
    }

    fn jobs(n: usize) -> Vec<JobRecord> {
        (0..n).map(|i| job(&i.to_string())).collect()
    }

    fn controller(api: MockJobsApi) -> (JobListController, NotificationService) {
        let notices = NotificationService::new();
        let controller = JobListController::new(
            Arc::new(api),
            Arc::new(notices.clone()),
            ImageResolver::new("https://api.example.com", "/default-image.jpg"),
        );
        (controller, notices)
    }

    #[tokio::test]
    async fn load_keeps_api_order_and_marks_ready() {
        let mut api = MockJobsApi::new();
        api.expect_list_jobs()
            .times(1)
            .returning(|| Ok(vec![job("b"), job("a"), job("c")]));
        let (list, _) = controller(api);

        let loaded = list.load_jobs().await.unwrap();

        let ids: Vec<_> = loaded.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(list.status().await, ListStatus::Ready);
    }

    #[tokio::test]
    async fn failed_load_shows_error_and_no_data() {
        let mut api = MockJobsApi::new();
        let mut seq = Sequence::new();
        api.expect_list_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(jobs(3)));
        api.expect_list_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(Error::Upstream { status: 503, body: String::new() }));
        let (list, _) = controller(api);

        list.load_jobs().await.unwrap();
        let err = list.load_jobs().await.unwrap_err();

        assert!(matches!(err, Error::Fetch(_)));
        assert_eq!(
            list.status().await,
            ListStatus::Failed(FETCH_ERROR_MESSAGE.to_string())
        );
        assert!(list.visible_jobs().await.is_empty());
    }

    #[tokio::test]
    async fn window_is_a_prefix_of_at_most_page_size() {
        let mut api = MockJobsApi::new();
        api.expect_list_jobs().returning(|| Ok(jobs(12)));
        let (list, _) = controller(api);
        list.load_jobs().await.unwrap();

        assert_eq!(list.visible_jobs().await.len(), 5);

        for n in PageSize::OPTIONS {
            list.set_page_size(n).await.unwrap();
            let visible = list.visible_jobs().await;
            assert_eq!(visible.len(), n.min(12));
            assert_eq!(visible, jobs(12)[..n.min(12)].to_vec());
        }
    }

    #[tokio::test]
    async fn page_size_outside_options_is_rejected() {
        let (list, _) = controller(MockJobsApi::new());

        assert!(matches!(
            list.set_page_size(7).await,
            Err(Error::BadRequest(_))
        ));
        assert_eq!(list.page_size().await, PageSize::Five);
    }

    #[tokio::test]
    async fn cancelled_confirmation_makes_no_call() {
        let mut api = MockJobsApi::new();
        api.expect_list_jobs().times(1).returning(|| Ok(jobs(3)));
        api.expect_delete_job().never();
        let (list, notices) = controller(api);
        list.load_jobs().await.unwrap();
        let before = list.visible_jobs().await;

        let prompt = list.request_delete("1").await.unwrap();
        assert_eq!(prompt.ok_text, "Yes, Delete");
        let outcome = list.resolve_delete(prompt.ticket, false).await.unwrap();

        assert_eq!(
            outcome,
            DeletionOutcome::Cancelled {
                job_id: "1".to_string()
            }
        );
        assert_eq!(list.visible_jobs().await, before);
        assert!(notices.drain().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_refetches_once_after_ack() {
        let mut api = MockJobsApi::new();
        let mut seq = Sequence::new();
        api.expect_list_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(jobs(3)));
        api.expect_delete_job()
            .withf(|id: &String| id == "1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        api.expect_list_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![job("0"), job("2")]));
        let (list, notices) = controller(api);
        list.load_jobs().await.unwrap();

        let outcome = list.delete_job("1", true).await.unwrap();

        assert_eq!(
            outcome,
            DeletionOutcome::Deleted {
                job_id: "1".to_string()
            }
        );
        assert_eq!(list.visible_jobs().await.len(), 2);
        let notices = notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, DELETE_SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn failed_delete_keeps_collection_and_notifies() {
        let mut api = MockJobsApi::new();
        api.expect_list_jobs().times(1).returning(|| Ok(jobs(3)));
        api.expect_delete_job()
            .times(1)
            .returning(|_| Err(Error::Upstream { status: 500, body: String::new() }));
        let (list, notices) = controller(api);
        list.load_jobs().await.unwrap();
        let before = list.visible_jobs().await;

        let err = list.delete_job("2", true).await.unwrap_err();

        assert!(matches!(err, Error::Delete(_)));
        assert_eq!(list.visible_jobs().await, before);
        let notices = notices.drain();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, DELETE_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn tickets_are_single_use() {
        let mut api = MockJobsApi::new();
        api.expect_list_jobs().returning(|| Ok(jobs(2)));
        let (list, _) = controller(api);
        list.load_jobs().await.unwrap();

        let prompt = list.request_delete("0").await.unwrap();
        list.resolve_delete(prompt.ticket, false).await.unwrap();

        assert!(matches!(
            list.resolve_delete(prompt.ticket, true).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            list.request_delete("missing").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn abandoned_prompts_do_not_accumulate() {
        let mut api = MockJobsApi::new();
        let mut seq = Sequence::new();
        api.expect_list_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(jobs(3)));
        api.expect_list_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![job("0")]));
        api.expect_delete_job().never();
        let (list, _) = controller(api);
        list.load_jobs().await.unwrap();

        let mut last = None;
        for _ in 0..1000 {
            last = Some(list.request_delete("1").await.unwrap());
        }
        let replaced = list.request_delete("0").await.unwrap();
        let current = list.request_delete("0").await.unwrap();
        assert_eq!(list.state.read().await.pending_deletions.len(), 2);
        assert!(matches!(
            list.resolve_delete(replaced.ticket, false).await,
            Err(Error::NotFound(_))
        ));

        // "1" is gone from the refetched collection, so its ticket goes too.
        list.load_jobs().await.unwrap();

        let pending = list.state.read().await.pending_deletions.clone();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.get(&current.ticket).map(String::as_str), Some("0"));
        assert!(matches!(
            list.resolve_delete(last.unwrap().ticket, true).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn detail_survives_refetch_that_drops_the_record() {
        let mut api = MockJobsApi::new();
        let mut seq = Sequence::new();
        api.expect_list_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(jobs(3)));
        api.expect_list_jobs()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![job("0")]));
        let (list, _) = controller(api);
        list.load_jobs().await.unwrap();

        let selected = list.view_detail(&job("2")).await.unwrap();
        list.load_jobs().await.unwrap();

        assert_eq!(list.selected().await, Some(selected));
        list.close_detail().await;
        assert!(list.selected().await.is_none());
    }

    #[tokio::test]
    async fn cancel_pending_aborts_inflight_load() {
        let mut api = MockJobsApi::new();
        api.expect_list_jobs().returning(|| Ok(jobs(1)));
        let (list, _) = controller(api);

        list.cancel.lock().await.cancel();
        let err = list.load_jobs().await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));

        list.cancel_pending().await;
        assert!(list.load_jobs().await.is_ok());
    }
}
