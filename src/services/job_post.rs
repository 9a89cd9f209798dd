use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::dto::job_api_dto::{CreateJobResponse, JobFormPayload};
use crate::error::{Error, Result};
use crate::models::job::{ImageAttachment, JobDraft, JobField};
use crate::services::jobs_api::JobsApi;
use crate::services::notification_service::{NoticeLevel, Notifier};
use crate::utils::image_url::normalize_returned_image_url;
use crate::utils::validation::{validate, DraftValidation};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Job posted successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Error posting job. Please try again.";
pub const JOB_LIST_PATH: &str = "/alljob";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// Where the console should go next.
    pub redirect_to: &'static str,
    pub image_url: Option<String>,
    pub response: CreateJobResponse,
}

/// Clears the in-flight flag however the submission ends, including when the
/// caller drops the future.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct JobCreationController {
    api: Arc<dyn JobsApi>,
    notifier: Arc<dyn Notifier>,
    draft: Arc<Mutex<JobDraft>>,
    submitting: Arc<AtomicBool>,
    cancel: Arc<Mutex<CancellationToken>>,
    enforce_validation: bool,
}

impl JobCreationController {
    pub fn new(api: Arc<dyn JobsApi>, notifier: Arc<dyn Notifier>, enforce_validation: bool) -> Self {
        Self {
            api,
            notifier,
            draft: Arc::new(Mutex::new(JobDraft::default())),
            submitting: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
            enforce_validation,
        }
    }

    pub async fn draft(&self) -> JobDraft {
        self.draft.lock().await.clone()
    }

    pub fn submission_state(&self) -> SubmissionState {
        if self.submitting.load(Ordering::Acquire) {
            SubmissionState::Submitting
        } else {
            SubmissionState::Idle
        }
    }

    pub async fn set_field(&self, field: JobField, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(field = %field, "Draft field changed");
        self.draft.lock().await.set(field, value);
    }

    pub async fn set_field_by_name(&self, name: &str, value: impl Into<String>) -> Result<()> {
        let field: JobField = name.parse()?;
        self.set_field(field, value).await;
        Ok(())
    }

    /// Replaces any previously attached image.
    pub async fn set_image(&self, image: ImageAttachment) {
        info!(file_name = %image.file_name, size = image.len(), "Draft image attached");
        self.draft.lock().await.image = Some(image);
    }

    pub async fn clear_image(&self) {
        self.draft.lock().await.image = None;
    }

    pub async fn reset(&self) {
        *self.draft.lock().await = JobDraft::default();
    }

    pub async fn validate(&self) -> DraftValidation {
        validate(&*self.draft.lock().await)
    }

    pub async fn to_payload(&self) -> JobFormPayload {
        JobFormPayload::from(&*self.draft.lock().await)
    }

    pub async fn cancel_pending(&self) {
        let mut token = self.cancel.lock().await;
        token.cancel();
        *token = CancellationToken::new();
    }

    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejected submission while another is in flight");
            return Err(Error::SubmissionInProgress);
        }
        let _in_flight = InFlight(&self.submitting);

        let payload = {
            let draft = self.draft.lock().await;
            if self.enforce_validation {
                if let DraftValidation::Invalid(errors) = validate(&*draft) {
                    warn!(errors = errors.len(), "Draft failed validation");
                    return Err(Error::Validation(errors));
                }
            }
            JobFormPayload::from(&*draft)
        };

        let token = self.cancel.lock().await.clone();
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(Error::Cancelled),
            result = self.api.create_job(payload) => result,
        };

        match result {
            Ok(response) => {
                let image_url = match response.image_url.as_deref() {
                    Some(raw) => {
                        let fixed = normalize_returned_image_url(raw);
                        info!(image_url = %fixed, "Fixed image URL");
                        Some(fixed)
                    }
                    None => {
                        warn!("No image URL returned from the jobs API");
                        None
                    }
                };

                info!(response = ?response, "Job posted successfully");
                self.reset().await;
                self.notifier.notify(NoticeLevel::Success, SUBMIT_SUCCESS_MESSAGE);

                Ok(SubmitOutcome {
                    redirect_to: JOB_LIST_PATH,
                    image_url,
                    response,
                })
            }
            Err(err) => {
                error!(error = %err, "Error posting job");
                self.notifier.notify(NoticeLevel::Error, SUBMIT_FAILURE_MESSAGE);
                Err(match err {
                    Error::Cancelled => Error::Cancelled,
                    other => Error::Submit(other.to_string()),
                })
            }
        }
    }
}
