use serde::{Deserialize, Serialize};

use crate::models::job::{
    JobDraft, JobField, JobRecord, CATEGORIES, EMPLOYMENT_TYPES, EXPERIENCE_LEVELS, WORK_PLACES,
};
use crate::services::job_list::{ListStatus, ListWindow, JOB_EDIT_PATH};
use crate::services::job_post::{SubmissionState, SubmitOutcome};
use crate::services::notification_service::Notice;
use crate::utils::image_url::ImageResolver;
use crate::utils::validation::{DraftValidation, FieldError};

const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub refresh: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub time_ago: Option<String>,
    pub image_url: String,
    pub edit_path: String,
}

impl JobSummary {
    pub fn from_record(record: &JobRecord, images: &ImageResolver) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            company: record.company.clone(),
            location: record.location.clone(),
            salary: record.salary.clone(),
            time_ago: record.time_ago.clone(),
            image_url: images.resolve(record.image.as_deref()),
            edit_path: format!("{}/{}", JOB_EDIT_PATH, record.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobListResponse {
    pub status: ListStatus,
    pub entries_per_page: usize,
    pub total: usize,
    pub items: Vec<JobSummary>,
}

impl JobListResponse {
    pub fn from_window(window: ListWindow, images: &ImageResolver) -> Self {
        Self {
            status: window.status,
            entries_per_page: window.page_size.get(),
            total: window.total,
            items: window
                .jobs
                .iter()
                .map(|job| JobSummary::from_record(job, images))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSizePayload {
    pub entries_per_page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetailResponse {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub time_ago: Option<String>,
    pub image_url: String,
    pub description: String,
    pub additional_details: Vec<DetailItem>,
}

impl JobDetailResponse {
    pub fn from_record(record: &JobRecord, images: &ImageResolver) -> Self {
        let description = record
            .description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION)
            .to_string();

        let additional_details = [
            ("Requirements", &record.requirements),
            ("Experience", &record.experience),
            ("Job Type", &record.job_type),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| DetailItem {
                    label: label.to_string(),
                    value: v.to_string(),
                })
        })
        .collect();

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            company: record.company.clone(),
            location: record.location.clone(),
            salary: record.salary.clone(),
            time_ago: record.time_ago.clone(),
            image_url: images.resolve(record.image.as_deref()),
            description,
            additional_details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionDecisionPayload {
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionResultResponse {
    pub job_id: String,
    pub deleted: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFieldPayload {
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftResponse {
    pub fields: serde_json::Map<String, serde_json::Value>,
    pub image: Option<ImageSummary>,
    pub submission: SubmissionState,
}

impl DraftResponse {
    pub fn new(draft: &JobDraft, submission: SubmissionState) -> Self {
        let fields = draft
            .fields()
            .map(|(field, value)| (field.wire_name().to_string(), value.into()))
            .collect();
        let image = draft.image.as_ref().map(|image| ImageSummary {
            file_name: image.file_name.clone(),
            content_type: image.content_type.clone(),
            size: image.len(),
        });
        Self {
            fields,
            image,
            submission,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl From<DraftValidation> for ValidationResponse {
    fn from(value: DraftValidation) -> Self {
        match value {
            DraftValidation::Valid => Self {
                valid: true,
                errors: Vec::new(),
            },
            DraftValidation::Invalid(errors) => Self {
                valid: false,
                errors,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub redirect_to: &'static str,
    pub image_url: Option<String>,
}

impl From<SubmitOutcome> for SubmitResponse {
    fn from(value: SubmitOutcome) -> Self {
        Self {
            message: crate::services::job_post::SUBMIT_SUCCESS_MESSAGE,
            redirect_to: value.redirect_to,
            image_url: value.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftOptionsResponse {
    pub fields: Vec<&'static str>,
    pub employment_types: &'static [&'static str],
    pub categories: &'static [&'static str],
    pub work_places: &'static [&'static str],
    pub experience_levels: &'static [&'static str],
}

impl Default for DraftOptionsResponse {
    fn default() -> Self {
        Self {
            fields: JobField::ALL.iter().map(|f| f.wire_name()).collect(),
            employment_types: EMPLOYMENT_TYPES,
            categories: CATEGORIES,
            work_places: WORK_PLACES,
            experience_levels: EXPERIENCE_LEVELS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsResponse {
    pub items: Vec<Notice>,
}
