#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use job_admin::{
    config::Config,
    dto::job_api_dto::{CreateJobResponse, JobFormPayload},
    error::{Error, Result},
    models::job::JobRecord,
    routes,
    services::jobs_api::JobsApi,
    AppState,
};

pub const IMAGE_BASE_URL: &str = "https://cdn.example.com";

/// In-memory stand-in for the remote jobs collection.
#[derive(Default)]
pub struct FakeJobsApi {
    pub jobs: Mutex<Vec<JobRecord>>,
    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<JobFormPayload>>,
    pub fail_list: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_create: AtomicBool,
}

impl FakeJobsApi {
    pub fn with_jobs(jobs: Vec<JobRecord>) -> Arc<Self> {
        let api = Self::default();
        *api.jobs.lock().unwrap() = jobs;
        Arc::new(api)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl JobsApi for FakeJobsApi {
    async fn list_jobs(&self) -> Result<Vec<JobRecord>> {
        self.record("list".to_string());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::Upstream {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn delete_job(&self, id: String) -> Result<()> {
        self.record(format!("delete:{}", id));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Error::Upstream {
                status: 500,
                body: "nope".to_string(),
            });
        }
        self.jobs.lock().unwrap().retain(|job| job.id != id);
        Ok(())
    }

    async fn create_job(&self, payload: JobFormPayload) -> Result<CreateJobResponse> {
        self.record("create".to_string());
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::Upstream {
                status: 500,
                body: "nope".to_string(),
            });
        }
        let mut jobs = self.jobs.lock().unwrap();
        let text = |name: &str| payload.text(name).unwrap_or_default().to_string();
        let next_id = jobs.len() + 1;
        jobs.push(JobRecord {
            id: format!("job-{}", next_id),
            title: text("title"),
            company: text("company"),
            location: text("location"),
            employment_type: text("employmentType"),
            image: Some("/img/x.png".to_string()),
            ..Default::default()
        });
        self.submitted.lock().unwrap().push(payload);
        Ok(CreateJobResponse::default())
    }
}

pub fn job(id: &str, title: &str) -> JobRecord {
    JobRecord {
        id: id.to_string(),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        salary: "5000".to_string(),
        ..Default::default()
    }
}

pub fn setup_app(api: Arc<FakeJobsApi>) -> (Router, AppState) {
    let config = Config::new("http://jobs.invalid", IMAGE_BASE_URL);
    let state = AppState::with_api(&config, api);
    let app = routes::app(state.clone(), config.max_upload_bytes());
    (app, state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
