use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{info, instrument};

use crate::dto::job_api_dto::{CreateJobResponse, JobFormPayload, JobListEnvelope};
use crate::error::{Error, Result};
use crate::models::job::JobRecord;

/// The remote jobs collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobsApi: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<JobRecord>>;

    async fn delete_job(&self, id: String) -> Result<()>;

    async fn create_job(&self, payload: JobFormPayload) -> Result<CreateJobResponse>;
}

#[derive(Clone)]
pub struct HttpJobsApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpJobsApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Jobs API client configured");
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Upstream {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl JobsApi for HttpJobsApi {
    #[instrument(skip(self))]
    async fn list_jobs(&self) -> Result<Vec<JobRecord>> {
        let request = self.authorize(self.client.get(self.endpoint("jobs")));
        let response = ensure_success(request.send().await?).await?;
        let envelope = response.json::<JobListEnvelope>().await?;
        Ok(envelope.into_jobs())
    }

    #[instrument(skip(self))]
    async fn delete_job(&self, id: String) -> Result<()> {
        let request = self.authorize(self.client.delete(self.endpoint(&format!("jobs/{}", id))));
        ensure_success(request.send().await?).await?;
        Ok(())
    }

    #[instrument(skip(self, payload), fields(parts = payload.parts.len()))]
    async fn create_job(&self, payload: JobFormPayload) -> Result<CreateJobResponse> {
        let form = payload.into_form()?;
        let request = self.authorize(self.client.post(self.endpoint("jobs")).multipart(form));
        let response = ensure_success(request.send().await?).await?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(CreateJobResponse::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}
