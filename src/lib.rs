pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    job_list::JobListController,
    job_post::JobCreationController,
    jobs_api::{HttpJobsApi, JobsApi},
    notification_service::NotificationService,
};
use crate::utils::image_url::ImageResolver;

#[derive(Clone)]
pub struct AppState {
    pub job_list: JobListController,
    pub job_post: JobCreationController,
    pub notifications: NotificationService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let api = HttpJobsApi::new(
            config.jobs_api_url.clone(),
            config.jobs_api_token.clone(),
            config.jobs_api_timeout,
        )?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    pub fn with_api(config: &Config, api: Arc<dyn JobsApi>) -> Self {
        let notifications = NotificationService::new();
        let images = ImageResolver::new(
            config.image_base_url.clone(),
            config.default_image_url.clone(),
        );

        let job_list =
            JobListController::new(api.clone(), Arc::new(notifications.clone()), images);
        let job_post = JobCreationController::new(
            api,
            Arc::new(notifications.clone()),
            config.enforce_draft_validation,
        );

        Self {
            job_list,
            job_post,
            notifications,
        }
    }
}
