pub mod job_list;
pub mod job_post;
pub mod jobs_api;
pub mod notification_service;
