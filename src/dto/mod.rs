pub mod admin_dto;
pub mod job_api_dto;
