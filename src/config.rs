use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

const DEFAULT_IMAGE_URL: &str = "/default-image.jpg";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub jobs_api_url: String,
    pub jobs_api_token: Option<String>,
    pub jobs_api_timeout: Duration,
    pub image_base_url: String,
    pub default_image_url: String,
    pub enforce_draft_validation: bool,
    pub max_upload_mb: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let jobs_api_url = get_env("JOBS_API_URL")?;
        Url::parse(&jobs_api_url)
            .map_err(|e| Error::Config(format!("Invalid value for JOBS_API_URL: {}", e)))?;

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            jobs_api_url,
            jobs_api_token: env::var("JOBS_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            jobs_api_timeout: Duration::from_secs(get_env_parse_or(
                "JOBS_API_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            image_base_url: get_env("IMAGE_BASE_URL")?,
            default_image_url: env::var("DEFAULT_IMAGE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_URL.to_string()),
            enforce_draft_validation: get_env_parse_or("ENFORCE_DRAFT_VALIDATION", false)?,
            max_upload_mb: get_env_parse_or("MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB)?,
        })
    }

    /// Settings pointing at the given jobs API, with every optional value at its default.
    pub fn new(jobs_api_url: impl Into<String>, image_base_url: impl Into<String>) -> Self {
        Self {
            server_address: "127.0.0.1:8080".to_string(),
            jobs_api_url: jobs_api_url.into(),
            jobs_api_token: None,
            jobs_api_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            image_base_url: image_base_url.into(),
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
            enforce_draft_validation: false,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
