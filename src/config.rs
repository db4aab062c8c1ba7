//! Environment-backed configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_KAKAO_API_URL: &str = "https://api2-page.kakao.com/api/v5";
const DEFAULT_KAKAO_IMAGE_URL: &str = "https://dn-img-page.kakao.com/download/resource";

#[derive(Clone, Debug)]
pub struct Config {
    pub kakao_api_url: String,
    pub kakao_image_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Requests per second allowed against a single provider.
    pub rate_limit: u32,
    pub data_path: PathBuf,
    pub logs_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kakao_api_url: DEFAULT_KAKAO_API_URL.to_string(),
            kakao_image_url: DEFAULT_KAKAO_IMAGE_URL.to_string(),
            user_agent: format!("toon-episodes/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(30),
            rate_limit: 5,
            data_path: PathBuf::from("./data"),
            logs_path: PathBuf::from("./logs"),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides defaults with whatever is set in the environment.
    pub fn load(&mut self) -> Result<(), AppError> {
        if let Ok(url) = std::env::var("KAKAO_API_URL") {
            self.kakao_api_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = std::env::var("KAKAO_IMAGE_URL") {
            self.kakao_image_url = url;
        }
        if let Ok(agent) = std::env::var("USER_AGENT") {
            self.user_agent = agent;
        }
        if let Some(secs) = Self::parse_positive("REQUEST_TIMEOUT")? {
            self.request_timeout = Duration::from_secs(secs.into());
        }
        if let Some(limit) = Self::parse_positive("RATE_LIMIT")? {
            self.rate_limit = limit;
        }
        if let Ok(path) = std::env::var("DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LOGS_PATH") {
            self.logs_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Garbage falls back to the default, zero is an error.
    fn parse_positive(key: &str) -> Result<Option<u32>, AppError> {
        let Ok(raw) = std::env::var(key) else {
            return Ok(None);
        };
        match raw.trim().parse::<u32>() {
            Ok(0) => Err(AppError::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
            Ok(v) => Ok(Some(v)),
            Err(_) => Ok(None),
        }
    }
}
