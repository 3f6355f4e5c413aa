use crate::error::{LoaderError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_UPLOAD_URL: &str = "http://host.docker.internal:3000/ecr-viewer/api/process-zip";
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;
pub const SEED_ROOT_DIR: &str = "baseECR";

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub base_dir: PathBuf,
    pub subfolders: Vec<String>,
    pub upload_url: String,
    pub max_in_flight: usize,
    /// `None` leaves the HTTP client's own defaults in place.
    pub request_timeout: Option<Duration>,
    pub show_progress: bool,
}

impl LoaderConfig {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        subfolders: Vec<String>,
        upload_url: impl Into<String>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            subfolders,
            upload_url: upload_url.into(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            request_timeout: None,
            show_progress: false,
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_in_flight == 0 {
            return Err(LoaderError::config("max_in_flight must be at least 1"));
        }
        reqwest::Url::parse(&self.upload_url).map_err(|e| {
            LoaderError::config(format!("invalid upload URL '{}': {}", self.upload_url, e))
        })?;
        Ok(())
    }

    pub fn seed_root(&self) -> PathBuf {
        self.base_dir.join(SEED_ROOT_DIR)
    }
}

/// Split the raw `SEED_DATA_DIRECTORIES` value into folder names.
///
/// Splitting is literal: names are neither trimmed nor deduplicated, so
/// `"LA, NY"` yields `"LA"` and `" NY"`.
pub fn parse_subfolders(raw: Option<&str>) -> Vec<String> {
    match raw {
        None | Some("") => Vec::new(),
        Some(raw) => raw.split(',').map(str::to_string).collect(),
    }
}
