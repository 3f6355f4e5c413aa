use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct UploadJob {
    pub source: PathBuf,
    pub archive_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success,
    HttpError(u16),
    /// The request never produced a response (connect failure, timeout, ...).
    NoResponse(String),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub source: PathBuf,
    pub outcome: UploadOutcome,
}
