use crate::error::Result;
use crate::upload::types::{UploadJob, UploadOutcome, UploadResult};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

const UPLOAD_FIELD: &str = "upload_file";
const ZIP_MIME: &str = "application/zip";

#[derive(Clone)]
pub struct ArchiveUploader {
    client: reqwest::Client,
    url: String,
}

impl ArchiveUploader {
    pub fn new(url: impl Into<String>, request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub async fn upload(&self, job: UploadJob) -> UploadResult {
        let UploadJob {
            source,
            archive_name,
            bytes,
        } = job;

        let outcome = match self.send(archive_name, bytes).await {
            Ok(status) if status == StatusCode::OK => UploadOutcome::Success,
            Ok(status) => UploadOutcome::HttpError(status.as_u16()),
            Err(e) => {
                debug!(path = %source.display(), error = %e, "Request produced no response");
                UploadOutcome::NoResponse(e.to_string())
            }
        };

        UploadResult { source, outcome }
    }

    async fn send(&self, archive_name: String, bytes: Vec<u8>) -> reqwest::Result<StatusCode> {
        let part = Part::bytes(bytes)
            .file_name(archive_name)
            .mime_str(ZIP_MIME)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        Ok(response.status())
    }
}
