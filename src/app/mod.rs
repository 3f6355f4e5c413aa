mod state;

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::upload::{ArchiveUploader, FileProcessor, UploadJob, UploadOutcome, UploadResult};
use futures::stream::{self, StreamExt};
pub use state::{BatchProgress, BatchSummary};
use tracing::{debug, error, info};

pub struct SeedLoader {
    config: LoaderConfig,
}

impl SeedLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<BatchSummary> {
        info!("Processing subfolders...");

        if self.config.subfolders.is_empty() {
            info!("No subfolders found in SEED_DATA_DIRECTORIES.");
            return Ok(BatchSummary::default());
        }

        let jobs = FileProcessor::new(&self.config).discover_jobs()?;
        let uploader = ArchiveUploader::new(&self.config.upload_url, self.config.request_timeout)?;

        Ok(self.dispatch(&uploader, jobs).await)
    }

    pub async fn dispatch(&self, uploader: &ArchiveUploader, jobs: Vec<UploadJob>) -> BatchSummary {
        info!("Sending {} ZIP files...", jobs.len());

        let mut progress = BatchProgress::new(jobs.len());
        let mut summary = BatchSummary::default();

        let mut responses = stream::iter(jobs)
            .map(|job| uploader.upload(job))
            .buffer_unordered(self.config.max_in_flight);

        while let Some(result) = responses.next().await {
            progress.record(&result);
            self.report(&progress, &result);
            summary.push(result);
        }

        debug!(
            successful = progress.successful,
            failed = progress.failed,
            "All responses received"
        );
        summary
    }

    fn report(&self, progress: &BatchProgress, result: &UploadResult) {
        let prefix = if self.config.show_progress {
            progress.status_prefix()
        } else {
            String::new()
        };
        let path = result.source.display();

        match &result.outcome {
            UploadOutcome::Success => info!("{}✅ Successfully uploaded {}", prefix, path),
            UploadOutcome::HttpError(status) => error!(
                status = *status,
                "{}❌ Failed to upload {}. Status: {}", prefix, path, status
            ),
            UploadOutcome::NoResponse(reason) => error!(
                reason = %reason,
                "{}❌ Failed to upload {}: No response received", prefix, path
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_IN_FLIGHT;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn archive_named(name: &str) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
        let needle = format!(r#"filename="{}.zip""#, name).into_bytes();
        move |request: &Request| request.body.windows(needle.len()).any(|w| w == needle.as_slice())
    }

    fn seed_tree(records: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (subfolder, record) in records {
            let folder = dir.path().join("baseECR").join(subfolder).join(record);
            fs::create_dir_all(&folder).unwrap();
            fs::write(folder.join("CDA_eICR.xml"), format!("<eicr id=\"{}\"/>", record)).unwrap();
        }
        dir
    }

    fn loader(base: &Path, subfolders: &[&str], url: String) -> SeedLoader {
        let config = LoaderConfig::new(
            base,
            subfolders.iter().map(|s| s.to_string()).collect(),
            url,
        );
        SeedLoader::new(config)
    }

    fn record_path(base: &Path, subfolder: &str, record: &str) -> PathBuf {
        base.join("baseECR").join(subfolder).join(record)
    }

    #[tokio::test]
    async fn no_subfolders_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = seed_tree(&[("LA", "rec-1")]);
        let summary = loader(dir.path(), &[], server.uri()).run().await.unwrap();

        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn one_attempt_per_child_folder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(4)
            .mount(&server)
            .await;

        let dir = seed_tree(&[
            ("LA", "rec-1"),
            ("LA", "rec-2"),
            ("NY", "rec-3"),
            ("TX", "rec-4"),
        ]);
        let summary = loader(dir.path(), &["LA", "NY", "TX"], server.uri())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.succeeded, 4);
        assert!(summary.failed.is_empty());
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn missing_subfolder_does_not_fail_the_run() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = seed_tree(&[("LA", "rec-1")]);
        let summary = loader(dir.path(), &["does-not-exist", "LA"], server.uri())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn failures_are_collected_regardless_of_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(archive_named("rec-2"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(archive_named("rec-4"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .with_priority(10)
            .mount(&server)
            .await;

        let dir = seed_tree(&[
            ("LA", "rec-1"),
            ("LA", "rec-2"),
            ("LA", "rec-3"),
            ("LA", "rec-4"),
            ("LA", "rec-5"),
        ]);
        let mut seed_loader = loader(dir.path(), &["LA"], server.uri());
        seed_loader.config = seed_loader
            .config
            .clone()
            .with_request_timeout(Some(Duration::from_millis(500)))
            .with_progress(true);

        let summary = seed_loader.run().await.unwrap();

        assert_eq!(summary.attempted, 5);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.exit_code(), 1);

        let mut failed = summary.failed.clone();
        failed.sort();
        assert_eq!(
            failed,
            vec![
                record_path(dir.path(), "LA", "rec-2"),
                record_path(dir.path(), "LA", "rec-4"),
            ]
        );
        // The timed-out upload is the last to come back.
        assert_eq!(
            summary.failed.last(),
            Some(&record_path(dir.path(), "LA", "rec-2"))
        );
    }

    async fn timed_dispatch(job_count: usize, delay: Duration) -> Duration {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .expect(job_count as u64)
            .mount(&server)
            .await;

        let seed_loader = loader(Path::new("/unused"), &["LA"], server.uri());
        let uploader = ArchiveUploader::new(server.uri(), None).unwrap();
        let jobs = (0..job_count)
            .map(|i| UploadJob {
                source: PathBuf::from(format!("/seed/rec-{}", i)),
                archive_name: format!("rec-{}.zip", i),
                bytes: Vec::new(),
            })
            .collect();

        let started = Instant::now();
        let summary = seed_loader.dispatch(&uploader, jobs).await;
        assert_eq!(summary.succeeded, job_count);
        started.elapsed()
    }

    #[tokio::test]
    async fn eight_uploads_run_at_once() {
        let delay = Duration::from_millis(400);
        let elapsed = timed_dispatch(DEFAULT_MAX_IN_FLIGHT, delay).await;
        // A narrower bound would need a second round.
        assert!(elapsed < delay * 3 / 2, "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn ninth_upload_waits_for_a_slot() {
        let delay = Duration::from_millis(400);
        let elapsed = timed_dispatch(DEFAULT_MAX_IN_FLIGHT + 1, delay).await;
        assert!(elapsed >= delay * 2, "took {:?}", elapsed);
    }
}
