use crate::upload::UploadResult;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct BatchProgress {
    pub total: usize,
    pub received: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, result: &UploadResult) {
        self.received += 1;
        if result.outcome.is_success() {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn status_prefix(&self) -> String {
        format!("Received response {} of {} ", self.received, self.total)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn push(&mut self, result: UploadResult) {
        self.attempted += 1;
        if result.outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed.push(result.source);
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn exit_code(&self) -> u8 {
        u8::from(self.has_failures())
    }

    pub fn completion_message(&self, show_progress: bool) -> String {
        if show_progress {
            format!(
                "Conversion complete: {} records attempted and {} failed : {:?}",
                self.attempted,
                self.failed.len(),
                self.failed
            )
        } else {
            format!(
                "Processing complete. {} failures: {:?}",
                self.failed.len(),
                self.failed
            )
        }
    }
}
