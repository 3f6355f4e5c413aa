mod client;
mod file_processor;
mod types;

pub use client::ArchiveUploader;
pub use file_processor::FileProcessor;
pub use types::{UploadJob, UploadOutcome, UploadResult};
