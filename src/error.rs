use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Failed uploads are not errors; see [`UploadOutcome`](crate::upload::UploadOutcome).
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build archive for {folder}: {source}")]
    Archive {
        folder: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LoaderError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
