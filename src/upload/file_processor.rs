use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::upload::types::UploadJob;
use crate::utils::file_size::FileSizeUtils;
use ignore::WalkBuilder;
use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Clone)]
pub struct FileProcessor {
    seed_root: PathBuf,
    subfolders: Vec<String>,
}

impl FileProcessor {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            seed_root: config.seed_root(),
            subfolders: config.subfolders.clone(),
        }
    }

    pub fn discover_jobs(&self) -> Result<Vec<UploadJob>> {
        let mut jobs = Vec::new();

        for subfolder in &self.subfolders {
            let subfolder_path = self.seed_root.join(subfolder);

            if !subfolder_path.is_dir() {
                warn!(
                    path = %subfolder_path.display(),
                    "Skipping: {} is not a valid directory.",
                    subfolder_path.display()
                );
                continue;
            }

            for folder_path in Self::child_folders(&subfolder_path)? {
                info!("Zipping and uploading: {}", folder_path.display());

                let bytes = Self::zip_folder(&folder_path)?;
                let archive_name = format!(
                    "{}.zip",
                    folder_path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                );
                debug!(
                    archive = %archive_name,
                    archive_bytes = bytes.len(),
                    "Built archive ({})",
                    FileSizeUtils::format_size(bytes.len() as u64)
                );

                jobs.push(UploadJob {
                    source: folder_path,
                    archive_name,
                    bytes,
                });
            }
        }

        Ok(jobs)
    }

    fn child_folders(parent: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(parent).map_err(|e| LoaderError::io(parent, e))?;

        let mut folders = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| LoaderError::io(parent, e))?.path();
            if path.is_dir() {
                folders.push(path);
            }
        }
        folders.sort();
        Ok(folders)
    }

    /// Entry names are relative to `folder` and always use `/`. Hidden and
    /// git-ignored files are included; empty directories are not.
    pub fn zip_folder(folder: &Path) -> Result<Vec<u8>> {
        let archive_err = |source| LoaderError::Archive {
            folder: folder.to_path_buf(),
            source,
        };

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let walker = WalkBuilder::new(folder)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| {
                LoaderError::io(folder, io::Error::new(io::ErrorKind::Other, e))
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(name) = Self::archive_entry_name(folder, path) else {
                continue;
            };

            writer.start_file(name, options).map_err(archive_err)?;
            let mut file = File::open(path).map_err(|e| LoaderError::io(path, e))?;
            io::copy(&mut file, &mut writer).map_err(|e| LoaderError::io(path, e))?;
        }

        let cursor = writer.finish().map_err(archive_err)?;
        Ok(cursor.into_inner())
    }

    fn archive_entry_name(root: &Path, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(root).ok()?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        (!name.is_empty()).then_some(name)
    }
}
