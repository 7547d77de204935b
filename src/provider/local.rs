/// Local folder provider
///
/// Lists the files directly inside a wallpaper folder. Each filename is
/// joined onto a fixed base (the folder itself by default, or a mount
/// prefix such as `wallpapers/` when the files are served elsewhere).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::task;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::AssetProvider;
use crate::error::{GalleryError, GalleryResult};
use crate::state::data::AssetDescriptor;

#[derive(Debug, Clone)]
pub struct LocalDirectoryProvider {
    dir: PathBuf,
    base_url: String,
}

impl LocalDirectoryProvider {
    /// Serve images straight from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let base_url = dir.to_string_lossy().to_string();
        Self { dir, base_url }
    }

    /// Build retrieval URLs from `base_url` instead of the folder path
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn retrieval_url(&self, filename: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", base, filename)
        }
    }
}

#[async_trait]
impl AssetProvider for LocalDirectoryProvider {
    async fn list_images(&self) -> GalleryResult<Vec<AssetDescriptor>> {
        let dir = self.dir.clone();

        // Directory walking is blocking I/O
        let filenames = task::spawn_blocking(move || scan_filenames(&dir))
            .await
            .map_err(|e| GalleryError::provider(format!("Task join error: {}", e)))??;

        Ok(filenames
            .into_iter()
            .map(|name| {
                let url = self.retrieval_url(&name);
                AssetDescriptor::new(name, url)
            })
            .collect())
    }

    fn describe(&self) -> String {
        format!("folder {}", self.dir.display())
    }
}

/// Names of the regular files directly inside `dir`, sorted
fn scan_filenames(dir: &Path) -> GalleryResult<Vec<String>> {
    let metadata = std::fs::metadata(dir).map_err(|e| {
        GalleryError::provider(format!("Unable to scan directory {}: {}", dir.display(), e))
    })?;
    if !metadata.is_dir() {
        return Err(GalleryError::provider(format!(
            "Unable to scan directory {}: not a directory",
            dir.display()
        )));
    }

    let mut filenames = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(GalleryError::provider(format!(
                    "Unable to scan directory {}: {}",
                    dir.display(),
                    err
                )));
            }
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        filenames.push(entry.file_name().to_string_lossy().to_string());
    }

    debug!("Scanned {} files in {}", filenames.len(), dir.display());
    Ok(filenames)
}
