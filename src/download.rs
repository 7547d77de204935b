/// Saving a gallery image to the download folder
///
/// Local assets are copied, remote ones fetched over HTTP. The file keeps
/// its listing name.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::info;

use crate::error::{GalleryError, GalleryResult};
use crate::state::data::AssetDescriptor;

/// Copy or download `asset` into `dest_dir`, returning the written path
pub async fn save_asset(
    client: &Client,
    asset: &AssetDescriptor,
    dest_dir: &Path,
) -> GalleryResult<PathBuf> {
    // Listing names are plain filenames; never let one escape dest_dir
    let file_name = Path::new(&asset.name)
        .file_name()
        .ok_or_else(|| GalleryError::download(format!("invalid file name: {}", asset.name)))?;

    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| GalleryError::download(format!("{}: {}", dest_dir.display(), e)))?;

    let target = dest_dir.join(file_name);

    if asset.is_remote() {
        let bytes = fetch_bytes(client, &asset.retrieval_url)
            .await
            .map_err(GalleryError::download)?;
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| GalleryError::download(format!("{}: {}", target.display(), e)))?;
    } else {
        tokio::fs::copy(&asset.retrieval_url, &target)
            .await
            .map_err(|e| GalleryError::download(format!("{}: {}", asset.retrieval_url, e)))?;
    }

    info!("Saved {} to {}", asset.name, target.display());
    Ok(target)
}

/// GET `url` and return the body
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("{}: {}", url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("{}: HTTP {}", url, status));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("{}: {}", url, e))?;
    Ok(bytes.to_vec())
}
