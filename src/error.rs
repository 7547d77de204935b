/// Error types shared by the gallery state and its providers
use thiserror::Error;

/// Errors surfaced to the gallery view.
///
/// `Clone` so an error can ride inside an iced `Message`. Sources are
/// flattened to strings at the boundary where they occur.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// The listing fetch failed (filesystem, network, or a malformed response)
    #[error("asset provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A listing fetch is already running; its result will land on its own
    #[error("a listing fetch is already in progress")]
    FetchInProgress,

    /// Saving an asset to the download directory failed
    #[error("download failed: {0}")]
    Download(String),
}

impl GalleryError {
    pub fn provider(err: impl std::fmt::Display) -> Self {
        Self::ProviderUnavailable(err.to_string())
    }

    pub fn download(err: impl std::fmt::Display) -> Self {
        Self::Download(err.to_string())
    }
}

pub type GalleryResult<T> = Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message() {
        let err = GalleryError::provider("Unable to scan directory");
        assert_eq!(
            err.to_string(),
            "asset provider unavailable: Unable to scan directory"
        );
    }
}
