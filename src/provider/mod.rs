/// Asset providers
///
/// This module answers "list images" for the gallery:
/// - Scanning a local folder of wallpapers (local.rs)
/// - Calling a remote repository listing API (remote.rs)
///
/// Both variants sit behind the same `AssetProvider` trait, so the
/// controller never knows which one it is talking to.

pub mod local;
pub mod remote;

use async_trait::async_trait;

use crate::error::GalleryResult;
use crate::state::data::AssetDescriptor;

pub use local::LocalDirectoryProvider;
pub use remote::RemoteListingProvider;

/// Filename suffixes that count as displayable images.
///
/// Matching is an exact, case-sensitive suffix test: `PHOTO.JPG` is not listed.
pub const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Anything that can produce a listing of image assets
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// Fetch the raw listing. Failure must be an error, never an empty `Ok`.
    async fn list_images(&self) -> GalleryResult<Vec<AssetDescriptor>>;

    /// Short label for logs and the window header
    fn describe(&self) -> String;
}

/// Check a listing name against `IMAGE_EXTENSIONS`
pub fn is_recognized_image(name: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Drop everything that is not a recognized image
pub fn retain_recognized(assets: &mut Vec<AssetDescriptor>) {
    assets.retain(|asset| !asset.name.is_empty() && is_recognized_image(&asset.name));
}

#[cfg(test)]
pub mod testing {
    //! In-memory provider for controller and cache tests

    use super::*;
    use crate::error::GalleryError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves a scripted sequence of responses and counts calls.
    /// Once the script runs out, the last response repeats.
    pub struct ScriptedProvider {
        responses: Mutex<Vec<GalleryResult<Vec<AssetDescriptor>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn new(responses: Vec<GalleryResult<Vec<AssetDescriptor>>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        /// Always returns the same listing
        pub fn serving(assets: Vec<AssetDescriptor>) -> Self {
            Self::new(vec![Ok(assets)])
        }

        pub fn failing() -> Self {
            Self::new(vec![Err(GalleryError::provider("connection refused"))])
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssetProvider for ScriptedProvider {
        async fn list_images(&self) -> GalleryResult<Vec<AssetDescriptor>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            }
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    /// `count` assets named `wall_000.jpg`, `wall_001.jpg`, ...
    pub fn numbered_assets(count: usize) -> Vec<AssetDescriptor> {
        (0..count)
            .map(|i| {
                let name = format!("wall_{i:03}.jpg");
                AssetDescriptor::new(name.clone(), format!("wallpapers/{name}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_extensions() {
        assert!(is_recognized_image("beach.jpg"));
        assert!(is_recognized_image("beach.jpeg"));
        assert!(is_recognized_image("beach.png"));
        assert!(!is_recognized_image("beach.gif"));
        assert!(!is_recognized_image("notes.txt"));
        assert!(!is_recognized_image("jpg"));
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        assert!(!is_recognized_image("PHOTO.JPG"));
        assert!(!is_recognized_image("photo.Png"));
    }

    #[test]
    fn test_retain_recognized() {
        let mut assets = vec![
            AssetDescriptor::new("a.jpg", "x/a.jpg"),
            AssetDescriptor::new("README.md", "x/README.md"),
            AssetDescriptor::new("b.png", "x/b.png"),
            AssetDescriptor::new("C.JPEG", "x/C.JPEG"),
            AssetDescriptor::new("", "x/"),
        ];

        retain_recognized(&mut assets);

        let names: Vec<&str> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }
}
