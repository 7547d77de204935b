/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the asset providers, the controller, and the UI layer.

use std::sync::Arc;

/// Represents a single image in a listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetDescriptor {
    /// Listing name (e.g., "sunset_01.jpg"), unique within a listing
    pub name: String,
    /// Where the image bytes live: a filesystem path or an http(s) URL
    pub retrieval_url: String,
}

impl AssetDescriptor {
    pub fn new(name: impl Into<String>, retrieval_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            retrieval_url: retrieval_url.into(),
        }
    }

    /// True when the image must be fetched over HTTP rather than read from disk
    pub fn is_remote(&self) -> bool {
        self.retrieval_url.starts_with("http://") || self.retrieval_url.starts_with("https://")
    }
}

/// An ordered, immutable, cheaply shared listing.
///
/// After a fresh fetch the order is the shuffled display order for the session.
pub type AssetListing = Arc<[AssetDescriptor]>;

/// Build an empty listing
pub fn empty_listing() -> AssetListing {
    Arc::from(Vec::new())
}

/// Pagination metadata handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: usize,
    pub total_pages: usize,
    /// "Previous" is enabled
    pub has_previous: bool,
    /// "Next" is enabled
    pub has_next: bool,
}
