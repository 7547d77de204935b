/// Gallery state controller
///
/// Owns every piece of mutable gallery state: the listing cache, the
/// listing currently held for display, the active search query and the
/// page position. All user entry points recompute from held state; only
/// a cache miss goes back to the provider.
///
/// Two states, derived from the query:
/// - Browsing: empty query, the active listing is the full listing
/// - Filtered: non-empty query, the active listing is the matching subsequence

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::cache::ListingCache;
use super::data::{empty_listing, AssetDescriptor, AssetListing, PaginationView};
use super::pagination::Pagination;
use super::search;
use crate::error::{GalleryError, GalleryResult};
use crate::provider::AssetProvider;

/// Where the controller sends what should be on screen
pub trait Renderer {
    /// Show the tiles for the current page
    fn display_slice(&mut self, items: &[AssetDescriptor]);
    /// Redraw navigation controls
    fn update_pagination(&mut self, view: PaginationView);
    /// Nothing matches (or the source holds no images)
    fn show_empty_state(&mut self);
    /// The listing could not be fetched
    fn show_error_state(&mut self, error: &GalleryError);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryState {
    Browsing,
    Filtered,
}

pub struct GalleryController<R: Renderer> {
    provider: Arc<dyn AssetProvider>,
    cache: ListingCache,
    renderer: R,
    /// Full listing from the last successful fetch; None until one lands
    listing: Option<AssetListing>,
    /// `listing` filtered by `query`
    active: AssetListing,
    query: String,
    pagination: Pagination,
    last_error: Option<GalleryError>,
}

impl<R: Renderer> GalleryController<R> {
    pub fn new(
        provider: Arc<dyn AssetProvider>,
        cache: ListingCache,
        page_size: NonZeroUsize,
        renderer: R,
    ) -> Self {
        Self {
            provider,
            cache,
            renderer,
            listing: None,
            active: empty_listing(),
            query: String::new(),
            pagination: Pagination::new(page_size),
            last_error: None,
        }
    }

    // ========== Accessors ==========

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn state(&self) -> GalleryState {
        if self.query.is_empty() {
            GalleryState::Browsing
        } else {
            GalleryState::Filtered
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn active_listing(&self) -> &AssetListing {
        &self.active
    }

    /// Slice currently on screen
    pub fn current_slice(&self) -> &[AssetDescriptor] {
        self.pagination.slice(&self.active)
    }

    pub fn is_loading(&self) -> bool {
        self.cache.is_fetching()
    }

    /// Full listing from the last successful fetch, before any search
    pub fn listing(&self) -> Option<&AssetListing> {
        self.listing.as_ref()
    }

    pub fn has_listing(&self) -> bool {
        self.listing.is_some()
    }

    pub fn last_error(&self) -> Option<&GalleryError> {
        self.last_error.as_ref()
    }

    // ========== Fetching ==========

    /// Populate from the cache (fetching and shuffling on a miss) and show page 1
    pub async fn load_initial(&mut self) -> GalleryResult<()> {
        if self.cache.is_fetching() {
            // The outstanding fetch renders when `finish_refresh` lands
            debug!("Load requested while a fetch is running");
            return Ok(());
        }
        info!("Loading gallery from {}", self.provider.describe());
        let fetched = self.cache.get(self.provider.as_ref()).await;
        self.apply_listing(fetched)
    }

    /// Refetch only if the cached listing has expired. Returns whether a fetch ran.
    pub async fn refresh_if_stale(&mut self) -> GalleryResult<bool> {
        if self.cache.is_current(Utc::now()) {
            return Ok(false);
        }
        self.load_initial().await?;
        Ok(true)
    }

    /// Event-loop form of a fetch: returns the provider to call when a fetch
    /// should start now, or None when the cache is fresh or a fetch is running.
    pub fn begin_refresh(&mut self, now: DateTime<Utc>) -> Option<Arc<dyn AssetProvider>> {
        if self.cache.begin_fetch(now) {
            info!("Refreshing gallery from {}", self.provider.describe());
            Some(Arc::clone(&self.provider))
        } else {
            None
        }
    }

    /// Hand the provider's answer back after `begin_refresh`
    pub fn finish_refresh(
        &mut self,
        fetched: GalleryResult<Vec<AssetDescriptor>>,
        now: DateTime<Utc>,
    ) -> GalleryResult<()> {
        let result = self.cache.finish_fetch(fetched, now);
        self.apply_listing(result)
    }

    /// True when the last successful fetch is older than the TTL and the
    /// listing should be refetched in the background. An empty result counts
    /// as a fetch. A failed fetch is not retried automatically.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.listing.is_some()
            && self.last_error.is_none()
            && !self.cache.is_fetching()
            && !self.cache.is_current(now)
    }

    fn apply_listing(&mut self, fetched: GalleryResult<AssetListing>) -> GalleryResult<()> {
        match fetched {
            Ok(listing) => {
                self.last_error = None;
                self.listing = Some(listing);
                self.rederive();
                Ok(())
            }
            Err(err) => {
                // Held listing stays for continued browsing; the view shows the failure
                self.renderer.show_error_state(&err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ========== User entry points ==========

    /// Apply a search query (empty returns to browsing) and restart at page 1
    pub fn submit_search(&mut self, query: impl Into<String>) {
        self.query = query.into();
        debug!("Search submitted: {:?}", self.query);
        self.rederive();
    }

    /// Jump to page `page`; out-of-range pages are ignored
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let moved = self.pagination.jump_to(page);
        if moved {
            self.render();
        }
        moved
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.pagination.next();
        if moved {
            self.render();
        }
        moved
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.pagination.previous();
        if moved {
            self.render();
        }
        moved
    }

    // ========== Derivation ==========

    /// Recompute the active listing from the held listing and query, back to page 1
    fn rederive(&mut self) {
        self.active = match &self.listing {
            Some(listing) => search::filter(listing, &self.query),
            None => empty_listing(),
        };
        self.pagination.reset(self.active.len());
        self.render();
    }

    fn render(&mut self) {
        // Before the first listing lands there is nothing to draw; state
        // changes are kept and shown once it arrives
        if self.listing.is_none() {
            return;
        }

        let view = self.pagination.view();
        debug!(
            "Rendering page {}/{} ({} active assets)",
            view.current_page,
            view.total_pages,
            self.active.len()
        );

        if self.active.is_empty() {
            self.renderer.show_empty_state();
        } else {
            let slice = self.pagination.slice(&self.active);
            self.renderer.display_slice(slice);
        }
        self.renderer.update_pagination(view);
    }
}

impl<R: Renderer> std::fmt::Debug for GalleryController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryController")
            .field("provider", &self.provider.describe())
            .field("cache", &self.cache)
            .field("query", &self.query)
            .field("pagination", &self.pagination)
            .finish()
    }
}
