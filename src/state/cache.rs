/// Time-bounded cache of the asset listing
///
/// Holds the last successful, filtered, shuffled listing together with
/// the time it was fetched. While the entry is younger than the TTL it is
/// served as-is (same allocation, same order); once it expires the
/// provider is asked again.
///
/// A fetch that succeeds with no images leaves no entry, but still counts
/// as a check: the provider is not asked again until the TTL has passed
/// since that check.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::data::{empty_listing, AssetDescriptor, AssetListing};
use super::shuffle::shuffle;
use crate::error::{GalleryError, GalleryResult};
use crate::provider::{retain_recognized, AssetProvider};

/// A populated cache slot. Listing and timestamp only ever exist together.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub listing: AssetListing,
    pub fetched_at: DateTime<Utc>,
}

pub struct ListingCache {
    entry: Option<CacheEntry>,
    /// Completion time of the last successful fetch, empty or not
    checked_at: Option<DateTime<Utc>>,
    ttl: Duration,
    fetch_in_flight: bool,
    rng: StdRng,
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_rng(ttl, StdRng::from_entropy())
    }

    /// Deterministic shuffles, for tests
    pub fn with_seed(ttl: Duration, seed: u64) -> Self {
        Self::with_rng(ttl, StdRng::seed_from_u64(seed))
    }

    fn with_rng(ttl: Duration, rng: StdRng) -> Self {
        Self {
            entry: None,
            checked_at: None,
            ttl,
            fetch_in_flight: false,
            rng,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_in_flight
    }

    pub fn checked_at(&self) -> Option<DateTime<Utc>> {
        self.checked_at
    }

    /// True while the last successful fetch is within the TTL at `now`,
    /// whether or not it produced an entry
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.checked_at
            .is_some_and(|checked_at| now - checked_at < self.ttl)
    }

    /// The cached listing if it is still within the TTL at `now`
    pub fn fresh_at(&self, now: DateTime<Utc>) -> Option<AssetListing> {
        self.entry
            .as_ref()
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| Arc::clone(&entry.listing))
    }

    /// Return the listing, fetching from `provider` on a miss or expiry
    pub async fn get(&mut self, provider: &dyn AssetProvider) -> GalleryResult<AssetListing> {
        self.get_at(provider, Utc::now()).await
    }

    /// `get` with an explicit clock.
    ///
    /// Fails with `FetchInProgress` while a `begin_fetch` is outstanding;
    /// the provider is never called twice for the same miss.
    pub async fn get_at(
        &mut self,
        provider: &dyn AssetProvider,
        now: DateTime<Utc>,
    ) -> GalleryResult<AssetListing> {
        if self.fetch_in_flight {
            debug!("Listing fetch already running, not starting another");
            return Err(GalleryError::FetchInProgress);
        }

        if self.is_current(now) {
            let listing = self.fresh_at(now).unwrap_or_else(empty_listing);
            debug!("Listing cache hit ({} assets)", listing.len());
            return Ok(listing);
        }

        self.fetch_in_flight = true;
        let fetched = provider.list_images().await;
        self.finish_fetch(fetched, now)
    }

    /// Start a background fetch unless the last check is within the TTL or one is already running.
    ///
    /// Returns true when the caller should now invoke the provider and hand the
    /// outcome to `finish_fetch`.
    pub fn begin_fetch(&mut self, now: DateTime<Utc>) -> bool {
        if self.fetch_in_flight || self.is_current(now) {
            return false;
        }
        self.fetch_in_flight = true;
        true
    }

    /// Apply the outcome of a provider call.
    ///
    /// Success filters, shuffles once, and replaces the entry wholesale.
    /// Failure leaves the entry untouched and passes the error on.
    pub fn finish_fetch(
        &mut self,
        fetched: GalleryResult<Vec<AssetDescriptor>>,
        now: DateTime<Utc>,
    ) -> GalleryResult<AssetListing> {
        self.fetch_in_flight = false;

        let mut assets = match fetched {
            Ok(assets) => assets,
            Err(err) => {
                warn!("Listing fetch failed: {}", err);
                return Err(err);
            }
        };

        self.checked_at = Some(now);
        let raw_count = assets.len();
        retain_recognized(&mut assets);

        if assets.is_empty() {
            info!("Listing fetch returned no images ({} raw entries)", raw_count);
            self.entry = None;
            return Ok(empty_listing());
        }

        shuffle(&mut assets, &mut self.rng);
        let listing: AssetListing = Arc::from(assets);

        info!(
            "Cached {} images ({} raw entries), valid for {}s",
            listing.len(),
            raw_count,
            self.ttl.num_seconds()
        );

        self.entry = Some(CacheEntry {
            listing: Arc::clone(&listing),
            fetched_at: now,
        });

        Ok(listing)
    }
}

impl std::fmt::Debug for ListingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCache")
            .field("entry", &self.entry.as_ref().map(|e| (e.listing.len(), e.fetched_at)))
            .field("checked_at", &self.checked_at)
            .field("ttl", &self.ttl)
            .field("fetch_in_flight", &self.fetch_in_flight)
            .finish()
    }
}
