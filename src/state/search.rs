/// Case-insensitive name search over a listing
use std::sync::Arc;

use super::data::{AssetDescriptor, AssetListing};

/// Project `listing` onto the descriptors whose name matches `query`.
///
/// An empty query hands back the same listing (same allocation, same order).
/// Otherwise relative order is preserved, so filtering twice with the same
/// query is the same as filtering once.
pub fn filter(listing: &AssetListing, query: &str) -> AssetListing {
    if query.is_empty() {
        return Arc::clone(listing);
    }

    let needle = query.to_lowercase();
    let matched: Vec<AssetDescriptor> = listing
        .iter()
        .filter(|asset| asset.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    Arc::from(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(names: &[&str]) -> AssetListing {
        names
            .iter()
            .map(|name| AssetDescriptor::new(*name, format!("wallpapers/{name}")))
            .collect::<Vec<_>>()
            .into()
    }

    fn names(listing: &AssetListing) -> Vec<&str> {
        listing.iter().map(|asset| asset.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_same_listing() {
        let full = listing(&["b.jpg", "a.png", "c.jpeg"]);
        let filtered = filter(&full, "");

        assert!(Arc::ptr_eq(&full, &filtered));
        assert_eq!(names(&filtered), vec!["b.jpg", "a.png", "c.jpeg"]);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let full = listing(&["Sunset_Beach.jpg", "forest.png", "SUNSET2.jpeg", "dawn.jpg"]);
        let filtered = filter(&full, "sunSET");

        assert_eq!(names(&filtered), vec!["Sunset_Beach.jpg", "SUNSET2.jpeg"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let full = listing(&["city-night.png", "night_sky.jpg", "noon.jpg", "Nightfall.jpeg"]);

        for query in ["", "night", "NIGHT", "jpg", "zzz"] {
            let once = filter(&full, query);
            let twice = filter(&once, query);
            assert_eq!(&*once, &*twice, "query={query}");
        }
    }

    #[test]
    fn test_no_matches() {
        let full = listing(&["forest.png", "dawn.jpg"]);
        assert!(filter(&full, "sunset").is_empty());
    }
}
