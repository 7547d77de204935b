/// Remote repository listing provider
///
/// Reads a GitHub-contents-style listing: a JSON array of entries with a
/// `name`, a `download_url` and a `type`. Only file entries with a
/// download URL become assets.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::AssetProvider;
use crate::error::{GalleryError, GalleryResult};
use crate::state::data::AssetDescriptor;

const USER_AGENT: &str = concat!("wallpaper-gallery/", env!("CARGO_PKG_VERSION"));

/// One entry of the listing response
#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl ListingEntry {
    fn into_descriptor(self) -> Option<AssetDescriptor> {
        if matches!(self.kind.as_deref(), Some(kind) if kind != "file") {
            return None;
        }
        let url = self.download_url?;
        Some(AssetDescriptor::new(self.name, url))
    }
}

#[derive(Debug, Clone)]
pub struct RemoteListingProvider {
    client: Client,
    listing_url: String,
}

/// HTTP client used for every remote request: listings, image tiles and saves
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

impl RemoteListingProvider {
    pub fn new(listing_url: impl Into<String>, timeout: Duration) -> GalleryResult<Self> {
        let client = http_client(timeout).map_err(GalleryError::provider)?;

        Ok(Self {
            client,
            listing_url: listing_url.into(),
        })
    }
}

#[async_trait]
impl AssetProvider for RemoteListingProvider {
    async fn list_images(&self) -> GalleryResult<Vec<AssetDescriptor>> {
        debug!("Requesting listing from {}", self.listing_url);

        let response = self
            .client
            .get(&self.listing_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("Listing request failed: {}", e);
                GalleryError::provider(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Listing request returned {}", status);
            return Err(GalleryError::provider(format!(
                "listing request returned {}",
                status
            )));
        }

        let body = response.text().await.map_err(GalleryError::provider)?;
        let entries: Vec<ListingEntry> = serde_json::from_str(&body)
            .map_err(|e| GalleryError::provider(format!("malformed listing: {}", e)))?;

        let total = entries.len();
        let assets: Vec<AssetDescriptor> = entries
            .into_iter()
            .filter_map(ListingEntry::into_descriptor)
            .collect();

        info!("Remote listing returned {} entries, {} files", total, assets.len());
        Ok(assets)
    }

    fn describe(&self) -> String {
        format!("remote {}", self.listing_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> RemoteListingProvider {
        RemoteListingProvider::new(
            format!("{}/repos/owner/walls/contents/images", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_parses_file_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/walls/contents/images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "name": "aurora.jpg",
                    "type": "file",
                    "download_url": "https://raw.example.com/aurora.jpg"
                },
                {
                    "name": "old",
                    "type": "dir",
                    "download_url": null
                },
                {
                    "name": "dunes.png",
                    "type": "file",
                    "download_url": "https://raw.example.com/dunes.png"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let assets = provider_for(&server).list_images().await.unwrap();

        assert_eq!(
            assets,
            vec![
                AssetDescriptor::new("aurora.jpg", "https://raw.example.com/aurora.jpg"),
                AssetDescriptor::new("dunes.png", "https://raw.example.com/dunes.png"),
            ]
        );
    }

    #[tokio::test]
    async fn test_http_error_is_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let result = provider_for(&server).list_images().await;

        match result {
            Err(GalleryError::ProviderUnavailable(msg)) => assert!(msg.contains("403")),
            other => panic!("expected ProviderUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let result = provider_for(&server).list_images().await;

        assert!(matches!(result, Err(GalleryError::ProviderUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_provider_unavailable() {
        let provider =
            RemoteListingProvider::new("http://127.0.0.1:9/listing", Duration::from_secs(2)).unwrap();

        let result = provider.list_images().await;

        assert!(matches!(result, Err(GalleryError::ProviderUnavailable(_))));
    }
}
