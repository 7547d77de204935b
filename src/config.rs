//! Gallery configuration.
//!
//! Loaded from a TOML file (default: `<config dir>/wallpaper-gallery/config.toml`)
//! and then overridden by `GALLERY_*` environment variables:
//!
//! | Variable                    | Effect                                   |
//! |-----------------------------|------------------------------------------|
//! | `GALLERY_DIR`               | local wallpaper folder                   |
//! | `GALLERY_BASE_URL`          | prefix for local retrieval URLs          |
//! | `GALLERY_REMOTE_URL`        | use a remote listing instead of a folder |
//! | `GALLERY_PAGE_SIZE`         | images per page                          |
//! | `GALLERY_CACHE_TTL_SECS`    | listing cache lifetime                   |
//! | `GALLERY_HTTP_TIMEOUT_SECS` | remote request timeout                   |
//! | `GALLERY_DOWNLOAD_DIR`      | where "Save" copies images               |

use std::env;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{GalleryError, GalleryResult};
use crate::provider::remote::http_client;
use crate::provider::{AssetProvider, LocalDirectoryProvider, RemoteListingProvider};

/// Page size used for local folders when none is configured
pub const DEFAULT_LOCAL_PAGE_SIZE: usize = 50;
/// Page size used for remote listings when none is configured
pub const DEFAULT_REMOTE_PAGE_SIZE: usize = 12;
/// One hour
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOCAL_DIR: &str = "wallpapers";

const APP_DIR: &str = "wallpaper-gallery";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the listing comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A folder on disk
    Local {
        dir: PathBuf,
        /// Prefix joined with each filename; defaults to `dir`. Must be an
        /// http(s) URL or an absolute path.
        #[serde(default)]
        base_url: Option<String>,
    },
    /// A repository contents listing over HTTP
    Remote { url: String },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Local {
            dir: PathBuf::from(DEFAULT_LOCAL_DIR),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub source: SourceConfig,
    /// Images per page; falls back to a per-source default
    pub page_size: Option<usize>,
    pub cache_ttl_secs: u64,
    pub http_timeout_secs: u64,
    pub download_dir: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            page_size: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            download_dir: None,
        }
    }
}

impl GalleryConfig {
    /// Load from the default file if it exists, apply env overrides, validate.
    pub fn load() -> ConfigResult<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            _ => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/wallpaper-gallery/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `GALLERY_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("GALLERY_REMOTE_URL") {
            self.source = SourceConfig::Remote { url };
        } else if let Some(dir) = lookup("GALLERY_DIR") {
            let base_url = match &self.source {
                SourceConfig::Local { base_url, .. } => base_url.clone(),
                SourceConfig::Remote { .. } => None,
            };
            self.source = SourceConfig::Local {
                dir: PathBuf::from(dir),
                base_url,
            };
        }

        if let Some(base) = lookup("GALLERY_BASE_URL") {
            if let SourceConfig::Local { base_url, .. } = &mut self.source {
                *base_url = Some(base);
            }
        }

        if let Some(value) = lookup("GALLERY_PAGE_SIZE") {
            self.page_size = Some(parse_number("GALLERY_PAGE_SIZE", &value)?);
        }
        if let Some(value) = lookup("GALLERY_CACHE_TTL_SECS") {
            self.cache_ttl_secs = parse_number("GALLERY_CACHE_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("GALLERY_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_number("GALLERY_HTTP_TIMEOUT_SECS", &value)?;
        }
        if let Some(dir) = lookup("GALLERY_DOWNLOAD_DIR") {
            self.download_dir = Some(PathBuf::from(dir));
        }

        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match &self.source {
            SourceConfig::Local { dir, base_url } => {
                if dir.as_os_str().is_empty() {
                    return Err(ConfigError::Validation(
                        "local source dir cannot be empty".to_string(),
                    ));
                }
                // A relative prefix would resolve against the working directory
                if let Some(base) = base_url {
                    let is_http = base.starts_with("http://") || base.starts_with("https://");
                    if !is_http && !Path::new(base).is_absolute() {
                        return Err(ConfigError::Validation(format!(
                            "base_url must be an http(s) URL or an absolute path, got: {}",
                            base
                        )));
                    }
                }
            }
            SourceConfig::Remote { url } => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::Validation(format!(
                        "remote url must start with http:// or https://, got: {}",
                        url
                    )));
                }
            }
        }

        if self.page_size == Some(0) {
            return Err(ConfigError::Validation(
                "page_size must be greater than 0".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "cache_ttl_secs must be greater than 0".to_string(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Configured page size, or the default for the source kind
    pub fn effective_page_size(&self) -> NonZeroUsize {
        let fallback = match self.source {
            SourceConfig::Local { .. } => DEFAULT_LOCAL_PAGE_SIZE,
            SourceConfig::Remote { .. } => DEFAULT_REMOTE_PAGE_SIZE,
        };
        self.page_size
            .and_then(NonZeroUsize::new)
            .or_else(|| NonZeroUsize::new(fallback))
            .unwrap_or(NonZeroUsize::MIN)
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        let secs = i64::try_from(self.cache_ttl_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        chrono::Duration::seconds(secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Where saved images go: configured dir, else the user download dir, else `.`
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// HTTP client for image tiles and saves, bounded by `http_timeout_secs`
    pub fn http_client(&self) -> GalleryResult<reqwest::Client> {
        http_client(self.http_timeout()).map_err(GalleryError::provider)
    }

    /// Build the provider this config describes
    pub fn build_provider(&self) -> GalleryResult<Arc<dyn AssetProvider>> {
        Ok(match &self.source {
            SourceConfig::Local { dir, base_url } => {
                let provider = LocalDirectoryProvider::new(dir);
                match base_url {
                    Some(base) => Arc::new(provider.with_base_url(base.clone())),
                    None => Arc::new(provider),
                }
            }
            SourceConfig::Remote { url } => {
                Arc::new(RemoteListingProvider::new(url.clone(), self.http_timeout())?)
            }
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{} must be a number, got: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GalleryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_page_size().get(), 50);
        assert_eq!(config.cache_ttl(), chrono::Duration::hours(1));
        assert_eq!(
            config.source,
            SourceConfig::Local {
                dir: PathBuf::from("wallpapers"),
                base_url: None
            }
        );
    }

    #[test]
    fn test_remote_defaults_to_twelve_per_page() {
        let mut config = GalleryConfig::default();
        config
            .apply_env(env_of(&[(
                "GALLERY_REMOTE_URL",
                "https://api.github.com/repos/owner/walls/contents/images",
            )]))
            .unwrap();

        assert!(matches!(config.source, SourceConfig::Remote { .. }));
        assert_eq!(config.effective_page_size().get(), 12);
    }

    #[test]
    fn test_parse_toml() {
        let config = GalleryConfig::from_toml(
            r#"
            page_size = 24
            cache_ttl_secs = 600

            [source]
            kind = "local"
            dir = "/srv/wallpapers"
            base_url = "https://cdn.example.com/wallpapers/"
            "#,
        )
        .unwrap();

        assert_eq!(config.effective_page_size().get(), 24);
        assert_eq!(config.cache_ttl_secs, 600);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(
            config.source,
            SourceConfig::Local {
                dir: PathBuf::from("/srv/wallpapers"),
                base_url: Some("https://cdn.example.com/wallpapers/".to_string()),
            }
        );
    }

    #[test]
    fn test_invalid_toml() {
        let result = GalleryConfig::from_toml("page_size = \"many\"");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GalleryConfig::default();
        config
            .apply_env(env_of(&[
                ("GALLERY_DIR", "/data/walls"),
                ("GALLERY_BASE_URL", "/srv/www/wallpapers/"),
                ("GALLERY_PAGE_SIZE", "30"),
                ("GALLERY_CACHE_TTL_SECS", "120"),
                ("GALLERY_DOWNLOAD_DIR", "/tmp/saved"),
            ]))
            .unwrap();

        assert_eq!(
            config.source,
            SourceConfig::Local {
                dir: PathBuf::from("/data/walls"),
                base_url: Some("/srv/www/wallpapers/".to_string()),
            }
        );
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_page_size().get(), 30);
        assert_eq!(config.cache_ttl(), chrono::Duration::minutes(2));
        assert_eq!(config.download_dir(), PathBuf::from("/tmp/saved"));
    }

    #[test]
    fn test_env_rejects_non_numbers() {
        let mut config = GalleryConfig::default();
        let result = config.apply_env(env_of(&[("GALLERY_PAGE_SIZE", "lots")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = GalleryConfig::default();
        config.page_size = Some(0);
        assert!(config.validate().is_err());

        let mut config = GalleryConfig::default();
        config.cache_ttl_secs = 0;
        assert!(config.validate().is_err());

        let config = GalleryConfig {
            source: SourceConfig::Remote {
                url: "ftp://example.com/list".to_string(),
            },
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_base_url_is_rejected() {
        let mut config = GalleryConfig::default();
        config
            .apply_env(env_of(&[
                ("GALLERY_DIR", "/data/walls"),
                ("GALLERY_BASE_URL", "wallpapers/"),
            ]))
            .unwrap();

        let result = config.validate();

        match result {
            Err(ConfigError::Validation(message)) => assert!(message.contains("wallpapers/")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_build_local_provider() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("peak.png"), b"x").unwrap();

        let config = GalleryConfig {
            source: SourceConfig::Local {
                dir: dir.path().to_path_buf(),
                base_url: Some("http://localhost:8080/wallpapers".to_string()),
            },
            ..GalleryConfig::default()
        };

        assert!(config.validate().is_ok());
        let provider = config.build_provider().unwrap();
        let assets = provider.list_images().await.unwrap();
        assert_eq!(
            assets[0].retrieval_url,
            "http://localhost:8080/wallpapers/peak.png"
        );
    }
}
