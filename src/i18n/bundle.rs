//! Bundle sources: where raw dictionary content comes from.
//!
//! The loader only needs to fetch one bundle per locale; whether that is a
//! file shipped with the build, a remote content service, or a map held in
//! memory is decided by whoever constructs the loader.

use crate::error::DictionaryLoadError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// Capability to fetch the raw bundle for a locale.
#[async_trait]
pub trait BundleSource: Send + Sync {
    /// Fetch the raw bundle content for `locale`.
    async fn fetch_bundle(&self, locale: &str) -> Result<String, DictionaryLoadError>;

    /// Short description used in logs.
    fn describe(&self) -> String;
}

/// Reads `{root}/{locale}.json` from the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryBundleSource {
    root: PathBuf,
}

impl DirectoryBundleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bundle_path(&self, locale: &str) -> PathBuf {
        self.root.join(format!("{}.json", locale))
    }
}

#[async_trait]
impl BundleSource for DirectoryBundleSource {
    async fn fetch_bundle(&self, locale: &str) -> Result<String, DictionaryLoadError> {
        if locale.is_empty() || locale.contains(['/', '\\', '.']) {
            return Err(DictionaryLoadError::NotFound {
                locale: locale.to_string(),
            });
        }

        let path = self.bundle_path(locale);
        debug!("Reading dictionary bundle from {}", path.display());

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DictionaryLoadError::NotFound {
                    locale: locale.to_string(),
                },
                _ => DictionaryLoadError::Fetch {
                    locale: locale.to_string(),
                    message: format!("{}: {}", path.display(), e),
                },
            })
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Fetches `{base_url}/{locale}.json` from a remote content service.
#[derive(Debug, Clone)]
pub struct HttpBundleSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBundleSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn bundle_url(&self, locale: &str) -> String {
        format!("{}/{}.json", self.base_url, locale)
    }
}

#[async_trait]
impl BundleSource for HttpBundleSource {
    async fn fetch_bundle(&self, locale: &str) -> Result<String, DictionaryLoadError> {
        let url = self.bundle_url(locale);
        debug!("Fetching dictionary bundle from {}", url);

        let fetch_error = |message: String| DictionaryLoadError::Fetch {
            locale: locale.to_string(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DictionaryLoadError::NotFound {
                locale: locale.to_string(),
            });
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(fetch_error(format!("{} returned {}", url, status)));
        }
        if !status.is_success() {
            return Err(DictionaryLoadError::Rejected {
                locale: locale.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| fetch_error(format!("failed to read body from {}: {}", url, e)))
    }

    fn describe(&self) -> String {
        format!("remote {}", self.base_url)
    }
}

/// Bundles held in memory, e.g. compiled into the binary with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct StaticBundleSource {
    bundles: HashMap<String, String>,
}

impl StaticBundleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the bundle for a locale.
    pub fn with_bundle(mut self, locale: impl Into<String>, content: impl Into<String>) -> Self {
        self.bundles.insert(locale.into(), content.into());
        self
    }
}

#[async_trait]
impl BundleSource for StaticBundleSource {
    async fn fetch_bundle(&self, locale: &str) -> Result<String, DictionaryLoadError> {
        self.bundles
            .get(locale)
            .cloned()
            .ok_or_else(|| DictionaryLoadError::NotFound {
                locale: locale.to_string(),
            })
    }

    fn describe(&self) -> String {
        format!("{} in-memory bundles", self.bundles.len())
    }
}
