// Cache-aware GitHub API client.
// Builds request URLs, serves fresh responses from disk and follows Link headers.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::cache::{self, CachedPage};
use crate::config::Config;
use crate::error::Result;

use super::link::next_page_url;
use super::transport::{HttpTransport, RawResponse, Transport};

/// Where and for how long a response may be cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSpec {
    /// Subdirectory of the cache root.
    pub namespace: String,
    pub ttl: Duration,
}

impl CacheSpec {
    pub fn new(namespace: impl Into<String>, ttl: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            ttl,
        }
    }
}

/// One page of an API response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Parsed body, passed through without schema validation.
    pub data: Value,
    /// URL of the following page, if any.
    pub next: Option<String>,
}

impl From<CachedPage> for Page {
    fn from(cached: CachedPage) -> Self {
        Self {
            data: cached.data,
            next: cached.next,
        }
    }
}

/// GitHub API client with an on-disk response cache.
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    config: Config,
    cache_root: PathBuf,
}

impl ApiClient<HttpTransport> {
    /// Create a client that talks to the network.
    pub fn new(config: Config, cache_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_transport(
            HttpTransport::new()?,
            config,
            cache_root,
        ))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, config: Config, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            config,
            cache_root: cache_root.into(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for an API path such as `/orgs/acme/repos`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    /// Build the final request URL.
    ///
    /// `params` replace same-named parameters already in `path`. Credentials
    /// are added when configured and not already present. Parameters are
    /// sorted so equal sets always produce the same URL.
    pub fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(path)?;

        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .into_owned()
            .filter(|(key, _)| !params.iter().any(|(k, _)| *k == key.as_str()))
            .collect();
        pairs.extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        if let Some(creds) = &self.config.credentials {
            if !pairs.iter().any(|(key, _)| key == "client_id") {
                pairs.push(("client_id".to_string(), creds.client_id.clone()));
                pairs.push(("client_secret".to_string(), creds.client_secret.clone()));
            }
        }

        pairs.sort();

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// GET `path` with `params`, using the cache when `cache` is given.
    ///
    /// A fresh cache entry is returned without touching the network. A
    /// missing, stale or malformed entry falls through to a request whose
    /// result is written back. Non-2xx bodies are returned as data so the
    /// caller can inspect the API's error object.
    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        cache: Option<&CacheSpec>,
    ) -> Result<Page> {
        let url = self.build_url(path, params)?;

        let Some(cache) = cache else {
            return self.fetch(&url).await;
        };

        let entry = cache::entry_path(&self.cache_root, &cache.namespace, url.as_str());
        if let Some(cached) = cache::read_if_fresh(&entry, cache.ttl) {
            return Ok(cached.into());
        }

        let page = self.fetch(&url).await?;
        let cached = CachedPage {
            data: page.data,
            next: page.next,
        };
        if let Err(err) = cache::write_page(&entry, &cached) {
            tracing::warn!(path = %entry.display(), error = %err, "failed to write cache entry");
        }
        Ok(cached.into())
    }

    async fn fetch(&self, url: &Url) -> Result<Page> {
        tracing::info!("GET {}", redacted(url));
        let RawResponse { status, body, link } = self.transport.get(url).await?;

        if !(200..300).contains(&status) {
            tracing::debug!(status, url = %redacted(url), "non-success response");
        }

        let data: Value = serde_json::from_str(&body)?;
        let next = link.as_deref().and_then(next_page_url);
        Ok(Page { data, next })
    }
}

/// URL with the client secret masked, for logging.
pub fn redacted(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "client_secret") {
        return url.to_string();
    }

    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .map(|(key, value)| {
            if key == "client_secret" {
                (key, "REDACTED".to_string())
            } else {
                (key, value)
            }
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
