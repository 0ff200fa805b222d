// Environment-driven configuration.
// Reads API credentials, cache lifetimes and the API host.

use std::time::Duration;

use crate::error::{LifespanError, Result};

/// Default GitHub REST API host.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default TTL for contributor email lookups: one week.
pub const DEFAULT_EMAIL_CACHE_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Default TTL for repository and issue listings: one hour.
pub const DEFAULT_REPOS_CACHE_AGE: Duration = Duration::from_secs(60 * 60);

/// OAuth application credentials appended to every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API host, without a trailing slash.
    pub api_base: String,
    /// Used only when both id and secret are set.
    pub credentials: Option<Credentials>,
    /// TTL for contributor email lookups.
    pub email_cache_age: Duration,
    /// TTL for repository and issue listings.
    pub repos_cache_age: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            credentials: None,
            email_cache_age: DEFAULT_EMAIL_CACHE_AGE,
            repos_cache_age: DEFAULT_REPOS_CACHE_AGE,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Each setting is read from its bare name first (`CLIENT_ID`), then from
    /// the `GITHUB_`-prefixed spelling (`GITHUB_CLIENT_ID`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .or_else(|| lookup(&format!("GITHUB_{}", name)))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let credentials = match (get("CLIENT_ID"), get("CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(Credentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let api_base = get("API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            api_base,
            credentials,
            email_cache_age: parse_ttl("EMAIL_CACHE_AGE", get("EMAIL_CACHE_AGE"))?
                .unwrap_or(DEFAULT_EMAIL_CACHE_AGE),
            repos_cache_age: parse_ttl("REPOS_CACHE_AGE", get("REPOS_CACHE_AGE"))?
                .unwrap_or(DEFAULT_REPOS_CACHE_AGE),
        })
    }
}

fn parse_ttl(name: &str, value: Option<String>) -> Result<Option<Duration>> {
    value
        .map(|v| {
            v.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                LifespanError::Config(format!("{} must be a number of seconds, got {:?}", name, v))
            })
        })
        .transpose()
}
