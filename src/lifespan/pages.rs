// Lazy page sequence over a paginated listing.
// Each call fetches at most one page; the sequence ends on a page without a next link.

use std::time::Duration;

use serde_json::Value;

use crate::error::Result;
use crate::github::{ApiClient, CacheSpec, Transport};

/// Cursor over the pages of one listing.
pub struct Pages<'a, T> {
    client: &'a ApiClient<T>,
    start_url: String,
    params: Vec<(&'static str, &'static str)>,
    /// Cache namespace prefix and TTL; `None` disables caching.
    cache: Option<(String, Duration)>,
    next: Option<String>,
    page: u32,
}

impl<'a, T: Transport> Pages<'a, T> {
    pub fn new(
        client: &'a ApiClient<T>,
        start_url: impl Into<String>,
        params: Vec<(&'static str, &'static str)>,
        cache: Option<(String, Duration)>,
    ) -> Self {
        let start_url = start_url.into();
        Self {
            client,
            next: Some(start_url.clone()),
            start_url,
            params,
            cache,
            page: 0,
        }
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> u32 {
        self.page
    }

    /// Rewind to the first page.
    pub fn restart(&mut self) {
        self.next = Some(self.start_url.clone());
        self.page = 0;
    }

    /// Fetch the next page body, or `None` once the listing is exhausted.
    ///
    /// An error ends the sequence.
    pub async fn next_page(&mut self) -> Result<Option<Value>> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };
        self.page += 1;

        // Continuation URLs already carry every query parameter
        let params: &[(&str, &str)] = if self.page == 1 { self.params.as_slice() } else { &[] };
        let cache = self
            .cache
            .as_ref()
            .map(|(base, ttl)| CacheSpec::new(format!("{}_page_{}", base, self.page), *ttl));

        let page = self.client.get(&url, params, cache.as_ref()).await?;
        self.next = page.next;
        Ok(Some(page.data))
    }
}
