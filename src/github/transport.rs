// Network transport for the GitHub API.
// A small trait over "GET this URL" so the client can be driven without a network.

use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue, LINK, USER_AGENT},
};
use url::Url;

use crate::error::Result;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Raw response: status, body text and the `Link` header if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub link: Option<String>,
}

/// Performs a single GET request.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &Url) -> Result<RawResponse>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("issue-lifespan"));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status().as_u16();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(RawResponse { status, body, link })
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::Value;

    use super::*;
    use crate::error::LifespanError;

    /// Serves canned responses by exact URL and records every request.
    #[derive(Default)]
    pub struct MockTransport {
        responses: HashMap<String, RawResponse>,
        requests: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a 200 JSON response with an optional next-page link.
        pub fn respond(&mut self, url: &str, body: Value, next: Option<&str>) -> &mut Self {
            let link = next.map(|n| format!(r#"<{}>; rel="next""#, n));
            self.respond_raw(
                url,
                RawResponse {
                    status: 200,
                    body: body.to_string(),
                    link,
                },
            )
        }

        pub fn respond_raw(&mut self, url: &str, response: RawResponse) -> &mut Self {
            self.responses.insert(url.to_string(), response);
            self
        }

        /// Every URL requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        async fn get(&self, url: &Url) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| LifespanError::Other(format!("connection refused: {}", url)))
        }
    }
}
