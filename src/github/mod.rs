// GitHub API module.
// Provides the cache-aware client and types for the REST API.

pub mod client;
pub mod endpoints;
pub mod link;
pub mod transport;
pub mod types;

pub use client::{ApiClient, CacheSpec, Page};
pub use endpoints::IssueState;
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::*;
