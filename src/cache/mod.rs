// Cache module for local filesystem caching.
// Stores GitHub API responses keyed by request URL.

pub mod paths;
pub mod store;

pub use paths::{DEFAULT_CACHE_ROOT, entry_path, url_key};
pub use store::{CachedPage, delete_dir, read_if_fresh, write_page};
