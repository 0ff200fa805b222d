// Cache path utilities.
// Maps a cache namespace and request URL to a file under the cache root.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_ROOT: &str = "cache";

/// Cache key for a fully-qualified request URL (hex SHA-256).
pub fn url_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Path to a namespace's directory.
pub fn namespace_dir(root: &Path, namespace: &str) -> PathBuf {
    root.join(sanitize_name(namespace))
}

/// Path to the cache entry for a request URL.
pub fn entry_path(root: &Path, namespace: &str, url: &str) -> PathBuf {
    namespace_dir(root, namespace).join(url_key(url))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    // "." and ".." would escape the namespace level
    match cleaned.as_str() {
        "" | "." | ".." => format!("_{}", cleaned),
        _ => cleaned,
    }
}
