// Cache store for reading and writing cached pages.
// Handles JSON serialization, mtime-based TTL checks and atomic writes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A cached response page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPage {
    /// The parsed response body.
    pub data: Value,
    /// Next-page URL that came with the response.
    #[serde(default)]
    pub next: Option<String>,
}

/// Age of a file, measured from its modification time.
///
/// An mtime in the future counts as age zero.
pub fn file_age(path: &Path) -> io::Result<Duration> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO))
}

/// Check whether a cache file exists and is younger than `ttl`.
pub fn is_fresh(path: &Path, ttl: Duration) -> bool {
    match file_age(path) {
        Ok(age) => age < ttl,
        Err(_) => false,
    }
}

/// Read a cached page if it exists, is fresh and parses.
///
/// Malformed entries are treated the same as missing ones.
pub fn read_if_fresh(path: &Path, ttl: Duration) -> Option<CachedPage> {
    if !is_fresh(path, ttl) {
        tracing::debug!(path = %path.display(), "cache miss or stale entry");
        return None;
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "unreadable cache entry");
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(page) => {
            tracing::debug!(path = %path.display(), "cache hit");
            Some(page)
        }
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "malformed cache entry");
            None
        }
    }
}

/// Write a page to the cache as JSON.
pub fn write_page(path: &Path, page: &CachedPage) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(page)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Delete a cached directory and all contents.
pub fn delete_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}
