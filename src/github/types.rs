// GitHub API response types.
// Defines structs for deserializing issue and repository listings.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

/// GitHub issue (only the fields lifespans need).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Time the issue stayed open, up to `now` if it is still open.
    pub fn lifespan(&self, now: DateTime<Utc>) -> TimeDelta {
        self.closed_at.unwrap_or(now) - self.created_at
    }

    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// GitHub repository (as listed under an organization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub fork: bool,
}

/// Error object returned by the API in place of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub documentation_url: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// A list endpoint's payload: either the items or an error object.
#[derive(Debug, Clone)]
pub enum Listing<T> {
    Items(Vec<T>),
    Error(ApiError),
}

impl<T: DeserializeOwned> Listing<T> {
    /// Decode a response body.
    ///
    /// Any object that is not a list is reported as an error; objects
    /// without a `message` keep their raw JSON as the message.
    pub fn decode(data: Value) -> Result<Self> {
        match data {
            Value::Array(_) => Ok(Listing::Items(serde_json::from_value(data)?)),
            other => Ok(Listing::Error(
                serde_json::from_value::<ApiError>(other.clone()).unwrap_or_else(|_| ApiError {
                    message: other.to_string(),
                    documentation_url: None,
                }),
            )),
        }
    }

    pub fn into_result(self) -> std::result::Result<Vec<T>, ApiError> {
        match self {
            Listing::Items(items) => Ok(items),
            Listing::Error(err) => Err(err),
        }
    }
}
