// issue-lifespan library.
// Average time-to-close of GitHub issues per repository, with a disk-cached API client.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod lifespan;

pub use error::{LifespanError, Result};
