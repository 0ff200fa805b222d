// Issue lifespan module.
// Turns configured repository identifiers into per-repository mean lifespans.

pub mod aggregate;
pub mod format;
pub mod pages;
pub mod target;

pub use aggregate::{Aggregator, RepoLifespan, average_lifespan};
pub use format::format_duration;
pub use pages::Pages;
pub use target::{Target, parse_repo_list};
