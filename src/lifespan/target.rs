// Repository identifiers.
// Parses `owner/name` and `owner/` (organization) entries from the input list.

use std::fmt;
use std::str::FromStr;

use crate::error::LifespanError;

/// A configured entry: one repository, or every source repository of an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `owner/name`
    Repository(String),
    /// `owner/`
    Organization(String),
}

impl FromStr for Target {
    type Err = LifespanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || LifespanError::InvalidTarget(s.to_string());

        let (owner, name) = trimmed.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.contains('/') || !is_valid_segment(owner) {
            return Err(invalid());
        }

        if name.is_empty() {
            Ok(Target::Organization(owner.to_string()))
        } else if is_valid_segment(name) {
            Ok(Target::Repository(trimmed.to_string()))
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Repository(full_name) => f.write_str(full_name),
            Target::Organization(org) => write!(f, "{}/", org),
        }
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.chars().any(|c| c.is_whitespace() || matches!(c, '?' | '#' | '%'))
}

/// Parse a repository list file: one identifier per line.
/// Blank lines and `#` comments are ignored.
pub fn parse_repo_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
