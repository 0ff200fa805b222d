// GitHub API endpoint URLs.
// Builds the start URLs for the listings this tool consumes.

use super::client::ApiClient;
use super::transport::Transport;

/// Page size requested from list endpoints.
pub const PER_PAGE: &str = "100";

/// Issue state filter for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    /// The endpoint default (open issues).
    Default,
    Closed,
}

impl<T: Transport> ApiClient<T> {
    /// Issues listing URL for `owner/name`.
    pub fn issues_url(&self, full_name: &str) -> String {
        self.api_url(&format!("/repos/{}/issues", full_name))
    }

    /// Query parameters for an issues listing.
    pub fn issues_params(state: IssueState) -> Vec<(&'static str, &'static str)> {
        match state {
            IssueState::Default => vec![("per_page", PER_PAGE)],
            IssueState::Closed => vec![("per_page", PER_PAGE), ("state", "closed")],
        }
    }

    /// Source (non-fork) repositories listing URL for an organization.
    pub fn org_repos_url(&self, org: &str) -> String {
        self.api_url(&format!("/orgs/{}/repos", org))
    }

    pub fn org_repos_params() -> Vec<(&'static str, &'static str)> {
        vec![("per_page", PER_PAGE), ("type", "sources")]
    }
}
