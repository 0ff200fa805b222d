// Issue lifespan aggregation.
// Collects every issue of a repository and reduces them to a mean lifespan.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::github::{ApiClient, Issue, IssueState, Listing, Repository, Transport};

use super::format::format_duration;
use super::pages::Pages;
use super::target::Target;

const ISSUES_NAMESPACE: &str = "repoissues";
const ORG_REPOS_NAMESPACE: &str = "org_repos";

/// Mean issue lifespan of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLifespan {
    /// `owner/name`
    pub repo: String,
    /// Issues counted, open and closed.
    pub issues: usize,
    /// Issues still open at evaluation time.
    pub open: usize,
    /// Whole-second arithmetic mean.
    pub average: TimeDelta,
}

impl fmt::Display for RepoLifespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "repo: {} avg issue lifespan: {}",
            self.repo,
            format_duration(self.average)
        )
    }
}

/// Mean lifespan of `issues` at `now`, or `None` for an empty slice.
pub fn average_lifespan(issues: &[Issue], now: DateTime<Utc>) -> Option<TimeDelta> {
    if issues.is_empty() {
        return None;
    }
    let total: i64 = issues.iter().map(|i| i.lifespan(now).num_seconds()).sum();
    Some(TimeDelta::seconds(total / issues.len() as i64))
}

/// Drives the API client over the configured repositories.
pub struct Aggregator<'a, T> {
    client: &'a ApiClient<T>,
    caching: bool,
    fixed_now: Option<DateTime<Utc>>,
}

impl<'a, T: Transport> Aggregator<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            client,
            caching: true,
            fixed_now: None,
        }
    }

    /// Enable or disable the response cache.
    pub fn caching(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        self
    }

    /// Evaluate open issues against a fixed instant instead of the clock.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// Page cursor over a listing, cached under `namespace` when caching is on.
    pub fn pages(
        &self,
        start_url: &str,
        params: Vec<(&'static str, &'static str)>,
        namespace: &str,
    ) -> Pages<'a, T> {
        let cache = self
            .caching
            .then(|| (namespace.to_string(), self.client.config().repos_cache_age));
        Pages::new(self.client, start_url, params, cache)
    }

    /// Drain a listing into memory.
    ///
    /// An error object on any page replaces the whole result.
    async fn collect<I: DeserializeOwned>(&self, mut pages: Pages<'a, T>) -> Result<Listing<I>> {
        let mut items = Vec::new();
        while let Some(data) = pages.next_page().await? {
            match Listing::<I>::decode(data)? {
                Listing::Items(page) => items.extend(page),
                Listing::Error(err) => return Ok(Listing::Error(err)),
            }
        }
        Ok(Listing::Items(items))
    }

    /// Every issue reachable from `start_url`, following next-page links.
    pub async fn collect_issues(
        &self,
        start_url: &str,
        params: Vec<(&'static str, &'static str)>,
    ) -> Result<Listing<Issue>> {
        self.collect(self.pages(start_url, params, ISSUES_NAMESPACE))
            .await
    }

    /// Mean lifespan across open and closed issues of `repo`.
    ///
    /// Returns `None` when the API answers with an error object or the
    /// repository has no issues.
    pub async fn report_repo_lifespan(&self, repo: &str) -> Result<Option<RepoLifespan>> {
        tracing::info!("Fetching lifespans for {}", repo);
        let url = self.client.issues_url(repo);

        let mut issues = Vec::new();
        for state in [IssueState::Default, IssueState::Closed] {
            match self
                .collect_issues(&url, ApiClient::<T>::issues_params(state))
                .await?
            {
                Listing::Items(found) => issues.extend(found),
                Listing::Error(err) => {
                    tracing::info!(repo, reason = %err, "skipping repository");
                    return Ok(None);
                }
            }
        }

        let Some(average) = average_lifespan(&issues, self.now()) else {
            tracing::info!(repo, "no issues, nothing to report");
            return Ok(None);
        };

        Ok(Some(RepoLifespan {
            repo: repo.to_string(),
            issues: issues.len(),
            open: issues.iter().filter(|i| i.is_open()).count(),
            average,
        }))
    }

    /// Source repositories of `org`, forks removed.
    pub async fn org_repositories(&self, org: &str) -> Result<Listing<Repository>> {
        let pages = self.pages(
            &self.client.org_repos_url(org),
            ApiClient::<T>::org_repos_params(),
            ORG_REPOS_NAMESPACE,
        );
        Ok(match self.collect::<Repository>(pages).await? {
            Listing::Items(repos) => {
                Listing::Items(repos.into_iter().filter(|r| !r.fork).collect())
            }
            err => err,
        })
    }

    /// Process every identifier in order, expanding organizations.
    ///
    /// `emit` is called for each repository with a result as soon as it is
    /// known. Failures are logged and the run moves on.
    pub async fn expand_and_process_with<S, F>(&self, ids: &[S], mut emit: F)
    where
        S: AsRef<str>,
        F: FnMut(RepoLifespan),
    {
        for id in ids {
            let target = match id.as_ref().parse::<Target>() {
                Ok(target) => target,
                Err(err) => {
                    tracing::warn!("{}", err);
                    continue;
                }
            };

            let repos = match &target {
                Target::Repository(full_name) => vec![full_name.clone()],
                Target::Organization(org) => match self.org_repositories(org).await {
                    Ok(Listing::Items(repos)) => repos.into_iter().map(|r| r.full_name).collect(),
                    Ok(Listing::Error(err)) => {
                        tracing::warn!(org = %org, reason = %err, "skipping organization");
                        continue;
                    }
                    Err(err) => {
                        tracing::warn!(org = %org, error = %err, "failed to list organization repositories");
                        continue;
                    }
                },
            };

            for repo in repos {
                match self.report_repo_lifespan(&repo).await {
                    Ok(Some(lifespan)) => emit(lifespan),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(repo = %repo, error = %err, "failed to fetch issues");
                    }
                }
            }
        }
    }

    /// Like [`Self::expand_and_process_with`], collecting the results.
    pub async fn expand_and_process<S: AsRef<str>>(&self, ids: &[S]) -> Vec<RepoLifespan> {
        let mut results = Vec::new();
        self.expand_and_process_with(ids, |r| results.push(r)).await;
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::github::transport::mock::MockTransport;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    const API: &str = "https://api.github.com";

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn open_url(repo: &str) -> String {
        format!("{}/repos/{}/issues?per_page=100", API, repo)
    }

    fn closed_url(repo: &str) -> String {
        format!("{}/repos/{}/issues?per_page=100&state=closed", API, repo)
    }

    fn org_url(org: &str) -> String {
        format!("{}/orgs/{}/repos?per_page=100&type=sources", API, org)
    }

    fn issue(created: &str, closed: Option<&str>) -> Value {
        json!({"created_at": created, "closed_at": closed})
    }

    fn octocat_hello(transport: &mut MockTransport) {
        transport
            .respond(
                &open_url("octocat/hello"),
                json!([issue("2020-01-01T00:00:00Z", None)]),
                None,
            )
            .respond(
                &closed_url("octocat/hello"),
                json!([issue("2020-01-01T00:00:00Z", Some("2020-01-03T00:00:00Z"))]),
                None,
            );
    }

    fn client(transport: MockTransport, temp_dir: &TempDir) -> ApiClient<MockTransport> {
        ApiClient::with_transport(transport, Config::default(), temp_dir.path())
    }

    #[test]
    fn test_average_lifespan_empty() {
        assert_eq!(average_lifespan(&[], Utc::now()), None);
    }

    #[tokio::test]
    async fn test_report_average_of_open_and_closed() {
        let temp_dir = TempDir::new().unwrap();
        let mut transport = MockTransport::new();
        octocat_hello(&mut transport);
        let client = client(transport, &temp_dir);
        let aggregator = Aggregator::new(&client).at(ts("2020-01-05T00:00:00Z"));

        let report = aggregator
            .report_repo_lifespan("octocat/hello")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.average, TimeDelta::days(3));
        assert_eq!(report.issues, 2);
        assert_eq!(report.open, 1);
        assert_eq!(
            report.to_string(),
            "repo: octocat/hello avg issue lifespan: 3 days, 0:00:00"
        );

        // Open issues are requested before closed ones
        assert_eq!(
            client.transport().requests(),
            vec![open_url("octocat/hello"), closed_url("octocat/hello")]
        );
    }

    #[tokio::test]
    async fn test_collect_issues_across_pages() {
        let temp_dir = TempDir::new().unwrap();
        let page2 = format!("{}/repositories/1/issues?page=2&per_page=100", API);
        let mut transport = MockTransport::new();
        transport
            .respond(
                &open_url("octocat/big"),
                json!([
                    issue("2020-01-01T00:00:00Z", None),
                    issue("2020-01-02T00:00:00Z", None)
                ]),
                Some(&page2),
            )
            .respond(&page2, json!([issue("2020-01-03T00:00:00Z", None)]), None);
        let client = client(transport, &temp_dir);
        let aggregator = Aggregator::new(&client);

        let issues = aggregator
            .collect_issues(
                &client.issues_url("octocat/big"),
                ApiClient::<MockTransport>::issues_params(IssueState::Default),
            )
            .await
            .unwrap()
            .into_result()
            .unwrap();

        let created: Vec<_> = issues.iter().map(|i| i.created_at).collect();
        assert_eq!(
            created,
            vec![
                ts("2020-01-01T00:00:00Z"),
                ts("2020-01-02T00:00:00Z"),
                ts("2020-01-03T00:00:00Z")
            ]
        );
        assert!(temp_dir.path().join("repoissues_page_2").is_dir());
    }

    #[tokio::test]
    async fn test_error_payload_skips_repository() {
        let temp_dir = TempDir::new().unwrap();
        let mut transport = MockTransport::new();
        transport.respond(
            &open_url("octocat/missing"),
            json!({"message": "Not Found"}),
            None,
        );
        let client = client(transport, &temp_dir);

        let report = Aggregator::new(&client)
            .report_repo_lifespan("octocat/missing")
            .await
            .unwrap();
        assert_eq!(report, None);
        // The closed-issues query is not attempted
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_issues_reports_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut transport = MockTransport::new();
        transport
            .respond(&open_url("octocat/empty"), json!([]), None)
            .respond(&closed_url("octocat/empty"), json!([]), None);
        let client = client(transport, &temp_dir);

        let report = Aggregator::new(&client)
            .report_repo_lifespan("octocat/empty")
            .await
            .unwrap();
        assert_eq!(report, None);
    }

    #[tokio::test]
    async fn test_expand_and_process_continues_past_failures() {
        let temp_dir = TempDir::new().unwrap();
        let mut transport = MockTransport::new();
        octocat_hello(&mut transport);
        transport.respond(
            &open_url("octocat/missing"),
            json!({"message": "Not Found"}),
            None,
        );
        // octocat/offline has no canned response: transport error
        let client = client(transport, &temp_dir);
        let aggregator = Aggregator::new(&client).at(ts("2020-01-05T00:00:00Z"));

        let results = aggregator
            .expand_and_process(&[
                "octocat/missing",
                "not-an-identifier",
                "octocat/offline",
                "octocat/hello",
            ])
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].repo, "octocat/hello");
    }

    #[tokio::test]
    async fn test_expand_organization_excludes_forks() {
        let temp_dir = TempDir::new().unwrap();
        let mut transport = MockTransport::new();
        transport.respond(
            &org_url("acme"),
            json!([
                {"full_name": "acme/foo", "fork": false},
                {"full_name": "acme/fork", "fork": true},
                {"full_name": "acme/bar", "fork": false}
            ]),
            None,
        );
        for repo in ["acme/foo", "acme/bar"] {
            transport
                .respond(
                    &open_url(repo),
                    json!([issue("2020-01-01T00:00:00Z", None)]),
                    None,
                )
                .respond(&closed_url(repo), json!([]), None);
        }
        let client = client(transport, &temp_dir);
        let aggregator = Aggregator::new(&client).at(ts("2020-01-02T00:00:00Z"));

        let results = aggregator.expand_and_process(&["acme/"]).await;

        let repos: Vec<_> = results.iter().map(|r| r.repo.as_str()).collect();
        assert_eq!(repos, vec!["acme/foo", "acme/bar"]);
        assert!(results.iter().all(|r| r.average == TimeDelta::days(1)));
        assert!(
            !client
                .transport()
                .requests()
                .iter()
                .any(|u| u.contains("acme/fork"))
        );
        assert!(temp_dir.path().join("org_repos_page_1").is_dir());
    }

    #[tokio::test]
    async fn test_organization_error_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let mut transport = MockTransport::new();
        transport.respond(&org_url("ghost"), json!({"message": "Not Found"}), None);
        octocat_hello(&mut transport);
        let client = client(transport, &temp_dir);

        let results = Aggregator::new(&client)
            .caching(false)
            .expand_and_process(&["ghost/", "octocat/hello"])
            .await;

        assert_eq!(results.len(), 1);
        assert!(fs_is_empty(temp_dir.path()));
    }

    fn fs_is_empty(path: &std::path::Path) -> bool {
        std::fs::read_dir(path).unwrap().next().is_none()
    }
}
