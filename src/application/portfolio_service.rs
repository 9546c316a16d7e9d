//! Portfolio data service with cache-first fetching and typed fallbacks.
//!
//! Every operation wraps its remote call in the memoization cache, catches
//! failures at the call site and substitutes the documented fallback shape.
//! No operation propagates an error to its caller; the worst case is a
//! degraded response marked with `Origin::Fallback`.

use crate::application::cache::{ttl, MemoryCache};
use crate::domain::{
    ActivityEvent, DependabotStatus, DeployProject, DeploymentApi, Fetched, GitHubApi,
    GitHubGraph, Identity, LatestRelease, NavLink, Organization, PinnedRepo, Profile, Project,
    Repo, RepoStack, RouterCheck, SkillCategory, SocialAccount, TrafficSummary,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Maximum number of projects on the grid.
const MAX_PROJECTS: usize = 12;

/// Maximum topics shown per project card.
const MAX_TOPICS: usize = 3;

/// Upstream framework repository whose latest release is reported on the
/// stack endpoint.
const FRAMEWORK_OWNER: &str = "vercel";
const FRAMEWORK_REPO: &str = "next.js";

/// Portfolio data service.
///
/// Holds the outbound API clients behind their trait seams, the shared
/// cache, and the static site configuration used for fallbacks.
pub struct PortfolioService {
    github: Arc<dyn GitHubApi>,
    graph: Arc<dyn GitHubGraph>,
    deploy: Arc<dyn DeploymentApi>,
    cache: Arc<MemoryCache>,
    identity: Identity,
    skills: Vec<SkillCategory>,
    navigation: Vec<NavLink>,
}

impl PortfolioService {
    pub fn new(
        github: Arc<dyn GitHubApi>,
        graph: Arc<dyn GitHubGraph>,
        deploy: Arc<dyn DeploymentApi>,
        cache: Arc<MemoryCache>,
        identity: Identity,
        skills: Vec<SkillCategory>,
        navigation: Vec<NavLink>,
    ) -> Self {
        Self {
            github,
            graph,
            deploy,
            cache,
            identity,
            skills,
            navigation,
        }
    }

    /// The account shown when no override is supplied.
    pub fn default_login(&self) -> &str {
        &self.identity.github_username
    }

    /// Static identity record from the configuration file.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Static proficiency grid.
    pub fn skills(&self) -> &[SkillCategory] {
        &self.skills
    }

    /// Static navigation links.
    pub fn navigation(&self) -> &[NavLink] {
        &self.navigation
    }

    /// Account profile, falling back to the placeholder record.
    pub async fn profile(&self, login: &str) -> Fetched<Profile> {
        let github = self.github.clone();
        let result = self
            .cache
            .get_or_fetch("profile", &[login], ttl::HOURS_1, || async move {
                github.get_user(login).await
            })
            .await;

        match result {
            Ok(profile) => Fetched::live(profile),
            Err(e) => {
                warn!("Profile fetch failed for {}: {}", login, e);
                Fetched::fallback(Profile::fallback(login))
            }
        }
    }

    /// Project grid: forks and the profile repository excluded, sorted by
    /// descending stars, capped at twelve entries.
    pub async fn projects(&self, login: &str) -> Fetched<Vec<Project>> {
        let github = self.github.clone();
        let result = self
            .cache
            .get_or_fetch("repos", &[login], ttl::HOURS_1, || async move {
                github.get_repos(login).await
            })
            .await;

        match result {
            Ok(repos) => Fetched::live(select_projects(repos, login)),
            Err(e) => {
                warn!("Repository fetch failed for {}: {}", login, e);
                Fetched::fallback(Vec::new())
            }
        }
    }

    /// Pinned repositories, empty on failure.
    pub async fn pinned(&self, login: &str) -> Fetched<Vec<PinnedRepo>> {
        let graph = self.graph.clone();
        let result = self
            .cache
            .get_or_fetch("pinned", &[login], ttl::HOURS_12, || async move {
                graph.get_pinned_repos(login).await
            })
            .await;

        match result {
            Ok(pinned) => Fetched::live(pinned),
            Err(e) => {
                warn!("Pinned repository fetch failed for {}: {}", login, e);
                Fetched::fallback(Vec::new())
            }
        }
    }

    /// Organizations, empty on failure.
    pub async fn organizations(&self, login: &str) -> Fetched<Vec<Organization>> {
        let graph = self.graph.clone();
        let result = self
            .cache
            .get_or_fetch("organizations", &[login], ttl::HOURS_12, || async move {
                graph.get_organizations(login).await
            })
            .await;

        match result {
            Ok(orgs) => Fetched::live(orgs),
            Err(e) => {
                warn!("Organization fetch failed for {}: {}", login, e);
                Fetched::fallback(Vec::new())
            }
        }
    }

    /// Linked social accounts, empty on failure.
    pub async fn social_accounts(&self, login: &str) -> Fetched<Vec<SocialAccount>> {
        let github = self.github.clone();
        let result = self
            .cache
            .get_or_fetch("social", &[login], ttl::HOURS_12, || async move {
                github.get_social_accounts(login).await
            })
            .await;

        match result {
            Ok(accounts) => Fetched::live(accounts),
            Err(e) => {
                warn!("Social account fetch failed for {}: {}", login, e);
                Fetched::fallback(Vec::new())
            }
        }
    }

    /// Recent public activity, empty on failure.
    pub async fn recent_activity(&self, login: &str) -> Fetched<Vec<ActivityEvent>> {
        let github = self.github.clone();
        let result = self
            .cache
            .get_or_fetch("activity", &[login], ttl::MINUTES_5, || async move {
                github.get_recent_events(login).await
            })
            .await;

        match result {
            Ok(events) => Fetched::live(events),
            Err(e) => {
                warn!("Activity fetch failed for {}: {}", login, e);
                Fetched::fallback(Vec::new())
            }
        }
    }

    /// Repository traffic, zeroed summary on failure.
    pub async fn traffic(&self, owner: &str, repo: &str) -> Fetched<TrafficSummary> {
        let github = self.github.clone();
        let result = self
            .cache
            .get_or_fetch("traffic", &[owner, repo], ttl::HOURS_1, || async move {
                github.get_traffic_views(owner, repo).await
            })
            .await;

        match result {
            Ok(summary) => Fetched::live(summary),
            Err(e) => {
                warn!("Traffic fetch failed for {}/{}: {}", owner, repo, e);
                Fetched::fallback(TrafficSummary::empty())
            }
        }
    }

    /// Dependabot alert rollup.
    ///
    /// A fetch failure maps to `Unavailable` rather than an empty rollup,
    /// so "no open alerts" and "could not check" stay distinguishable.
    pub async fn dependabot_summary(&self, owner: &str, repo: &str) -> DependabotStatus {
        let github = self.github.clone();
        let result = self
            .cache
            .get_or_fetch("dependabot", &[owner, repo], ttl::HOURS_12, || async move {
                let raw = github.get_dependabot_alerts(owner, repo).await?;
                Ok(summarize_alerts(&raw))
            })
            .await;

        match result {
            Ok(status) => status,
            Err(e) => {
                warn!("Dependabot fetch failed for {}/{}: {}", owner, repo, e);
                DependabotStatus::Unavailable
            }
        }
    }

    /// Probe both Next.js router entry points concurrently and combine the
    /// results. A failed probe counts as "absent" for that flavor.
    pub async fn router_check(&self, owner: &str, repo: &str) -> RouterCheck {
        let github = self.github.clone();
        let result = self
            .cache
            .get_or_fetch("router_check", &[owner, repo], ttl::HOURS_1, || async move {
                let (pages, app) = tokio::join!(
                    github.probe_content(owner, repo, "pages/_app.jsx"),
                    github.probe_content(owner, repo, "app/layout.jsx"),
                );
                Ok(RouterCheck {
                    is_router_pages: pages.unwrap_or_else(|e| {
                        warn!("pages/_app.jsx probe failed for {}/{}: {}", owner, repo, e);
                        false
                    }),
                    is_router_app: app.unwrap_or_else(|e| {
                        warn!("app/layout.jsx probe failed for {}/{}: {}", owner, repo, e);
                        false
                    }),
                })
            })
            .await;

        result.unwrap_or_default()
    }

    /// Parsed `package.json` of a repository, `None` when absent or
    /// unparsable.
    pub async fn package_manifest(&self, owner: &str, repo: &str) -> Option<Value> {
        let graph = self.graph.clone();
        let result = self
            .cache
            .get_or_fetch("manifest", &[owner, repo], ttl::HOURS_1, || async move {
                graph.get_file_text(owner, repo, "package.json").await
            })
            .await;

        match result {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Malformed package.json in {}/{}: {}", owner, repo, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Manifest fetch failed for {}/{}: {}", owner, repo, e);
                None
            }
        }
    }

    /// Latest release of the upstream framework, `None` on failure.
    pub async fn framework_release(&self) -> Option<LatestRelease> {
        let graph = self.graph.clone();
        let result = self
            .cache
            .get_or_fetch("framework_release", &[], ttl::HOURS_12, || async move {
                graph.get_latest_release(FRAMEWORK_OWNER, FRAMEWORK_REPO).await
            })
            .await;

        match result {
            Ok(release) => release,
            Err(e) => {
                warn!("Framework release fetch failed: {}", e);
                None
            }
        }
    }

    /// Combined stack report for a repository. The manifest, router probes
    /// and release lookup run concurrently and are awaited jointly.
    pub async fn repo_stack(&self, owner: &str, repo: &str) -> RepoStack {
        let (manifest, router, framework_release) = tokio::join!(
            self.package_manifest(owner, repo),
            self.router_check(owner, repo),
            self.framework_release(),
        );
        RepoStack {
            manifest,
            router,
            framework_release,
        }
    }

    /// Deployment projects, empty on failure or when unconfigured.
    pub async fn deployments(&self) -> Fetched<Vec<DeployProject>> {
        let deploy = self.deploy.clone();
        let result = self
            .cache
            .get_or_fetch("deployments", &[], ttl::HOURS_12, || async move {
                deploy.list_projects().await
            })
            .await;

        match result {
            Ok(projects) => Fetched::live(projects),
            Err(e) => {
                warn!("Deployment fetch failed: {}", e);
                Fetched::fallback(Vec::new())
            }
        }
    }
}

/// Apply the project-grid presentation rules to a raw repository list:
/// drop forks and the profile repository, sort by descending stars,
/// truncate to [`MAX_PROJECTS`], bound topics at [`MAX_TOPICS`].
pub fn select_projects(repos: Vec<Repo>, login: &str) -> Vec<Project> {
    let mut kept: Vec<Repo> = repos
        .into_iter()
        .filter(|repo| !repo.fork && repo.name != login)
        .collect();
    kept.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));

    kept.into_iter()
        .take(MAX_PROJECTS)
        .map(|repo| Project {
            display_name: format_repo_name(&repo.name),
            name: repo.name,
            description: repo.description,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language,
            topics: repo.topics.into_iter().take(MAX_TOPICS).collect(),
            homepage: repo.homepage,
            html_url: repo.html_url,
            updated_at: repo.updated_at,
        })
        .collect()
}

/// `my-cool_repo` -> `My Cool Repo`.
pub fn format_repo_name(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Roll up raw Dependabot alerts into open counts per severity.
///
/// When alerts are disabled the endpoint returns an object instead of an
/// array; that maps to `NotEnabled`.
pub fn summarize_alerts(raw: &Value) -> DependabotStatus {
    let Some(alerts) = raw.as_array() else {
        return DependabotStatus::NotEnabled;
    };

    let mut open_by_severity: HashMap<String, u32> = HashMap::new();
    for alert in alerts {
        if alert.get("state").and_then(Value::as_str) == Some("open") {
            if let Some(severity) = alert
                .pointer("/security_advisory/severity")
                .and_then(Value::as_str)
            {
                *open_by_severity.entry(severity.to_string()).or_insert(0) += 1;
            }
        }
    }
    DependabotStatus::Enabled { open_by_severity }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MockDeploymentApi, MockGitHubApi, MockGitHubGraph,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn repo(name: &str, stars: u32, fork: bool) -> Repo {
        Repo {
            id: 1,
            name: name.to_string(),
            description: None,
            fork,
            stargazers_count: stars,
            forks_count: 0,
            language: Some("Rust".to_string()),
            topics: vec![
                "web".to_string(),
                "api".to_string(),
                "cache".to_string(),
                "extra".to_string(),
            ],
            homepage: None,
            html_url: format!("https://github.com/octocat/{}", name),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn identity() -> Identity {
        Identity {
            display_name: "Octo Cat".to_string(),
            github_username: "octocat".to_string(),
            avatar_url: String::new(),
            bio: String::new(),
            email: "octo@example.com".to_string(),
            socials: Default::default(),
        }
    }

    fn service(
        github: MockGitHubApi,
        graph: MockGitHubGraph,
        deploy: MockDeploymentApi,
    ) -> PortfolioService {
        PortfolioService::new(
            Arc::new(github),
            Arc::new(graph),
            Arc::new(deploy),
            Arc::new(MemoryCache::default()),
            identity(),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn projects_exclude_forks_and_profile_repo() {
        let repos = vec![
            repo("octocat", 50, false), // profile repo
            repo("forked", 40, true),
            repo("kept", 5, false),
        ];
        let projects = select_projects(repos, "octocat");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "kept");
    }

    #[test]
    fn projects_sorted_by_stars_and_capped_at_twelve() {
        let repos: Vec<Repo> = (0..20).map(|i| repo(&format!("r{}", i), i, false)).collect();
        let projects = select_projects(repos, "octocat");
        assert_eq!(projects.len(), 12);
        assert_eq!(projects[0].stars, 19);
        assert!(projects.windows(2).all(|w| w[0].stars >= w[1].stars));
    }

    #[test]
    fn project_topics_bounded_at_three() {
        let projects = select_projects(vec![repo("demo", 1, false)], "octocat");
        assert_eq!(projects[0].topics.len(), 3);
    }

    #[test]
    fn repo_names_are_formatted_for_display() {
        assert_eq!(format_repo_name("my-cool_repo"), "My Cool Repo");
        assert_eq!(format_repo_name("plain"), "Plain");
        assert_eq!(format_repo_name("double--dash"), "Double Dash");
    }

    #[test]
    fn alerts_array_rolls_up_open_alerts_by_severity() {
        let raw = json!([
            { "state": "open", "security_advisory": { "severity": "high" } },
            { "state": "open", "security_advisory": { "severity": "high" } },
            { "state": "fixed", "security_advisory": { "severity": "low" } },
            { "state": "open", "security_advisory": { "severity": "critical" } },
        ]);
        match summarize_alerts(&raw) {
            DependabotStatus::Enabled { open_by_severity } => {
                assert_eq!(open_by_severity.get("high"), Some(&2));
                assert_eq!(open_by_severity.get("critical"), Some(&1));
                assert_eq!(open_by_severity.get("low"), None);
            }
            other => panic!("expected Enabled, got {:?}", other),
        }
    }

    #[test]
    fn alerts_object_means_not_enabled() {
        let raw = json!({ "message": "Dependabot alerts are disabled for this repository." });
        assert_eq!(summarize_alerts(&raw), DependabotStatus::NotEnabled);
    }

    #[tokio::test]
    async fn failed_profile_fetch_returns_fallback_shape() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_user()
            .returning(|_| Err(anyhow::anyhow!("503 Service Unavailable")));
        let service = service(github, MockGitHubGraph::new(), MockDeploymentApi::new());

        let fetched = service.profile("octocat").await;
        assert!(fetched.is_fallback());
        assert_eq!(fetched.data.name.as_deref(), Some("octocat"));
        assert_eq!(fetched.data.public_repos, 0);
        assert_eq!(fetched.data.followers, 0);
    }

    #[tokio::test]
    async fn profile_is_cached_across_calls() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_user()
            .times(1)
            .returning(|login| Ok(Profile::fallback(login)));
        let service = service(github, MockGitHubGraph::new(), MockDeploymentApi::new());

        let first = service.profile("octocat").await;
        let second = service.profile("octocat").await;
        assert_eq!(first.origin, crate::domain::Origin::Live);
        assert_eq!(second.origin, crate::domain::Origin::Live);
    }

    #[tokio::test]
    async fn failed_repo_fetch_yields_empty_fallback_grid() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_repos()
            .returning(|_| Err(anyhow::anyhow!("network error")));
        let service = service(github, MockGitHubGraph::new(), MockDeploymentApi::new());

        let fetched = service.projects("octocat").await;
        assert!(fetched.is_fallback());
        assert!(fetched.data.is_empty());
    }

    #[tokio::test]
    async fn disabled_alerts_report_not_enabled() {
        let mut github = MockGitHubApi::new();
        github.expect_get_dependabot_alerts().returning(|_, _| {
            Ok(json!({"message": "Dependabot alerts are disabled for this repository."}))
        });
        let service = service(github, MockGitHubGraph::new(), MockDeploymentApi::new());

        let status = service.dependabot_summary("octocat", "site").await;
        assert_eq!(status, DependabotStatus::NotEnabled);
    }

    #[tokio::test]
    async fn dependabot_fetch_failure_is_unavailable_not_empty() {
        let mut github = MockGitHubApi::new();
        github
            .expect_get_dependabot_alerts()
            .returning(|_, _| Err(anyhow::anyhow!("401 Unauthorized")));
        let service = service(github, MockGitHubGraph::new(), MockDeploymentApi::new());

        let status = service.dependabot_summary("octocat", "site").await;
        assert_eq!(status, DependabotStatus::Unavailable);
    }

    #[tokio::test]
    async fn router_check_combines_concurrent_probes() {
        let mut github = MockGitHubApi::new();
        github
            .expect_probe_content()
            .returning(|_, _, path| Ok(path == "app/layout.jsx"));
        let service = service(github, MockGitHubGraph::new(), MockDeploymentApi::new());

        let check = service.router_check("octocat", "site").await;
        assert!(!check.is_router_pages);
        assert!(check.is_router_app);
    }

    #[tokio::test]
    async fn failed_probe_counts_as_absent() {
        let mut github = MockGitHubApi::new();
        github
            .expect_probe_content()
            .returning(|_, _, _| Err(anyhow::anyhow!("timeout")));
        let service = service(github, MockGitHubGraph::new(), MockDeploymentApi::new());

        let check = service.router_check("octocat", "site").await;
        assert_eq!(check, RouterCheck::default());
    }
}
