//! Domain entities.
//!
//! REST entities mirror the GitHub v3 JSON field names directly; GraphQL
//! entities keep the camelCase names of the v4 schema. Everything that can
//! be absent upstream carries a serde default so a partial answer still
//! deserializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use utoipa::ToSchema;

/// Where a payload came from: a live upstream fetch or the local fallback
/// shape substituted after a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Live,
    Fallback,
}

/// A payload tagged with its [`Origin`], so "empty but valid" stays
/// distinguishable from "fetch failed" on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fetched<T> {
    pub origin: Origin,
    pub data: T,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self {
            origin: Origin::Live,
            data,
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            origin: Origin::Fallback,
            data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == Origin::Fallback
    }
}

/// Account profile from `GET /users/{login}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
}

impl Profile {
    /// Placeholder profile served when the upstream fetch fails: the login
    /// doubles as the display name, every count is zero.
    pub fn fallback(login: &str) -> Self {
        Self {
            login: login.to_string(),
            name: Some(login.to_string()),
            avatar_url: String::new(),
            bio: Some("GitHub profile information unavailable".to_string()),
            company: None,
            location: None,
            blog: None,
            html_url: format!("https://github.com/{}", login),
            public_repos: 0,
            followers: 0,
            following: 0,
        }
    }
}

/// Repository from `GET /users/{login}/repos`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub html_url: String,
    pub updated_at: DateTime<Utc>,
}

/// A repository shaped for the project grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub name: String,
    /// Human-readable variant of `name` (`my-repo` -> `My Repo`).
    pub display_name: String,
    pub description: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
    /// At most three topics survive selection.
    pub topics: Vec<String>,
    pub homepage: Option<String>,
    pub html_url: String,
    pub updated_at: DateTime<Utc>,
}

/// Linked account from `GET /users/{login}/social_accounts`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SocialAccount {
    pub provider: String,
    pub url: String,
}

/// Pinned repository node from the GraphQL `pinnedItems` query. The nested
/// `primaryLanguage { name }` object is flattened to a string by the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PinnedRepo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazer_count: u32,
    #[serde(default)]
    pub fork_count: u32,
    #[serde(default)]
    pub primary_language: Option<String>,
    #[serde(default)]
    pub url: String,
}

/// Organization node from the GraphQL `organizations` query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub name: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Public event from `GET /users/{login}/events`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub repo: EventRepo,
    #[serde(default)]
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

/// Repository reference inside an activity event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventRepo {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// 14-day traffic summary from `GET /repos/{owner}/{repo}/traffic/views`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrafficSummary {
    pub count: u64,
    pub uniques: u64,
    #[serde(default)]
    pub views: Vec<TrafficPoint>,
}

impl TrafficSummary {
    /// Zeroed summary used when traffic data is inaccessible (the endpoint
    /// requires push access).
    pub fn empty() -> Self {
        Self {
            count: 0,
            uniques: 0,
            views: Vec::new(),
        }
    }
}

/// One day of traffic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrafficPoint {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
    pub uniques: u64,
}

/// Dependabot alert rollup for a repository.
///
/// Three states: alerts enabled (with open counts per severity), alerts
/// not enabled for the repository, and the check itself failing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DependabotStatus {
    Enabled { open_by_severity: HashMap<String, u32> },
    NotEnabled,
    Unavailable,
}

/// Which Next.js router flavor a repository uses, detected by probing the
/// two entry-point paths. Both false when neither probe found its file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RouterCheck {
    pub is_router_pages: bool,
    pub is_router_app: bool,
}

/// Latest release of a repository, from the GraphQL `latestRelease` field.
/// The client strips a leading `v` from the tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestRelease {
    pub tag_name: String,
    pub updated_at: DateTime<Utc>,
}

/// Deployment project from the Vercel `/v9/projects` listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeployProject {
    pub name: String,
    #[serde(default)]
    pub framework: Option<String>,
    /// Millisecond epoch of the last update.
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<i64>,
}

/// Combined stack report for a repository: its manifest, router flavor and
/// the latest upstream framework release.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RepoStack {
    pub manifest: Option<Value>,
    pub router: RouterCheck,
    pub framework_release: Option<LatestRelease>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_profile_uses_login_as_name_with_zeroed_counts() {
        let profile = Profile::fallback("octocat");
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.name.as_deref(), Some("octocat"));
        assert_eq!(profile.public_repos, 0);
        assert_eq!(profile.followers, 0);
        assert!(profile.avatar_url.is_empty());
    }

    #[test]
    fn repo_deserializes_with_missing_optional_fields() {
        let repo: Repo = serde_json::from_value(json!({
            "id": 42,
            "name": "site",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(!repo.fork);
        assert_eq!(repo.stargazers_count, 0);
        assert!(repo.topics.is_empty());
    }

    #[test]
    fn dependabot_status_serializes_with_status_tag() {
        let status = DependabotStatus::NotEnabled;
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({"status": "not_enabled"})
        );

        let enabled = DependabotStatus::Enabled {
            open_by_severity: HashMap::from([("high".to_string(), 2)]),
        };
        let value = serde_json::to_value(&enabled).unwrap();
        assert_eq!(value["status"], "enabled");
        assert_eq!(value["open_by_severity"]["high"], 2);
    }

    #[test]
    fn fetched_wrapper_tags_origin() {
        let live = Fetched::live(vec![1, 2]);
        assert!(!live.is_fallback());
        let value = serde_json::to_value(&live).unwrap();
        assert_eq!(value["origin"], "live");
        assert_eq!(value["data"], json!([1, 2]));

        let fallback: Fetched<Vec<u8>> = Fetched::fallback(Vec::new());
        assert!(fallback.is_fallback());
    }

    #[test]
    fn pinned_repo_reads_camel_case_fields() {
        let pinned: PinnedRepo = serde_json::from_value(json!({
            "name": "demo",
            "stargazerCount": 7,
            "forkCount": 1,
            "primaryLanguage": "Rust",
            "url": "https://github.com/octocat/demo"
        }))
        .unwrap();
        assert_eq!(pinned.stargazer_count, 7);
        assert_eq!(pinned.primary_language.as_deref(), Some("Rust"));
    }

    #[test]
    fn activity_event_renames_type_field() {
        let event: ActivityEvent = serde_json::from_value(json!({
            "id": "1",
            "type": "PushEvent",
            "repo": {"name": "octocat/site"},
            "created_at": "2025-06-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(event.event_type, "PushEvent");
        assert_eq!(event.repo.name, "octocat/site");
    }
}
