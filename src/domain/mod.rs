//! Domain layer - Core entities and outbound API traits.
//!
//! This module defines the domain model for the portfolio data gateway:
//! - Traits describing the remote APIs the gateway consumes (GitHub REST,
//!   GitHub GraphQL, the deployment platform)
//! - Entities for profile, repository, activity and deployment data
//! - Static site configuration types loaded from `config.yaml`

pub mod models;
pub use models::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[cfg(test)]
use mockall::automock;

/// GitHub REST API v3 operations used by the portfolio.
///
/// Implementations must be thread-safe (`Send + Sync`) for use in async
/// contexts. See `infrastructure::github::GitHubClient` for the HTTP
/// implementation; tests mock this trait.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetch the account profile for `login`.
    async fn get_user(&self, login: &str) -> anyhow::Result<Profile>;

    /// Fetch the account's repositories, newest-updated first.
    ///
    /// Paginated; implementations fetch at most three pages and stop early
    /// when a continuation page fails.
    async fn get_repos(&self, login: &str) -> anyhow::Result<Vec<Repo>>;

    /// Fetch the account's linked social accounts.
    async fn get_social_accounts(&self, login: &str) -> anyhow::Result<Vec<SocialAccount>>;

    /// Fetch the account's recent public activity, newest first.
    /// Same pagination cap as `get_repos`.
    async fn get_recent_events(&self, login: &str) -> anyhow::Result<Vec<ActivityEvent>>;

    /// Fetch the 14-day traffic summary for a repository.
    /// Requires push access; fails with 403 otherwise.
    async fn get_traffic_views(&self, owner: &str, repo: &str) -> anyhow::Result<TrafficSummary>;

    /// Fetch raw Dependabot alerts for a repository.
    ///
    /// Returns the raw JSON body: an array when alerts are enabled, an
    /// error object when they are not. The service layer interprets it.
    async fn get_dependabot_alerts(&self, owner: &str, repo: &str) -> anyhow::Result<Value>;

    /// Check whether a file exists in a repository (contents endpoint,
    /// 200 = present, 404 = absent).
    async fn probe_content(&self, owner: &str, repo: &str, path: &str) -> anyhow::Result<bool>;
}

/// GitHub GraphQL API v4 operations used by the portfolio.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GitHubGraph: Send + Sync {
    /// Fetch the account's pinned repositories (at most six).
    async fn get_pinned_repos(&self, login: &str) -> anyhow::Result<Vec<PinnedRepo>>;

    /// Fetch the account's organizations (at most six).
    async fn get_organizations(&self, login: &str) -> anyhow::Result<Vec<Organization>>;

    /// Fetch the latest release of a named repository, if it has one.
    async fn get_latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Option<LatestRelease>>;

    /// Fetch the text of a file at `HEAD:{path}`, if present.
    async fn get_file_text(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> anyhow::Result<Option<String>>;
}

/// Deployment platform operations (Vercel).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// List the account's deployment projects. Implementations return an
    /// empty list without a network call when no credential is configured.
    async fn list_projects(&self) -> anyhow::Result<Vec<DeployProject>>;
}

/// Static identity record from `config.yaml`.
///
/// Used as the fallback source of display data when environment overrides
/// are absent or the GitHub profile fetch fails.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct Identity {
    pub display_name: String,
    pub github_username: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub email: String,
    /// Provider name -> profile URL.
    #[serde(default)]
    pub socials: BTreeMap<String, String>,
}

/// One category of the proficiency grid (e.g. "Languages", "Backend").
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct SkillCategory {
    pub title: String,
    pub skills: Vec<Skill>,
}

/// A single skill with a 0-100 proficiency value.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct Skill {
    pub name: String,
    pub value: u8,
}

/// Navigation link rendered by the collapsible nav.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct NavLink {
    pub name: String,
    pub href: String,
}
