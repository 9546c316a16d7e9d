//! GitHub REST API v3 client.
//!
//! This module provides the `GitHubClient` implementation of the `GitHubApi`
//! trait, covering every REST endpoint the portfolio reads.
//!
//! # Features
//!
//! - Optional bearer authentication (unauthenticated requests work for
//!   public data at 60 req/hour; a token raises the limit to 5,000 req/hour)
//! - Request timeouts (30s for requests, 5s for connections)
//! - `Link`-header pagination with a hard cap of three pages per collection
//! - Rate limit monitoring via the `X-RateLimit-Remaining` header
//!
//! # Pagination
//!
//! Repository and event listings are paged at 100 items. When a response
//! carries a `Link: rel="next"` header, up to two further pages are fetched
//! and appended in order. A failed continuation page stops the loop early
//! and the items collected so far are returned.

use crate::domain::{
    ActivityEvent, GitHubApi, Profile, Repo, SocialAccount, TrafficSummary,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Base URL for the GitHub REST API.
const BASE_URL: &str = "https://api.github.com";

/// Items requested per page.
const PER_PAGE: u32 = 100;

/// Hard cap on successive page fetches, regardless of how many pages the
/// server reports.
pub const MAX_PAGES: u32 = 3;

/// GitHub REST API client.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    /// Create a new client with the default GitHub endpoint.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token; `None` falls back to
    ///   unauthenticated requests.
    pub fn new(token: Option<String>) -> anyhow::Result<Self> {
        Self::with_base_url(token, BASE_URL)
    }

    /// Create a client against a custom base URL (for testing).
    pub fn with_base_url(token: Option<String>, base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("portfolio-gateway")
            .build()?;

        Ok(Self {
            client,
            token,
            base_url: base_url.to_string(),
        })
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    /// Log a warning when the remaining rate limit budget runs low.
    fn check_rate_limit(resp: &Response) {
        let remaining = resp
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok());
        if let Some(remaining) = remaining {
            if remaining < 10 {
                warn!("GitHub API rate limit low: {} requests remaining", remaining);
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.request(&url).send().await?;
        Self::check_rate_limit(&resp);

        if !resp.status().is_success() {
            anyhow::bail!("GitHub API error for {}: {}", path, resp.status());
        }
        Ok(resp.json().await?)
    }

    /// Fetch a paged collection, following `rel="next"` links up to
    /// [`MAX_PAGES`] pages. A failed continuation page stops the loop.
    async fn get_paged<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<Vec<T>> {
        let mut items: Vec<T> = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}{}?per_page={}&page={}",
                self.base_url, path, PER_PAGE, page
            );
            let resp = match self.request(&url).send().await {
                Ok(resp) => resp,
                Err(e) if page > 1 => {
                    warn!("Failed to fetch page {} of {}: {}", page, path, e);
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            Self::check_rate_limit(&resp);

            if !resp.status().is_success() {
                if page > 1 {
                    warn!(
                        "Page {} of {} returned {}, stopping pagination",
                        page,
                        path,
                        resp.status()
                    );
                    break;
                }
                anyhow::bail!("GitHub API error for {}: {}", path, resp.status());
            }

            let more = has_next_page(
                resp.headers()
                    .get("link")
                    .and_then(|v| v.to_str().ok()),
            );
            let batch: Vec<T> = resp.json().await?;
            items.extend(batch);

            if !more || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

/// Whether a `Link` header advertises a further page.
pub fn has_next_page(link_header: Option<&str>) -> bool {
    link_header
        .map(|links| {
            links
                .split(',')
                .any(|link| link.contains("rel=\"next\""))
        })
        .unwrap_or(false)
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_user(&self, login: &str) -> anyhow::Result<Profile> {
        self.get_json(&format!("/users/{}", login)).await
    }

    async fn get_repos(&self, login: &str) -> anyhow::Result<Vec<Repo>> {
        // sort=updated matches the page ordering before stars take over.
        self.get_paged(&format!("/users/{}/repos", login)).await
    }

    async fn get_social_accounts(&self, login: &str) -> anyhow::Result<Vec<SocialAccount>> {
        self.get_json(&format!("/users/{}/social_accounts", login))
            .await
    }

    async fn get_recent_events(&self, login: &str) -> anyhow::Result<Vec<ActivityEvent>> {
        self.get_paged(&format!("/users/{}/events", login)).await
    }

    async fn get_traffic_views(&self, owner: &str, repo: &str) -> anyhow::Result<TrafficSummary> {
        self.get_json(&format!("/repos/{}/{}/traffic/views", owner, repo))
            .await
    }

    async fn get_dependabot_alerts(&self, owner: &str, repo: &str) -> anyhow::Result<Value> {
        let url = format!(
            "{}/repos/{}/{}/dependabot/alerts",
            self.base_url, owner, repo
        );
        let resp = self.request(&url).send().await?;
        Self::check_rate_limit(&resp);

        let status = resp.status();
        // A 403 carries an object body stating that alerts are disabled for
        // the repository; pass it through so the caller can tell "disabled"
        // apart from a failed check.
        if status.is_success() || status == StatusCode::FORBIDDEN {
            return Ok(resp.json().await?);
        }
        anyhow::bail!(
            "GitHub API error for {}/{} dependabot alerts: {}",
            owner,
            repo,
            status
        )
    }

    async fn probe_content(&self, owner: &str, repo: &str, path: &str) -> anyhow::Result<bool> {
        let clean_path = path.trim_start_matches('/');
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url, owner, repo, clean_path
        );
        let resp = self.request(&url).send().await?;
        Ok(resp.status() == StatusCode::OK)
    }
}
