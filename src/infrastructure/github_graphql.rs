//! GitHub GraphQL API v4 client.
//!
//! A single POST endpoint carries all GraphQL queries: pinned repositories,
//! organizations, the latest release of a named repository, and file
//! contents at a given path. Caller-supplied values travel as GraphQL
//! variables, never spliced into the query document. Responses are
//! navigated as raw JSON since each query has its own nesting.

use crate::domain::{GitHubGraph, LatestRelease, Organization, PinnedRepo};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// GraphQL endpoint URL.
const GRAPHQL_URL: &str = "https://api.github.com/graphql";

const PINNED_QUERY: &str = r#"query($login: String!) {
    user(login: $login) {
        pinnedItems(first: 6, types: REPOSITORY) {
            nodes {
                ... on Repository {
                    name
                    description
                    stargazerCount
                    forkCount
                    primaryLanguage { name }
                    url
                }
            }
        }
    }
}"#;

const ORGANIZATIONS_QUERY: &str = r#"query($login: String!) {
    user(login: $login) {
        organizations(first: 6) {
            nodes {
                name
                websiteUrl
                url
                avatarUrl
                description
            }
        }
    }
}"#;

const LATEST_RELEASE_QUERY: &str = r#"query($owner: String!, $name: String!) {
    repository(owner: $owner, name: $name) {
        latestRelease {
            tagName
            updatedAt
        }
    }
}"#;

const FILE_TEXT_QUERY: &str = r#"query($owner: String!, $name: String!, $expression: String!) {
    repository(owner: $owner, name: $name) {
        object(expression: $expression) {
            ... on Blob {
                text
            }
        }
    }
}"#;

/// GitHub GraphQL client. Requires a bearer credential; without one the
/// endpoint rejects every query, so construction without a token still
/// works but every call will fail and fall back at the service layer.
#[derive(Clone)]
pub struct GitHubGraphQlClient {
    client: Client,
    token: Option<String>,
    endpoint: String,
}

impl GitHubGraphQlClient {
    pub fn new(token: Option<String>) -> anyhow::Result<Self> {
        Self::with_endpoint(token, GRAPHQL_URL)
    }

    /// Create a client against a custom endpoint (for testing).
    pub fn with_endpoint(token: Option<String>, endpoint: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("portfolio-gateway")
            .build()?;

        Ok(Self {
            client,
            token,
            endpoint: endpoint.to_string(),
        })
    }

    /// POST a query document with its variables and return the parsed
    /// response body.
    async fn query(&self, query: &str, variables: Value) -> anyhow::Result<Value> {
        debug!(
            "GraphQL query: {}",
            query.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/vnd.github.v3+json")
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let resp = request.send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("GitHub GraphQL error: {}", resp.status());
        }

        let body: Value = resp.json().await.context("Malformed GraphQL response")?;
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                anyhow::bail!("GraphQL query returned errors: {}", errors[0]);
            }
        }
        Ok(body)
    }
}

#[async_trait]
impl GitHubGraph for GitHubGraphQlClient {
    async fn get_pinned_repos(&self, login: &str) -> anyhow::Result<Vec<PinnedRepo>> {
        let body = self
            .query(PINNED_QUERY, json!({ "login": login }))
            .await?;

        let nodes = body
            .pointer("/data/user/pinnedItems/nodes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        nodes
            .into_iter()
            .map(|mut node| {
                // primaryLanguage is a nested { name } object; flatten it.
                if let Some(lang) = node
                    .pointer("/primaryLanguage/name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                {
                    node["primaryLanguage"] = Value::String(lang);
                }
                serde_json::from_value(node).context("Malformed pinned repository node")
            })
            .collect()
    }

    async fn get_organizations(&self, login: &str) -> anyhow::Result<Vec<Organization>> {
        let body = self
            .query(ORGANIZATIONS_QUERY, json!({ "login": login }))
            .await?;

        let nodes = body
            .pointer("/data/user/organizations/nodes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        nodes
            .into_iter()
            .filter(|node| !node.is_null())
            .map(|node| serde_json::from_value(node).context("Malformed organization node"))
            .collect()
    }

    async fn get_latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Option<LatestRelease>> {
        let body = self
            .query(
                LATEST_RELEASE_QUERY,
                json!({ "owner": owner, "name": repo }),
            )
            .await?;

        let release = body.pointer("/data/repository/latestRelease");
        match release {
            Some(node) if !node.is_null() => {
                let mut release: LatestRelease = serde_json::from_value(node.clone())
                    .context("Malformed latestRelease node")?;
                release.tag_name = release
                    .tag_name
                    .strip_prefix('v')
                    .map(str::to_string)
                    .unwrap_or(release.tag_name);
                Ok(Some(release))
            }
            _ => Ok(None),
        }
    }

    async fn get_file_text(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> anyhow::Result<Option<String>> {
        let body = self
            .query(
                FILE_TEXT_QUERY,
                json!({
                    "owner": owner,
                    "name": repo,
                    "expression": format!("HEAD:{}", path),
                }),
            )
            .await?;

        Ok(body
            .pointer("/data/repository/object/text")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}
