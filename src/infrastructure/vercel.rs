//! Vercel deployment platform client.
//!
//! Lists the account's projects from `/v9/projects`. Without a credential
//! no request is attempted and an empty list is returned, so a template
//! clone works out of the box.

use crate::domain::{DeployProject, DeploymentApi};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const BASE_URL: &str = "https://api.vercel.com";

#[derive(Deserialize)]
struct ProjectList {
    #[serde(default)]
    projects: Vec<DeployProject>,
}

/// Vercel REST API client.
#[derive(Clone)]
pub struct VercelClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl VercelClient {
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
}

#[async_trait]
impl DeploymentApi for VercelClient {
    async fn list_projects(&self) -> anyhow::Result<Vec<DeployProject>> {
        let Some(ref token) = self.token else {
            info!("No Vercel token configured - no deployment projects will be shown");
            return Ok(Vec::new());
        };

        let url = format!("{}/v9/projects", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("Vercel API error: {}", resp.status());
        }

        let list: ProjectList = resp.json().await?;
        Ok(list.projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_token_returns_empty_without_network() {
        // Unroutable base URL proves no request is made.
        let client = VercelClient::with_base_url(None, "http://127.0.0.1:1").unwrap();
        let projects = client.list_projects().await.unwrap();
        assert!(projects.is_empty());
    }
}
