//! EmailJS transactional-email client.
//!
//! Forwards contact-form submissions through the EmailJS send endpoint.
//! Credentials (service, template and user identifiers) come from the
//! environment; the client only exists when all three are present.

use anyhow::Context;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Template parameters for the contact-form email.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateParams {
    pub to_email: String,
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub reply_to: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

/// EmailJS API client.
#[derive(Clone)]
pub struct EmailJsClient {
    client: Client,
    service_id: String,
    template_id: String,
    user_id: String,
    endpoint: String,
}

impl EmailJsClient {
    pub fn new(service_id: String, template_id: String, user_id: String) -> anyhow::Result<Self> {
        Self::with_endpoint(service_id, template_id, user_id, SEND_URL)
    }

    /// Create a client against a custom endpoint (for testing).
    pub fn with_endpoint(
        service_id: String,
        template_id: String,
        user_id: String,
        endpoint: &str,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("portfolio-gateway")
            .build()?;

        Ok(Self {
            client,
            service_id,
            template_id,
            user_id,
            endpoint: endpoint.to_string(),
        })
    }

    /// Build a client from `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID` and
    /// `EMAILJS_USER_ID`. Returns `None` when any identifier is missing.
    pub fn from_env() -> Option<Self> {
        let service_id = std::env::var("EMAILJS_SERVICE_ID").ok()?;
        let template_id = std::env::var("EMAILJS_TEMPLATE_ID").ok()?;
        let user_id = std::env::var("EMAILJS_USER_ID").ok()?;
        Self::new(service_id, template_id, user_id).ok()
    }

    /// Send one templated email.
    pub async fn send(&self, params: &TemplateParams) -> anyhow::Result<()> {
        debug!("Relaying contact message from {}", params.from_email);

        let body = SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.user_id,
            template_params: params,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("network error sending contact message")?;

        let status = resp.status();
        if status.as_u16() == 429 {
            anyhow::bail!("rate limit exceeded relaying contact message");
        }
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("EmailJS send failed with status {}: {}", status, detail);
        }
        Ok(())
    }
}
