//! Contact-form relay with local validation and coarse error buckets.
//!
//! Submissions are validated before any network call. Relay failures are
//! classified by inspecting the error text and mapped to one of four
//! user-facing messages; nothing more precise leaks to the page.

use crate::infrastructure::{EmailJsClient, TemplateParams};
use std::fmt;
use tracing::{error, info};
use validator::Validate;

/// A contact-form submission. All three fields are required; the email
/// must pass a simple pattern check.
#[derive(Debug, Clone, serde::Deserialize, Validate, utoipa::ToSchema)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

/// User-facing contact failure categories.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactError {
    /// One of the form fields failed validation.
    Invalid(String),
    /// Relay credentials are not configured.
    NotConfigured,
    /// The relay could not be reached.
    Network,
    /// The relay rejected the submission for rate limiting.
    RateLimited,
    /// Anything else.
    Failed,
}

impl ContactError {
    /// The canned message shown on the page.
    pub fn user_message(&self) -> String {
        match self {
            ContactError::Invalid(detail) => detail.clone(),
            ContactError::NotConfigured => {
                "Contact form is not configured. Please use the email link instead.".to_string()
            }
            ContactError::Network => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ContactError::RateLimited => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            ContactError::Failed => "Failed to send message. Please try again later.".to_string(),
        }
    }
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

/// Classify a relay error by its message text.
fn classify(detail: &str) -> ContactError {
    let lower = detail.to_lowercase();
    if lower.contains("not configured") {
        ContactError::NotConfigured
    } else if lower.contains("rate limit") {
        ContactError::RateLimited
    } else if lower.contains("network") {
        ContactError::Network
    } else {
        ContactError::Failed
    }
}

/// Contact relay service.
pub struct ContactService {
    relay: Option<EmailJsClient>,
    /// Recipient address from the site configuration.
    recipient: String,
}

impl ContactService {
    pub fn new(relay: Option<EmailJsClient>, recipient: String) -> Self {
        Self { relay, recipient }
    }

    /// Whether relay credentials are configured.
    pub fn is_configured(&self) -> bool {
        self.relay.is_some()
    }

    /// Validate and relay a submission.
    ///
    /// Validation failures and missing configuration are reported without
    /// any network call being made.
    pub async fn submit(&self, form: &ContactForm) -> Result<(), ContactError> {
        if let Err(e) = form.validate() {
            return Err(ContactError::Invalid(e.to_string()));
        }

        let Some(ref relay) = self.relay else {
            return Err(ContactError::NotConfigured);
        };

        let params = TemplateParams {
            to_email: self.recipient.clone(),
            from_name: form.name.clone(),
            from_email: form.email.clone(),
            message: form.message.clone(),
            reply_to: form.email.clone(),
        };

        match relay.send(&params).await {
            Ok(()) => {
                info!("Contact message relayed from {}", form.email);
                Ok(())
            }
            Err(e) => {
                error!("Contact relay failed: {}", e);
                Err(classify(&e.to_string()))
            }
        }
    }
}
