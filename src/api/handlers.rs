use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::state::AppState;
use crate::application::cache::CacheStats;
use crate::application::{ContactError, ContactForm};
use utoipa::{IntoParams, ToSchema};

#[allow(unused_imports)]
use serde_json::json; // Used in utoipa::path examples

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Optional account override accepted by the profile endpoints.
#[derive(Deserialize, IntoParams, ToSchema, Debug, Default)]
pub struct AccountQuery {
    /// GitHub login to show instead of the configured account
    #[param(example = "octocat")]
    pub username: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub mode: String,
    pub contact: String,
    pub cache: CacheStats,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Health check passed", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        mode: if state.template_mode {
            "template".to_string()
        } else {
            "live".to_string()
        },
        contact: if state.contact.is_configured() {
            "configured".to_string()
        } else {
            "not-configured".to_string()
        },
        cache: state.cache.stats().await,
    })
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "system",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain")
    )
)]
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

fn account(state: &AppState, query: &AccountQuery) -> String {
    query
        .username
        .clone()
        .unwrap_or_else(|| state.portfolio.default_login().to_string())
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/profile",
    params(AccountQuery),
    tag = "portfolio",
    responses(
        (status = 200, description = "Account profile, fallback shape when the fetch failed", body = serde_json::Value,
            example = json!({"origin": "live", "data": {"name": "Octo Cat", "login": "octocat", "public_repos": 8}})
        )
    )
)]
#[instrument(skip(state, query))]
pub async fn profile_handler(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let login = account(&state, &query);
    metrics::counter!("portfolio_requests_total", "endpoint" => "profile").increment(1);
    Json(state.portfolio.profile(&login).await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/projects",
    params(AccountQuery),
    tag = "portfolio",
    responses(
        (status = 200, description = "Project grid: no forks, sorted by stars, at most 12 entries", body = serde_json::Value)
    )
)]
#[instrument(skip(state, query))]
pub async fn projects_handler(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let login = account(&state, &query);
    metrics::counter!("portfolio_requests_total", "endpoint" => "projects").increment(1);
    Json(state.portfolio.projects(&login).await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/pinned",
    params(AccountQuery),
    tag = "portfolio",
    responses(
        (status = 200, description = "Pinned repositories", body = serde_json::Value)
    )
)]
#[instrument(skip(state, query))]
pub async fn pinned_handler(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let login = account(&state, &query);
    Json(state.portfolio.pinned(&login).await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/organizations",
    params(AccountQuery),
    tag = "portfolio",
    responses(
        (status = 200, description = "Organizations", body = serde_json::Value)
    )
)]
#[instrument(skip(state, query))]
pub async fn organizations_handler(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let login = account(&state, &query);
    Json(state.portfolio.organizations(&login).await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/social",
    params(AccountQuery),
    tag = "portfolio",
    responses(
        (status = 200, description = "Linked social accounts", body = serde_json::Value)
    )
)]
#[instrument(skip(state, query))]
pub async fn social_handler(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let login = account(&state, &query);
    Json(state.portfolio.social_accounts(&login).await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/activity",
    params(AccountQuery),
    tag = "portfolio",
    responses(
        (status = 200, description = "Recent public activity, at most 3 pages of events", body = serde_json::Value)
    )
)]
#[instrument(skip(state, query))]
pub async fn activity_handler(
    Query(query): Query<AccountQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let login = account(&state, &query);
    metrics::counter!("portfolio_requests_total", "endpoint" => "activity").increment(1);
    Json(state.portfolio.recent_activity(&login).await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/skills",
    tag = "portfolio",
    responses(
        (status = 200, description = "Static proficiency grid from the site configuration", body = serde_json::Value)
    )
)]
pub async fn skills_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "skills": state.portfolio.skills(),
        "navigation": state.portfolio.navigation(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/deployments",
    tag = "portfolio",
    responses(
        (status = 200, description = "Deployment projects, empty when no credential is configured", body = serde_json::Value)
    )
)]
#[instrument(skip(state))]
pub async fn deployments_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.portfolio.deployments().await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/repos/{repo}/traffic",
    params(
        ("repo" = String, Path, description = "Repository name under the configured account")
    ),
    tag = "portfolio",
    responses(
        (status = 200, description = "14-day traffic summary, zeroed on failure", body = serde_json::Value)
    )
)]
#[instrument(skip(state))]
pub async fn traffic_handler(
    Path(repo): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let owner = state.portfolio.default_login().to_string();
    Json(state.portfolio.traffic(&owner, &repo).await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/repos/{repo}/alerts",
    params(
        ("repo" = String, Path, description = "Repository name under the configured account")
    ),
    tag = "portfolio",
    responses(
        (status = 200, description = "Dependabot alert rollup: enabled, not enabled, or unavailable", body = serde_json::Value,
            example = json!({"status": "enabled", "open_by_severity": {"high": 2}})
        )
    )
)]
#[instrument(skip(state))]
pub async fn alerts_handler(
    Path(repo): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let owner = state.portfolio.default_login().to_string();
    Json(state.portfolio.dependabot_summary(&owner, &repo).await)
}

#[utoipa::path(
    get,
    path = "/v1/portfolio/repos/{repo}/stack",
    params(
        ("repo" = String, Path, description = "Repository name under the configured account")
    ),
    tag = "portfolio",
    responses(
        (status = 200, description = "Manifest, router flavor and latest framework release", body = serde_json::Value)
    )
)]
#[instrument(skip(state))]
pub async fn stack_handler(
    Path(repo): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let owner = state.portfolio.default_login().to_string();
    Json(state.portfolio.repo_stack(&owner, &repo).await)
}

#[derive(Serialize, ToSchema)]
pub struct ContactResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/v1/contact",
    request_body = ContactForm,
    tag = "contact",
    responses(
        (status = 200, description = "Message relayed", body = ContactResponse),
        (status = 400, description = "Validation failed",
            example = json!({"message": "email: invalid email format"})
        ),
        (status = 429, description = "Relay rate limited"),
        (status = 502, description = "Relay unreachable"),
        (status = 503, description = "Relay not configured")
    )
)]
#[instrument(skip(state, form), fields(from = %form.email))]
pub async fn contact_handler(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>, (StatusCode, Json<ContactResponse>)> {
    metrics::counter!("portfolio_requests_total", "endpoint" => "contact").increment(1);

    match state.contact.submit(&form).await {
        Ok(()) => Ok(Json(ContactResponse {
            message: "Message sent successfully! I'll get back to you soon.".to_string(),
        })),
        Err(e) => {
            let status = match e {
                ContactError::Invalid(_) => StatusCode::BAD_REQUEST,
                ContactError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                ContactError::Network => StatusCode::BAD_GATEWAY,
                ContactError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                ContactError::Failed => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((
                status,
                Json(ContactResponse {
                    message: e.user_message(),
                }),
            ))
        }
    }
}
