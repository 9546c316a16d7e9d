//! Portfolio Data Gateway
//!
//! A REST gateway that aggregates GitHub-derived portfolio data (profile,
//! repositories, pinned items, organizations, activity) behind an
//! in-process TTL cache, and relays contact-form submissions to the
//! EmailJS transactional-email API.
//!
//! # Architecture
//!
//! The gateway follows clean/onion architecture with clear separation of
//! concerns:
//! - **Domain**: entities and the outbound API traits
//! - **Application**: cache, portfolio and contact services
//! - **Infrastructure**: external integrations (GitHub REST/GraphQL,
//!   Vercel, EmailJS)
//! - **API**: HTTP handlers, routing, and middleware
//!
//! # Configuration
//!
//! The gateway is configured via `config.yaml` and environment variables:
//! - `GH_TOKEN`: GitHub personal access token (optional)
//!   - If set: authenticated requests (5,000 req/hour) and access to the
//!     GraphQL, traffic and Dependabot endpoints
//!   - If not set: unauthenticated requests (60 req/hour, public data only)
//! - `VC_TOKEN`: Vercel token (optional; deployments are hidden without it)
//! - `GITHUB_USERNAME`: overrides the account from `config.yaml`
//! - `EMAILJS_SERVICE_ID` / `EMAILJS_TEMPLATE_ID` / `EMAILJS_USER_ID`:
//!   contact relay credentials (the form reports "not configured" without
//!   them)
//! - `IS_TEMPLATE`: marks a fresh template clone; surfaced on `/health`
//! - `RUST_LOG`, `LOG_FORMAT`: logging level and text/json format
//!
//! # Quick Start
//!
//! ```bash
//! export GH_TOKEN="your_token_here"   # Optional
//! cargo run --release
//!
//! curl http://localhost:3020/health
//! curl http://localhost:3020/v1/portfolio/profile
//! ```

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use portfolio_gateway::api::{create_router, AppState};
use portfolio_gateway::application::{ContactService, MemoryCache, PortfolioService};
use portfolio_gateway::domain::{Identity, NavLink, SkillCategory};
use portfolio_gateway::infrastructure::{
    EmailJsClient, GitHubClient, GitHubGraphQlClient, VercelClient,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Top-level application configuration loaded from `config.yaml`.
#[derive(Deserialize, Debug, Clone)]
struct Config {
    /// Server configuration (host, port, CORS origins)
    server: ServerConfig,
    /// Cache sizing
    #[serde(default)]
    cache: CacheConfig,
    /// Static identity record used as the fallback display data
    identity: Identity,
    /// Proficiency grid shown on the tech-stack section
    #[serde(default)]
    skills: Vec<SkillCategory>,
    /// Navigation links for the collapsible nav
    #[serde(default)]
    navigation: Vec<NavLink>,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    capacity: usize,
}

fn default_cache_capacity() -> usize {
    portfolio_gateway::application::cache::DEFAULT_CAPACITY
}

/// Server configuration settings.
#[derive(Deserialize, Debug, Clone)]
struct ServerConfig {
    /// Host address to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    host: String,
    /// Port number to listen on (default: 3020)
    #[serde(default = "default_port")]
    port: u16,
    /// Comma-separated list of allowed CORS origins (default: "*")
    #[serde(default = "default_allowed_origins")]
    allowed_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3020
}
fn default_allowed_origins() -> String {
    "*".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = EnvFilter::new(env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));

    if log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let github_token = env::var("GH_TOKEN").ok();
    if github_token.is_none() {
        tracing::warn!(
            "GH_TOKEN not found in env - using unauthenticated requests (60 req/hour, public data only). Set GH_TOKEN for higher limits and the GraphQL/traffic/Dependabot endpoints"
        );
    } else {
        tracing::info!("GH_TOKEN found - using authenticated requests (5,000 req/hour limit)");
    }

    // Load Config
    let config_content = fs::read_to_string("config.yaml")
        .context("Failed to read config.yaml - ensure file exists in working directory")?;
    let config: Config = serde_yaml::from_str(&config_content)
        .context("Failed to parse config.yaml - check YAML syntax and structure")?;

    let mut identity = config.identity.clone();
    if let Ok(username) = env::var("GITHUB_USERNAME") {
        identity.github_username = username;
    }
    let template_mode = env::var("IS_TEMPLATE")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if template_mode {
        tracing::warn!(
            "IS_TEMPLATE=true - this is still a template clone; update config.yaml and unset the flag"
        );
    }

    // Infrastructure
    let github = Arc::new(GitHubClient::new(github_token.clone())?);
    let graph = Arc::new(GitHubGraphQlClient::new(github_token)?);
    let deploy = Arc::new(VercelClient::new(env::var("VC_TOKEN").ok())?);

    let relay = EmailJsClient::from_env();
    if relay.is_none() {
        tracing::warn!("EmailJS credentials incomplete - contact form will report 'not configured'");
    }

    // Application
    let cache = Arc::new(MemoryCache::new(config.cache.capacity));
    tracing::info!(
        "Memoization cache initialized: capacity {} entries",
        config.cache.capacity
    );

    let portfolio = Arc::new(PortfolioService::new(
        github,
        graph,
        deploy,
        cache.clone(),
        identity.clone(),
        config.skills.clone(),
        config.navigation.clone(),
    ));
    let contact = Arc::new(ContactService::new(relay, identity.email.clone()));

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let state = AppState {
        portfolio,
        contact,
        cache,
        metrics,
        template_mode,
    };

    let app = create_router(state, config.server.allowed_origins.clone());

    // Allow PORT env var override
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;
    tracing::info!("Portfolio gateway running at http://{}", addr);
    tracing::info!("Serving portfolio for account: {}", identity.github_username);

    // Graceful shutdown handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error during operation")?;

    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) to initiate graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
