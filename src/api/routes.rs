use crate::api::doc::ApiDoc;
use crate::api::handlers::{
    activity_handler, alerts_handler, contact_handler, deployments_handler, health_handler,
    metrics_handler, organizations_handler, pinned_handler, profile_handler, projects_handler,
    skills_handler, social_handler, stack_handler, traffic_handler,
};
use crate::api::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

use axum::http::HeaderValue;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the CORS layer from a comma-separated origin list; `*` or an
/// empty/invalid list falls back to permissive.
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins == "*" {
        return CorsLayer::permissive();
    }

    let origin_values: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<HeaderValue>().ok()
            }
        })
        .collect();

    if origin_values.is_empty() {
        tracing::warn!("No valid CORS origins found, falling back to permissive CORS");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origin_values))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn create_router(state: AppState, allowed_origins: String) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: Duration,
                     _span: &tracing::Span| {
                        let status = response.status().as_u16().to_string();
                        metrics::counter!("http_requests_total", "status" => status.clone())
                            .increment(1);
                        metrics::histogram!("http_request_duration_seconds", "status" => status)
                            .record(latency.as_secs_f64());

                        if latency.as_millis() > 1000 {
                            tracing::warn!("Slow HTTP request: {}ms", latency.as_millis());
                        }
                    },
                )
                .on_failure(
                    |_error: tower_http::classify::ServerErrorsFailureClass,
                     _latency: Duration,
                     _span: &tracing::Span| {
                        metrics::counter!("http_requests_total", "status" => "error")
                            .increment(1);
                    },
                ),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(60),
        ))
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(cors_layer(&allowed_origins));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // System endpoints (no versioning)
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // OpenAPI spec (downloadable)
        .route("/v1/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        // Portfolio data
        .route("/v1/portfolio/profile", get(profile_handler))
        .route("/v1/portfolio/projects", get(projects_handler))
        .route("/v1/portfolio/pinned", get(pinned_handler))
        .route("/v1/portfolio/organizations", get(organizations_handler))
        .route("/v1/portfolio/social", get(social_handler))
        .route("/v1/portfolio/activity", get(activity_handler))
        .route("/v1/portfolio/skills", get(skills_handler))
        .route("/v1/portfolio/deployments", get(deployments_handler))
        .route("/v1/portfolio/repos/{repo}/traffic", get(traffic_handler))
        .route("/v1/portfolio/repos/{repo}/alerts", get(alerts_handler))
        .route("/v1/portfolio/repos/{repo}/stack", get(stack_handler))
        // Contact relay
        .route("/v1/contact", post(contact_handler))
        .layer(middleware)
        .with_state(state)
}
