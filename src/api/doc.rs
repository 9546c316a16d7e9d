use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // System handlers
        crate::api::handlers::health_handler,
        crate::api::handlers::metrics_handler,
        // Portfolio handlers
        crate::api::handlers::profile_handler,
        crate::api::handlers::projects_handler,
        crate::api::handlers::pinned_handler,
        crate::api::handlers::organizations_handler,
        crate::api::handlers::social_handler,
        crate::api::handlers::activity_handler,
        crate::api::handlers::skills_handler,
        crate::api::handlers::deployments_handler,
        crate::api::handlers::traffic_handler,
        crate::api::handlers::alerts_handler,
        crate::api::handlers::stack_handler,
        // Contact relay
        crate::api::handlers::contact_handler
    ),
    components(
        schemas(
            crate::api::handlers::HealthResponse,
            crate::api::handlers::ContactResponse,
            crate::application::cache::CacheStats,
            crate::application::contact_service::ContactForm,
            crate::domain::Profile,
            crate::domain::Repo,
            crate::domain::Project,
            crate::domain::SocialAccount,
            crate::domain::PinnedRepo,
            crate::domain::Organization,
            crate::domain::ActivityEvent,
            crate::domain::EventRepo,
            crate::domain::TrafficSummary,
            crate::domain::TrafficPoint,
            crate::domain::DependabotStatus,
            crate::domain::RouterCheck,
            crate::domain::LatestRelease,
            crate::domain::DeployProject,
            crate::domain::RepoStack,
            crate::domain::Origin,
            crate::domain::Identity,
            crate::domain::SkillCategory,
            crate::domain::Skill,
            crate::domain::NavLink
        )
    ),
    tags(
        (name = "system", description = "Health and observability"),
        (name = "portfolio", description = "GitHub-derived portfolio data"),
        (name = "contact", description = "Contact-form relay")
    ),
    info(
        title = "Portfolio Data Gateway",
        description = "Caching gateway that aggregates GitHub profile data for a portfolio site and relays contact-form submissions",
        version = env!("CARGO_PKG_VERSION")
    )
)]
pub struct ApiDoc;
