pub mod emailjs;
pub mod github;
pub mod github_graphql;
pub mod vercel;

pub use emailjs::{EmailJsClient, TemplateParams};
pub use github::GitHubClient;
pub use github_graphql::GitHubGraphQlClient;
pub use vercel::VercelClient;
