pub mod cache;
pub mod contact_service;
pub mod portfolio_service;

pub use cache::{CacheStats, MemoryCache};
pub use contact_service::{ContactError, ContactForm, ContactService};
pub use portfolio_service::PortfolioService;
