use crate::application::{ContactService, MemoryCache, PortfolioService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub portfolio: Arc<PortfolioService>,
    pub contact: Arc<ContactService>,
    pub cache: Arc<MemoryCache>,
    pub metrics: PrometheusHandle,
    /// True when the site still runs on template data (`IS_TEMPLATE`).
    pub template_mode: bool,
}
