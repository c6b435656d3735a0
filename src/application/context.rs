use std::sync::Arc;

use crate::config::Settings;
use crate::domain::services::name_resolver::NameResolver;
use crate::domain::services::notifier::Notifier;
use crate::domain::services::run_executor::RunExecutor;

/// Shared collaborators and settings used by the relay pipeline.
pub struct AppContext {
    pub settings: Settings,
    pub executor: Arc<dyn RunExecutor>,
    pub resolver: Arc<dyn NameResolver>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Build a new application context from settings and collaborators.
    pub fn new(
        settings: Settings,
        executor: Arc<dyn RunExecutor>,
        resolver: Arc<dyn NameResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            executor,
            resolver,
            notifier,
        }
    }

    /// Public URL of the most recent HTML report, when one is produced and reachable.
    pub fn report_link_url(&self) -> Option<String> {
        if !self.settings.runner.writes_html_report() {
            return None;
        }
        let base = self.settings.public_base_url.as_deref()?;
        Some(format!(
            "{}/reports/{}",
            base.trim_end_matches('/'),
            self.settings.runner.report_file
        ))
    }
}
