use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::workflows::command_parser::CommandConvention;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub runner: Runner,
    pub postman: Postman,
    pub notifications: Notifications,
    pub observability: Observability,
    /// Externally reachable base URL used to link generated reports.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Resolve names to JSON files under the configured directories.
    Local,
    /// Resolve names against a remote Postman workspace.
    Postman,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Runner {
    pub newman_bin: String,
    pub collections_dir: PathBuf,
    pub environments_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub report_file: String,
    pub reporters: Vec<String>,
    pub default_iterations: u32,
    #[serde(default)]
    pub default_collection: Option<String>,
    pub convention: CommandConvention,
    pub resolver: ResolverKind,
}

impl Runner {
    /// Returns `true` when the run writes an HTML report that can be linked.
    pub fn writes_html_report(&self) -> bool {
        self.reporters.iter().any(|r| r == "htmlextra")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Postman {
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Notifications {
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Observability {
    pub service_name: String,
    pub json_logs: bool,
    pub enable_metrics: bool,
}

/// Load settings from `config/default.toml`, `config/<env>.toml`, and env overrides.
///
/// `PORT` and `POSTMAN_API_KEY` are honoured on top of the `RELAY__` prefixed variables.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(config::Environment::with_prefix("RELAY").separator("__"))
        .set_override_option("server.port", std::env::var("PORT").ok())?
        .set_override_option("postman.api_key", std::env::var("POSTMAN_API_KEY").ok())?
        .build()?
        .try_deserialize()
}
