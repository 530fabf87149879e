//! Configuration for the company directory
//!
//! Layered with figment: built-in defaults, then an optional YAML file, then
//! `DIRECTORY_`-prefixed environment variables (`__` separates sections),
//! then the plain deployment variables `DATABASE_URL`, `PORT`,
//! `FRONTEND_ORIGIN` and `APP_ENV` (`NODE_ENV` is accepted as a fallback).

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub directory: Config,
    /// Deployment environment ("development", "production", ...)
    #[serde(default = "default_environment")]
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origin for the admin frontend; any origin when unset
    #[serde(default)]
    pub frontend_origin: Option<String>,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_origin: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sea-orm connection URL (sqlite or postgres)
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format; JSON in production when unset
    #[serde(default)]
    pub format: Option<LogFormat>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

/// Company directory behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Page size used when a listing does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Upper bound for any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,

    /// Default number of search results
    #[serde(default = "default_search_limit")]
    pub search_limit: u64,

    /// Maximum number of pages returned by a category listing
    #[serde(default = "default_max_category_results")]
    pub max_category_results: u64,

    /// Maximum number of dynamic components per page
    #[serde(default = "default_max_dynamic_components")]
    pub max_dynamic_components: usize,

    /// Validate tab content against the per-kind JSON Schema
    #[serde(default = "default_true")]
    pub strict_tab_validation: bool,

    /// Capacity of the in-process event channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            search_limit: default_search_limit(),
            max_category_results: default_max_category_results(),
            max_dynamic_components: default_max_dynamic_components(),
            strict_tab_validation: true,
            event_capacity: default_event_capacity(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Invalid(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Yaml::file(path));
        }

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: AppConfig = figment
            .merge(Env::prefixed("DIRECTORY_").split("__"))
            .merge(Env::raw().only(&["NODE_ENV"]).map(|_| "environment".into()))
            .merge(deployment_env())
            .extract()
            .map_err(Box::new)?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url cannot be empty".into()));
        }
        if self.directory.max_page_size == 0 || self.directory.default_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".into()));
        }
        if self.directory.default_page_size > self.directory.max_page_size {
            return Err(ConfigError::Invalid(
                "directory.default_page_size exceeds directory.max_page_size".into(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Effective log format
    pub fn log_format(&self) -> LogFormat {
        match self.logging.format {
            Some(format) => format,
            None if self.is_production() => LogFormat::Json,
            None => LogFormat::Pretty,
        }
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Plain variables used by existing deployments
fn deployment_env() -> Env {
    Env::raw().filter_map(|key| {
        deployment_key(&key.as_str().to_ascii_uppercase()).map(Into::into)
    })
}

fn deployment_key(key: &str) -> Option<&'static str> {
    match key {
        "DATABASE_URL" => Some("database.url"),
        "PORT" => Some("server.port"),
        "FRONTEND_ORIGIN" => Some("server.frontend_origin"),
        "APP_ENV" => Some("environment"),
        _ => None,
    }
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024 // 2MB
}

fn default_database_url() -> String {
    "sqlite://data/directory.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_log_level() -> String {
    "info,sqlx=warn,sea_orm=warn".to_string()
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

fn default_search_limit() -> u64 {
    20
}

fn default_max_category_results() -> u64 {
    500
}

fn default_max_dynamic_components() -> usize {
    200
}

fn default_true() -> bool {
    true
}

fn default_event_capacity() -> usize {
    256
}
