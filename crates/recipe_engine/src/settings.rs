use std::str::FromStr;
use std::time::Duration;

use engine_logging::engine_info;
use thiserror::Error;
use url::Url;

use crate::PollSettings;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const ENV_BASE_URL: &str = "RECIPE_API_URL";
const ENV_ROUTES: &str = "RECIPE_API_ROUTES";
const ENV_MAX_RECIPES: &str = "RECIPE_MAX_RECIPES";
const ENV_CUISINE_STYLE: &str = "RECIPE_CUISINE_STYLE";
const ENV_HEALTH_TIMEOUT_MS: &str = "RECIPE_HEALTH_TIMEOUT_MS";
const ENV_RETRY_INTERVAL_MS: &str = "RECIPE_RETRY_INTERVAL_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid base url: {reason}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{key}={value:?} is not a valid number")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
    #[error("unknown route set {0:?} (expected \"v1\" or \"legacy\")")]
    UnknownRoutes(String),
}

/// Which path layout the recipe API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecipeRoutes {
    /// `/recipes/generate`
    Legacy,
    /// `/api/v1/recipes/generate`
    #[default]
    V1,
}

impl RecipeRoutes {
    pub fn generate_path(self) -> &'static str {
        match self {
            RecipeRoutes::Legacy => "/recipes/generate",
            RecipeRoutes::V1 => "/api/v1/recipes/generate",
        }
    }
}

impl FromStr for RecipeRoutes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(RecipeRoutes::V1),
            "legacy" => Ok(RecipeRoutes::Legacy),
            other => Err(ConfigError::UnknownRoutes(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Scheme, host and optional path prefix, without a trailing slash.
    pub base_url: String,
    pub routes: RecipeRoutes,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Give up on the health poll after this long.
    pub health_timeout: Duration,
    pub retry_interval: Duration,
    pub max_recipes: u32,
    pub cuisine_style: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            routes: RecipeRoutes::default(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(60),
            retry_interval: Duration::from_secs(2),
            max_recipes: 3,
            cuisine_style: "any".to_string(),
        }
    }
}

impl ApiSettings {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from `lookup`; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = value(&lookup, ENV_BASE_URL) {
            settings = settings.with_base_url(&raw)?;
        }
        if let Some(raw) = value(&lookup, ENV_ROUTES) {
            settings.routes = raw.parse()?;
        }
        if let Some(raw) = value(&lookup, ENV_MAX_RECIPES) {
            settings.max_recipes = parse_positive(ENV_MAX_RECIPES, &raw)? as u32;
        }
        if let Some(raw) = value(&lookup, ENV_CUISINE_STYLE) {
            settings.cuisine_style = raw;
        }
        if let Some(raw) = value(&lookup, ENV_HEALTH_TIMEOUT_MS) {
            settings.health_timeout =
                Duration::from_millis(parse_positive(ENV_HEALTH_TIMEOUT_MS, &raw)?);
        }
        if let Some(raw) = value(&lookup, ENV_RETRY_INTERVAL_MS) {
            settings.retry_interval =
                Duration::from_millis(parse_positive(ENV_RETRY_INTERVAL_MS, &raw)?);
        }

        Ok(settings)
    }

    /// Validates and normalizes `raw` as the API base url.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
            key: ENV_BASE_URL,
            value: raw.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                key: ENV_BASE_URL,
                value: raw.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            max_duration: self.health_timeout,
            interval: self.retry_interval,
        }
    }
}

fn value<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => Some(raw),
        None => {
            engine_info!("{} not set, using default", key);
            None
        }
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let parsed: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })?;
    if parsed == 0 {
        return Err(ConfigError::Zero { key });
    }
    if key == ENV_MAX_RECIPES && parsed > u64::from(u32::MAX) {
        return Err(ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        });
    }
    Ok(parsed)
}
