use crate::common::{ConfigError, ConfigResult};
use crate::domains::scanner_agent::{AgentSettings, DEFAULT_PASSWORD};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub fleet: FleetConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub agent_count: usize,
    pub interval_secs: u64,
    pub max_ticks: Option<u64>,
    pub password: String,
    pub token_ttl_secs: u64,
    pub refresh_margin_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also append agent logs to this file.
    pub file: Option<String>,
    /// Queue depth between agents and the log sinks.
    pub buffer: Option<usize>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5171".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            agent_count: 5,
            interval_secs: 10,
            max_ticks: None,
            password: DEFAULT_PASSWORD.to_string(),
            token_ttl_secs: 8 * 3600,
            refresh_margin_secs: 60,
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let config = Self::read_file(path).await?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` when it exists, falls back to defaults otherwise, then
    /// applies environment overrides.
    pub async fn load<P: AsRef<Path>>(path: Option<P>) -> ConfigResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok()).await
    }

    /// Validation runs once, after the overrides, so the environment can
    /// repair a value the file gets wrong.
    pub async fn load_with<P, F>(path: Option<P>, lookup: F) -> ConfigResult<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(p) if p.as_ref().exists() => Self::read_file(p).await?,
            _ => Self::default(),
        };
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    async fn read_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&content)?)
    }

    /// `API_URL`, `ROBOTS_COUNT`, `UPDATE_INTERVAL`, `MAX_TICKS`, `LOG_FILE`.
    /// `lookup` is injected so tests do not touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("API_URL") {
            self.backend.base_url = url;
        }
        if let Some(v) = lookup("ROBOTS_COUNT") {
            self.fleet.agent_count = parse_var("ROBOTS_COUNT", &v)?;
        }
        if let Some(v) = lookup("UPDATE_INTERVAL") {
            self.fleet.interval_secs = parse_var("UPDATE_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("MAX_TICKS") {
            self.fleet.max_ticks = Some(parse_var("MAX_TICKS", &v)?);
        }
        if let Some(path) = lookup("LOG_FILE") {
            self.logging.file = Some(path);
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(invalid("backend.base_url", "must not be empty"));
        }
        if self.backend.request_timeout_secs == 0 {
            return Err(invalid("backend.request_timeout_secs", "must be positive"));
        }
        if self.fleet.agent_count == 0 {
            return Err(invalid("fleet.agent_count", "at least one agent is required"));
        }
        if self.fleet.interval_secs == 0 {
            return Err(invalid("fleet.interval_secs", "must be positive"));
        }
        if self.fleet.refresh_margin_secs >= self.fleet.token_ttl_secs {
            return Err(invalid(
                "fleet.refresh_margin_secs",
                "must be shorter than fleet.token_ttl_secs",
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            interval: Duration::from_secs(self.fleet.interval_secs),
            token_ttl: Duration::from_secs(self.fleet.token_ttl_secs),
            refresh_margin: Duration::from_secs(self.fleet.refresh_margin_secs),
            max_ticks: self.fleet.max_ticks,
            password: self.fleet.password.clone(),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, &format!("{:?}: {}", value, e)))
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue { key: key.to_string(), reason: reason.to_string() }
}
