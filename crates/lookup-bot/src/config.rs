//! Configuration for lookup operations and the bot process

use crate::error::{BotError, Result};
use lookup_utils::EnvSource;
use std::time::Duration;
use url::Url;

/// Default geo-IP provider
pub const DEFAULT_GEOIP_API_URL: &str = "http://ip-api.com";

/// Default liveness port
pub const DEFAULT_HEALTH_PORT: u16 = 10000;

/// Configuration for lookups and the process around them
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Phone lookup endpoint; `key` and `phone` are appended as query parameters
    pub phone_api_url: Url,

    /// Key sent with every phone lookup
    pub phone_api_key: String,

    /// Geo-IP base URL; lookups go to `<base>/json/<ip>`
    pub geoip_api_url: Url,

    /// Phone lookup timeout
    pub phone_timeout: Duration,

    /// Geo-IP lookup timeout
    pub geoip_timeout: Duration,

    /// Idle time after which a session is dropped
    pub session_ttl: Duration,

    /// How often expired sessions are swept
    pub session_sweep_interval: Duration,

    /// Port for the liveness HTTP server
    pub health_port: u16,
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&lookup_utils::ProcessEnv)
    }

    /// Load configuration from any [`EnvSource`].
    ///
    /// `PHONE_API_URL` and `PHONE_API_KEY` are required; there is no built-in
    /// fallback endpoint or key.
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(url) = env.get("PHONE_API_URL") {
            builder = builder.phone_api_url(url);
        }
        if let Some(key) = env.get("PHONE_API_KEY") {
            builder = builder.phone_api_key(key);
        }
        if let Some(url) = env.get("GEOIP_API_URL") {
            builder = builder.geoip_api_url(url);
        }
        if let Some(secs) = parse_env::<u64>(env, "PHONE_TIMEOUT_SECS")? {
            builder = builder.phone_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_env::<u64>(env, "GEOIP_TIMEOUT_SECS")? {
            builder = builder.geoip_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_env::<u64>(env, "SESSION_TTL_SECS")? {
            builder = builder.session_ttl(Duration::from_secs(secs));
        }
        if let Some(port) = parse_env::<u16>(env, "PORT")? {
            builder = builder.health_port(port);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.phone_api_key.trim().is_empty() {
            return Err(BotError::Config("PHONE_API_KEY must not be empty".to_string()));
        }

        for (name, url) in [
            ("PHONE_API_URL", &self.phone_api_url),
            ("GEOIP_API_URL", &self.geoip_api_url),
        ] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(BotError::Config(format!(
                    "{name} must be an http(s) URL, got {url}"
                )));
            }
        }

        if self.phone_timeout.is_zero() || self.geoip_timeout.is_zero() {
            return Err(BotError::Config(
                "lookup timeouts must be greater than 0".to_string(),
            ));
        }

        if self.session_ttl.is_zero() || self.session_sweep_interval.is_zero() {
            return Err(BotError::Config(
                "session ttl and sweep interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(env: &impl EnvSource, key: &str) -> Result<Option<T>> {
    env.parse::<T>(key)
        .map_err(|raw| BotError::Config(format!("{key} has an invalid value: {raw:?}")))
}

fn parse_url(name: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| BotError::Config(format!("{name} is not a valid URL: {e}")))
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    phone_api_url: Option<String>,
    phone_api_key: Option<String>,
    geoip_api_url: Option<String>,
    phone_timeout: Option<Duration>,
    geoip_timeout: Option<Duration>,
    session_ttl: Option<Duration>,
    session_sweep_interval: Option<Duration>,
    health_port: Option<u16>,
}

impl BotConfigBuilder {
    /// Set the phone lookup endpoint
    pub fn phone_api_url(mut self, url: impl Into<String>) -> Self {
        self.phone_api_url = Some(url.into());
        self
    }

    /// Set the phone lookup key
    pub fn phone_api_key(mut self, key: impl Into<String>) -> Self {
        self.phone_api_key = Some(key.into());
        self
    }

    /// Set the geo-IP base URL
    pub fn geoip_api_url(mut self, url: impl Into<String>) -> Self {
        self.geoip_api_url = Some(url.into());
        self
    }

    /// Set the phone lookup timeout
    pub fn phone_timeout(mut self, timeout: Duration) -> Self {
        self.phone_timeout = Some(timeout);
        self
    }

    /// Set the geo-IP lookup timeout
    pub fn geoip_timeout(mut self, timeout: Duration) -> Self {
        self.geoip_timeout = Some(timeout);
        self
    }

    /// Set the session TTL
    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    /// Set the session sweep interval
    pub fn session_sweep_interval(mut self, interval: Duration) -> Self {
        self.session_sweep_interval = Some(interval);
        self
    }

    /// Set the liveness port
    pub fn health_port(mut self, port: u16) -> Self {
        self.health_port = Some(port);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let phone_api_url = self
            .phone_api_url
            .ok_or_else(|| BotError::Config("PHONE_API_URL is not set".to_string()))?;
        let phone_api_key = self
            .phone_api_key
            .ok_or_else(|| BotError::Config("PHONE_API_KEY is not set".to_string()))?;
        let geoip_api_url = self
            .geoip_api_url
            .unwrap_or_else(|| DEFAULT_GEOIP_API_URL.to_string());

        let config = BotConfig {
            phone_api_url: parse_url("PHONE_API_URL", &phone_api_url)?,
            phone_api_key,
            geoip_api_url: parse_url("GEOIP_API_URL", &geoip_api_url)?,
            phone_timeout: self.phone_timeout.unwrap_or(Duration::from_secs(15)),
            geoip_timeout: self.geoip_timeout.unwrap_or(Duration::from_secs(10)),
            session_ttl: self.session_ttl.unwrap_or(Duration::from_secs(3600)),
            session_sweep_interval: self
                .session_sweep_interval
                .unwrap_or(Duration::from_secs(300)),
            health_port: self.health_port.unwrap_or(DEFAULT_HEALTH_PORT),
        };

        config.validate()?;
        Ok(config)
    }
}
