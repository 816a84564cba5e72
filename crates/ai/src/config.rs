//! Connection settings for the chat-completion service.
//!
//! Built explicitly by whoever constructs the ports and scoped to a batch
//! run; nothing here is process-global.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub const ENV_ENDPOINT: &str = "ENDPOINT_URL";
pub const ENV_DEPLOYMENT: &str = "DEPLOYMENT_NAME";
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_TIMEOUT_SECS: &str = "STOCKCAST_AI_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{key}`: `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    /// Deployment (model) name.
    pub deployment: String,
    pub api_key: SecretString,
    pub api_version: String,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,
}

impl AiConfig {
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            endpoint: endpoint.into().trim().trim_end_matches('/').to_string(),
            deployment: deployment.into().trim().to_string(),
            api_key: SecretString::from(api_key.into()),
            api_version: api_version.into().trim().to_string(),
            timeout: DEFAULT_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup` (environment-shaped key/value source).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let config = Self::new(
            required(ENV_ENDPOINT)?,
            required(ENV_DEPLOYMENT)?,
            required(ENV_API_KEY)?,
            required(ENV_API_VERSION)?,
        )?;

        match lookup(ENV_TIMEOUT_SECS) {
            None => Ok(config),
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or(ConfigError::Invalid {
                        key: ENV_TIMEOUT_SECS,
                        value: raw.clone(),
                    })?;
                Ok(config.with_timeout(Duration::from_secs(secs)))
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::Missing(ENV_ENDPOINT));
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                key: ENV_ENDPOINT,
                value: self.endpoint.clone(),
            });
        }
        if self.deployment.is_empty() {
            return Err(ConfigError::Missing(ENV_DEPLOYMENT));
        }
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::Missing(ENV_API_KEY));
        }
        if self.api_version.is_empty() {
            return Err(ConfigError::Missing(ENV_API_VERSION));
        }
        Ok(())
    }

    /// Chat-completions URL of the configured deployment.
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}
