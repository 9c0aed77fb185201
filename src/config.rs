//! Configuration management for Agent Relay.
//!
//! Configuration is read from environment variables (a `.env` file in the
//! working directory is loaded first by the binaries):
//! - `OPENAI_API_KEY` - Optional. Credential for the OpenAI provider.
//! - `GROQ_API_KEY` - Optional. Credential for the Groq provider.
//! - `OPENAI_BASE_URL` - Optional. Overrides `https://api.openai.com/v1`.
//! - `GROQ_BASE_URL` - Optional. Overrides `https://api.groq.com/openai/v1`.
//! - `HOST` - Optional. Server host. Defaults to `0.0.0.0`.
//! - `PORT` - Optional. Server port. Defaults to `9999`.
//! - `MAX_ITERATIONS` - Optional. Model calls allowed per agent run. Defaults to `25`.
//! - `SEARCH_MAX_RESULTS` - Optional. Results returned by web search. Defaults to `5`.
//!
//! Credentials are not validated here; a missing key surfaces as a provider
//! error when the model is first called.

use std::collections::HashMap;

use thiserror::Error;

use crate::agent::Provider;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9999;
pub const DEFAULT_MAX_ITERATIONS: usize = 25;
pub const DEFAULT_SEARCH_MAX_RESULTS: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Credential and endpoint for one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// API key sent as a bearer token (may be empty)
    pub api_key: Option<String>,

    /// Base URL override; the provider default is used when unset
    pub base_url: Option<String>,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum model calls in one agent run
    pub max_iterations: usize,

    /// Maximum results returned by the search tool
    pub search_max_results: usize,

    /// Per-provider credentials and endpoints
    pub providers: HashMap<Provider, ProviderSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            search_max_results: DEFAULT_SEARCH_MAX_RESULTS,
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let max_iterations = parse_or(&lookup, "MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS)?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let search_max_results =
            parse_or(&lookup, "SEARCH_MAX_RESULTS", DEFAULT_SEARCH_MAX_RESULTS)?;

        let providers = Provider::ALL
            .iter()
            .map(|&provider| {
                let spec = provider.spec();
                let settings = ProviderSettings {
                    api_key: lookup(spec.api_key_env),
                    base_url: lookup(spec.base_url_env).filter(|u| !u.trim().is_empty()),
                };
                (provider, settings)
            })
            .collect();

        Ok(Self {
            host,
            port,
            max_iterations,
            search_max_results,
            providers,
        })
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// API key for a provider, empty when unset.
    pub fn api_key(&self, provider: Provider) -> String {
        self.providers
            .get(&provider)
            .and_then(|s| s.api_key.clone())
            .unwrap_or_default()
    }

    /// Base URL for a provider, honouring any override.
    pub fn base_url(&self, provider: Provider) -> String {
        self.providers
            .get(&provider)
            .and_then(|s| s.base_url.clone())
            .unwrap_or_else(|| provider.spec().default_base_url.to_string())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}
