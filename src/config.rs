use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // CMS
    pub graphql_endpoint: String,
    pub seo_plugin_enabled: bool,
    pub request_timeout: Duration,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // CMS
            graphql_endpoint: required_env("WORDPRESS_GRAPHQL_ENDPOINT")?,
            seo_plugin_enabled: parse_env_bool("WORDPRESS_PLUGIN_SEO", false)?,
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Configuration pointing at a local CMS, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            graphql_endpoint: "http://127.0.0.1:8000/graphql".to_string(),
            seo_plugin_enabled: false,
            request_timeout: Duration::from_secs(5),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graphql_endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "WORDPRESS_GRAPHQL_ENDPOINT".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        self.api_host()?;
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Host component of the GraphQL endpoint, including a non-default port.
    ///
    /// This is what SEO canonical URLs are compared against.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL with a host.
    pub fn api_host(&self) -> Result<String, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            name: "WORDPRESS_GRAPHQL_ENDPOINT".to_string(),
            message,
        };
        let url = Url::parse(&self.graphql_endpoint).map_err(|e| invalid(e.to_string()))?;
        host_with_port(&url).ok_or_else(|| invalid("URL has no host".to_string()))
    }
}

/// `host[:port]` of a URL, the same shape as a browser `URL.host`.
#[must_use]
pub fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
