//! Configuration loading and representation.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::cache::DEFAULT_ASSOCIATION_CACHE_PREFIX;
use crate::export::ExportEndpoints;
use crate::graph::INVARIANT_LANGUAGE;
use crate::router::RouterOptions;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub endpoints: ExportEndpoints,
    pub language: String,
    pub association_cache_prefix: String,
    /// Transport timeout for the HTTP sink. `None` waits indefinitely.
    pub http_timeout: Option<Duration>,
}

impl ExportConfig {
    pub fn new(endpoints: ExportEndpoints) -> Self {
        Self {
            endpoints,
            language: INVARIANT_LANGUAGE.to_string(),
            association_cache_prefix: DEFAULT_ASSOCIATION_CACHE_PREFIX.to_string(),
            http_timeout: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let url = |name: &'static str| -> Result<String, ConfigError> {
            let value = required(name)?;
            reqwest::Url::parse(&value).map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })?;
            Ok(value)
        };

        let endpoints = ExportEndpoints {
            products_url: url("CATALOGSYNC_PRODUCTS_URL")?,
            assets_url: url("CATALOGSYNC_ASSETS_URL")?,
            recommendations_url: url("CATALOGSYNC_RECOMMENDATIONS_URL")?,
            folders_url: url("CATALOGSYNC_FOLDERS_URL")?,
        };

        let http_timeout = match lookup("CATALOGSYNC_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        name: "CATALOGSYNC_HTTP_TIMEOUT_SECS",
                        reason: e.to_string(),
                    }
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            endpoints,
            language: lookup("CATALOGSYNC_LANGUAGE")
                .unwrap_or_else(|| INVARIANT_LANGUAGE.to_string()),
            association_cache_prefix: lookup("CATALOGSYNC_ASSOCIATION_CACHE_PREFIX")
                .unwrap_or_else(|| DEFAULT_ASSOCIATION_CACHE_PREFIX.to_string()),
            http_timeout,
        })
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            language: self.language.clone(),
            association_cache_prefix: self.association_cache_prefix.clone(),
        }
    }
}
