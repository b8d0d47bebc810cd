//! # Configuration Module
//!
//! Everything the pipeline needs is gathered in one `Config` value that is
//! handed to `SeoService::from_config`. Nothing below the service reads the
//! process environment; `Config::from_env` exists for the binary.
//!
//! ## Key Components
//!
//! - `Config`: inference settings, retry policy, decoding parameters, ids
//! - `ConfigBuilder`: builder pattern implementation for easier configuration
//! - `IdStrategy`: how `PageMetadata` ids are assigned
//!
//! ## Environment
//!
//! - `HUGGINGFACE_API_KEY` (required): inference API token
//! - `METAGEN_MODEL`: model identifier override
//! - `METAGEN_BASE_URL`: API root override

use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::inference::{GenerationParams, InferenceConfig};
use crate::retry::RetryPolicy;

/// Environment variable holding the API token
pub const API_KEY_VAR: &str = "HUGGINGFACE_API_KEY";

/// Environment variable overriding the model
pub const MODEL_VAR: &str = "METAGEN_MODEL";

/// Environment variable overriding the API root
pub const BASE_URL_VAR: &str = "METAGEN_BASE_URL";

/// How ids are assigned to generated metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Millisecond timestamps, nudged forward on collision
    #[default]
    Timestamp,
    /// A counter starting at 1
    Sequential,
}

/// Configuration for the metadata service
#[derive(Debug, Clone)]
pub struct Config {
    /// How to reach the hosted model
    pub inference: InferenceConfig,

    /// Retry budget and backoff for every model call
    pub retry: RetryPolicy,

    /// Decoding parameters for metadata generation
    pub metadata_params: GenerationParams,

    /// Decoding parameters for content analysis
    pub analysis_params: GenerationParams,

    /// Client-side request quota, if any
    pub requests_per_minute: Option<NonZeroU32>,

    /// Id assignment
    pub id_strategy: IdStrategy,
}

impl Config {
    /// Configuration with defaults and the given API token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            inference: InferenceConfig::new(api_token),
            retry: RetryPolicy::default(),
            metadata_params: GenerationParams::metadata(),
            analysis_params: GenerationParams::analysis(),
            requests_per_minute: None,
            id_strategy: IdStrategy::default(),
        }
    }

    /// Create a new builder
    pub fn builder(api_token: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(api_token)
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps variable names to values
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup(API_KEY_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(format!("{} environment variable must be set", API_KEY_VAR))
            })?;

        let mut builder = ConfigBuilder::new(api_token);
        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.trim().is_empty()) {
            builder = builder.model(model);
        }
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            builder = builder.base_url(base_url);
        }
        Ok(builder.build())
    }
}

/// Builder for Config
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            config: Config::new(api_token),
        }
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.inference.model = model.into();
        self
    }

    /// Set the API root
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.inference.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.inference.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set the decoding parameters for metadata generation
    pub fn metadata_params(mut self, params: GenerationParams) -> Self {
        self.config.metadata_params = params;
        self
    }

    /// Set the decoding parameters for content analysis
    pub fn analysis_params(mut self, params: GenerationParams) -> Self {
        self.config.analysis_params = params;
        self
    }

    /// Limit requests per minute; zero disables the limit
    pub fn requests_per_minute(mut self, requests: u32) -> Self {
        self.config.requests_per_minute = NonZeroU32::new(requests);
        self
    }

    /// Set the id strategy
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.config.id_strategy = strategy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}
