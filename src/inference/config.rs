//! Connection settings for the hosted inference endpoint

use std::time::Duration;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// Hosted inference API root
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings needed to reach the hosted model
///
/// The credential is passed in explicitly; nothing in the client reads the
/// process environment.
#[derive(Clone)]
pub struct InferenceConfig {
    /// Bearer token for the inference API
    pub api_token: String,

    /// Model identifier, e.g. `mistralai/Mistral-7B-Instruct-v0.2`
    pub model: String,

    /// API root, without a trailing `/models`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl InferenceConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_token", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
