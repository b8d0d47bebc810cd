use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{Instrument, debug_span, info_span};

use super::{GenerationParams, TextGenerator};
use crate::error::Result;

/// Waits on a client-side quota before every call to the wrapped generator
#[derive(Clone)]
pub struct RateLimitedGenerator<G: TextGenerator> {
    inner: G,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl<G> RateLimitedGenerator<G>
where
    G: TextGenerator,
{
    pub fn new(inner: G, limiter: DefaultDirectRateLimiter) -> Self {
        Self {
            inner,
            limiter: Arc::new(limiter),
        }
    }

    /// Allow at most `requests` calls per minute
    pub fn per_minute(inner: G, requests: NonZeroU32) -> Self {
        Self::new(inner, RateLimiter::direct(Quota::per_minute(requests)))
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: TextGenerator> TextGenerator for RateLimitedGenerator<G> {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        self.limiter
            .until_ready()
            .instrument(debug_span!("limiter"))
            .await;
        self.inner
            .generate(prompt, params)
            .instrument(info_span!("generate"))
            .await
    }
}
