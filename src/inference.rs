//! # Remote Inference Module
//!
//! Everything the pipeline knows about the hosted language model lives behind
//! the `TextGenerator` trait: given a prompt and decoding parameters, produce
//! text or fail. Which model answers, and where it is hosted, is configuration.
//!
//! ## Key Components
//!
//! - `TextGenerator`: the contract the generator and analyzer depend on
//! - `GenerationParams`: decoding controls sent with every prompt
//! - `InferenceClient`: hosted text-generation endpoint over HTTP
//! - `RateLimitedGenerator`: client-side quota around any generator
//! - `MockGenerator`: scripted generator for tests

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;

mod client;
mod config;
pub mod mock;
mod ratelimited;
mod types;

pub use client::InferenceClient;
pub use config::InferenceConfig;
pub use mock::{MockGenerator, MockReply};
pub use ratelimited::RateLimitedGenerator;

/// Decoding controls passed to the model alongside the prompt
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,

    /// Sampling temperature
    pub temperature: f64,

    /// Nucleus-sampling probability mass
    pub top_p: f64,

    /// Penalty applied to repeated tokens
    pub repetition_penalty: f64,
}

impl GenerationParams {
    /// Parameters used when asking for JSON metadata
    pub fn metadata() -> Self {
        Self {
            max_new_tokens: 250,
            temperature: 0.3,
            top_p: 0.9,
            repetition_penalty: 1.2,
        }
    }

    /// Parameters used when asking for free-text suggestions
    pub fn analysis() -> Self {
        Self {
            max_new_tokens: 300,
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.1,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::metadata()
    }
}

/// Something that turns a prompt into generated text
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`, or fail with a transport/model error
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String>> + Send;
}

impl<G: TextGenerator> TextGenerator for Arc<G> {
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String>> + Send {
        self.as_ref().generate(prompt, params)
    }
}
