//! # SEO Service
//!
//! The surface a presentation layer talks to: one value that owns a text
//! generator and exposes metadata generation, content analysis and the
//! (unimplemented) page listing.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::analyzer::ContentAnalyzer;
use crate::config::{Config, IdStrategy};
use crate::error::Result;
use crate::inference::{InferenceClient, RateLimitedGenerator, TextGenerator};
use crate::metadata::{
    IdSource, MetadataGenerator, MetadataSource, PageMetadata, SequentialIds, TimestampIds,
};

/// Generator produced by `SeoService::from_config`
pub enum HostedGenerator {
    Direct(InferenceClient),
    RateLimited(RateLimitedGenerator<InferenceClient>),
}

impl TextGenerator for HostedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &crate::inference::GenerationParams,
    ) -> Result<String> {
        match self {
            HostedGenerator::Direct(client) => client.generate(prompt, params).await,
            HostedGenerator::RateLimited(client) => client.generate(prompt, params).await,
        }
    }
}

/// Metadata generation and content analysis over one shared generator
pub struct SeoService<G: TextGenerator> {
    metadata: MetadataGenerator<Arc<G>>,
    analyzer: ContentAnalyzer<Arc<G>>,
}

impl SeoService<HostedGenerator> {
    /// Wire the hosted client, retry policy, parameters and ids from `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let client = InferenceClient::new(config.inference.clone())?;
        info!("Using model {}", client.model());

        let generator = match config.requests_per_minute {
            Some(limit) => {
                info!("Client-side rate limit: {} requests per minute", limit);
                HostedGenerator::RateLimited(RateLimitedGenerator::per_minute(client, limit))
            }
            None => HostedGenerator::Direct(client),
        };

        Ok(Self::with_config(generator, &config))
    }
}

impl<G: TextGenerator> SeoService<G> {
    /// Service with default retry policy, parameters and timestamp ids
    pub fn new(generator: G) -> Self {
        let generator = Arc::new(generator);
        Self {
            metadata: MetadataGenerator::new(generator.clone()),
            analyzer: ContentAnalyzer::new(generator),
        }
    }

    /// Service around any generator, tuned by `config`
    pub fn with_config(generator: G, config: &Config) -> Self {
        let ids: Arc<dyn IdSource> = match config.id_strategy {
            IdStrategy::Timestamp => Arc::new(TimestampIds::default()),
            IdStrategy::Sequential => Arc::new(SequentialIds::default()),
        };
        let generator = Arc::new(generator);

        Self {
            metadata: MetadataGenerator::new(generator.clone())
                .with_retry_policy(config.retry)
                .with_params(config.metadata_params)
                .with_id_source(ids),
            analyzer: ContentAnalyzer::new(generator)
                .with_retry_policy(config.retry)
                .with_params(config.analysis_params),
        }
    }

    /// SEO metadata for a page; always returns a populated record
    #[instrument(skip(self, content))]
    pub async fn generate_llm_metadata(&self, url: &str, content: &str) -> PageMetadata {
        self.metadata.generate(url, content).await
    }

    /// Like `generate_llm_metadata`, also reporting which path produced the result
    pub async fn generate_llm_metadata_with_source(
        &self,
        url: &str,
        content: &str,
    ) -> (PageMetadata, MetadataSource) {
        self.metadata.generate_with_source(url, content).await
    }

    /// SEO suggestions for the content; always returns at least the generic list
    #[instrument(skip(self, content))]
    pub async fn analyze_content(&self, content: &str) -> Vec<String> {
        self.analyzer.analyze(content).await
    }

    /// Stored pages; there is no storage, so this is always empty
    pub async fn get_pages(&self) -> Vec<PageMetadata> {
        Vec::new()
    }

    /// The generator shared by both pipelines
    pub fn generator(&self) -> &G {
        self.metadata.generator()
    }
}
