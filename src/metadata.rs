//! # Metadata Generator
//!
//! Turns `(url, content)` into a `PageMetadata` by asking the model for JSON
//! and, whenever that fails, synthesizing the fields from the content itself.
//! The generator never returns an error: a broken model path only lowers the
//! quality of the result.
//!
//! ## Stages
//!
//! 1. Build the instruction prompt (`build_metadata_prompt`)
//! 2. Call the model through the retry policy (`Stage::Generated` or
//!    `Stage::RetryExhausted`)
//! 3. Parse and validate the answer (`Stage::Parsed` or `Stage::ParseInvalid`)
//! 4. Finish: trim and format a parsed answer, or fall back to templates

mod fallback;
mod ids;
mod parse;
mod prompt;

pub use fallback::{FallbackReason, MetadataFields, fallback_fields, main_topic};
pub use ids::{IdSource, SequentialIds, TimestampIds};
pub use parse::{ParsedMetadata, parse_metadata_response};
pub use prompt::build_metadata_prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::Error;
use crate::inference::{GenerationParams, TextGenerator};
use crate::normalizer::format_description;
use crate::retry::RetryPolicy;

/// SEO metadata for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Identifier assigned at creation
    pub id: u64,

    /// Source page address, as given
    pub url: String,

    /// Page title
    pub title: String,

    /// One or two sentence summary
    pub description: String,

    /// Comma-separated keywords
    pub keywords: String,
}

/// Which path produced a `PageMetadata`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    /// The model's answer, tidied
    Model,
    /// Synthesized from the content
    Fallback(FallbackReason),
}

/// Where a generation request stands
#[derive(Debug)]
pub enum Stage {
    /// The model answered with this raw text
    Generated(String),
    /// The answer passed validation
    Parsed(ParsedMetadata),
    /// The model could not be reached within the retry budget
    RetryExhausted(Error),
    /// The answer was not usable metadata
    ParseInvalid(String),
}

impl Stage {
    /// Validate a `Generated` answer; other stages pass through unchanged
    pub fn parse(self) -> Stage {
        match self {
            Stage::Generated(text) => match parse_metadata_response(&text) {
                Ok(parsed) => Stage::Parsed(parsed),
                Err(reason) => Stage::ParseInvalid(reason),
            },
            other => other,
        }
    }
}

/// Generates page metadata with a model, falling back to templates
pub struct MetadataGenerator<G: TextGenerator> {
    generator: G,
    retry: RetryPolicy,
    params: GenerationParams,
    ids: Arc<dyn IdSource>,
}

impl<G: TextGenerator> MetadataGenerator<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            retry: RetryPolicy::default(),
            params: GenerationParams::metadata(),
            ids: Arc::new(TimestampIds::default()),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_id_source(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate metadata for a page; never fails
    pub async fn generate(&self, url: &str, content: &str) -> PageMetadata {
        self.generate_with_source(url, content).await.0
    }

    /// Generate metadata and report which path produced it
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn generate_with_source(
        &self,
        url: &str,
        content: &str,
    ) -> (PageMetadata, MetadataSource) {
        let prompt = build_metadata_prompt(url, content);
        let stage = self.call_model(&prompt).await.parse();
        self.finish(url, content, stage)
    }

    /// Ask the model, retrying with backoff
    pub async fn call_model(&self, prompt: &str) -> Stage {
        debug!("Requesting metadata, prompt of {} characters", prompt.len());
        let generator = &self.generator;
        let params = &self.params;
        match self
            .retry
            .run(move || generator.generate(prompt, params))
            .await
        {
            Ok(text) => Stage::Generated(text),
            Err(err) => Stage::RetryExhausted(err),
        }
    }

    /// Turn the final stage into metadata
    pub fn finish(&self, url: &str, content: &str, stage: Stage) -> (PageMetadata, MetadataSource) {
        let (fields, source) = match stage {
            Stage::Generated(text) => {
                return self.finish(url, content, Stage::Generated(text).parse());
            }
            Stage::Parsed(parsed) => match finalize(parsed) {
                Ok(fields) => {
                    info!("Using model-generated metadata");
                    (fields, MetadataSource::Model)
                }
                Err(reason) => {
                    return self.finish(url, content, Stage::ParseInvalid(reason));
                }
            },
            Stage::RetryExhausted(err) => {
                warn!(
                    "Model unavailable, falling back to content-derived metadata: {}",
                    err
                );
                let reason = FallbackReason::RetryExhausted;
                (fallback_fields(url, content, reason), MetadataSource::Fallback(reason))
            }
            Stage::ParseInvalid(reason_text) => {
                warn!(
                    "Unusable model response, falling back to content-derived metadata: {}",
                    reason_text
                );
                let reason = FallbackReason::ParseInvalid;
                (fallback_fields(url, content, reason), MetadataSource::Fallback(reason))
            }
        };

        let metadata = PageMetadata {
            id: self.ids.next_id(),
            url: url.to_string(),
            title: fields.title,
            description: fields.description,
            keywords: fields.keywords,
        };
        (metadata, source)
    }
}

/// Trim and format a validated model answer
///
/// Formatting can strip a field down to nothing (a description made only of
/// list markers), so emptiness is checked again on the finished fields.
fn finalize(parsed: ParsedMetadata) -> Result<MetadataFields, String> {
    let fields = MetadataFields {
        title: parsed.title.trim().to_string(),
        description: format_description(&parsed.description),
        keywords: parsed.keywords.trim().to_string(),
    };

    for (name, value) in [
        ("title", &fields.title),
        ("description", &fields.description),
        ("keywords", &fields.keywords),
    ] {
        if value.is_empty() {
            return Err(format!("field `{}` is empty after formatting", name));
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{MockGenerator, MockReply};
    use crate::normalizer::extract_keywords;

    const CONTENT: &str = "Healthy eating matters. It helps you.";

    fn generator(mock: MockGenerator) -> MetadataGenerator<MockGenerator> {
        MetadataGenerator::new(mock).with_id_source(Arc::new(SequentialIds::default()))
    }

    fn assert_populated(metadata: &PageMetadata) {
        assert!(!metadata.title.is_empty());
        assert!(!metadata.description.is_empty());
        assert!(!metadata.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_model_answer_is_tidied() {
        let mock = MockGenerator::replying(
            r#"{"title": "  Healthy Eating: Why It Matters  ", "description": "Here are 3 tips for eating well.\n1. Eat greens. 2. Drink water. 3. Sleep.", "keywords": " healthy eating, nutrition "}"#,
        );
        let generator = generator(mock.clone());

        let (metadata, source) = generator.generate_with_source("http://x", CONTENT).await;

        assert_eq!(source, MetadataSource::Model);
        assert_eq!(metadata.id, 1);
        assert_eq!(metadata.url, "http://x");
        assert_eq!(metadata.title, "Healthy Eating: Why It Matters");
        assert_eq!(
            metadata.description,
            "Discover essential tips for eating well. Eat greens."
        );
        assert_eq!(metadata.keywords, "healthy eating, nutrition");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back_without_retrying() {
        let mock = MockGenerator::replying("Sorry, I can only answer in prose.");
        let generator = generator(mock.clone());

        let (metadata, source) = generator.generate_with_source("http://x", CONTENT).await;

        assert_eq!(source, MetadataSource::Fallback(FallbackReason::ParseInvalid));
        assert_eq!(metadata.title, "Healthy eating matters");
        assert_eq!(metadata.keywords, extract_keywords(CONTENT));
        assert!(
            metadata
                .description
                .starts_with("Discover comprehensive insights about healthy eating matters.")
        );
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_field_falls_back() {
        let mock = MockGenerator::replying(r#"{"title": "Only a title", "description": "Text."}"#);
        let generator = generator(mock);

        let (metadata, source) = generator.generate_with_source("http://x", CONTENT).await;

        assert_eq!(source, MetadataSource::Fallback(FallbackReason::ParseInvalid));
        assert_eq!(metadata.title, "Healthy eating matters");
    }

    #[tokio::test]
    async fn test_description_of_only_list_markers_falls_back() {
        let mock =
            MockGenerator::replying(r#"{"title": "T", "description": "1. ", "keywords": "k"}"#);
        let generator = generator(mock.clone());

        let (metadata, source) = generator.generate_with_source("http://x", CONTENT).await;

        assert_eq!(source, MetadataSource::Fallback(FallbackReason::ParseInvalid));
        assert_populated(&metadata);
        assert_eq!(metadata.title, "Healthy eating matters");
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn test_finalize_rejects_fields_emptied_by_formatting() {
        let parsed = ParsedMetadata {
            title: "T".to_string(),
            description: "2. ".to_string(),
            keywords: "k".to_string(),
        };
        let err = finalize(parsed).unwrap_err();
        assert!(err.contains("description"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fall_back_after_three_calls() {
        let mock = MockGenerator::failing("service unavailable");
        let generator = generator(mock.clone());

        let (metadata, source) = generator.generate_with_source("http://x", CONTENT).await;

        assert_eq!(source, MetadataSource::Fallback(FallbackReason::RetryExhausted));
        assert_eq!(mock.calls(), 3);
        assert_populated(&metadata);
        assert_eq!(metadata.title, "Healthy eating matters");
        assert!(
            metadata
                .description
                .starts_with("Explore essential information about healthy eating matters.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_then_success() {
        let mock = MockGenerator::replying(
            r#"{"title": "T", "description": "D", "keywords": "k"}"#,
        )
        .with_script([MockReply::failure("blip")]);
        let generator = generator(mock.clone());

        let (metadata, source) = generator.generate_with_source("http://x", CONTENT).await;

        assert_eq!(source, MetadataSource::Model);
        assert_eq!(metadata.description, "D.");
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_ids_come_from_injected_source() {
        let generator = MetadataGenerator::new(MockGenerator::replying("not json"))
            .with_id_source(Arc::new(SequentialIds::starting_at(100)));

        let first = generator.generate("http://a", CONTENT).await;
        let second = generator.generate("http://b", CONTENT).await;

        assert_eq!(first.id, 100);
        assert_eq!(second.id, 101);
        assert_eq!(second.url, "http://b");
    }

    #[tokio::test]
    async fn test_prompt_reaches_model() {
        let mock = MockGenerator::replying("not json");
        let generator = generator(mock.clone());

        generator.generate("https://example.com/food", CONTENT).await;

        let prompts = mock.prompts().await;
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("https://example.com/food"));
        assert!(prompts[0].contains(CONTENT));
    }

    #[tokio::test]
    async fn test_empty_content_is_still_populated() {
        let generator = generator(MockGenerator::replying("garbage"));
        let metadata = generator.generate("https://example.com", "").await;
        assert_populated(&metadata);
        assert_eq!(metadata.title, "https://example.com");
    }

    #[test]
    fn test_stage_transitions() {
        let parsed = Stage::Generated(r#"{"title": "T", "description": "D", "keywords": "k"}"#.into())
            .parse();
        assert!(matches!(parsed, Stage::Parsed(_)));

        let invalid = Stage::Generated("nope".into()).parse();
        assert!(matches!(invalid, Stage::ParseInvalid(_)));

        let exhausted = Stage::RetryExhausted(Error::EmptyResponse).parse();
        assert!(matches!(exhausted, Stage::RetryExhausted(_)));
    }

    #[test]
    fn test_finish_from_each_stage() {
        let generator = generator(MockGenerator::default());

        let (_, source) = generator.finish(
            "u",
            CONTENT,
            Stage::RetryExhausted(Error::Api {
                status_code: 500,
                message: "down".into(),
            }),
        );
        assert_eq!(source, MetadataSource::Fallback(FallbackReason::RetryExhausted));

        let (_, source) = generator.finish("u", CONTENT, Stage::ParseInvalid("bad".into()));
        assert_eq!(source, MetadataSource::Fallback(FallbackReason::ParseInvalid));

        let (metadata, source) = generator.finish(
            "u",
            CONTENT,
            Stage::Generated(r#"{"title": "T", "description": "D", "keywords": "k"}"#.into()),
        );
        assert_eq!(source, MetadataSource::Model);
        assert_eq!(metadata.title, "T");
    }
}
