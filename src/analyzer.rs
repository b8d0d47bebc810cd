//! # Content Analyzer
//!
//! Asks the model for a handful of SEO suggestions about a page's content.
//! Like the metadata generator it never fails: if the model cannot be reached
//! or answers with nothing, a fixed list of generic suggestions is returned.

use tracing::{debug, instrument, warn};

use crate::error::Error;
use crate::inference::{GenerationParams, TextGenerator};
use crate::retry::RetryPolicy;

/// Suggestions returned when the model path fails
pub const FALLBACK_SUGGESTIONS: [&str; 5] = [
    "Add a clear, descriptive title between 50 and 60 characters that includes your main keyword.",
    "Write a meta description of 150-160 characters that summarizes the page and invites clicks.",
    "Structure the content with descriptive headings (H1, H2, H3) that reflect search intent.",
    "Use your primary keywords naturally in the opening paragraph and throughout the text.",
    "Link to related pages on your site and add descriptive alt text to every image.",
];

/// Prompt asking for newline-separated suggestions
pub fn build_analysis_prompt(content: &str) -> String {
    format!(
        "[INST] You are an SEO specialist. Review the webpage content below and give 3 to 5 specific, \
actionable suggestions to improve its search engine optimization.\n\n\
Content:\n{content}\n\n\
Write each suggestion on its own line. Do not add an introduction or a conclusion. [/INST]"
    )
}

/// Split a model answer into trimmed, non-empty lines
pub fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// The fixed suggestion list, owned
pub fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Produces SEO suggestions for page content
pub struct ContentAnalyzer<G: TextGenerator> {
    generator: G,
    retry: RetryPolicy,
    params: GenerationParams,
}

impl<G: TextGenerator> ContentAnalyzer<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            retry: RetryPolicy::default(),
            params: GenerationParams::analysis(),
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

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Suggestions for `content`, in the order the model gave them
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn analyze(&self, content: &str) -> Vec<String> {
        let prompt = build_analysis_prompt(content);
        let prompt = prompt.as_str();
        let generator = &self.generator;
        let params = &self.params;

        let result = self
            .retry
            .run(move || async move {
                let text = generator.generate(prompt, params).await?;
                if text.trim().is_empty() {
                    return Err(Error::EmptyResponse);
                }
                Ok(text)
            })
            .await;

        match result {
            Ok(text) => {
                let suggestions = parse_suggestions(&text);
                debug!("Model returned {} suggestions", suggestions.len());
                suggestions
            }
            Err(err) => {
                warn!("Content analysis failed, using generic suggestions: {}", err);
                fallback_suggestions()
            }
        }
    }
}
