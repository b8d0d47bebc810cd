//! Template-based metadata used when the model path fails

use serde::Serialize;

use crate::normalizer::{extract_keywords, format_description};

const UNTITLED: &str = "Untitled page";
const UNKNOWN_TOPIC: &str = "this page";
const LAST_RESORT_KEYWORD: &str = "seo";

/// Why the model's answer could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Every attempt to reach the model failed
    RetryExhausted,
    /// The model answered, but not with usable JSON
    ParseInvalid,
}

impl FallbackReason {
    fn description_template(self, topic: &str) -> String {
        match self {
            FallbackReason::RetryExhausted => format!(
                "Explore essential information about {topic}. Find helpful details and practical advice to get started with confidence."
            ),
            FallbackReason::ParseInvalid => format!(
                "Discover comprehensive insights about {topic}. Learn key facts, practical tips and expert guidance in one place."
            ),
        }
    }
}

/// Title, description and keywords before an id is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFields {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

/// Everything before the first period of `content`
pub fn main_topic(content: &str) -> &str {
    content.split('.').next().unwrap_or_default()
}

/// Build metadata from the page text alone
///
/// Empty content still yields non-empty fields: the title falls back to the
/// URL (or a placeholder) and keywords to those of the title.
pub fn fallback_fields(url: &str, content: &str, reason: FallbackReason) -> MetadataFields {
    let topic = main_topic(content).trim();

    let title = if !topic.is_empty() {
        topic.to_string()
    } else if !url.trim().is_empty() {
        url.trim().to_string()
    } else {
        UNTITLED.to_string()
    };

    let subject = if topic.is_empty() {
        UNKNOWN_TOPIC.to_string()
    } else {
        topic.to_lowercase()
    };
    let description = format_description(&reason.description_template(&subject));

    let mut keywords = extract_keywords(content);
    if keywords.is_empty() {
        keywords = extract_keywords(&title);
    }
    if keywords.is_empty() {
        keywords = LAST_RESORT_KEYWORD.to_string();
    }

    MetadataFields {
        title,
        description,
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_topic() {
        assert_eq!(main_topic("Healthy eating matters. It helps you."), "Healthy eating matters");
        assert_eq!(main_topic("No period at all"), "No period at all");
        assert_eq!(main_topic(""), "");
    }

    #[test]
    fn test_parse_invalid_phrasing() {
        let fields = fallback_fields(
            "http://x",
            "Healthy eating matters. It helps you.",
            FallbackReason::ParseInvalid,
        );

        assert_eq!(fields.title, "Healthy eating matters");
        assert_eq!(fields.keywords, "healthy, eating, matters, helps");
        assert_eq!(
            fields.description,
            "Discover comprehensive insights about healthy eating matters. Learn key facts, practical tips and expert guidance in one place."
        );
    }

    #[test]
    fn test_retry_exhausted_phrasing() {
        let fields = fallback_fields(
            "http://x",
            "Healthy eating matters. It helps you.",
            FallbackReason::RetryExhausted,
        );

        assert!(
            fields
                .description
                .starts_with("Explore essential information about healthy eating matters.")
        );
        assert!(fields.description.ends_with('.'));
    }

    #[test]
    fn test_empty_content_still_populates_fields() {
        let fields = fallback_fields("https://example.com/about", "", FallbackReason::ParseInvalid);
        assert_eq!(fields.title, "https://example.com/about");
        assert!(fields.description.contains("this page"));
        assert!(!fields.keywords.is_empty());

        let bare = fallback_fields("", "", FallbackReason::RetryExhausted);
        assert_eq!(bare.title, "Untitled page");
        assert_eq!(bare.keywords, "untitled, page");
    }
}
