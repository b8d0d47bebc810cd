//! Prompt templates sent to the model

/// Instruction prompt asking for title, description and keywords as JSON
///
/// The worked examples steer the model away from list-style answers, which
/// are the most common way the response ends up unusable.
pub fn build_metadata_prompt(url: &str, content: &str) -> String {
    format!(
        r#"[INST] You are an SEO specialist. Write search engine metadata for the webpage below.

URL: {url}

Content:
{content}

Respond with a single JSON object with exactly these fields:
- "title": a compelling page title, ideally 50-60 characters
- "description": one or two complete sentences, ideally 150-160 characters, summarizing the page
- "keywords": up to 5 relevant keywords separated by commas

Good response:
{{"title": "Healthy Eating Guide: Simple Habits for Better Nutrition", "description": "Learn simple healthy eating habits that boost your energy every day. Practical nutrition advice for busy people who want lasting results.", "keywords": "healthy eating, nutrition, meal planning, balanced diet, wellness"}}

Bad response (a list instead of JSON):
Here are 5 tips for healthy eating:
1. Eat more vegetables
2. Drink water

Bad response (missing fields):
{{"title": "Healthy Eating"}}

Return only the JSON object, with no explanation before or after it. [/INST]"#
    )
}
