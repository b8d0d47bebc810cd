//! Parsing and validation of the model's JSON answer

use serde::Deserialize;
use tracing::trace;

/// Fields of a model answer that passed validation, still untrimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMetadata {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    title: Option<String>,
    description: Option<String>,
    keywords: Option<Keywords>,
}

/// Models return keywords either as one string or as a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Keywords {
    Text(String),
    List(Vec<String>),
}

impl Keywords {
    fn into_string(self) -> String {
        match self {
            Keywords::Text(text) => text,
            Keywords::List(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Parse a generated answer into metadata fields
///
/// The answer must be a JSON object with non-blank `title`, `description` and
/// `keywords`. Text wrapped around the object (a chatty preamble, a code
/// fence) is tolerated. On failure the reason is returned for logging.
pub fn parse_metadata_response(text: &str) -> Result<ParsedMetadata, String> {
    let raw = parse_object(text)?;

    let title = required(raw.title, "title")?;
    let description = required(raw.description, "description")?;
    let keywords = required(raw.keywords.map(Keywords::into_string), "keywords")?;

    Ok(ParsedMetadata {
        title,
        description,
        keywords,
    })
}

fn parse_object(text: &str) -> Result<RawMetadata, String> {
    let trimmed = text.trim();
    match serde_json::from_str::<RawMetadata>(trimmed) {
        Ok(raw) => Ok(raw),
        Err(whole_err) => {
            let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) else {
                return Err(format!("response is not JSON: {}", whole_err));
            };
            if end <= start {
                return Err(format!("response is not JSON: {}", whole_err));
            }
            trace!("Retrying parse on embedded object at {}..={}", start, end);
            serde_json::from_str::<RawMetadata>(&trimmed[start..=end])
                .map_err(|e| format!("embedded object is not valid metadata: {}", e))
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(format!("field `{}` is empty", field)),
        None => Err(format!("field `{}` is missing", field)),
    }
}
