//! Wire types for the hosted text-generation API

use serde::{Deserialize, Serialize};

use super::GenerationParams;

/// Request body for a text-generation call
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    /// The prompt
    pub inputs: &'a str,

    /// Decoding parameters
    pub parameters: RequestParameters,
}

/// Decoding parameters as the API expects them
#[derive(Debug, Serialize)]
pub(crate) struct RequestParameters {
    #[serde(flatten)]
    pub params: GenerationParams,

    /// Only return the continuation, not the prompt echoed back
    pub return_full_text: bool,
}

impl<'a> GenerateRequest<'a> {
    pub fn new(inputs: &'a str, params: GenerationParams) -> Self {
        Self {
            inputs,
            parameters: RequestParameters {
                params,
                return_full_text: false,
            },
        }
    }
}

/// A single generation
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeneratedText {
    pub generated_text: String,
}

/// The API answers with a list of generations; some deployments return one object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum GenerateResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl GenerateResponse {
    /// Text of the first generation, if any
    pub fn into_text(self) -> Option<String> {
        match self {
            GenerateResponse::Many(items) => items.into_iter().next().map(|g| g.generated_text),
            GenerateResponse::One(item) => Some(item.generated_text),
        }
    }
}

/// Error payload, e.g. `{"error": "Model is currently loading", "estimated_time": 20.0}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
}
