//! HTTP client for the hosted text-generation API

use reqwest::{Client as ReqwestClient, StatusCode};
use tracing::{debug, error, instrument, trace};
use url::Url;

use super::config::InferenceConfig;
use super::types::{ApiErrorBody, GenerateRequest, GenerateResponse};
use super::{GenerationParams, TextGenerator};
use crate::error::{Error, Result};

/// Retry-After fallback when a 429 carries no header
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Client for a hosted text-generation model
///
/// One request per call: retries and backoff are the caller's business (see
/// `crate::retry`), so every failure is reported as soon as it happens.
#[derive(Clone)]
pub struct InferenceClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,

    /// Bearer token
    api_token: String,

    /// Model identifier appended to the request path
    model: String,
}

impl InferenceClient {
    /// Create a client from explicit configuration
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_token: config.api_token,
            model: config.model,
        })
    }

    /// The model this client talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_url(&self) -> Result<Url> {
        let url = format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        Url::parse(&url).map_err(|e| Error::Other(format!("Invalid URL: {}", e)))
    }

    /// Turn a non-success response into the matching error
    fn status_error(status: StatusCode, retry_after: Option<u64>, body: String) -> Error {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        error!("API error: {} - {}", status, message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Error::Auth("Invalid API token or credentials".to_string())
            }
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimit {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            _ => Error::Api {
                status_code: status.as_u16(),
                message,
            },
        }
    }
}

impl TextGenerator for InferenceClient {
    #[instrument(skip(self, prompt, params), fields(model = %self.model, prompt_len = prompt.len()), level = "debug")]
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let url = self.build_url()?;
        let body = GenerateRequest::new(prompt, *params);

        debug!("Sending generation request to {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, retry_after, response_text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse response: {}", e);
            Error::UnexpectedResponse(format!("Failed to parse response: {}", e))
        })?;

        let text = parsed.into_text().ok_or(Error::EmptyResponse)?;
        trace!("Generated {} characters", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &Server) -> InferenceClient {
        let config = InferenceConfig::new("test-token")
            .with_model("test-org/test-model")
            .with_base_url(server.url())
            .with_timeout(Duration::from_secs(5));
        InferenceClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test-org/test-model")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "Write a title",
                "parameters": {
                    "max_new_tokens": 250,
                    "return_full_text": false
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"generated_text": "A great title"}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let text = client
            .generate("Write a title", &GenerationParams::metadata())
            .await
            .unwrap();

        assert_eq!(text, "A great title");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test-org/test-model")
            .with_status(401)
            .with_body(r#"{"error": "Authorization header is correct, but the token seems invalid"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.generate("hi", &GenerationParams::default()).await;

        assert!(matches!(result, Err(Error::Auth(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test-org/test-model")
            .with_status(429)
            .with_header("retry-after", "7")
            .with_body(r#"{"error": "Rate limit reached"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.generate("hi", &GenerationParams::default()).await;

        assert!(matches!(
            result,
            Err(Error::RateLimit {
                retry_after_secs: 7
            })
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_model_loading_maps_to_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test-org/test-model")
            .with_status(503)
            .with_body(r#"{"error": "Model is currently loading", "estimated_time": 20.0}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.generate("hi", &GenerationParams::default()).await;

        match result {
            Err(Error::Api {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 503);
                assert_eq!(message, "Model is currently loading");
            }
            other => panic!("expected API error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_garbage_body_is_unexpected_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test-org/test-model")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.generate("hi", &GenerationParams::default()).await;

        assert!(matches!(result, Err(Error::UnexpectedResponse(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_generation_list() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test-org/test-model")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.generate("hi", &GenerationParams::default()).await;

        assert!(matches!(result, Err(Error::EmptyResponse)));
        mock.assert_async().await;
    }
}
