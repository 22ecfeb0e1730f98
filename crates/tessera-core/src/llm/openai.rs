//! OpenAI-compatible chat completions client.
//!
//! Works against the public OpenAI API and Azure OpenAI deployments. When an
//! API version is configured the request carries `api-version` and the
//! `api-key` header that Azure expects.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, CompletionError, CompletionParams, CompletionService};
use crate::config::CompletionConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Default wait when a 429 carries no usable retry-after header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504)
}

/// Wait before retry `attempt`: exponential backoff, stretched to honor a
/// server-provided retry-after.
fn retry_delay(attempt: u32, retry_after: Option<Duration>) -> Duration {
    let backoff = Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt.saturating_sub(1)));
    retry_after.map_or(backoff, |hint| hint.max(backoff))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat completions client for OpenAI-compatible endpoints
pub struct OpenAiClient {
    model: String,
    api_key: String,
    base_url: String,
    api_version: Option<String>,
    http: Client,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(CompletionError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            http,
        })
    }

    /// Endpoint for chat completions, including the API version when set.
    fn endpoint(&self) -> String {
        match &self.api_version {
            Some(version) => format!("{}/chat/completions?api-version={version}", self.base_url),
            None => format!("{}/chat/completions", self.base_url),
        }
    }

    /// Pulls the first choice's text out of a response body.
    fn extract_content(response: ChatResponse) -> Result<String, CompletionError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse("response has no content".to_string()))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, CompletionError> {
        debug!("Requesting completion from {} ({} messages)", self.model, messages.len());
        let url = self.endpoint();
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let mut last_error = None;
        let mut retry_after_hint: Option<Duration> = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = retry_delay(attempt, retry_after_hint.take());
                warn!(
                    "Retrying completion request (attempt {attempt}) after {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.http.post(url.as_str()).bearer_auth(&self.api_key).json(&body);
            if self.api_version.is_some() {
                request = request.header("api-key", self.api_key.as_str());
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!("Completion request failed on attempt {attempt}: {e}");
                    last_error = Some(CompletionError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);

                debug!("Completion endpoint rate limited the request on attempt {attempt}");
                retry_after_hint = retry_after;
                last_error = Some(CompletionError::RateLimited {
                    retry_after: retry_after
                        .unwrap_or(Duration::from_secs(DEFAULT_RETRY_AFTER_SECS)),
                });
                continue;
            }

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let message = response.text().await.unwrap_or_default();
                debug!("Completion endpoint returned retryable status {status}");
                last_error = Some(CompletionError::Api { status, message });
                continue;
            }

            if !response.status().is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(CompletionError::Api { status, message });
            }

            let parsed: ChatResponse = response.json().await?;
            return Self::extract_content(parsed);
        }

        Err(last_error
            .unwrap_or_else(|| CompletionError::InvalidResponse("Max retries exceeded".to_string())))
    }
}
