//! Gemini `generateContent` REST client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{SynthesisError, SynthesisInput, SynthesisPrompts, Synthesizer, EMPTY_RESPONSE_FALLBACK};

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API credential; `None` leaves the client unconfigured
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL without trailing slash
    pub base_url: String,
    pub max_output_tokens: u32,
    /// Deadline for the whole call, including reading the response body
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeminiConfig {
    /// Default configuration with the credential taken from [`API_KEY_ENV`]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Synthesizer backed by the Gemini HTTP API
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// The credential, if present and not blank
    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &GenerateContentRequest<'_>,
    ) -> Result<String, SynthesisError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| SynthesisError::Network(format!("Gemini API request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            warn!(status = status.as_u16(), body = %body, "Gemini API returned an error");
            return Err(SynthesisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(|err| {
            SynthesisError::Network(format!("Failed to read Gemini response: {err}"))
        })?;

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|err| SynthesisError::MalformedResponse(err.to_string()))?;

        let parsed = serde_json::from_value::<GenerateContentResponse>(value)
            .map_err(|err| debug!(error = %err, "Unexpected Gemini response shape"))
            .ok();

        Ok(parsed.and_then(extract_text_response).unwrap_or_else(|| {
            debug!("Gemini response carried no text");
            EMPTY_RESPONSE_FALLBACK.to_string()
        }))
    }
}

#[async_trait]
impl Synthesizer for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    async fn synthesize(
        &self,
        input: SynthesisInput<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, SynthesisError> {
        let api_key = self.api_key().ok_or_else(|| {
            SynthesisError::Configuration(format!("{} is not set", API_KEY_ENV))
        })?;

        let user_content = SynthesisPrompts::build_user_content(
            input.user_query,
            input.formatted_context,
            input.has_context,
        );
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SynthesisPrompts::system_instruction(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &user_content,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        debug!(
            model = %self.config.model,
            has_context = input.has_context,
            prompt_len = user_content.len(),
            "Calling Gemini API"
        );

        let start = Instant::now();
        let timeout = self.config.timeout;
        let result = tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(SynthesisError::Cancelled),
            result = tokio::time::timeout(timeout, self.send_request(api_key, &request)) => {
                result.unwrap_or_else(|_| Err(SynthesisError::Timeout(timeout)))
            }
        };

        debug!(
            duration_ms = start.elapsed().as_millis(),
            ok = result.is_ok(),
            "Gemini call finished"
        );

        result
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Option<Vec<PartResponse>>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

/// First non-blank text part, scanning candidates then parts in order
fn extract_text_response(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .flatten()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts.unwrap_or_default())
        .filter_map(|part| part.text)
        .find(|text| !text.trim().is_empty())
}
