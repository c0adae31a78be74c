/// LLM Client — the single point of entry for all model calls in the service.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through this module.
///
/// Providers: Google Gemini (`generateContent`) and Groq (OpenAI-compatible
/// chat completions). Model name, temperature, and output budget come from
/// `LlmSettings`; the provider is chosen once at startup via `LLM_PROVIDER`.
use anyhow::{bail, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The configured LLM backend. Parsed from `LLM_PROVIDER`; "google" is the
/// default, anything unknown is a startup error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    Groq,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(ProviderKind::Google),
            "groq" => Ok(ProviderKind::Groq),
            other => bail!("Invalid LLM provider: {other}"),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Google => write!(f, "google"),
            ProviderKind::Groq => write!(f, "groq"),
        }
    }
}

// ── Gemini wire types ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

// ── Groq wire types ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GroqRequest<'a> {
    model: &'a str,
    messages: Vec<GroqMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct GroqMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    #[serde(default)]
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct GroqChoiceMessage {
    content: Option<String>,
}

/// Both providers report errors in an OpenAI-style envelope.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client used by all services.
/// Wraps the provider API with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    provider: ProviderKind,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl LlmClient {
    /// Builds a client for the provider selected in `config`, using that
    /// provider's tuning block and API key.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (settings, api_key) = match config.llm_provider {
            ProviderKind::Google => (&config.llm.google, config.google_api_key.as_deref()),
            ProviderKind::Groq => (&config.llm.groq, config.groq_api_key.as_deref()),
        };
        let Some(api_key) = api_key else {
            bail!("No API key available for provider '{}'", config.llm_provider);
        };

        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            provider: config.llm_provider,
            api_key: api_key.to_string(),
            model: settings.model_name.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Makes one call to the configured provider and returns the response
    /// text. Retries on 429 (rate limit) and 5xx errors with exponential
    /// backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.provider {
                ProviderKind::Google => self.send_gemini(prompt, system).await,
                ProviderKind::Groq => self.send_groq(prompt, system).await,
            };

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let text = match self.provider {
                ProviderKind::Google => {
                    let parsed: GeminiResponse = response.json().await?;
                    parsed
                        .candidates
                        .into_iter()
                        .next()
                        .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
                }
                ProviderKind::Groq => {
                    let parsed: GroqResponse = response.json().await?;
                    parsed.choices.into_iter().next().and_then(|c| c.message.content)
                }
            };

            let text = text.ok_or(LlmError::EmptyContent)?;
            debug!(
                "LLM call succeeded: provider={}, response_chars={}",
                self.provider,
                text.len()
            );
            return Ok(text);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Convenience method that calls the LLM and deserializes the text
    /// response as JSON. The prompt must instruct the model to return valid
    /// JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.call(prompt, system).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }

    async fn send_gemini(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let request_body = GeminiRequest {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart { text: system }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        self.client
            .post(format!(
                "{GEMINI_API_BASE}/{}:generateContent",
                self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
    }

    async fn send_groq(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let request_body = GroqRequest {
            model: &self.model,
            messages: vec![
                GroqMessage {
                    role: "system",
                    content: system,
                },
                GroqMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
        };

        self.client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_provider_kind_parse_accepts_known_names() {
        assert_eq!(ProviderKind::parse("google").unwrap(), ProviderKind::Google);
        assert_eq!(ProviderKind::parse("GROQ").unwrap(), ProviderKind::Groq);
        assert_eq!(
            ProviderKind::parse(" groq ").unwrap(),
            ProviderKind::Groq
        );
    }

    #[test]
    fn test_provider_kind_parse_rejects_unknown_names() {
        assert!(ProviderKind::parse("openai").is_err());
        assert!(ProviderKind::parse("").is_err());
    }

    #[test]
    fn test_gemini_response_text_extraction() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "hello"}]}}
            ]
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text));
        assert_eq!(text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_groq_response_text_extraction() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "hi there"}}
            ]
        }"#;
        let parsed: GroqResponse = serde_json::from_str(json).unwrap();
        let text = parsed.choices.into_iter().next().and_then(|c| c.message.content);
        assert_eq!(text.as_deref(), Some("hi there"));
    }
}
