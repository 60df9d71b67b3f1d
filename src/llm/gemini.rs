//! Gemini text generation client.
//!
//! Talks to the `generateContent` REST endpoint directly; the response is
//! requested as plain text since the chapter grammar is line-oriented.

use super::TextGenerator;
use crate::config::GeminiSettings;
use crate::error::{KapitlerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default timeout for Gemini API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Gemini API client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// Create a client from settings, reading the API key from the environment.
    pub fn new(settings: &GeminiSettings) -> Result<Self> {
        Self::with_timeout(settings, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(settings: &GeminiSettings, timeout: Duration) -> Result<Self> {
        let api_key = std::env::var(GEMINI_API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                KapitlerError::Config(format!(
                    "{} not set. Set it with: export {}='...'",
                    GEMINI_API_KEY_VAR, GEMINI_API_KEY_VAR
                ))
            })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            http,
            api_key,
            settings: settings.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            API_BASE, self.settings.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                top_k: self.settings.top_k,
                max_output_tokens: self.settings.max_output_tokens,
                response_mime_type: "text/plain".to_string(),
            },
        };

        debug!(
            "Requesting {} with {} prompt bytes",
            self.settings.model,
            prompt.len()
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| KapitlerError::GenerationFailed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KapitlerError::GenerationFailed(format!(
                "Gemini API returned {}: {}",
                status,
                body.trim()
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| KapitlerError::GenerationFailed(format!("Malformed response: {}", e)))?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                KapitlerError::GenerationFailed("Empty response from Gemini".to_string())
            })?;

        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_wire_format() {
        let config = GenerationConfig {
            temperature: 0.5,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 500,
            response_mime_type: "text/plain".to_string(),
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["topP"], 0.95);
        assert_eq!(json["topK"], 64);
        assert_eq!(json["maxOutputTokens"], 500);
        assert_eq!(json["responseMimeType"], "text/plain");
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "00:00 Intro\n"}, {"text": "00:30 Topic"}]}}
            ]
        }"#;

        let reply: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let text: String = reply.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "00:00 Intro\n00:30 Topic");
    }
}
