//! Anthropic Messages API Provider
//!
//! Implements both call shapes against the Messages API: reasoning mode maps
//! to extended thinking with a configured budget (thinking blocks are
//! discarded, only text blocks are returned), section mode is a plain
//! messages call.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{CompletionProvider, ProviderConfig};
use crate::types::{ForgeError, Result};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

/// Anthropic provider with secure API key handling
pub struct AnthropicProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    max_tokens: u32,
    thinking_budget_tokens: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("thinking_budget_tokens", &self.thinking_budget_tokens)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config.api_key.ok_or_else(|| {
            ForgeError::Config("Anthropic API key not configured. Set llm.api_key".to_string())
        })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ForgeError::llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            max_tokens: config.max_tokens,
            thinking_budget_tokens: config.thinking_budget_tokens,
            client,
        })
    }

    async fn send(&self, request: &MessagesRequest) -> Result<String> {
        let url = format!("{}/messages", self.api_base);

        debug!("Sending request to Anthropic Messages API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ForgeError::llm(format!("Anthropic request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ForgeError::llm(format!(
                "Anthropic API error ({}): {}",
                status, body
            )));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::llm(format!("Failed to parse Anthropic response: {}", e)))?;

        // Thinking blocks are intermediate reasoning; only text blocks carry
        // the answer.
        let text: String = body
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(ForgeError::llm("No text content in Anthropic response"));
        }

        Ok(text)
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn reason(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        info!(
            "Reasoning call (model: {}, max_tokens: {}, thinking_budget: {})",
            self.model, max_tokens, self.thinking_budget_tokens
        );

        // The API requires the thinking budget to stay below max_tokens.
        let budget = self
            .thinking_budget_tokens
            .min(max_tokens.saturating_sub(1024));

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens,
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            thinking: Some(ThinkingConfig {
                kind: "enabled".to_string(),
                budget_tokens: budget,
            }),
        };

        self.send(&request).await
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        info!("Section call (model: {})", self.model);

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            thinking: None,
        };

        self.send(&request).await
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ThinkingConfig {
    #[serde(rename = "type")]
    kind: String,
    budget_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_rejected() {
        let config = ProviderConfig::default();
        assert!(AnthropicProvider::new(config).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = AnthropicProvider::new(ProviderConfig {
            api_key: Some("sk-ant-secret".to_string()),
            ..Default::default()
        })
        .unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-ant-secret"));
    }

    #[test]
    fn test_response_text_extraction_shape() {
        let json = r#"{
            "content": [
                {"type": "thinking", "thinking": "step by step"},
                {"type": "text", "text": "final answer"}
            ]
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        let text: Vec<&str> = response
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();
        assert_eq!(text, vec!["final answer"]);
    }
}
