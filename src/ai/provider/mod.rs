//! Text-Completion Provider Abstraction
//!
//! Defines the CompletionProvider trait with the two call shapes the
//! generation pipeline needs: a reasoning-heavy plan call and a plain-text
//! section call. Both are fallible remote calls; neither retries - the
//! pipeline runs to completion or failure exactly once per invocation.

mod anthropic;

pub use anthropic::AnthropicProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::types::{ForgeError, Result};

/// Shared provider handle for concurrent access across pipeline stages.
pub type SharedProvider = Arc<dyn CompletionProvider>;

// =============================================================================
// Provider Trait
// =============================================================================

/// A text-completion service with two call shapes.
///
/// Timeout semantics are whatever the underlying HTTP client enforces; the
/// pipeline layers no additional timeout on top.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Reasoning mode: system+user prompt, explicit token budget, extended
    /// deliberative reasoning enabled. Returns final text only; any
    /// intermediate reasoning trace is discarded.
    async fn reason(&self, system: &str, user: &str, max_tokens: u32) -> Result<String>;

    /// Section mode: system+user prompt, plain text back.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for completion providers.
///
/// API keys are explicit configuration: providers never read ambient
/// environment variables themselves (the config loader is the only
/// environment boundary). Keys are never serialized back out and are
/// redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "anthropic"
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key, never serialized to output
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
    /// Maximum tokens for section-mode calls
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Thinking-token budget for reasoning-mode calls
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget_tokens: u32,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .field("thinking_budget_tokens", &self.thinking_budget_tokens)
            .finish()
    }
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_thinking_budget() -> u32 {
    8192
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: None,
            timeout_secs: 300,
            api_key: None,
            api_base: None,
            max_tokens: default_max_tokens(),
            thinking_budget_tokens: default_thinking_budget(),
        }
    }
}

impl ProviderConfig {
    /// Validate URL shape and timeout bounds.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(ForgeError::Config(
                "provider timeout_secs must be greater than 0".to_string(),
            ));
        }
        if let Some(base) = &self.api_base {
            url::Url::parse(base)
                .map_err(|e| ForgeError::Config(format!("invalid api_base '{}': {}", base, e)))?;
        }
        Ok(())
    }
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    config.validate()?;
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicProvider::new(config.clone())?)),
        _ => Err(ForgeError::Config(format!(
            "Unknown provider: {}. Supported: anthropic",
            config.provider
        ))),
    }
}
