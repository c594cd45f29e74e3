//! Configuration Types
//!
//! Explicit configuration passed into constructors. Components never read
//! ambient environment themselves; the loader is the only environment
//! boundary, which keeps the pipeline testable without process-global
//! mutation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::provider::ProviderConfig;
use crate::types::{ForgeError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Completion provider settings
    pub llm: ProviderConfig,

    /// Generation pipeline settings
    pub generator: GeneratorConfig,

    /// Row store settings
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: ProviderConfig::default(),
            generator: GeneratorConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate()?;
        self.generator.validate()?;
        Ok(())
    }
}

// =============================================================================
// Generator Configuration
// =============================================================================

/// Settings for the generation orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Token budget for the reasoning-heavy plan call.
    pub plan_token_budget: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            plan_token_budget: 16_000,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.plan_token_budget == 0 {
            return Err(ForgeError::Config(
                "generator.plan_token_budget must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Database Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("proposalforge.db"),
        }
    }
}
