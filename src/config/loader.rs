//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources:
//! 1. Built-in defaults (Serialized)
//! 2. A TOML file (proposalforge.toml, or an explicit path)
//! 3. Environment variables (PROPOSALFORGE_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::Path;

use tracing::debug;

use super::types::Config;
use crate::types::{ForgeError, Result};

const DEFAULT_CONFIG_FILE: &str = "proposalforge.toml";
const ENV_PREFIX: &str = "PROPOSALFORGE_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults -> proposalforge.toml -> env vars
    pub fn load() -> Result<Config> {
        Self::load_with_file(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration with a specific TOML file in the chain.
    pub fn load_with_file(path: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if path.exists() {
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // e.g. PROPOSALFORGE_LLM_MODEL -> llm.model
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split('_').lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ForgeError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only (no env merge).
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ForgeError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_default_config() {
        let config = ConfigLoader::load_from_file(Path::new("/nonexistent.toml")).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.generator.plan_token_budget, 16_000);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[llm]
model = "claude-opus-4-20250514"
timeout_secs = 120

[generator]
plan_token_budget = 20000

[database]
path = "/tmp/forge-test.db"
"#
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.llm.model.as_deref(), Some("claude-opus-4-20250514"));
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.generator.plan_token_budget, 20_000);
    }

    #[test]
    fn test_invalid_file_config_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[generator]
plan_token_budget = 0
"#
        )
        .unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }
}
