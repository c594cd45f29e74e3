//! Unified Error Type System
//!
//! Centralized error types for the entire crate.
//!
//! ## Design Principles
//!
//! - Single unified error type (ForgeError) for the entire application
//! - Structured variants with context for better debugging
//! - No panic/unwrap in library paths - all errors are recoverable
//! - The generation pipeline never lets an error cross the fire-and-forget
//!   boundary: the orchestrator converts every failure into a persisted
//!   metadata record instead of propagating

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // LLM Errors
    // -------------------------------------------------------------------------
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// The plan response could not be interpreted as structured JSON under
    /// direct or best-effort extraction. Fatal to a generation run.
    #[error("Plan parse error: {0}")]
    PlanParse(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

pub type Result<T> = std::result::Result<T, ForgeError>;

impl ForgeError {
    /// Create an LLM API error from any displayable cause
    pub fn llm(message: impl Into<String>) -> Self {
        Self::LlmApi(message.into())
    }

    /// Create a not-found error for a row lookup
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error, converting it into a storage error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| ForgeError::Storage(format!("{}: {}", context.into(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ForgeError::not_found("proposal", "p-123");
        assert_eq!(err.to_string(), "proposal not found: p-123");
    }

    #[test]
    fn test_plan_parse_display() {
        let err = ForgeError::PlanParse("no JSON object in response".to_string());
        assert!(err.to_string().starts_with("Plan parse error"));
    }

    #[test]
    fn test_with_context() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk on fire"));
        let err = result.with_context("acquiring connection").unwrap_err();
        assert!(err.to_string().contains("acquiring connection"));
        assert!(err.to_string().contains("disk on fire"));
    }
}
