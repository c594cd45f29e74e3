//! Proposal Template Model
//!
//! A template is a named bundle of default styling, boilerplate terms, and AI
//! tone/pricing guidance an owner may apply to bias generation for a given
//! industry or service type. Read-only input to the pipeline.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateContent {
    #[serde(default)]
    pub color_scheme: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,

    /// Boilerplate terms text. Empty signals "generate via AI"; non-empty is
    /// persisted verbatim with no model call and no normalization.
    #[serde(default)]
    pub terms: String,

    #[serde(default)]
    pub ai_guidance: Option<AiGuidance>,

    #[serde(default)]
    pub section_config: SectionConfig,
}

impl TemplateContent {
    /// Non-empty template terms short-circuit the terms model call.
    pub fn has_terms(&self) -> bool {
        !self.terms.trim().is_empty()
    }
}

/// Free-text guidance fed verbatim into prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiGuidance {
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub industry_context: Option<String>,
    #[serde(default)]
    pub pricing_guidance: Option<String>,
    #[serde(default)]
    pub pricing_model: Option<String>,
    #[serde(default)]
    pub style_notes: Option<String>,
}

/// Gates for the optional sections. Both default on, matching template-less
/// generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SectionConfig {
    #[serde(default = "default_true")]
    pub include_understanding: bool,
    #[serde(default = "default_true")]
    pub include_about_us: bool,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            include_understanding: true,
            include_about_us: true,
        }
    }
}

fn default_true() -> bool {
    true
}
