//! Proposal Row Model and Generation Metadata
//!
//! The proposal row is the pipeline's entire externally observable surface:
//! the triggering action inserts it in `generating` status and detaches, the
//! UI polls it, and the orchestrator is its sole writer until generation
//! terminates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Status
// =============================================================================

/// Proposal lifecycle status. The pipeline only ever writes the
/// `Generating` -> `Draft` transition; later states belong to the editor and
/// signing flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Generating,
    #[default]
    Draft,
    Sent,
    Accepted,
    Declined,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generating => "generating",
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl std::str::FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "generating" => Ok(Self::Generating),
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            other => Err(format!("unknown proposal status: {}", other)),
        }
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Generation Metadata
// =============================================================================

/// The single JSON blob that is the whole progress/error contract between the
/// orchestrator and the polling UI.
///
/// Written wholesale on every update, exclusively by the orchestrator.
/// `progress` only ever increases within one run; `error` is present only on
/// terminal failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Label of the in-flight or last-attempted step.
    pub current_step: String,
    /// Step labels completed so far, in completion order.
    pub completed_steps: Vec<String>,
    /// 0-100.
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationMetadata {
    pub fn in_progress(step: impl Into<String>, completed: Vec<String>, progress: u8) -> Self {
        Self {
            current_step: step.into(),
            completed_steps: completed,
            progress,
            error: None,
        }
    }

    /// Terminal success record.
    pub fn complete(completed: Vec<String>) -> Self {
        Self {
            current_step: "Complete".to_string(),
            completed_steps: completed,
            progress: 100,
            error: None,
        }
    }

    /// Terminal failure record. Progress resets to 0 so the UI bar reads as a
    /// failed run rather than a stalled one.
    pub fn failed(completed: Vec<String>, error: impl Into<String>) -> Self {
        Self {
            current_step: "Error".to_string(),
            completed_steps: completed,
            progress: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// =============================================================================
// Proposal Row
// =============================================================================

/// A proposal row as read from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub status: ProposalStatus,

    pub executive_summary: Option<String>,
    pub understanding: Option<String>,
    pub scope_of_work: Option<String>,
    pub deliverables: Option<String>,
    pub timeline: Option<String>,
    pub investment: Option<String>,
    pub terms: Option<String>,
    pub about_us: Option<String>,

    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_company: Option<String>,
    pub client_id: Option<String>,

    pub generation_metadata: Option<GenerationMetadata>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The full content payload of the terminal success write: title, all content
/// fields, and the `draft` status transition land in one update.
#[derive(Debug, Clone)]
pub struct ProposalContent {
    pub title: String,
    pub executive_summary: String,
    pub understanding: Option<String>,
    pub scope_of_work: String,
    pub deliverables: String,
    pub timeline: String,
    pub investment: String,
    pub terms: String,
    pub about_us: Option<String>,
}

// =============================================================================
// Inputs
// =============================================================================

/// Input captured by the "create proposal" action and handed to the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProposalInput {
    pub client_brief: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_company: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
}

/// The owning account's profile, injected into plan and about-us prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Owner/account id; scopes all client lookups.
    pub id: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

// =============================================================================
// Client Row
// =============================================================================

/// A client record, deduplicated per owner by email then company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub proposal_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
