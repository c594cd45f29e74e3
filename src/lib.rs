//! ProposalForge - AI Proposal Generation Pipeline
//!
//! Turns a client brief into a full proposal draft using an LLM: a
//! multi-stage, partially-parallel, partially-templated content-generation
//! workflow with progress tracking, error recovery, and best-effort client
//! record resolution, running as a detached background task.
//!
//! ## Core Flow
//!
//! 1. A caller inserts a proposal row in `generating` status and fires the
//!    orchestrator without awaiting it
//! 2. One reasoning-heavy call drafts a structured plan; contact info in the
//!    plan resolves (or creates) a client record
//! 3. Sections fan out in parallel, gated by template configuration
//! 4. One terminal write lands the draft content - or the failure record
//!
//! The proposal row's `generation_metadata` blob is the entire contract with
//! the polling UI; nothing else is externally observable.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use proposalforge::{ConfigLoader, Database, ProposalGenerator, create_provider};
//!
//! let config = ConfigLoader::load()?;
//! let db = Arc::new(Database::open(&config.database.path)?);
//! let provider = create_provider(&config.llm)?;
//! let generator = Arc::new(ProposalGenerator::new(db.clone(), provider, config.generator));
//!
//! let proposal_id = db.insert_proposal(&profile.id, &input)?;
//! generator.clone().spawn(proposal_id, input, profile, template); // fire-and-forget
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: completion provider abstraction and response normalization
//! - [`generator`]: the orchestrator, prompts, plan parsing, progress
//! - [`storage`]: pooled SQLite row store
//! - [`config`]: layered explicit configuration

pub mod ai;
pub mod config;
pub mod generator;
pub mod storage;
pub mod telemetry;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, DatabaseConfig, GeneratorConfig};

// Error Types
pub use types::error::{ForgeError, Result, ResultExt};

// Domain Models
pub use types::{
    Client, CreateProposalInput, GenerationMetadata, Profile, Proposal, ProposalContent,
    ProposalPlan, ProposalStatus, TemplateContent,
};

// Storage
pub use storage::database::PoolConfig;
pub use storage::{Database, SharedDatabase};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use generator::ProposalGenerator;
pub use generator::clients::resolve_client;
pub use generator::plan::parse_plan;
pub use generator::progress::ProgressTracker;

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    AnthropicProvider, CompletionProvider, ProviderConfig, SharedProvider, create_provider,
    normalize,
};
