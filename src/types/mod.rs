pub mod error;
pub mod plan;
pub mod proposal;
pub mod template;

pub use error::{ForgeError, Result, ResultExt};
pub use plan::{Deliverable, LineItem, ProposalPlan, ScopeItem, TimelinePhase};
pub use proposal::{
    Client, CreateProposalInput, GenerationMetadata, Profile, Proposal, ProposalContent,
    ProposalStatus,
};
pub use template::{AiGuidance, SectionConfig, TemplateContent};
