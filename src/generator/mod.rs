//! Generation Orchestrator
//!
//! The top-level state machine: sequential plan generation with extended
//! reasoning, best-effort client resolution, a parallel section fan-out
//! gated by template configuration, and a single terminal write.
//!
//! The caller fires this asynchronously and never awaits it, so nothing here
//! throws across that boundary: every failure terminates in a persisted
//! metadata record, which is the pipeline's only failure channel.

pub mod clients;
pub mod plan;
pub mod progress;
pub mod prompts;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::ai::normalize::normalize;
use crate::ai::provider::SharedProvider;
use crate::config::GeneratorConfig;
use crate::storage::SharedDatabase;
use crate::types::{
    CreateProposalInput, GenerationMetadata, Profile, ProposalContent, Result, TemplateContent,
};

use progress::{
    ProgressTracker, STEP_ANALYZING, STEP_DRAFTING_SCOPE, STEP_EXECUTIVE_SUMMARY, STEP_FINALIZING,
    STEP_RESEARCHING, STEP_TIMELINE,
};

const GENERIC_FAILURE: &str = "Proposal generation failed";

/// Drives one proposal generation run from brief to draft.
///
/// Designed for exactly-once execution per proposal id: there is no locking,
/// and two concurrent invocations for the same id would race on the row.
pub struct ProposalGenerator {
    db: SharedDatabase,
    provider: SharedProvider,
    config: GeneratorConfig,
}

impl ProposalGenerator {
    pub fn new(db: SharedDatabase, provider: SharedProvider, config: GeneratorConfig) -> Self {
        Self {
            db,
            provider,
            config,
        }
    }

    /// Fire-and-forget entry point: detaches the run so the caller (an HTTP
    /// action that just inserted the row in `generating` status) can return
    /// immediately. The handle is returned for tests; production callers
    /// drop it.
    pub fn spawn(
        self: Arc<Self>,
        proposal_id: String,
        input: CreateProposalInput,
        profile: Profile,
        template: Option<TemplateContent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.generate(&proposal_id, input, profile, template).await;
        })
    }

    /// Run generation to completion or failure. Never returns an error: the
    /// outcome lands on the proposal row either way.
    pub async fn generate(
        &self,
        proposal_id: &str,
        input: CreateProposalInput,
        profile: Profile,
        template: Option<TemplateContent>,
    ) {
        info!(proposal_id, provider = self.provider.name(), "starting proposal generation");

        let mut tracker = ProgressTracker::new(self.db.clone(), proposal_id);

        match self
            .run(proposal_id, &input, &profile, template.as_ref(), &mut tracker)
            .await
        {
            Ok(()) => {
                info!(proposal_id, "proposal generation complete");
            }
            Err(e) => {
                error!(proposal_id, "proposal generation failed: {}", e);

                let mut message = e.to_string();
                if message.trim().is_empty() {
                    message = GENERIC_FAILURE.to_string();
                }

                let metadata = GenerationMetadata::failed(tracker.completed_steps(), message);
                if let Err(write_err) = self.db.mark_generation_failed(proposal_id, &metadata) {
                    error!(
                        proposal_id,
                        "failed to record generation failure: {}", write_err
                    );
                }
            }
        }
    }

    async fn run(
        &self,
        proposal_id: &str,
        input: &CreateProposalInput,
        profile: &Profile,
        template: Option<&TemplateContent>,
        tracker: &mut ProgressTracker,
    ) -> Result<()> {
        tracker.begin(STEP_ANALYZING, 10);
        tracker.begin(STEP_RESEARCHING, 20);

        // Plan: the one reasoning-heavy call. A parse failure here is fatal
        // to the whole run.
        tracker.begin(STEP_DRAFTING_SCOPE, 30);
        let plan_response = self
            .provider
            .reason(
                &prompts::plan_system_prompt(template),
                &prompts::plan_user_prompt(input, profile, template),
                self.config.plan_token_budget,
            )
            .await?;
        let plan = plan::parse_plan(&plan_response)?;

        // Client resolution: plan-extracted contact info wins over caller
        // input. Best-effort; persisted immediately so linkage survives a
        // failure in any later step.
        let client_name = plan.client_name.clone().or_else(|| input.client_name.clone());
        let client_email = plan
            .client_email
            .clone()
            .or_else(|| input.client_email.clone());
        let client_company = plan
            .client_company
            .clone()
            .or_else(|| input.client_company.clone());

        let mut linked_client: Option<String> = None;
        match clients::resolve_client(
            &self.db,
            &profile.id,
            client_name.as_deref(),
            client_email.as_deref(),
            client_company.as_deref(),
        ) {
            Ok(Some(client_id)) => {
                if let Err(e) = self.db.update_proposal_client(
                    proposal_id,
                    client_name.as_deref(),
                    client_email.as_deref(),
                    client_company.as_deref(),
                    &client_id,
                ) {
                    warn!(proposal_id, "client linkage write failed (ignored): {}", e);
                } else {
                    linked_client = Some(client_id);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(proposal_id, "client resolution failed (ignored): {}", e);
            }
        }

        // Section fan-out. Gates default open without a template; template
        // terms short-circuit the terms call entirely.
        tracker.begin(STEP_TIMELINE, 50);

        let section_config = template.map(|t| t.section_config).unwrap_or_default();
        let template_terms = template.filter(|t| t.has_terms()).map(|t| t.terms.clone());
        let section_system = prompts::section_system_prompt(template);

        let summary_fut = async {
            self.provider
                .complete(&section_system, &prompts::executive_summary_prompt(&plan))
                .await
                .map(|text| normalize(&text))
        };
        let understanding_fut = async {
            if section_config.include_understanding {
                self.provider
                    .complete(&section_system, &prompts::understanding_prompt(input, &plan))
                    .await
                    .map(|text| Some(normalize(&text)))
            } else {
                Ok(None)
            }
        };
        let terms_fut = async {
            match &template_terms {
                // Template terms are persisted verbatim: no model call, no
                // normalization.
                Some(terms) => Ok(terms.clone()),
                None => self
                    .provider
                    .complete(&section_system, &prompts::terms_prompt(&plan))
                    .await
                    .map(|text| normalize(&text)),
            }
        };
        let about_us_fut = async {
            if section_config.include_about_us {
                self.provider
                    .complete(&section_system, &prompts::about_us_prompt(profile, &plan))
                    .await
                    .map(|text| Some(normalize(&text)))
            } else {
                Ok(None)
            }
        };

        // All four start before any is awaited; one failure fails the run
        // through the `?`s below.
        let (summary, understanding, terms, about_us) =
            tokio::join!(summary_fut, understanding_fut, terms_fut, about_us_fut);
        let executive_summary = summary?;
        let understanding = understanding?;
        let terms = terms?;
        let about_us = about_us?;

        tracker.begin(STEP_EXECUTIVE_SUMMARY, 80);
        tracker.begin(STEP_FINALIZING, 90);

        let content = ProposalContent {
            title: plan.title.clone(),
            executive_summary,
            understanding,
            scope_of_work: plan::render_scope_of_work(&plan),
            deliverables: plan::render_deliverables(&plan),
            timeline: plan::render_timeline(&plan),
            investment: plan::render_investment(&plan),
            terms,
            about_us,
        };

        let metadata = GenerationMetadata::complete(tracker.finish());
        self.db.finalize_proposal(proposal_id, &content, &metadata)?;

        if let Some(client_id) = linked_client {
            // Recompute, not increment. Loses updates under concurrent
            // generations for the same client.
            let count = self.db.count_proposals_for_client(&client_id)?;
            self.db.set_client_proposal_count(&client_id, count)?;
        }

        Ok(())
    }
}
