//! Prompt Builders
//!
//! Pure functions constructing system/user prompts for the two response
//! modes: structured-JSON plan and free-text section. Template guidance is
//! injected verbatim when present. No I/O, no side effects.

use crate::types::{CreateProposalInput, Profile, ProposalPlan, TemplateContent};

use super::plan::format_cents;

// =============================================================================
// System Prompts
// =============================================================================

const PLAN_PERSONA: &str = "You are an expert proposal writer for agencies and freelancers. \
You turn rough client briefs into specific, credible proposal plans. \
Prefer specificity over filler: concrete scope items, realistic timelines, \
defensible pricing. Respond with JSON only - no markdown, no commentary.";

const SECTION_PERSONA: &str = "You are an expert proposal writer for agencies and freelancers. \
You write polished, client-facing proposal sections. \
Prefer specificity over filler. Respond with plain text only - no JSON, \
no markdown formatting. Use ALL CAPS for headings if headings are needed.";

/// System prompt for the structured-JSON plan call.
pub fn plan_system_prompt(template: Option<&TemplateContent>) -> String {
    with_guidance(PLAN_PERSONA, template)
}

/// System prompt for free-text section calls.
pub fn section_system_prompt(template: Option<&TemplateContent>) -> String {
    with_guidance(SECTION_PERSONA, template)
}

fn with_guidance(persona: &str, template: Option<&TemplateContent>) -> String {
    let Some(guidance) = template.and_then(|t| t.ai_guidance.as_ref()) else {
        return persona.to_string();
    };

    let mut prompt = persona.to_string();
    prompt.push_str("\n\nTone and style guidance:");
    if let Some(tone) = &guidance.tone {
        prompt.push_str(&format!("\n{}", tone));
    }
    if let Some(notes) = &guidance.style_notes
        && !notes.trim().is_empty()
    {
        prompt.push_str(&format!("\n{}", notes));
    }
    prompt
}

// =============================================================================
// Plan User Prompt
// =============================================================================

/// User prompt for the plan call: brief, any caller-supplied client fields,
/// the owner's profile, and template industry/pricing guidance when present.
pub fn plan_user_prompt(
    input: &CreateProposalInput,
    profile: &Profile,
    template: Option<&TemplateContent>,
) -> String {
    let mut prompt = format!(
        "Create a proposal plan for the following client brief.\n\nBrief:\n{}",
        input.client_brief
    );

    if let Some(service) = &input.service_type {
        prompt.push_str(&format!("\n\nService type: {}", service));
    }

    let mut known = Vec::new();
    if let Some(name) = &input.client_name {
        known.push(format!("name: {}", name));
    }
    if let Some(email) = &input.client_email {
        known.push(format!("email: {}", email));
    }
    if let Some(company) = &input.client_company {
        known.push(format!("company: {}", company));
    }
    if !known.is_empty() {
        prompt.push_str(&format!("\n\nKnown client details:\n{}", known.join("\n")));
    }

    if let Some(company) = &profile.company_name {
        prompt.push_str(&format!("\n\nOur company: {}", company));
    }
    if let Some(bio) = &profile.bio {
        prompt.push_str(&format!("\nAbout us: {}", bio));
    }

    if let Some(guidance) = template.and_then(|t| t.ai_guidance.as_ref()) {
        if let Some(industry) = &guidance.industry_context {
            prompt.push_str(&format!("\n\nIndustry context: {}", industry));
        }
        if let Some(pricing) = &guidance.pricing_guidance {
            prompt.push_str(&format!("\nPricing guidance: {}", pricing));
        }
        if let Some(model) = &guidance.pricing_model {
            prompt.push_str(&format!("\nPricing model: {}", model));
        }
    }

    prompt.push_str(
        r#"

Respond with a single JSON object with these fields:
{
  "title": string,
  "client_analysis": string,
  "client_name": string or null (extracted from the brief if present),
  "client_email": string or null,
  "client_company": string or null,
  "scope_items": [{"title": string, "description": string}],
  "deliverables": [{"title": string, "description": string}],
  "timeline_phases": [{"phase": string, "duration": string, "description": string}],
  "suggested_investment_cents": integer (non-negative, in cents),
  "line_items": [{"description": string, "amount_cents": integer}],
  "key_selling_points": [string]
}"#,
    );

    prompt
}

// =============================================================================
// Section User Prompts
// =============================================================================

/// Executive summary: seeded from the plan's client analysis, scope titles,
/// and suggested investment.
pub fn executive_summary_prompt(plan: &ProposalPlan) -> String {
    let scope_titles: Vec<&str> = plan.scope_items.iter().map(|s| s.title.as_str()).collect();

    format!(
        "Write the executive summary for a proposal titled \"{}\".\n\n\
         Client analysis: {}\n\
         Scope: {}\n\
         Suggested investment: {}\n\n\
         Two to four short paragraphs. Confident, client-facing, no headings.",
        plan.title,
        plan.client_analysis,
        scope_titles.join(", "),
        format_cents(plan.suggested_investment_cents),
    )
}

/// Understanding-of-needs section.
pub fn understanding_prompt(input: &CreateProposalInput, plan: &ProposalPlan) -> String {
    format!(
        "Write the \"understanding of your needs\" section of a proposal.\n\n\
         Client brief:\n{}\n\n\
         Our analysis: {}\n\n\
         Show the client we understood their situation and goals. \
         Two to three paragraphs, no headings.",
        input.client_brief, plan.client_analysis,
    )
}

/// Terms section, generated only when the template supplies none.
pub fn terms_prompt(plan: &ProposalPlan) -> String {
    format!(
        "Write the terms and conditions section for a proposal titled \"{}\" \
         with a total investment of {}.\n\n\
         Cover these areas, each under an ALL CAPS header: \
         PAYMENT TERMS, REVISIONS, INTELLECTUAL PROPERTY, CONFIDENTIALITY, CANCELLATION.\n\
         Keep each area to a short paragraph of plain, readable language.",
        plan.title,
        format_cents(plan.suggested_investment_cents),
    )
}

/// About-us section, seeded from the owner's profile.
pub fn about_us_prompt(profile: &Profile, plan: &ProposalPlan) -> String {
    let mut prompt = "Write the \"about us\" section of a client proposal.".to_string();

    if let Some(company) = &profile.company_name {
        prompt.push_str(&format!("\n\nCompany name: {}", company));
    }
    if let Some(bio) = &profile.bio {
        prompt.push_str(&format!("\nBackground: {}", bio));
    }
    if !plan.key_selling_points.is_empty() {
        prompt.push_str(&format!(
            "\nRelevant strengths for this project: {}",
            plan.key_selling_points.join("; ")
        ));
    }

    prompt.push_str("\n\nOne to two paragraphs, warm but professional, no headings.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AiGuidance;

    fn template_with_guidance() -> TemplateContent {
        TemplateContent {
            ai_guidance: Some(AiGuidance {
                tone: Some("Friendly but direct.".to_string()),
                industry_context: Some("B2B SaaS.".to_string()),
                pricing_guidance: Some("Value-based pricing.".to_string()),
                pricing_model: Some("Fixed fee.".to_string()),
                style_notes: Some("Short sentences.".to_string()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_system_prompt_base() {
        let prompt = plan_system_prompt(None);
        assert!(prompt.contains("JSON only"));
        assert!(!prompt.contains("Tone and style guidance"));
    }

    #[test]
    fn test_section_system_prompt_base() {
        let prompt = section_system_prompt(None);
        assert!(prompt.contains("plain text only"));
        assert!(prompt.contains("ALL CAPS"));
    }

    #[test]
    fn test_guidance_appended() {
        let template = template_with_guidance();
        let prompt = plan_system_prompt(Some(&template));
        assert!(prompt.contains("Tone and style guidance"));
        assert!(prompt.contains("Friendly but direct."));
        assert!(prompt.contains("Short sentences."));
    }

    #[test]
    fn test_empty_style_notes_skipped() {
        let mut template = template_with_guidance();
        if let Some(g) = template.ai_guidance.as_mut() {
            g.style_notes = Some("   ".to_string());
        }
        let prompt = section_system_prompt(Some(&template));
        assert!(prompt.contains("Friendly but direct."));
        assert!(!prompt.contains("   \n"));
    }

    #[test]
    fn test_builders_are_deterministic() {
        let template = template_with_guidance();
        assert_eq!(
            plan_system_prompt(Some(&template)),
            plan_system_prompt(Some(&template))
        );
    }

    #[test]
    fn test_plan_user_prompt_injects_guidance_and_fields() {
        let input = CreateProposalInput {
            client_brief: "Redesign our site.".to_string(),
            client_email: Some("dana@example.com".to_string()),
            ..Default::default()
        };
        let profile = Profile {
            id: "owner-1".to_string(),
            company_name: Some("Studio North".to_string()),
            bio: Some("Design studio.".to_string()),
        };
        let template = template_with_guidance();

        let prompt = plan_user_prompt(&input, &profile, Some(&template));
        assert!(prompt.contains("Redesign our site."));
        assert!(prompt.contains("dana@example.com"));
        assert!(prompt.contains("Studio North"));
        assert!(prompt.contains("Industry context: B2B SaaS."));
        assert!(prompt.contains("Pricing model: Fixed fee."));
        assert!(prompt.contains("suggested_investment_cents"));
    }

    #[test]
    fn test_terms_prompt_names_required_areas() {
        let plan: ProposalPlan =
            serde_json::from_str(r#"{"title": "Redesign", "suggested_investment_cents": 500000}"#)
                .unwrap();
        let prompt = terms_prompt(&plan);
        for header in [
            "PAYMENT TERMS",
            "REVISIONS",
            "INTELLECTUAL PROPERTY",
            "CONFIDENTIALITY",
            "CANCELLATION",
        ] {
            assert!(prompt.contains(header));
        }
        assert!(prompt.contains("$5,000.00"));
    }
}
