//! Plan Parsing and Rendering
//!
//! Extracts the structured plan from the reasoning call's response, and
//! renders plan data into the persisted content fields (no model calls).

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ForgeError, ProposalPlan, Result};

// Greedy: grabs from the first `{` to the last `}`, which survives prose or
// fences wrapped around the object.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid object regex"));

/// Parse a plan from a possibly markdown-wrapped JSON response.
///
/// Direct parse first; on failure, best-effort extraction of the outermost
/// `{...}` substring. Both failing is fatal to the whole run, not a degraded
/// result.
pub fn parse_plan(response: &str) -> Result<ProposalPlan> {
    if let Ok(plan) = serde_json::from_str::<ProposalPlan>(response) {
        return Ok(plan);
    }

    if let Some(candidate) = JSON_OBJECT_RE.find(response)
        && let Ok(plan) = serde_json::from_str::<ProposalPlan>(candidate.as_str())
    {
        return Ok(plan);
    }

    Err(ForgeError::PlanParse(
        "failed to parse proposal plan from model response".to_string(),
    ))
}

// =============================================================================
// Plan -> Content Rendering
// =============================================================================

/// Scope items as titled paragraphs.
pub fn render_scope_of_work(plan: &ProposalPlan) -> String {
    plan.scope_items
        .iter()
        .map(|item| {
            if item.description.is_empty() {
                item.title.clone()
            } else {
                format!("{}\n{}", item.title, item.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_deliverables(plan: &ProposalPlan) -> String {
    plan.deliverables
        .iter()
        .map(|item| {
            if item.description.is_empty() {
                item.title.clone()
            } else {
                format!("{}\n{}", item.title, item.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Timeline phases as phase/duration lines.
pub fn render_timeline(plan: &ProposalPlan) -> String {
    plan.timeline_phases
        .iter()
        .map(|phase| {
            let header = if phase.duration.is_empty() {
                phase.phase.clone()
            } else {
                format!("{} ({})", phase.phase, phase.duration)
            };
            if phase.description.is_empty() {
                header
            } else {
                format!("{}\n{}", header, phase.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Line items plus total. Amounts are printed as-is; no reconciliation
/// against the suggested total is enforced.
pub fn render_investment(plan: &ProposalPlan) -> String {
    let mut lines: Vec<String> = plan
        .line_items
        .iter()
        .map(|item| format!("{}: {}", item.description, format_cents(item.amount_cents)))
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Total investment: {}",
        format_cents(plan.suggested_investment_cents)
    ));

    lines.join("\n")
}

/// Integer cents to a dollar string with thousands separators.
pub fn format_cents(cents: u64) -> String {
    let dollars = cents / 100;
    let remainder = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}.{:02}", grouped, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LineItem, ScopeItem, TimelinePhase};

    fn sample_plan_json() -> String {
        serde_json::json!({
            "title": "Website Redesign",
            "client_analysis": "SaaS company, dated site.",
            "scope_items": [{"title": "Discovery", "description": "Interviews"}],
            "deliverables": [],
            "timeline_phases": [],
            "suggested_investment_cents": 1850000,
            "line_items": [],
            "key_selling_points": []
        })
        .to_string()
    }

    #[test]
    fn test_parse_bare_json() {
        let plan = parse_plan(&sample_plan_json()).unwrap();
        assert_eq!(plan.title, "Website Redesign");
    }

    #[test]
    fn test_parse_fenced_json_matches_bare() {
        let bare = sample_plan_json();
        let fenced = format!("```json\n{}\n```", bare);

        let from_bare = parse_plan(&bare).unwrap();
        let from_fenced = parse_plan(&fenced).unwrap();
        assert_eq!(
            serde_json::to_value(&from_bare).unwrap(),
            serde_json::to_value(&from_fenced).unwrap()
        );
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let wrapped = format!("Here is the plan you asked for:\n{}\nHope it helps!",
            sample_plan_json());
        assert!(parse_plan(&wrapped).is_ok());
    }

    #[test]
    fn test_parse_non_json_fails() {
        let err = parse_plan("I can't help with that.").unwrap_err();
        assert!(matches!(err, ForgeError::PlanParse(_)));
    }

    #[test]
    fn test_render_scope() {
        let mut plan = parse_plan(&sample_plan_json()).unwrap();
        plan.scope_items.push(ScopeItem {
            title: "Build".to_string(),
            description: String::new(),
        });
        let rendered = render_scope_of_work(&plan);
        assert_eq!(rendered, "Discovery\nInterviews\n\nBuild");
    }

    #[test]
    fn test_render_timeline() {
        let mut plan = parse_plan(&sample_plan_json()).unwrap();
        plan.timeline_phases.push(TimelinePhase {
            phase: "Discovery".to_string(),
            duration: "2 weeks".to_string(),
            description: "Audit and interviews".to_string(),
        });
        assert_eq!(
            render_timeline(&plan),
            "Discovery (2 weeks)\nAudit and interviews"
        );
    }

    #[test]
    fn test_render_investment_with_line_items() {
        let mut plan = parse_plan(&sample_plan_json()).unwrap();
        plan.line_items.push(LineItem {
            description: "Design".to_string(),
            amount_cents: 1_000_000,
        });
        let rendered = render_investment(&plan);
        assert!(rendered.contains("Design: $10,000.00"));
        assert!(rendered.ends_with("Total investment: $18,500.00"));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(99), "$0.99");
        assert_eq!(format_cents(123456), "$1,234.56");
        assert_eq!(format_cents(100000000), "$1,000,000.00");
    }
}
