//! Proposal Plan Model
//!
//! The structured intermediate result produced by the reasoning-heavy first
//! generation call. Ephemeral: it seeds all section prompts and is rendered
//! into the persisted content fields, but is never stored as-is.

use serde::{Deserialize, Serialize};

/// Structured plan extracted from the model's first response.
///
/// Monetary amounts are non-negative integer cents, enforced at the type
/// level (`u64` deserialization rejects negatives). `line_items` amounts are
/// not required to sum to `suggested_investment_cents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalPlan {
    pub title: String,

    /// The model's read of the client's situation and needs.
    #[serde(default)]
    pub client_analysis: String,

    // Contact info the model extracted from the brief. May corroborate or
    // override caller-supplied values.
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_company: Option<String>,

    #[serde(default)]
    pub scope_items: Vec<ScopeItem>,
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
    #[serde(default)]
    pub timeline_phases: Vec<TimelinePhase>,

    #[serde(default)]
    pub suggested_investment_cents: u64,
    #[serde(default)]
    pub line_items: Vec<LineItem>,

    #[serde(default)]
    pub key_selling_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deliverable {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePhase {
    pub phase: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    #[serde(default)]
    pub amount_cents: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_plan_parses_with_defaults() {
        let plan: ProposalPlan = serde_json::from_str(r#"{"title": "Website Redesign"}"#).unwrap();
        assert_eq!(plan.title, "Website Redesign");
        assert!(plan.scope_items.is_empty());
        assert_eq!(plan.suggested_investment_cents, 0);
        assert!(plan.client_email.is_none());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result: std::result::Result<ProposalPlan, _> = serde_json::from_str(
            r#"{"title": "Bad", "suggested_investment_cents": -500}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_full_plan_roundtrip() {
        let json = r#"{
            "title": "SaaS Redesign",
            "client_analysis": "Growth-stage SaaS with dated marketing site.",
            "client_name": "Dana Reyes",
            "client_email": "dana@example.com",
            "client_company": "Acme Metrics",
            "scope_items": [{"title": "Discovery", "description": "Stakeholder interviews"}],
            "deliverables": [{"title": "Design system", "description": "Figma library"}],
            "timeline_phases": [{"phase": "Discovery", "duration": "2 weeks", "description": "Audit"}],
            "suggested_investment_cents": 1850000,
            "line_items": [{"description": "Design", "amount_cents": 1000000}],
            "key_selling_points": ["Conversion-focused"]
        }"#;
        let plan: ProposalPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.scope_items.len(), 1);
        assert_eq!(plan.line_items[0].amount_cents, 1_000_000);
        assert_eq!(plan.suggested_investment_cents, 1_850_000);
    }
}
