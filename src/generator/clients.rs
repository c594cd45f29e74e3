//! Client Resolution
//!
//! Deduplicates or creates a client record from extracted contact info.
//! Idempotent against existing records by email, then company name. A
//! generation with no extractable contact info creates nothing.
//!
//! Failure policy lives with the caller: any error here is caught and logged
//! by the orchestrator and never aborts a generation.

use tracing::debug;

use crate::storage::Database;
use crate::types::Result;

/// Resolve contact info to a client id, creating a record when no exact
/// match exists. Returns `None` when both name and company are absent.
///
/// The caller is responsible for linking the returned id onto the proposal
/// row; this function never writes the proposal.
pub fn resolve_client(
    db: &Database,
    owner_id: &str,
    name: Option<&str>,
    email: Option<&str>,
    company: Option<&str>,
) -> Result<Option<String>> {
    let name = non_empty(name);
    let email = non_empty(email);
    let company = non_empty(company);

    if name.is_none() && company.is_none() {
        return Ok(None);
    }

    // Exact-match lookup, email first. No fuzzy matching.
    if let Some(email) = email
        && let Some(existing) = db.find_client_by_email(owner_id, email)?
    {
        debug!(client_id = %existing.id, "resolved client by email");
        return Ok(Some(existing.id));
    }

    if let Some(company) = company
        && let Some(existing) = db.find_client_by_company(owner_id, company)?
    {
        debug!(client_id = %existing.id, "resolved client by company");
        return Ok(Some(existing.id));
    }

    // No match: create. Company stands in for a missing name.
    let display_name = name.or(company).unwrap_or_default();
    let created = db.insert_client(owner_id, display_name, email, company)?;
    debug!(client_id = %created.id, "created client");
    Ok(Some(created.id))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
