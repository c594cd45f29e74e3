//! Progress Reporting
//!
//! Persists the monotonically-advancing progress record the UI poller reads.
//! Every write replaces the whole metadata blob; the tracker carries the
//! accumulated step list so no read-before-write merge is ever needed.
//! Write failures are logged and swallowed - telemetry must never abort an
//! otherwise-successful generation.

use tracing::warn;

use crate::storage::SharedDatabase;
use crate::types::GenerationMetadata;

// Step labels are the UI contract: completed steps render as checked items,
// the current step as the active item.
pub const STEP_ANALYZING: &str = "Analyzing client brief";
pub const STEP_RESEARCHING: &str = "Researching client background";
pub const STEP_DRAFTING_SCOPE: &str = "Drafting scope of work";
pub const STEP_TIMELINE: &str = "Creating project timeline";
pub const STEP_EXECUTIVE_SUMMARY: &str = "Writing executive summary";
pub const STEP_FINALIZING: &str = "Finalizing proposal";

/// Tracks step completion across one generation run and writes each
/// transition to the proposal row.
pub struct ProgressTracker {
    db: SharedDatabase,
    proposal_id: String,
    current: Option<String>,
    completed: Vec<String>,
}

impl ProgressTracker {
    pub fn new(db: SharedDatabase, proposal_id: impl Into<String>) -> Self {
        Self {
            db,
            proposal_id: proposal_id.into(),
            current: None,
            completed: Vec::new(),
        }
    }

    /// Enter a step: the previous step (if any) moves to completed, and the
    /// new step is written as current. A step that fails mid-flight stays
    /// "attempted", never "completed".
    pub fn begin(&mut self, step: &str, progress: u8) {
        if let Some(previous) = self.current.take() {
            self.completed.push(previous);
        }

        let metadata =
            GenerationMetadata::in_progress(step, self.completed.clone(), progress);
        if let Err(e) = self.db.update_generation_metadata(&self.proposal_id, &metadata) {
            warn!(
                proposal_id = %self.proposal_id,
                step,
                "progress write failed (ignored): {}",
                e
            );
        }

        self.current = Some(step.to_string());
    }

    /// Steps completed so far, excluding any in-flight step. Used for the
    /// terminal failure record.
    pub fn completed_steps(&self) -> Vec<String> {
        self.completed.clone()
    }

    /// Close out the run: the in-flight step counts as completed. Used for
    /// the terminal success record.
    pub fn finish(&mut self) -> Vec<String> {
        if let Some(current) = self.current.take() {
            self.completed.push(current);
        }
        self.completed.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::types::CreateProposalInput;
    use std::sync::Arc;

    fn setup() -> (SharedDatabase, String) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let id = db
            .insert_proposal(
                "owner-1",
                &CreateProposalInput {
                    client_brief: "brief".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        (db, id)
    }

    #[test]
    fn test_begin_writes_metadata() {
        let (db, id) = setup();
        let mut tracker = ProgressTracker::new(db.clone(), &id);

        tracker.begin(STEP_ANALYZING, 10);

        let meta = db.get_proposal(&id).unwrap().generation_metadata.unwrap();
        assert_eq!(meta.current_step, STEP_ANALYZING);
        assert_eq!(meta.progress, 10);
        assert!(meta.completed_steps.is_empty());
    }

    #[test]
    fn test_previous_step_moves_to_completed() {
        let (db, id) = setup();
        let mut tracker = ProgressTracker::new(db.clone(), &id);

        tracker.begin(STEP_ANALYZING, 10);
        tracker.begin(STEP_RESEARCHING, 20);

        let meta = db.get_proposal(&id).unwrap().generation_metadata.unwrap();
        assert_eq!(meta.current_step, STEP_RESEARCHING);
        assert_eq!(meta.completed_steps, vec![STEP_ANALYZING.to_string()]);
    }

    #[test]
    fn test_in_flight_step_not_completed_on_failure() {
        let (db, id) = setup();
        let mut tracker = ProgressTracker::new(db, &id);

        tracker.begin(STEP_ANALYZING, 10);
        tracker.begin(STEP_DRAFTING_SCOPE, 30);

        // A failure during "Drafting scope of work" reports only the prior
        // step as completed.
        assert_eq!(tracker.completed_steps(), vec![STEP_ANALYZING.to_string()]);
    }

    #[test]
    fn test_finish_includes_current_step() {
        let (db, id) = setup();
        let mut tracker = ProgressTracker::new(db, &id);

        tracker.begin(STEP_ANALYZING, 10);
        tracker.begin(STEP_FINALIZING, 90);

        assert_eq!(
            tracker.finish(),
            vec![STEP_ANALYZING.to_string(), STEP_FINALIZING.to_string()]
        );
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let mut tracker = ProgressTracker::new(db, "missing-proposal");

        // Missing row: the write fails, the tracker carries on.
        tracker.begin(STEP_ANALYZING, 10);
        assert!(tracker.completed_steps().is_empty());
    }
}
