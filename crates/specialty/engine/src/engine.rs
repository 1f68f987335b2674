//! The workflow engine: pure transitions over association records
//!
//! Every operation takes a record by reference and returns a new record
//! on success. A failed operation returns the typed error and nothing
//! else — there are no partial writes to roll back.

use crate::guards;
use chrono::Utc;
use specialty_types::{
    ApprovalAction, ApprovalComment, ApprovalResult, AssociationState, Rejection, Report, Role,
    SpecialtyAssociation, Tier,
};

/// The specialty approval workflow engine — decides, never persists
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkflowEngine;

impl WorkflowEngine {
    pub fn new() -> Self {
        Self
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Submit an evidence report, entering (or re-entering) the chain
    /// at the counselor tier.
    ///
    /// Resubmission starts a fresh full-review cycle: all three
    /// approval flags and their timestamps are cleared.
    pub fn submit_report(
        &self,
        record: &SpecialtyAssociation,
        text: impl Into<String>,
    ) -> ApprovalResult<SpecialtyAssociation> {
        guards::check_submit_report(record)?;

        let now = Utc::now();
        let mut next = record.clone();
        next.approvals.clear();
        next.reports.push(Report::new(text, now));
        next.state = AssociationState::waiting(Tier::first());
        next.updated_at = now;

        tracing::info!(
            association_id = %next.id,
            from = %record.state,
            to = %next.state,
            "Report submitted"
        );
        Ok(next)
    }

    /// Approve at the tier the record is waiting on
    pub fn approve(
        &self,
        record: &SpecialtyAssociation,
        actor: Role,
    ) -> ApprovalResult<SpecialtyAssociation> {
        self.approve_with_comment(record, actor, "")
    }

    /// Approve with a reviewer comment
    pub fn approve_with_comment(
        &self,
        record: &SpecialtyAssociation,
        actor: Role,
        comment: impl Into<String>,
    ) -> ApprovalResult<SpecialtyAssociation> {
        let tier = guards::check_review(record, actor, ApprovalAction::Approve)?;

        let now = Utc::now();
        let mut next = record.clone();
        next.approvals.grant(tier, now);
        next.approval_comments
            .push(ApprovalComment::new(comment, now, actor));
        next.state = match tier.next() {
            Some(next_tier) => AssociationState::waiting(next_tier),
            None => AssociationState::Approved,
        };
        next.updated_at = now;

        tracing::info!(
            association_id = %next.id,
            tier = %tier,
            actor = %actor,
            from = %record.state,
            to = %next.state,
            "Approval granted"
        );
        Ok(next)
    }

    /// Reject at the tier the record is waiting on.
    ///
    /// The pending report is cleared — its text survives only in the
    /// audit trail — and the member must resubmit to continue. Approval
    /// flags granted by lower tiers are left intact; they are cleared
    /// when the resubmission re-enters the chain.
    pub fn reject(
        &self,
        record: &SpecialtyAssociation,
        actor: Role,
        comment: impl Into<String>,
    ) -> ApprovalResult<SpecialtyAssociation> {
        let tier = guards::check_review(record, actor, ApprovalAction::Reject)?;

        let now = Utc::now();
        let mut next = record.clone();
        next.rejections.push(Rejection::new(comment, now, actor));
        next.reports.clear();
        next.state = AssociationState::rejected(tier);
        next.updated_at = now;

        tracing::info!(
            association_id = %next.id,
            tier = %tier,
            actor = %actor,
            from = %record.state,
            to = %next.state,
            "Report rejected"
        );
        Ok(next)
    }

    /// Administrative reset: return the record to `pending`.
    ///
    /// The only path out of the terminal state. Clears the working set
    /// (report and approval flags) but retains the audit trails. Role
    /// gating happens at the service layer.
    pub fn reset(&self, record: &SpecialtyAssociation) -> ApprovalResult<SpecialtyAssociation> {
        let now = Utc::now();
        let mut next = record.clone();
        next.approvals.clear();
        next.reports.clear();
        next.state = AssociationState::Pending;
        next.updated_at = now;

        tracing::info!(
            association_id = %next.id,
            from = %record.state,
            "Association reset to pending"
        );
        Ok(next)
    }

    // ── Presenter predicates ─────────────────────────────────────────
    //
    // These reproduce the operation preconditions exactly, by calling
    // the same guards the operations call.

    /// Check whether a report submission would succeed
    pub fn can_submit_report(&self, record: &SpecialtyAssociation) -> bool {
        guards::check_submit_report(record).is_ok()
    }

    /// Check whether `actor` could approve right now
    pub fn can_approve(&self, record: &SpecialtyAssociation, actor: Role) -> bool {
        guards::check_review(record, actor, ApprovalAction::Approve).is_ok()
    }

    /// Check whether `actor` could reject right now
    pub fn can_reject(&self, record: &SpecialtyAssociation, actor: Role) -> bool {
        guards::check_review(record, actor, ApprovalAction::Reject).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specialty_types::{ApprovalError, MemberId, SpecialtyId, TierOutcome};

    fn engine() -> WorkflowEngine {
        WorkflowEngine::new()
    }

    fn fresh_record() -> SpecialtyAssociation {
        SpecialtyAssociation::new(MemberId::new("member-1"), SpecialtyId::new("first-aid"))
            .with_quiz_approved(true)
    }

    fn submitted_record() -> SpecialtyAssociation {
        engine()
            .submit_report(&fresh_record(), "did the task")
            .unwrap()
    }

    #[test]
    fn test_submit_without_quiz_fails() {
        let record = fresh_record().with_quiz_approved(false);
        let err = engine().submit_report(&record, "evidence").unwrap_err();
        assert!(matches!(err, ApprovalError::InvalidTransition { .. }));
    }

    #[test]
    fn test_submit_enters_counselor_waiting() {
        let record = submitted_record();
        assert_eq!(record.state, AssociationState::waiting(Tier::Counselor));
        assert_eq!(record.reports.len(), 1);
        assert_eq!(record.pending_report().unwrap().text, "did the task");
    }

    #[test]
    fn test_double_submit_fails() {
        let record = submitted_record();
        let err = engine().submit_report(&record, "again").unwrap_err();
        assert!(matches!(err, ApprovalError::InvalidTransition { .. }));
    }

    #[test]
    fn test_counselor_approval_advances_to_lead() {
        let record = engine()
            .approve(&submitted_record(), Role::Counselor)
            .unwrap();
        assert_eq!(record.state, AssociationState::waiting(Tier::Lead));
        assert!(record.approvals.is_granted(Tier::Counselor));
        assert!(record.approvals.get(Tier::Counselor).granted_at.is_some());
        assert_eq!(record.approval_comments.len(), 1);
    }

    #[test]
    fn test_full_chain_terminates_approved() {
        let eng = engine();
        let record = submitted_record();
        let record = eng.approve(&record, Role::Counselor).unwrap();
        let record = eng
            .approve_with_comment(&record, Role::Lead, "solid work")
            .unwrap();
        let record = eng.approve(&record, Role::Director).unwrap();

        assert_eq!(record.state, AssociationState::Approved);
        assert!(record.is_terminal());
        assert!(record.approvals.all_granted());
        assert_eq!(record.approval_comments.len(), 3);
        assert!(record.flags_consistent());
    }

    #[test]
    fn test_admin_can_close_the_chain() {
        let eng = engine();
        let record = submitted_record();
        let record = eng.approve(&record, Role::Counselor).unwrap();
        let record = eng.approve(&record, Role::Lead).unwrap();
        let record = eng.approve(&record, Role::Admin).unwrap();
        assert_eq!(record.state, AssociationState::Approved);
    }

    #[test]
    fn test_terminal_state_refuses_further_review() {
        let eng = engine();
        let record = submitted_record();
        let record = eng.approve(&record, Role::Counselor).unwrap();
        let record = eng.approve(&record, Role::Lead).unwrap();
        let record = eng.approve(&record, Role::Director).unwrap();

        assert!(eng.approve(&record, Role::Director).is_err());
        assert!(eng.reject(&record, Role::Director, "no").is_err());
        assert!(eng.submit_report(&record, "more").is_err());
    }

    #[test]
    fn test_tier_skipping_fails() {
        let eng = engine();
        let record = submitted_record();

        // Director cannot act while the counselor tier is waiting
        let err = eng.approve(&record, Role::Director).unwrap_err();
        assert!(err.is_forbidden());

        // Lead cannot act either
        assert!(eng.approve(&record, Role::Lead).unwrap_err().is_forbidden());
    }

    #[test]
    fn test_lead_rejection_keeps_counselor_approval() {
        let eng = engine();
        let record = submitted_record();
        let record = eng.approve(&record, Role::Counselor).unwrap();
        let record = eng
            .reject(&record, Role::Lead, "insufficient evidence")
            .unwrap();

        assert_eq!(record.state, AssociationState::rejected(Tier::Lead));
        assert!(record.reports.is_empty());
        assert_eq!(record.rejections.len(), 1);
        assert_eq!(record.rejections[0].rejected_by, Role::Lead);
        // Lower-tier approval survives the rejection
        assert!(record.approvals.is_granted(Tier::Counselor));
        assert!(record.flags_consistent());
    }

    #[test]
    fn test_double_rejection_fails() {
        let eng = engine();
        let record = submitted_record();
        let record = eng.reject(&record, Role::Counselor, "redo it").unwrap();
        let err = eng.reject(&record, Role::Counselor, "again").unwrap_err();
        assert!(matches!(err, ApprovalError::InvalidTransition { .. }));
    }

    #[test]
    fn test_resubmission_after_rejection_restarts_the_cycle() {
        let eng = engine();
        let record = submitted_record();
        let record = eng.approve(&record, Role::Counselor).unwrap();
        let record = eng.reject(&record, Role::Lead, "needs photos").unwrap();

        let record = eng.submit_report(&record, "with photos").unwrap();
        assert_eq!(record.state, AssociationState::waiting(Tier::Counselor));
        // The fresh cycle cleared every flag, including the counselor's
        assert_eq!(record.approvals.granted_count(), 0);
        assert_eq!(record.approvals.get(Tier::Counselor).granted_at, None);
        assert_eq!(record.reports.len(), 1);
        // Audit trails kept the history
        assert_eq!(record.rejections.len(), 1);
        assert_eq!(record.approval_comments.len(), 1);
    }

    #[test]
    fn test_reset_returns_to_pending() {
        let eng = engine();
        let record = submitted_record();
        let record = eng.approve(&record, Role::Counselor).unwrap();
        let record = eng.approve(&record, Role::Lead).unwrap();
        let record = eng.approve(&record, Role::Director).unwrap();

        let record = eng.reset(&record).unwrap();
        assert_eq!(record.state, AssociationState::Pending);
        assert_eq!(record.approvals.granted_count(), 0);
        assert!(record.reports.is_empty());
        assert_eq!(record.approval_comments.len(), 3);

        // Quiz is still approved, so the member can start over
        assert!(eng.can_submit_report(&record));
    }

    #[test]
    fn test_predicates_match_operations() {
        let eng = engine();
        let record = fresh_record();
        assert!(eng.can_submit_report(&record));
        assert!(!eng.can_approve(&record, Role::Counselor));

        let record = eng.submit_report(&record, "evidence").unwrap();
        assert!(!eng.can_submit_report(&record));
        assert!(eng.can_approve(&record, Role::Counselor));
        assert!(eng.can_reject(&record, Role::Counselor));
        assert!(!eng.can_approve(&record, Role::Lead));
        assert!(!eng.can_reject(&record, Role::Member));
    }

    #[test]
    fn test_failed_operation_leaves_record_unchanged() {
        let eng = engine();
        let record = submitted_record();
        let snapshot = record.clone();

        assert!(eng.approve(&record, Role::Member).is_err());
        assert!(eng.submit_report(&record, "again").is_err());
        assert_eq!(record, snapshot);
    }

    #[test]
    fn test_rejected_states_carry_the_rejecting_tier() {
        let eng = engine();
        let record = submitted_record();
        let rejected = eng.reject(&record, Role::Counselor, "redo").unwrap();
        assert_eq!(
            rejected.state,
            AssociationState::Review {
                tier: Tier::Counselor,
                outcome: TierOutcome::Rejected,
            }
        );
        assert_eq!(rejected.state.as_str(), "rejected_by_counselor");
    }
}
