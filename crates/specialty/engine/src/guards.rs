//! Transition guards — the single source of truth for preconditions
//!
//! Every engine operation and every presenter-facing predicate goes
//! through these two checks. The UI never re-implements the rules, so
//! it cannot disagree with the engine about what is legal.

use specialty_types::{
    ApprovalAction, ApprovalError, ApprovalResult, Role, SpecialtyAssociation, Tier,
};

/// Check whether a report may be submitted.
///
/// Legal only when the quiz has been passed and no earlier report is
/// still awaiting review. This is both the entry point into the chain
/// and the re-entry point after a rejection (which clears the report).
pub fn check_submit_report(record: &SpecialtyAssociation) -> ApprovalResult<()> {
    let action = ApprovalAction::SubmitReport;
    if record.is_terminal() {
        return Err(ApprovalError::invalid(
            action,
            record.state,
            "association is already approved",
        ));
    }
    if !record.quiz_approved {
        return Err(ApprovalError::invalid(
            action,
            record.state,
            "quiz has not been approved",
        ));
    }
    if !record.reports.is_empty() {
        return Err(ApprovalError::invalid(
            action,
            record.state,
            "a report is already awaiting review",
        ));
    }
    Ok(())
}

/// Check whether `actor` may review (approve or reject) right now.
///
/// Returns the tier the record is waiting on. The actor must hold that
/// tier's role, and every lower tier must already have granted
/// approval.
pub fn check_review(
    record: &SpecialtyAssociation,
    actor: Role,
    action: ApprovalAction,
) -> ApprovalResult<Tier> {
    let tier = match record.state.waiting_tier() {
        Some(tier) => tier,
        None => {
            let reason = if record.is_terminal() {
                "association is already approved"
            } else {
                "no tier is waiting for review"
            };
            return Err(ApprovalError::invalid(action, record.state, reason));
        }
    };

    if !actor.satisfies(tier) {
        return Err(ApprovalError::forbidden(actor, action, record.state));
    }

    if !record.approvals.lower_tiers_granted(tier) {
        return Err(ApprovalError::invalid(
            action,
            record.state,
            format!("tiers below {} have not all approved", tier),
        ));
    }

    Ok(tier)
}
