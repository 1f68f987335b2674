//! Engine error taxonomy
//!
//! Two kinds suffice: the actor lacks the required role (`Forbidden`),
//! or the action is not legal from the current state
//! (`InvalidTransition`). Neither is ever retried automatically, and a
//! failed operation leaves the input record untouched.

use crate::{AssociationState, Role};
use std::fmt;
use thiserror::Error;

/// Result type for engine operations
pub type ApprovalResult<T> = Result<T, ApprovalError>;

/// The workflow action that was requested
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalAction {
    SubmitReport,
    Approve,
    Reject,
    Reset,
    Delete,
}

impl ApprovalAction {
    pub fn name(self) -> &'static str {
        match self {
            ApprovalAction::SubmitReport => "submit_report",
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::Reset => "reset",
            ApprovalAction::Delete => "delete",
        }
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an engine operation was refused
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApprovalError {
    /// The actor's role does not match the tier the record is waiting on
    #[error("role '{role}' may not {action} an association in state '{state}'")]
    Forbidden {
        role: Role,
        action: ApprovalAction,
        state: AssociationState,
    },

    /// The action is not legal from the current state
    #[error("{action} is not legal from state '{state}': {reason}")]
    InvalidTransition {
        action: ApprovalAction,
        state: AssociationState,
        reason: String,
    },
}

impl ApprovalError {
    pub fn forbidden(role: Role, action: ApprovalAction, state: AssociationState) -> Self {
        Self::Forbidden {
            role,
            action,
            state,
        }
    }

    pub fn invalid(
        action: ApprovalAction,
        state: AssociationState,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidTransition {
            action,
            state,
            reason: reason.into(),
        }
    }

    /// Check if this is a permission failure (as opposed to a state one)
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_user_facing() {
        let err = ApprovalError::forbidden(
            Role::Member,
            ApprovalAction::Approve,
            AssociationState::waiting(crate::Tier::Counselor),
        );
        assert!(err.is_forbidden());
        assert_eq!(
            err.to_string(),
            "role 'member' may not approve an association in state 'waiting_by_counselor'"
        );

        let err = ApprovalError::invalid(
            ApprovalAction::SubmitReport,
            AssociationState::Pending,
            "quiz not approved",
        );
        assert!(!err.is_forbidden());
        assert_eq!(
            err.to_string(),
            "submit_report is not legal from state 'pending': quiz not approved"
        );
    }
}
