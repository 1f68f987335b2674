//! Specialty approval domain types for Trailhead
//!
//! A [`SpecialtyAssociation`] tracks one member's attempt at one specialty:
//! the evidence report they submitted, where the record sits in the
//! counselor → lead → director review chain, and the append-only audit
//! trails of every approval and rejection along the way.
//!
//! The state model is structured ([`Tier`] plus [`TierOutcome`] under
//! [`AssociationState`]); the flat legacy vocabulary
//! (`waiting_by_counselor`, `rejected_by_lead`, …) exists only at the
//! serialization boundary, where [`AssociationState`] serializes to and
//! parses from exactly those strings.

#![deny(unsafe_code)]

pub mod association;
pub mod audit;
pub mod error;
pub mod role;
pub mod state;

// Re-export main types
pub use association::{
    AssociationId, MemberId, SpecialtyAssociation, SpecialtyId, TierApproval, TierApprovals,
};
pub use audit::{ApprovalComment, Rejection, Report};
pub use error::{ApprovalAction, ApprovalError, ApprovalResult};
pub use role::{ParseRoleError, Role};
pub use state::{AssociationState, ParseStateError, Tier, TierOutcome};
