//! Association records: one member's attempt at one specialty
//!
//! A SpecialtyAssociation is the persistent entity the workflow engine
//! operates on. The engine receives whole records and returns updated
//! whole records; everything here is plain data.

use crate::{ApprovalComment, AssociationState, Rejection, Report, Tier, TierOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for an association record
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssociationId(pub String);

impl AssociationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl fmt::Display for AssociationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a club member
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a specialty
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecialtyId(pub String);

impl SpecialtyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SpecialtyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Tier Approvals ───────────────────────────────────────────────────

/// One tier's approval flag with its optional timestamp
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierApproval {
    /// Whether this tier has granted approval
    pub granted: bool,
    /// When approval was granted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_at: Option<DateTime<Utc>>,
}

/// The three per-tier approval flags.
///
/// Once granted, a flag is cleared only by a full
/// rejection-then-resubmission cycle: rejection leaves lower-tier flags
/// intact, and the next report submission clears all three.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierApprovals {
    pub counselor: TierApproval,
    pub lead: TierApproval,
    pub director: TierApproval,
}

impl TierApprovals {
    pub fn get(&self, tier: Tier) -> &TierApproval {
        match tier {
            Tier::Counselor => &self.counselor,
            Tier::Lead => &self.lead,
            Tier::Director => &self.director,
        }
    }

    fn get_mut(&mut self, tier: Tier) -> &mut TierApproval {
        match tier {
            Tier::Counselor => &mut self.counselor,
            Tier::Lead => &mut self.lead,
            Tier::Director => &mut self.director,
        }
    }

    /// Check whether a tier has granted approval
    pub fn is_granted(&self, tier: Tier) -> bool {
        self.get(tier).granted
    }

    /// Grant a tier's approval with a timestamp
    pub fn grant(&mut self, tier: Tier, at: DateTime<Utc>) {
        let approval = self.get_mut(tier);
        approval.granted = true;
        approval.granted_at = Some(at);
    }

    /// Clear all flags and timestamps (a fresh review cycle)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check whether every tier before `tier` has granted approval
    pub fn lower_tiers_granted(&self, tier: Tier) -> bool {
        tier.preceding().iter().all(|t| self.is_granted(*t))
    }

    /// Check whether every tier has granted approval
    pub fn all_granted(&self) -> bool {
        Tier::ORDER.iter().all(|t| self.is_granted(*t))
    }

    /// Number of tiers that have granted approval
    pub fn granted_count(&self) -> usize {
        Tier::ORDER.iter().filter(|t| self.is_granted(**t)).count()
    }
}

// ── Association Record ───────────────────────────────────────────────

/// One member's attempt at one specialty
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyAssociation {
    /// Unique record identifier, immutable
    pub id: AssociationId,
    /// The member pursuing the specialty, immutable after creation
    pub member_id: MemberId,
    /// The specialty being pursued, immutable after creation
    pub specialty_id: SpecialtyId,
    /// Current lifecycle state, mutable only through engine transitions
    pub state: AssociationState,
    /// Set by the external quiz subsystem; gates report submission
    pub quiz_approved: bool,
    /// Reports awaiting or under review; cleared on rejection
    #[serde(default)]
    pub reports: Vec<Report>,
    /// Per-tier approval flags
    #[serde(default)]
    pub approvals: TierApprovals,
    /// Append-only rejection audit trail
    #[serde(default)]
    pub rejections: Vec<Rejection>,
    /// Append-only approval audit trail
    #[serde(default)]
    pub approval_comments: Vec<ApprovalComment>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last changed by a transition
    pub updated_at: DateTime<Utc>,
}

impl SpecialtyAssociation {
    /// Create a new record in `pending`, as registration does upstream
    /// of the engine
    pub fn new(member_id: MemberId, specialty_id: SpecialtyId) -> Self {
        let now = Utc::now();
        Self {
            id: AssociationId::generate(),
            member_id,
            specialty_id,
            state: AssociationState::Pending,
            quiz_approved: false,
            reports: Vec::new(),
            approvals: TierApprovals::default(),
            rejections: Vec::new(),
            approval_comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_quiz_approved(mut self, quiz_approved: bool) -> Self {
        self.quiz_approved = quiz_approved;
        self
    }

    // ── Query methods ────────────────────────────────────────────────

    /// Check if the record has reached the terminal state
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Check if the record is waiting for a specific tier's review
    pub fn is_waiting_for(&self, tier: Tier) -> bool {
        self.state.waiting_tier() == Some(tier)
    }

    /// The report currently awaiting review, if any
    pub fn pending_report(&self) -> Option<&Report> {
        self.reports.last()
    }

    /// Check the state/flag consistency invariants: the reviewing tier's
    /// own flag is never granted while it is waiting or has rejected,
    /// and director approval only ever coexists with the terminal state.
    pub fn flags_consistent(&self) -> bool {
        match self.state {
            AssociationState::Approved => self.approvals.all_granted(),
            AssociationState::Review { tier, outcome } => {
                let own_flag_ok = match outcome {
                    TierOutcome::Approved => true,
                    TierOutcome::Waiting | TierOutcome::Rejected => {
                        !self.approvals.is_granted(tier)
                    }
                };
                own_flag_ok && !self.approvals.is_granted(Tier::last())
            }
            AssociationState::Pending => !self.approvals.is_granted(Tier::last()),
        }
    }
}
