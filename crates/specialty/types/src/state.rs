//! The association state model: review tiers and their outcomes
//!
//! A record passes sequentially through the tiers in [`Tier::ORDER`].
//! Internally the state is structured — a tier paired with an outcome —
//! so the engine never branches per tier. The flat legacy strings
//! (`waiting_by_counselor`, `rejected_by_lead`, …) are derived only at
//! the serialization boundary.

use crate::Role;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ── Review Tiers ─────────────────────────────────────────────────────

/// One of the sequential review tiers in the approval chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Counselor,
    Lead,
    Director,
}

impl Tier {
    /// The fixed review order. The engine walks this array rather than
    /// branching per tier, so adding a tier means extending the array.
    pub const ORDER: [Tier; 3] = [Tier::Counselor, Tier::Lead, Tier::Director];

    /// The tier that reviews after this one, if any
    pub fn next(self) -> Option<Tier> {
        let idx = self.index();
        Self::ORDER.get(idx + 1).copied()
    }

    /// Position of this tier in [`Tier::ORDER`]
    pub fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|t| *t == self)
            .expect("tier is in ORDER")
    }

    /// The tiers that must have granted approval before this one reviews
    pub fn preceding(self) -> &'static [Tier] {
        &Self::ORDER[..self.index()]
    }

    /// The role whose approval this tier requires
    pub fn required_role(self) -> Role {
        match self {
            Tier::Counselor => Role::Counselor,
            Tier::Lead => Role::Lead,
            Tier::Director => Role::Director,
        }
    }

    /// The first tier in the chain
    pub fn first() -> Tier {
        Self::ORDER[0]
    }

    /// The final tier in the chain
    pub fn last() -> Tier {
        Self::ORDER[Self::ORDER.len() - 1]
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Counselor => "counselor",
            Tier::Lead => "lead",
            Tier::Director => "director",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Tier Outcome ─────────────────────────────────────────────────────

/// What the tier currently under review has decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TierOutcome {
    /// Ready for review by this tier
    Waiting,
    /// This tier granted approval
    Approved,
    /// This tier rejected the report
    Rejected,
}

// ── Association State ────────────────────────────────────────────────

/// Where an association record sits in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AssociationState {
    /// Created, no report under review yet
    #[default]
    Pending,
    /// In the review chain at a specific tier
    Review { tier: Tier, outcome: TierOutcome },
    /// Fully approved — terminal
    Approved,
}

impl AssociationState {
    /// The waiting state for a tier
    pub fn waiting(tier: Tier) -> Self {
        Self::Review {
            tier,
            outcome: TierOutcome::Waiting,
        }
    }

    /// The rejected state for a tier
    pub fn rejected(tier: Tier) -> Self {
        Self::Review {
            tier,
            outcome: TierOutcome::Rejected,
        }
    }

    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// The tier whose review this state is waiting on, if any
    pub fn waiting_tier(&self) -> Option<Tier> {
        match self {
            Self::Review {
                tier,
                outcome: TierOutcome::Waiting,
            } => Some(*tier),
            _ => None,
        }
    }

    /// The tier that rejected, if this is a rejected state
    pub fn rejected_tier(&self) -> Option<Tier> {
        match self {
            Self::Review {
                tier,
                outcome: TierOutcome::Rejected,
            } => Some(*tier),
            _ => None,
        }
    }

    /// The flat legacy string for this state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Review { tier, outcome } => match (tier, outcome) {
                (Tier::Counselor, TierOutcome::Waiting) => "waiting_by_counselor",
                (Tier::Counselor, TierOutcome::Approved) => "approved_by_counselor",
                (Tier::Counselor, TierOutcome::Rejected) => "rejected_by_counselor",
                (Tier::Lead, TierOutcome::Waiting) => "waiting_by_lead",
                (Tier::Lead, TierOutcome::Approved) => "approved_by_lead",
                (Tier::Lead, TierOutcome::Rejected) => "rejected_by_lead",
                (Tier::Director, TierOutcome::Waiting) => "waiting_by_director",
                (Tier::Director, TierOutcome::Approved) => "approved_by_director",
                (Tier::Director, TierOutcome::Rejected) => "rejected_by_director",
            },
        }
    }
}

impl fmt::Display for AssociationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a flat legacy state string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown association state '{0}'")]
pub struct ParseStateError(pub String);

impl FromStr for AssociationState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => return Ok(Self::Pending),
            "approved" => return Ok(Self::Approved),
            _ => {}
        }
        let (outcome, tier) = s
            .split_once("_by_")
            .ok_or_else(|| ParseStateError(s.to_string()))?;
        let outcome = match outcome {
            "waiting" => TierOutcome::Waiting,
            "approved" => TierOutcome::Approved,
            "rejected" => TierOutcome::Rejected,
            _ => return Err(ParseStateError(s.to_string())),
        };
        let tier = Tier::ORDER
            .into_iter()
            .find(|t| t.name() == tier)
            .ok_or_else(|| ParseStateError(s.to_string()))?;
        Ok(Self::Review { tier, outcome })
    }
}

impl Serialize for AssociationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AssociationState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
