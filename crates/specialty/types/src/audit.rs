//! Append-only audit records
//!
//! Every report submission, approval, and rejection leaves a named
//! record behind. These vectors only ever grow; a rejected report is
//! dropped from the working set but its text survives here.

use crate::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An evidence report submitted by the member
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The evidence text
    pub text: String,
    /// When the report was submitted
    pub submitted_at: DateTime<Utc>,
}

impl Report {
    pub fn new(text: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            submitted_at,
        }
    }
}

/// A rejection recorded by a reviewing tier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// The reviewer's comment explaining the rejection
    pub comment: String,
    /// When the rejection happened
    pub rejected_at: DateTime<Utc>,
    /// The role that rejected
    pub rejected_by: Role,
}

impl Rejection {
    pub fn new(comment: impl Into<String>, rejected_at: DateTime<Utc>, rejected_by: Role) -> Self {
        Self {
            comment: comment.into(),
            rejected_at,
            rejected_by,
        }
    }
}

/// An approval comment recorded by a reviewing tier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalComment {
    /// The reviewer's comment
    pub comment: String,
    /// When the approval happened
    pub approved_at: DateTime<Utc>,
    /// The role that approved
    pub approved_by: Role,
}

impl ApprovalComment {
    pub fn new(comment: impl Into<String>, approved_at: DateTime<Utc>, approved_by: Role) -> Self {
        Self {
            comment: comment.into(),
            approved_at,
            approved_by,
        }
    }
}
