//! Merged audit view
//!
//! Presenters render one chronological history per association. The
//! record keeps three separate append-only vectors; this module merges
//! them into a single ordered event list.

use chrono::{DateTime, Utc};
use specialty_types::{Role, SpecialtyAssociation};

/// One event in an association's history
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuditEvent {
    ReportSubmitted {
        text: String,
        at: DateTime<Utc>,
    },
    ApprovalGranted {
        comment: String,
        at: DateTime<Utc>,
        by: Role,
    },
    ReportRejected {
        comment: String,
        at: DateTime<Utc>,
        by: Role,
    },
}

impl AuditEvent {
    /// When the event happened
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::ReportSubmitted { at, .. }
            | Self::ApprovalGranted { at, .. }
            | Self::ReportRejected { at, .. } => *at,
        }
    }

    // Submissions sort before reviews that share a timestamp.
    fn rank(&self) -> u8 {
        match self {
            Self::ReportSubmitted { .. } => 0,
            Self::ApprovalGranted { .. } | Self::ReportRejected { .. } => 1,
        }
    }
}

/// Merge a record's audit vectors into one chronological event list.
///
/// The sort is stable, so events with equal timestamps keep submission
/// before review, and otherwise their append order.
pub fn audit_trail(record: &SpecialtyAssociation) -> Vec<AuditEvent> {
    let mut events = Vec::with_capacity(
        record.reports.len() + record.approval_comments.len() + record.rejections.len(),
    );

    for report in &record.reports {
        events.push(AuditEvent::ReportSubmitted {
            text: report.text.clone(),
            at: report.submitted_at,
        });
    }
    for approval in &record.approval_comments {
        events.push(AuditEvent::ApprovalGranted {
            comment: approval.comment.clone(),
            at: approval.approved_at,
            by: approval.approved_by,
        });
    }
    for rejection in &record.rejections {
        events.push(AuditEvent::ReportRejected {
            comment: rejection.comment.clone(),
            at: rejection.rejected_at,
            by: rejection.rejected_by,
        });
    }

    events.sort_by_key(|e| (e.occurred_at(), e.rank()));
    events
}
