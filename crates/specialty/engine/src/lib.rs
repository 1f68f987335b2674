//! Specialty approval workflow engine
//!
//! The engine owns the decision logic of the review chain: it validates
//! a requested transition against the current record and actor role,
//! computes the next state, and returns an updated record with its
//! audit entries appended. It is pure — no I/O, no shared state, and
//! the wall clock is consulted only to stamp timestamps.
//!
//! # Key principle
//!
//! **The engine decides, it never persists.** Callers fetch a consistent
//! snapshot, invoke one operation, and write the result back under an
//! optimistic concurrency check. Read-validate-write atomicity belongs
//! to the store; retry-on-conflict belongs to the caller.
//!
//! # Example
//!
//! ```rust
//! use specialty_engine::WorkflowEngine;
//! use specialty_types::{AssociationState, MemberId, Role, SpecialtyAssociation, SpecialtyId};
//!
//! let engine = WorkflowEngine::new();
//! let record = SpecialtyAssociation::new(
//!     MemberId::new("member-1"),
//!     SpecialtyId::new("orienteering"),
//! )
//! .with_quiz_approved(true);
//!
//! let record = engine.submit_report(&record, "completed the night hike").unwrap();
//! let record = engine.approve(&record, Role::Counselor).unwrap();
//! let record = engine.approve(&record, Role::Lead).unwrap();
//! let record = engine.approve(&record, Role::Director).unwrap();
//!
//! assert_eq!(record.state, AssociationState::Approved);
//! ```

#![deny(unsafe_code)]

pub mod audit_trail;
pub mod engine;
pub mod guards;

// Re-export main types
pub use audit_trail::{audit_trail, AuditEvent};
pub use engine::WorkflowEngine;
