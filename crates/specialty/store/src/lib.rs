//! Association record storage for the approval workflow
//!
//! The engine is stateless between calls; whatever durability the
//! workflow has lives behind [`AssociationStore`]. The contract the
//! engine imposes on callers — read-validate-write must be atomic — is
//! discharged here by version-checked writes: every read returns a
//! [`VersionedAssociation`] snapshot, and every write names the version
//! it was computed from. Two approvers racing on one record serialize
//! into one winner and one [`StoreError::Conflict`].

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod traits;

// Re-export main types
pub use error::{StoreError, StoreResult};
pub use memory::MemoryAssociationStore;
pub use traits::{AssociationStore, VersionedAssociation};
