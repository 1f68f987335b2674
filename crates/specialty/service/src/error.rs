use specialty_store::StoreError;
use specialty_types::{ApprovalError, AssociationId};
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to presenters and API handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The engine refused the transition; user-visible, never retried
    #[error(transparent)]
    Approval(#[from] ApprovalError),

    /// The store failed outside the retried conflict path
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No record with this id exists
    #[error("association not found: {0}")]
    NotFound(AssociationId),

    /// Concurrent writers kept winning; the caller may try again later
    #[error("write conflict persisted after {0} retries")]
    ConflictRetriesExhausted(u32),
}

impl ServiceError {
    /// Check if this is a permission failure
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Approval(err) if err.is_forbidden())
    }
}
