use crate::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use specialty_types::{AssociationId, MemberId, SpecialtyAssociation};

/// A consistent snapshot of a stored record.
///
/// The version is the optimistic concurrency token: engine preconditions
/// are only valid against the snapshot they were checked on, so every
/// write names the version the caller read.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VersionedAssociation {
    pub record: SpecialtyAssociation,
    pub version: u64,
}

/// Storage interface for association records.
///
/// The engine never calls this directly; the service layer runs
/// fetch → pure engine operation → [`update`](AssociationStore::update)
/// and retries on conflict by re-fetching.
#[async_trait]
pub trait AssociationStore: Send + Sync {
    /// Insert a newly created record at version 1.
    async fn insert(&self, record: SpecialtyAssociation) -> StoreResult<u64>;

    /// Get one record snapshot by id.
    async fn get(&self, id: &AssociationId) -> StoreResult<Option<VersionedAssociation>>;

    /// Replace a record, provided the stored version still matches
    /// `expected_version`. Returns the new version.
    ///
    /// Fails with `Conflict` when another writer got there first; the
    /// caller re-fetches and re-runs the same pure operation.
    async fn update(
        &self,
        record: SpecialtyAssociation,
        expected_version: u64,
    ) -> StoreResult<u64>;

    /// Physically delete a record. Administrative path only; the
    /// workflow itself never deletes.
    async fn remove(&self, id: &AssociationId) -> StoreResult<()>;

    /// List a member's records, newest-first by last update.
    async fn list_for_member(&self, member_id: &MemberId)
        -> StoreResult<Vec<VersionedAssociation>>;
}
