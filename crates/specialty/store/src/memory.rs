//! In-memory reference implementation of the association store.
//!
//! Deterministic and test-friendly. Production deployments put the
//! version check inside a transactional backend instead; the semantics
//! callers see are identical.

use crate::traits::{AssociationStore, VersionedAssociation};
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use specialty_types::{AssociationId, MemberId, SpecialtyAssociation};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory association store.
#[derive(Default)]
pub struct MemoryAssociationStore {
    records: RwLock<HashMap<AssociationId, VersionedAssociation>>,
}

impl MemoryAssociationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AssociationStore for MemoryAssociationStore {
    async fn insert(&self, record: SpecialtyAssociation) -> StoreResult<u64> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;

        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict(format!(
                "association {} already exists",
                record.id
            )));
        }

        let id = record.id.clone();
        guard.insert(id, VersionedAssociation { record, version: 1 });
        Ok(1)
    }

    async fn get(&self, id: &AssociationId) -> StoreResult<Option<VersionedAssociation>> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn update(
        &self,
        record: SpecialtyAssociation,
        expected_version: u64,
    ) -> StoreResult<u64> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;
        let stored = guard
            .get_mut(&record.id)
            .ok_or_else(|| StoreError::NotFound(format!("association {} not found", record.id)))?;

        if stored.version != expected_version {
            return Err(StoreError::Conflict(format!(
                "association {} is at version {}, write expected {}",
                record.id, stored.version, expected_version
            )));
        }

        stored.version += 1;
        stored.record = record;
        Ok(stored.version)
    }

    async fn remove(&self, id: &AssociationId) -> StoreResult<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("association {} not found", id)))
    }

    async fn list_for_member(
        &self,
        member_id: &MemberId,
    ) -> StoreResult<Vec<VersionedAssociation>> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("records lock poisoned".to_string()))?;
        let mut records = guard
            .values()
            .filter(|v| &v.record.member_id == member_id)
            .cloned()
            .collect::<Vec<_>>();
        records.sort_by(|a, b| b.record.updated_at.cmp(&a.record.updated_at));
        Ok(records)
    }
}
