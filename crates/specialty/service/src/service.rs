//! The approval service

use crate::{ServiceError, ServiceResult};
use specialty_engine::{audit_trail, AuditEvent, WorkflowEngine};
use specialty_store::{AssociationStore, VersionedAssociation};
use specialty_types::{
    ApprovalAction, ApprovalError, ApprovalResult, AssociationId, MemberId, Role,
    SpecialtyAssociation, SpecialtyId,
};

const DEFAULT_CONFLICT_RETRIES: u32 = 3;

/// Caller-facing surface over the engine and a record store.
///
/// Holds no workflow state of its own; every operation is one
/// read-validate-write round against the store.
pub struct ApprovalService<S> {
    store: S,
    engine: WorkflowEngine,
    max_conflict_retries: u32,
}

impl<S: AssociationStore> ApprovalService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: WorkflowEngine::new(),
            max_conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Record lifecycle ─────────────────────────────────────────────

    /// Create a `pending` record for a member registering interest in
    /// a specialty.
    pub async fn register_interest(
        &self,
        member_id: MemberId,
        specialty_id: SpecialtyId,
    ) -> ServiceResult<AssociationId> {
        let record = SpecialtyAssociation::new(member_id, specialty_id);
        let id = record.id.clone();
        self.store.insert(record).await?;
        tracing::info!(association_id = %id, "Association registered");
        Ok(id)
    }

    /// Integration point for the quiz subsystem: record the quiz
    /// outcome on the association. Not a workflow transition.
    pub async fn record_quiz_result(
        &self,
        id: &AssociationId,
        approved: bool,
    ) -> ServiceResult<SpecialtyAssociation> {
        self.write_through(id, |record| {
            let mut next = record.clone();
            next.quiz_approved = approved;
            Ok(next)
        })
        .await
    }

    // ── Workflow transitions ─────────────────────────────────────────

    /// Submit an evidence report for review
    pub async fn submit_report(
        &self,
        id: &AssociationId,
        text: &str,
    ) -> ServiceResult<SpecialtyAssociation> {
        self.write_through(id, |record| self.engine.submit_report(record, text))
            .await
    }

    /// Approve at the waiting tier
    pub async fn approve(
        &self,
        id: &AssociationId,
        actor: Role,
    ) -> ServiceResult<SpecialtyAssociation> {
        self.write_through(id, |record| self.engine.approve(record, actor))
            .await
    }

    /// Approve at the waiting tier, with a reviewer comment
    pub async fn approve_with_comment(
        &self,
        id: &AssociationId,
        actor: Role,
        comment: &str,
    ) -> ServiceResult<SpecialtyAssociation> {
        self.write_through(id, |record| {
            self.engine.approve_with_comment(record, actor, comment)
        })
        .await
    }

    /// Reject at the waiting tier
    pub async fn reject(
        &self,
        id: &AssociationId,
        actor: Role,
        comment: &str,
    ) -> ServiceResult<SpecialtyAssociation> {
        self.write_through(id, |record| self.engine.reject(record, actor, comment))
            .await
    }

    // ── Administration ───────────────────────────────────────────────

    /// Administrative reset to `pending`. Admin only.
    pub async fn reset(
        &self,
        id: &AssociationId,
        actor: Role,
    ) -> ServiceResult<SpecialtyAssociation> {
        self.require_admin(id, actor, ApprovalAction::Reset).await?;
        self.write_through(id, |record| self.engine.reset(record))
            .await
    }

    /// Physically delete a record. Admin only; an operation, not a
    /// state transition.
    pub async fn delete(&self, id: &AssociationId, actor: Role) -> ServiceResult<()> {
        self.require_admin(id, actor, ApprovalAction::Delete).await?;
        self.store.remove(id).await?;
        tracing::info!(association_id = %id, "Association deleted");
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch one record
    pub async fn association(&self, id: &AssociationId) -> ServiceResult<SpecialtyAssociation> {
        Ok(self.fetch(id).await?.record)
    }

    /// Fetch a member's records, newest-first
    pub async fn associations_for_member(
        &self,
        member_id: &MemberId,
    ) -> ServiceResult<Vec<SpecialtyAssociation>> {
        let records = self.store.list_for_member(member_id).await?;
        Ok(records.into_iter().map(|v| v.record).collect())
    }

    /// Merged chronological history for one record
    pub async fn history(&self, id: &AssociationId) -> ServiceResult<Vec<AuditEvent>> {
        let record = self.association(id).await?;
        Ok(audit_trail(&record))
    }

    /// The review/submission actions `actor` could take right now,
    /// straight from the engine's guards — presenters surface these
    /// instead of re-deriving the rules.
    pub async fn available_actions(
        &self,
        id: &AssociationId,
        actor: Role,
    ) -> ServiceResult<Vec<ApprovalAction>> {
        let record = self.association(id).await?;
        let mut actions = Vec::new();
        if self.engine.can_submit_report(&record) {
            actions.push(ApprovalAction::SubmitReport);
        }
        if self.engine.can_approve(&record, actor) {
            actions.push(ApprovalAction::Approve);
        }
        if self.engine.can_reject(&record, actor) {
            actions.push(ApprovalAction::Reject);
        }
        Ok(actions)
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn fetch(&self, id: &AssociationId) -> ServiceResult<VersionedAssociation> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    async fn require_admin(
        &self,
        id: &AssociationId,
        actor: Role,
        action: ApprovalAction,
    ) -> ServiceResult<()> {
        if actor.is_admin() {
            return Ok(());
        }
        let record = self.association(id).await?;
        Err(ApprovalError::forbidden(actor, action, record.state).into())
    }

    /// Fetch → pure operation → version-checked write. On a stale
    /// write, re-fetch and re-run the same operation; engine refusals
    /// propagate immediately.
    async fn write_through<F>(
        &self,
        id: &AssociationId,
        op: F,
    ) -> ServiceResult<SpecialtyAssociation>
    where
        F: Fn(&SpecialtyAssociation) -> ApprovalResult<SpecialtyAssociation>,
    {
        let mut conflicts = 0;
        loop {
            let snapshot = self.fetch(id).await?;
            let next = op(&snapshot.record)?;
            match self.store.update(next.clone(), snapshot.version).await {
                Ok(_) => return Ok(next),
                Err(err) if err.is_conflict() => {
                    conflicts += 1;
                    if conflicts > self.max_conflict_retries {
                        tracing::warn!(
                            association_id = %id,
                            retries = self.max_conflict_retries,
                            "Giving up after repeated write conflicts"
                        );
                        return Err(ServiceError::ConflictRetriesExhausted(
                            self.max_conflict_retries,
                        ));
                    }
                    tracing::debug!(
                        association_id = %id,
                        attempt = conflicts,
                        "Stale write, re-fetching"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
