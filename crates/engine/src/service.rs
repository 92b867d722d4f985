//! Content service: load → plan → commit
//!
//! `ContentService` is the entry point for editing operations. For each
//! request it loads the item and its history, asks the
//! [`TransactionPlanner`] for a [`SaveTransaction`], and hands the
//! transaction to persistence.
//!
//! ## Retry Policy
//!
//! The only retry the service performs on its own is rename-and-retry: when
//! inserting a new item collides with a sibling's name, it tries
//! `report(1).docx`, `report(2).docx`, ... up to `max_name_retries` times.
//! Every other failure is returned to the caller immediately. A lost
//! compare-and-set surfaces as `PersistenceConflict`; the caller reloads and
//! tries again if it wants to. A storage failure surfaces as `Storage` and
//! is not worth retrying.
//!
//! # Memory Ordering
//!
//! The stats counters use Relaxed ordering. They are observational only and
//! do not synchronize any other memory operations.

use crate::config::FolioConfig;
use crate::memory::MemoryRepository;
use crate::naming::{NameCandidates, NumberedSuffix};
use crate::store::{CommitError, CommitOutcome, HistorySource, Persistence};
use folio_concurrency::{SaveRequest, SaveTransaction, TransactionPlanner};
use folio_core::{
    Authorizer, ContentId, ContentItem, Error, PrincipalId, Result, StateAction, VersionHistory,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Snapshot of the service counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Transactions committed
    pub committed: u64,
    /// Requests refused before commit (permissions, state, history)
    pub rejected: u64,
    /// Commits refused by persistence because of a collision
    pub conflicts: u64,
    /// Rename attempts after sibling-name collisions
    pub name_retries: u64,
}

/// Editing operations over a content repository
pub struct ContentService {
    planner: TransactionPlanner,
    history: Arc<dyn HistorySource>,
    persistence: Arc<dyn Persistence>,
    authorizer: Arc<dyn Authorizer>,
    naming: Box<dyn NameCandidates>,
    max_name_retries: u32,
    committed: AtomicU64,
    rejected: AtomicU64,
    conflicts: AtomicU64,
    name_retries: AtomicU64,
}

impl ContentService {
    /// Create a service over separate collaborators
    pub fn new(
        config: &FolioConfig,
        history: Arc<dyn HistorySource>,
        persistence: Arc<dyn Persistence>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            planner: TransactionPlanner::new(config.default_policy()),
            history,
            persistence,
            authorizer,
            naming: Box::new(NumberedSuffix),
            max_name_retries: config.max_name_retries,
            committed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            conflicts: AtomicU64::new(0),
            name_retries: AtomicU64::new(0),
        }
    }

    /// Create a service backed entirely by one [`MemoryRepository`]
    pub fn with_repository(config: &FolioConfig, repository: Arc<MemoryRepository>) -> Self {
        Self::new(config, repository.clone(), repository.clone(), repository)
    }

    /// Replace the rename candidate provider
    pub fn with_naming(mut self, naming: impl NameCandidates + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// The planner this service uses
    pub fn planner(&self) -> &TransactionPlanner {
        &self.planner
    }

    /// Current counter values
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            committed: self.committed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            name_retries: self.name_retries.load(Ordering::Relaxed),
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// First save of a new item
    ///
    /// `request.action` must be `Save` or `SaveAndCheckIn`; a multistep
    /// save leaves the new item checked out to the actor. If the name is
    /// taken, numbered alternatives are tried.
    ///
    /// # Errors
    ///
    /// - `ParentNotFound` if the parent container does not exist
    /// - any planning error
    /// - `PersistenceConflict` when no free name was found or the commit
    ///   was refused
    /// - `Storage` when persistence failed outright
    pub fn create(&self, item: ContentItem, request: SaveRequest) -> Result<CommitOutcome> {
        if let Some(parent) = item.parent_id {
            if !self.history.contains(parent) {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                return Err(Error::ParentNotFound(parent));
            }
        }

        let txn = self.plan(&item, &VersionHistory::empty(), request)?;
        self.commit_with_rename(item, &txn)
    }

    /// Run `request` against a stored item
    ///
    /// # Errors
    ///
    /// `ItemNotFound`, any planning error, `PersistenceConflict`, or
    /// `Storage`.
    pub fn execute(&self, id: ContentId, request: SaveRequest) -> Result<CommitOutcome> {
        let (item, history) = self.history.load(id)?;
        let txn = self.plan(&item, &history, request)?;

        match self.persistence.commit(&item, &txn) {
            Ok(outcome) => Ok(self.record_commit(&txn, outcome)),
            Err(e) => Err(self.record_failure(&txn, e)),
        }
    }

    /// Save changes
    pub fn save(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::new(StateAction::Save, actor))
    }

    /// Save changes and keep the item checked out until check-in or undo
    pub fn save_multistep(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::multistep_save(actor))
    }

    /// Check the item out to `actor`
    pub fn check_out(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::new(StateAction::CheckOut, actor))
    }

    /// Check the working copy in
    pub fn check_in(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::new(StateAction::CheckIn, actor))
    }

    /// Discard the working copy
    pub fn undo_check_out(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::new(StateAction::UndoCheckOut, actor))
    }

    /// Publish, or submit for approval when approval is required
    pub fn publish(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::new(StateAction::Publish, actor))
    }

    /// Approve the pending version
    pub fn approve(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::new(StateAction::Approve, actor))
    }

    /// Reject the pending version
    pub fn reject(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::new(StateAction::Reject, actor))
    }

    /// Save a new version and check it in
    pub fn save_and_check_in(&self, id: ContentId, actor: PrincipalId) -> Result<CommitOutcome> {
        self.execute(id, SaveRequest::new(StateAction::SaveAndCheckIn, actor))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn plan(
        &self,
        item: &ContentItem,
        history: &VersionHistory,
        request: SaveRequest,
    ) -> Result<SaveTransaction> {
        self.planner
            .plan(item, history, request, self.authorizer.as_ref())
            .map_err(|e| {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                e
            })
    }

    fn commit_with_rename(&self, mut item: ContentItem, txn: &SaveTransaction) -> Result<CommitOutcome> {
        let original = item.name.clone();

        for attempt in 0..=self.max_name_retries {
            if attempt > 0 {
                item.name = self.naming.candidate(&original, attempt);
                self.name_retries.fetch_add(1, Ordering::Relaxed);
            }

            match self.persistence.commit(&item, txn) {
                Ok(outcome) => return Ok(self.record_commit(txn, outcome)),
                Err(CommitError::NameConflict { name }) => {
                    warn!(
                        target: "folio::commit",
                        content_id = %txn.content_id(),
                        name = %name,
                        attempt,
                        "Name taken, retrying with another name"
                    );
                }
                Err(e) => return Err(self.record_failure(txn, e)),
            }
        }

        self.conflicts.fetch_add(1, Ordering::Relaxed);
        warn!(
            target: "folio::commit",
            content_id = %txn.content_id(),
            name = %original,
            retries = self.max_name_retries,
            "No free name found"
        );
        Err(Error::persistence_conflict(format!(
            "no free name for '{}' after {} retries",
            original, self.max_name_retries
        )))
    }

    fn record_commit(&self, txn: &SaveTransaction, outcome: CommitOutcome) -> CommitOutcome {
        self.committed.fetch_add(1, Ordering::Relaxed);
        info!(
            target: "folio::commit",
            content_id = %outcome.content_id,
            action = %txn.action(),
            version = %outcome.version,
            version_id = %outcome.version_id,
            deleted = outcome.deleted,
            "Transaction committed"
        );
        outcome
    }

    fn record_failure(&self, txn: &SaveTransaction, e: CommitError) -> Error {
        if e.is_conflict() {
            self.conflicts.fetch_add(1, Ordering::Relaxed);
            warn!(
                target: "folio::commit",
                content_id = %txn.content_id(),
                action = %txn.action(),
                error = %e,
                "Commit refused"
            );
        } else {
            error!(
                target: "folio::commit",
                content_id = %txn.content_id(),
                action = %txn.action(),
                error = %e,
                "Commit failed"
            );
        }
        Error::from(e)
    }
}
