//! Save transaction
//!
//! A `SaveTransaction` is the complete, immutable outcome of planning one
//! editing operation: the version the item moves to, the lock owner it ends
//! with, and the versions to discard. It is produced by
//! [`TransactionPlanner::plan`](crate::TransactionPlanner::plan) and
//! consumed exactly once by persistence, which applies it atomically.
//!
//! ## Invariants
//!
//! - `deletable_version_ids` never contains the target version id
//! - a transaction exists only if the permission gate and the transition
//!   table both accepted the request
//!
//! `expected_version_id` and `expected_lock_owner` are what the planner saw;
//! persistence compares them against the stored item and refuses the commit
//! if another writer got there first.

use folio_core::{
    ContentId, PrincipalId, StateAction, VersionHistory, VersionHistoryEntry, VersionId,
    VersionNumber, VersionPolicy,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which stored version the item points at after commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetVersionId {
    /// An entry already in the history (renumbered in place if needed)
    Existing(VersionId),
    /// A version persistence must create
    New,
}

impl TargetVersionId {
    /// The existing id, if any
    pub fn existing(&self) -> Option<VersionId> {
        match self {
            TargetVersionId::Existing(id) => Some(*id),
            TargetVersionId::New => None,
        }
    }

    /// Whether persistence must allocate a new version
    pub fn is_new(&self) -> bool {
        matches!(self, TargetVersionId::New)
    }
}

impl fmt::Display for TargetVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetVersionId::Existing(id) => write!(f, "{}", id),
            TargetVersionId::New => f.write_str("new"),
        }
    }
}

/// Planned outcome of one editing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveTransaction {
    pub(crate) content_id: ContentId,
    pub(crate) action: StateAction,
    pub(crate) actor: PrincipalId,
    pub(crate) policy: VersionPolicy,
    pub(crate) expected_version_id: Option<VersionId>,
    pub(crate) expected_lock_owner: Option<PrincipalId>,
    pub(crate) target_version: VersionNumber,
    pub(crate) target_version_id: TargetVersionId,
    pub(crate) deletable_version_ids: BTreeSet<VersionId>,
    pub(crate) lock_owner: Option<PrincipalId>,
    pub(crate) multistep_in_progress: bool,
    pub(crate) force_refresh: bool,
}

impl SaveTransaction {
    /// Item the transaction applies to
    pub fn content_id(&self) -> ContentId {
        self.content_id
    }

    /// Requested action
    pub fn action(&self) -> StateAction {
        self.action
    }

    /// Acting principal
    pub fn actor(&self) -> PrincipalId {
        self.actor
    }

    /// Policy the transaction was planned under
    pub fn policy(&self) -> VersionPolicy {
        self.policy
    }

    /// Live version id the planner saw (`None` for a new item)
    pub fn expected_version_id(&self) -> Option<VersionId> {
        self.expected_version_id
    }

    /// Lock owner the planner saw
    pub fn expected_lock_owner(&self) -> Option<PrincipalId> {
        self.expected_lock_owner
    }

    /// Version number the item moves to
    pub fn target_version(&self) -> VersionNumber {
        self.target_version
    }

    /// Version the item points at after commit
    pub fn target_version_id(&self) -> TargetVersionId {
        self.target_version_id
    }

    /// Versions persistence must remove
    pub fn deletable_version_ids(&self) -> &BTreeSet<VersionId> {
        &self.deletable_version_ids
    }

    /// Lock owner after commit
    pub fn lock_owner(&self) -> Option<PrincipalId> {
        self.lock_owner
    }

    /// Whether a multistep save is open after commit
    pub fn multistep_in_progress(&self) -> bool {
        self.multistep_in_progress
    }

    /// Whether callers must reload the item after commit
    pub fn force_refresh(&self) -> bool {
        self.force_refresh
    }

    /// History as it looks after this transaction commits
    ///
    /// `new_version_id` is the id persistence assigned when the target is
    /// [`TargetVersionId::New`]; it is ignored otherwise.
    pub fn apply_to(&self, history: &VersionHistory, new_version_id: VersionId) -> VersionHistory {
        let mut entries: Vec<VersionHistoryEntry> = history
            .entries()
            .iter()
            .filter(|e| !self.deletable_version_ids.contains(&e.version_id))
            .copied()
            .collect();

        match self.target_version_id {
            TargetVersionId::Existing(id) => {
                for entry in entries.iter_mut().filter(|e| e.version_id == id) {
                    entry.number = self.target_version;
                }
            }
            TargetVersionId::New => {
                entries.push(VersionHistoryEntry::new(new_version_id, self.target_version));
            }
        }

        VersionHistory::new(entries)
    }
}

impl fmt::Display for SaveTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} -> {} ({}), deleting {}",
            self.action,
            self.content_id,
            self.target_version,
            self.target_version_id,
            self.deletable_version_ids.len()
        )
    }
}
