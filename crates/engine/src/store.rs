//! Collaborator interfaces for the content service
//!
//! The state machine itself never touches storage. The service loads an item
//! and its history through [`HistorySource`], plans a transaction, and hands
//! it to [`Persistence`] which applies it atomically.
//!
//! ## Commit Contract
//!
//! `Persistence::commit` must, in one atomic step:
//! - check the stored live version id against `expected_version_id`
//! - check the stored lock owner against `expected_lock_owner`
//! - write the target version (renumbering an existing one or creating one)
//! - set or clear the lock owner and the multistep flag
//! - physically remove every deletable version
//!
//! A sibling-name collision on insert is reported as
//! [`CommitError::NameConflict`] so the caller can rename and retry. Every
//! other failure leaves the stored item untouched. Collisions surface as the
//! retryable `PersistenceConflict`; [`CommitError::Storage`] surfaces as the
//! non-retryable `Storage`.

use folio_concurrency::SaveTransaction;
use folio_core::{
    ContentId, ContentItem, Error, PrincipalId, Result, VersionHistory, VersionId, VersionNumber,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Loads items and their version histories
pub trait HistorySource: Send + Sync {
    /// Load an item
    ///
    /// # Errors
    ///
    /// `ItemNotFound` if no item has this id.
    fn load_item(&self, id: ContentId) -> Result<ContentItem>;

    /// Load an item's history, oldest entry first
    ///
    /// # Errors
    ///
    /// `ItemNotFound` if no item has this id.
    fn load_history(&self, id: ContentId) -> Result<VersionHistory>;

    /// Whether an item with this id exists
    fn contains(&self, id: ContentId) -> bool;

    /// Load an item together with its history
    ///
    /// Implementations backed by concurrent storage should override this to
    /// read both from one snapshot.
    fn load(&self, id: ContentId) -> Result<(ContentItem, VersionHistory)> {
        Ok((self.load_item(id)?, self.load_history(id)?))
    }
}

/// Applies planned transactions
pub trait Persistence: Send + Sync {
    /// Apply `txn` to `item` atomically
    ///
    /// For a new item, `item` is inserted under its current name.
    fn commit(
        &self,
        item: &ContentItem,
        txn: &SaveTransaction,
    ) -> std::result::Result<CommitOutcome, CommitError>;
}

/// Why a commit was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// Another sibling already uses this name
    #[error("name '{name}' is already taken in this container")]
    NameConflict {
        /// The name that collided
        name: String,
    },

    /// The lock owner changed since the item was loaded
    #[error("lock owner changed: expected {expected:?}, found {actual:?}")]
    LockConflict {
        /// Lock owner the planner saw
        expected: Option<PrincipalId>,
        /// Lock owner in storage
        actual: Option<PrincipalId>,
    },

    /// The live version changed since the history was loaded
    #[error("history is stale: expected live version {expected:?}, found {actual:?}")]
    StaleHistory {
        /// Live version id the planner saw
        expected: Option<VersionId>,
        /// Live version id in storage
        actual: Option<VersionId>,
    },

    /// Storage failed for another reason
    #[error("storage error: {0}")]
    Storage(String),
}

impl CommitError {
    /// Whether the refusal is a naming or optimistic-lock collision
    pub fn is_conflict(&self) -> bool {
        !matches!(self, CommitError::Storage(_))
    }
}

impl From<CommitError> for Error {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::Storage(reason) => Error::Storage(reason),
            other => Error::PersistenceConflict(other.to_string()),
        }
    }
}

/// What a successful commit produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    /// Item the transaction applied to
    pub content_id: ContentId,
    /// Name the item was stored under
    pub name: String,
    /// Live version id after commit
    pub version_id: VersionId,
    /// Live version number after commit
    pub version: VersionNumber,
    /// Lock owner after commit
    pub lock_owner: Option<PrincipalId>,
    /// Number of versions physically removed
    pub deleted: usize,
    /// The live pointer moved to an older existing version; cached views
    /// of the item must be reloaded
    pub force_refresh: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ErrorKind;

    #[test]
    fn test_collisions_become_persistence_conflicts() {
        let errors = [
            CommitError::NameConflict {
                name: "a.txt".to_string(),
            },
            CommitError::LockConflict {
                expected: None,
                actual: Some(PrincipalId::new(3)),
            },
            CommitError::StaleHistory {
                expected: Some(VersionId::new(1)),
                actual: Some(VersionId::new(2)),
            },
        ];
        for e in errors {
            assert!(e.is_conflict());
            let err = Error::from(e);
            assert_eq!(err.kind(), ErrorKind::PersistenceConflict);
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn test_storage_failure_is_not_retryable() {
        let e = CommitError::Storage("disk full".to_string());
        assert!(!e.is_conflict());
        let err = Error::from(e);
        assert_eq!(err, Error::storage("disk full"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_name_conflict_display() {
        let e = CommitError::NameConflict {
            name: "report.docx".to_string(),
        };
        assert!(e.to_string().contains("report.docx"));
    }
}
