//! Error types for Folio
//!
//! Every failure the version state machine can report is a variant of
//! [`Error`]. Validation failures are raised before anything is mutated, so
//! none of them leave partial state behind. Only
//! [`Error::PersistenceConflict`] is worth retrying, and only after
//! reloading the item.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::contract::{StateAction, VersionPolicy, VersionStatus};
use crate::traits::Capability;
use crate::types::{ContentId, PrincipalId};
use thiserror::Error;

/// Result type alias for Folio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Folio
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The transition table forbids the action in the current state
    #[error("{action} is not valid from {} under {policy}", state_label(.state))]
    InvalidStateAction {
        /// Requested action
        action: StateAction,
        /// Current status, `None` for an item that was never saved
        state: Option<VersionStatus>,
        /// Resolved policy
        policy: VersionPolicy,
    },

    /// The actor lacks a capability the action needs
    #[error("not enough permissions for {action}: missing {capability}")]
    NotEnoughPermissions {
        /// Requested action
        action: StateAction,
        /// First missing capability
        capability: Capability,
    },

    /// The item is checked out to somebody else
    #[error("{action} refused: item is checked out to {owner}")]
    CheckedOutToAnotherPrincipal {
        /// Requested action
        action: StateAction,
        /// Current lock owner
        owner: PrincipalId,
    },

    /// A multistep save is open; only check-in or undo may follow
    #[error("{action} refused: a multistep save is in progress")]
    MultistepSaveInProgress {
        /// Requested action
        action: StateAction,
    },

    /// Undo check-out with nothing to revert to
    #[error("cannot undo check-out: the locked version is the only version")]
    UndoOnSingleVersion,

    /// Naming or optimistic-lock collision reported by persistence
    #[error("persistence conflict: {0}")]
    PersistenceConflict(String),

    /// The history handed to the planner breaks a structural invariant
    #[error("invalid version history: {0}")]
    InvalidHistory(String),

    /// No item with this id
    #[error("content item not found: {0}")]
    ItemNotFound(ContentId),

    /// A new item names a parent container that does not exist
    #[error("parent container not found: {0}")]
    ParentNotFound(ContentId),

    /// Persistence failed for a reason other than a collision
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

/// Discriminant of [`Error`] for matching without destructuring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidStateAction`]
    InvalidStateAction,
    /// See [`Error::NotEnoughPermissions`]
    NotEnoughPermissions,
    /// See [`Error::CheckedOutToAnotherPrincipal`]
    CheckedOutToAnotherPrincipal,
    /// See [`Error::MultistepSaveInProgress`]
    MultistepSaveInProgress,
    /// See [`Error::UndoOnSingleVersion`]
    UndoOnSingleVersion,
    /// See [`Error::PersistenceConflict`]
    PersistenceConflict,
    /// See [`Error::InvalidHistory`]
    InvalidHistory,
    /// See [`Error::ItemNotFound`]
    ItemNotFound,
    /// See [`Error::ParentNotFound`]
    ParentNotFound,
    /// See [`Error::Storage`]
    Storage,
    /// See [`Error::Config`]
    Config,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidStateAction { .. } => ErrorKind::InvalidStateAction,
            Error::NotEnoughPermissions { .. } => ErrorKind::NotEnoughPermissions,
            Error::CheckedOutToAnotherPrincipal { .. } => ErrorKind::CheckedOutToAnotherPrincipal,
            Error::MultistepSaveInProgress { .. } => ErrorKind::MultistepSaveInProgress,
            Error::UndoOnSingleVersion => ErrorKind::UndoOnSingleVersion,
            Error::PersistenceConflict(_) => ErrorKind::PersistenceConflict,
            Error::InvalidHistory(_) => ErrorKind::InvalidHistory,
            Error::ItemNotFound(_) => ErrorKind::ItemNotFound,
            Error::ParentNotFound(_) => ErrorKind::ParentNotFound,
            Error::Storage(_) => ErrorKind::Storage,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether a caller may retry after reloading the item
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::PersistenceConflict(_))
    }

    /// Whether the failure is a permission failure of either flavour
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotEnoughPermissions | ErrorKind::CheckedOutToAnotherPrincipal
        )
    }

    /// Create an invalid history error
    pub fn invalid_history(reason: impl Into<String>) -> Self {
        Error::InvalidHistory(reason.into())
    }

    /// Create a persistence conflict error
    pub fn persistence_conflict(reason: impl Into<String>) -> Self {
        Error::PersistenceConflict(reason.into())
    }

    /// Create a storage error
    pub fn storage(reason: impl Into<String>) -> Self {
        Error::Storage(reason.into())
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config(reason.into())
    }
}

fn state_label(state: &Option<VersionStatus>) -> &'static str {
    match state {
        Some(status) => status.name(),
        None => "a new item",
    }
}
