//! Editing operations that drive the version state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// A requested editing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateAction {
    /// Persist changes (in place when checked out by the actor)
    Save,
    /// Take the exclusive lock and open a working version
    CheckOut,
    /// Release the lock and keep the working version
    CheckIn,
    /// Release the lock and discard the working version
    UndoCheckOut,
    /// Release the current version (or submit it for approval)
    Publish,
    /// Accept a pending version
    Approve,
    /// Decline a pending version
    Reject,
    /// Save a new version and check it in in one step
    SaveAndCheckIn,
}

impl StateAction {
    /// All actions, in declaration order
    pub const ALL: [StateAction; 8] = [
        StateAction::Save,
        StateAction::CheckOut,
        StateAction::CheckIn,
        StateAction::UndoCheckOut,
        StateAction::Publish,
        StateAction::Approve,
        StateAction::Reject,
        StateAction::SaveAndCheckIn,
    ];

    /// Get the action name for observability
    pub const fn name(&self) -> &'static str {
        match self {
            StateAction::Save => "Save",
            StateAction::CheckOut => "CheckOut",
            StateAction::CheckIn => "CheckIn",
            StateAction::UndoCheckOut => "UndoCheckOut",
            StateAction::Publish => "Publish",
            StateAction::Approve => "Approve",
            StateAction::Reject => "Reject",
            StateAction::SaveAndCheckIn => "SaveAndCheckIn",
        }
    }

    /// Whether the action is accepted while a multistep save is open
    #[inline]
    pub const fn finishes_multistep(&self) -> bool {
        matches!(self, StateAction::CheckIn | StateAction::UndoCheckOut)
    }

    /// Whether the action may trigger history pruning
    #[inline]
    pub const fn prunes_history(&self) -> bool {
        matches!(
            self,
            StateAction::CheckIn | StateAction::Approve | StateAction::SaveAndCheckIn
        )
    }
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
