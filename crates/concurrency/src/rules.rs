//! Transition rules
//!
//! Which editing operation is legal in which state, per policy bucket. This
//! table is the single source of truth for legality; arithmetic and pruning
//! only run for combinations it accepts.
//!
//! | Action | Allowed from |
//! |--------|--------------|
//! | Save | any state |
//! | SaveAndCheckIn, CheckOut | any state except `Locked` |
//! | CheckIn, UndoCheckOut | `Locked` only |
//! | Publish | MajorAndMinor: `Draft`, `Rejected`, `Locked`; None/MajorOnly without approval: `Draft`, `Rejected`; otherwise never |
//! | Approve, Reject | `Pending`, and only with approval |
//!
//! An item that was never saved accepts only `Save` and `SaveAndCheckIn`.

use folio_core::{StateAction, VersionPolicy, VersionStatus, VersioningMode};

/// The transition-validity table
pub struct TransitionRules;

impl TransitionRules {
    /// Is `action` legal from `state` under `policy`?
    ///
    /// `state` is `None` for an item with no history.
    pub fn is_allowed(policy: VersionPolicy, state: Option<VersionStatus>, action: StateAction) -> bool {
        use StateAction::*;
        use VersionStatus::*;

        let Some(state) = state else {
            return matches!(action, Save | SaveAndCheckIn);
        };

        match action {
            Save => true,
            SaveAndCheckIn | CheckOut => !matches!(state, Locked),
            CheckIn | UndoCheckOut => matches!(state, Locked),
            Publish => match (policy.mode, policy.approval) {
                (VersioningMode::MajorAndMinor, _) => matches!(state, Draft | Rejected | Locked),
                (VersioningMode::None | VersioningMode::MajorOnly, false) => {
                    matches!(state, Draft | Rejected)
                }
                (VersioningMode::None | VersioningMode::MajorOnly, true) => false,
            },
            Approve | Reject => policy.approval && matches!(state, Pending),
        }
    }

    /// Every action legal from `state` under `policy`, in declaration order
    pub fn allowed_actions(policy: VersionPolicy, state: Option<VersionStatus>) -> Vec<StateAction> {
        StateAction::ALL
            .into_iter()
            .filter(|action| Self::is_allowed(policy, state, *action))
            .collect()
    }
}
