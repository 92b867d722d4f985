//! History pruning
//!
//! Decides which historical versions become garbage when a transition
//! commits. Pruning only runs for check-in, save-and-check-in and approve.
//!
//! ## Strategies
//!
//! - **CollapseToApproved** (`None`, target `Approved`): everything but the
//!   target goes.
//! - **CollapsePreservingDecision** (`None`, target `Pending`): the newest
//!   `Approved`/`Rejected` entry survives together with everything older;
//!   everything newer goes. With no decision on record, everything but the
//!   target goes.
//! - **WorkingTail** (`MajorOnly` on check-in/approve, `MajorAndMinor` on
//!   approve and on check-in without approval): the non-approved entries
//!   newer than the last approved one go; approved history is never touched.
//! - **Keep**: nothing goes. `MajorAndMinor` check-ins with approval keep
//!   their drafts and pending versions.
//!
//! The entry the transition makes current is never deleted.

use folio_core::{
    StateAction, VersionHistory, VersionId, VersionPolicy, VersionStatus, VersioningMode,
};
use std::collections::BTreeSet;

/// A pruning strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneStrategy {
    /// Keep nothing but the target
    CollapseToApproved,
    /// Keep the newest decision entry and everything before it
    CollapsePreservingDecision,
    /// Drop the non-approved tail above the last approved entry
    WorkingTail,
    /// Delete nothing
    Keep,
}

/// History pruning decisions
pub struct HistoryPruner;

impl HistoryPruner {
    /// Choose the strategy for `action` under `policy`
    ///
    /// `target_status` is the status the transition gives the new current
    /// version.
    pub fn strategy(policy: VersionPolicy, action: StateAction, target_status: VersionStatus) -> PruneStrategy {
        if !action.prunes_history() {
            return PruneStrategy::Keep;
        }

        match policy.mode {
            VersioningMode::None => match target_status {
                VersionStatus::Approved => PruneStrategy::CollapseToApproved,
                _ => PruneStrategy::CollapsePreservingDecision,
            },
            VersioningMode::MajorOnly => PruneStrategy::WorkingTail,
            VersioningMode::MajorAndMinor => match (action, policy.approval) {
                // Check-ins under approval leave drafts and pending versions as they are.
                (StateAction::CheckIn | StateAction::SaveAndCheckIn, true) => PruneStrategy::Keep,
                _ => PruneStrategy::WorkingTail,
            },
        }
    }

    /// Ids in `history` to delete under `strategy`
    ///
    /// `keep` is the id of an existing entry that becomes current; it is
    /// never part of the result. Pass `None` when the transition creates a
    /// new version.
    pub fn deletable(
        history: &VersionHistory,
        strategy: PruneStrategy,
        keep: Option<VersionId>,
    ) -> BTreeSet<VersionId> {
        let entries = history.entries();
        let kept = |id: VersionId| Some(id) == keep;

        let first_deletable = match strategy {
            PruneStrategy::Keep => return BTreeSet::new(),
            PruneStrategy::CollapseToApproved => 0,
            PruneStrategy::CollapsePreservingDecision => history
                .rposition(|e| e.status().is_decision() && !kept(e.version_id))
                .map_or(0, |i| i + 1),
            PruneStrategy::WorkingTail => history
                .rposition(|e| e.status() == VersionStatus::Approved && !kept(e.version_id))
                .map_or(0, |i| i + 1),
        };

        entries[first_deletable..]
            .iter()
            .map(|e| e.version_id)
            .filter(|id| !kept(*id))
            .collect()
    }
}
