//! Save transaction planner
//!
//! Turns `(item, history, request)` into a [`SaveTransaction`] or a typed
//! error. Planning is pure: the same inputs always give the same result and
//! nothing is mutated, so concurrent planners over the same item are safe.
//! Only one of them can win the commit.
//!
//! ## Planning Sequence
//!
//! ```text
//! 1. validate the history against the item's pointers
//! 2. resolve the policy (item → content type → default)
//! 3. permission gate          → NotEnoughPermissions / CheckedOutToAnotherPrincipal
//! 4. multistep guard          → MultistepSaveInProgress
//! 5. transition table         → InvalidStateAction
//! 6. target version + id      → UndoOnSingleVersion
//! 7. deletable ids (pruner)
//! 8. lock owner, flags
//! ```

use crate::arithmetic::VersionArithmetic;
use crate::gate::PermissionGate;
use crate::pruner::HistoryPruner;
use crate::rules::TransitionRules;
use crate::transaction::{SaveTransaction, TargetVersionId};
use folio_core::{
    Authorizer, ContentItem, Error, PrincipalId, Result, StateAction, VersionHistory,
    VersionHistoryEntry, VersionId, VersionNumber, VersionPolicy, VersionStatus, VersioningMode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// A requested editing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Requested action
    pub action: StateAction,
    /// Acting principal
    pub actor: PrincipalId,
    /// Open a multistep save. Only meaningful for [`StateAction::Save`].
    pub multistep: bool,
}

impl SaveRequest {
    /// A plain request
    pub const fn new(action: StateAction, actor: PrincipalId) -> Self {
        SaveRequest {
            action,
            actor,
            multistep: false,
        }
    }

    /// A save that opens a multistep save
    ///
    /// While one is open, only check-in or undo check-out are accepted.
    pub const fn multistep_save(actor: PrincipalId) -> Self {
        SaveRequest {
            action: StateAction::Save,
            actor,
            multistep: true,
        }
    }
}

/// What a single branch of the planner decided
struct Outcome {
    target_version: VersionNumber,
    target_version_id: TargetVersionId,
    deletable_version_ids: BTreeSet<VersionId>,
    lock_owner: Option<PrincipalId>,
    multistep_in_progress: bool,
}

impl Outcome {
    fn new(target_version: VersionNumber, target_version_id: TargetVersionId) -> Self {
        Outcome {
            target_version,
            target_version_id,
            deletable_version_ids: BTreeSet::new(),
            lock_owner: None,
            multistep_in_progress: false,
        }
    }

    fn existing(entry: &VersionHistoryEntry, number: VersionNumber) -> Self {
        Self::new(number, TargetVersionId::Existing(entry.version_id))
    }

    fn created(number: VersionNumber) -> Self {
        Self::new(number, TargetVersionId::New)
    }

    fn locked_by(mut self, owner: PrincipalId) -> Self {
        self.lock_owner = Some(owner);
        self
    }

    fn multistep(mut self, open: bool) -> Self {
        self.multistep_in_progress = open;
        self
    }

    fn deleting(mut self, ids: BTreeSet<VersionId>) -> Self {
        self.deletable_version_ids = ids;
        self
    }
}

/// Stateless planner for save transactions
///
/// Holds only the repository-wide default policy used when neither the
/// item nor its content type sets one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionPlanner {
    default_policy: VersionPolicy,
}

impl TransactionPlanner {
    /// Create a planner with a default policy
    pub const fn new(default_policy: VersionPolicy) -> Self {
        TransactionPlanner { default_policy }
    }

    /// The repository-wide default policy
    pub fn default_policy(&self) -> VersionPolicy {
        self.default_policy
    }

    /// Resolve the effective policy of `item`
    pub fn resolve_policy(&self, item: &ContentItem) -> VersionPolicy {
        VersionPolicy::resolve(item.policy, item.content_type.policy, self.default_policy)
    }

    /// Plan one editing operation
    ///
    /// # Errors
    ///
    /// Any of the validation errors; see the module docs for the order in
    /// which they are checked. Nothing is mutated on error.
    pub fn plan(
        &self,
        item: &ContentItem,
        history: &VersionHistory,
        request: SaveRequest,
        authorizer: &dyn Authorizer,
    ) -> Result<SaveTransaction> {
        let result = self.plan_inner(item, history, request, authorizer);
        match &result {
            Ok(txn) => debug!(
                target: "folio::plan",
                content_id = %item.id,
                action = %request.action,
                target = %txn.target_version,
                target_id = %txn.target_version_id,
                deleted = txn.deletable_version_ids.len(),
                "Transaction planned"
            ),
            Err(e) => debug!(
                target: "folio::plan",
                content_id = %item.id,
                action = %request.action,
                error = %e,
                "Request rejected"
            ),
        }
        result
    }

    fn plan_inner(
        &self,
        item: &ContentItem,
        history: &VersionHistory,
        request: SaveRequest,
        authorizer: &dyn Authorizer,
    ) -> Result<SaveTransaction> {
        let SaveRequest { action, actor, .. } = request;

        history.validate(item.current_version_id, item.is_locked())?;
        let policy = self.resolve_policy(item);

        PermissionGate::check(authorizer, item, actor, action)?;

        if item.multistep_in_progress && !action.finishes_multistep() {
            return Err(Error::MultistepSaveInProgress { action });
        }

        let state = history.current_status();
        if !TransitionRules::is_allowed(policy, state, action) {
            return Err(Error::InvalidStateAction {
                action,
                state,
                policy,
            });
        }

        let outcome = match history.current() {
            None => Self::plan_new(policy, request),
            Some(current) => Self::plan_existing(policy, history, current, request)?,
        };

        debug_assert!(outcome
            .target_version_id
            .existing()
            .map_or(true, |id| !outcome.deletable_version_ids.contains(&id)));

        let force_refresh = match (outcome.target_version_id, item.current_version_id) {
            (TargetVersionId::Existing(target), Some(current)) => target != current,
            _ => false,
        };

        Ok(SaveTransaction {
            content_id: item.id,
            action,
            actor,
            policy,
            expected_version_id: item.current_version_id,
            expected_lock_owner: item.lock_owner,
            target_version: outcome.target_version,
            target_version_id: outcome.target_version_id,
            deletable_version_ids: outcome.deletable_version_ids,
            lock_owner: outcome.lock_owner,
            multistep_in_progress: outcome.multistep_in_progress,
            force_refresh,
        })
    }

    /// First save of an item with no history
    fn plan_new(policy: VersionPolicy, request: SaveRequest) -> Outcome {
        let initial = VersionArithmetic::initial_version(policy);
        match request.action {
            StateAction::Save if request.multistep => {
                Outcome::created(initial.with_status(VersionStatus::Locked))
                    .locked_by(request.actor)
                    .multistep(true)
            }
            _ => Outcome::created(initial),
        }
    }

    fn plan_existing(
        policy: VersionPolicy,
        history: &VersionHistory,
        current: &VersionHistoryEntry,
        request: SaveRequest,
    ) -> Result<Outcome> {
        let number = current.number;
        let checked_in = VersionArithmetic::checked_in_status(policy);

        let outcome = match request.action {
            StateAction::Save => Self::plan_save(policy, current, request)?,

            StateAction::CheckOut => Outcome::created(VersionArithmetic::next_non_public(
                policy.mode,
                number,
                VersionStatus::Locked,
            )?)
            .locked_by(request.actor),

            StateAction::CheckIn => {
                let target = number.with_status(checked_in);
                let strategy = HistoryPruner::strategy(policy, StateAction::CheckIn, target.status);
                Outcome::existing(current, target).deleting(HistoryPruner::deletable(
                    history,
                    strategy,
                    Some(current.version_id),
                ))
            }

            StateAction::SaveAndCheckIn => {
                let target = VersionArithmetic::next_non_public(policy.mode, number, checked_in)?;
                let strategy =
                    HistoryPruner::strategy(policy, StateAction::SaveAndCheckIn, target.status);
                Outcome::created(target).deleting(HistoryPruner::deletable(history, strategy, None))
            }

            StateAction::UndoCheckOut => {
                let previous = history.previous().ok_or(Error::UndoOnSingleVersion)?;
                Outcome::existing(previous, previous.number)
                    .deleting(BTreeSet::from([current.version_id]))
            }

            StateAction::Publish => {
                let target = match (policy.mode, policy.approval) {
                    (VersioningMode::MajorAndMinor, true) => number.with_status(VersionStatus::Pending),
                    _ => VersionArithmetic::promote(number)?,
                };
                Outcome::existing(current, target)
            }

            StateAction::Approve => {
                let target = VersionArithmetic::promote(number)?;
                let strategy = HistoryPruner::strategy(policy, StateAction::Approve, target.status);
                Outcome::existing(current, target).deleting(HistoryPruner::deletable(
                    history,
                    strategy,
                    Some(current.version_id),
                ))
            }

            StateAction::Reject => {
                Outcome::existing(current, number.with_status(VersionStatus::Rejected))
            }
        };

        Ok(outcome)
    }

    /// `Save` on an item that already has versions
    fn plan_save(
        policy: VersionPolicy,
        current: &VersionHistoryEntry,
        request: SaveRequest,
    ) -> Result<Outcome> {
        let number = current.number;

        if number.status == VersionStatus::Locked {
            // The gate has already refused saves into somebody else's check-out.
            return Ok(Outcome::existing(current, number)
                .locked_by(request.actor)
                .multistep(request.multistep));
        }

        if request.multistep {
            return Ok(Outcome::created(VersionArithmetic::next_non_public(
                policy.mode,
                number,
                VersionStatus::Locked,
            )?)
            .locked_by(request.actor)
            .multistep(true));
        }

        let checked_in = VersionArithmetic::checked_in_status(policy);
        let outcome = match policy.mode {
            VersioningMode::None if number.status.is_public() && policy.approval => Outcome::created(
                VersionArithmetic::next_non_public(policy.mode, number, checked_in)?,
            ),
            VersioningMode::None => Outcome::existing(current, number.with_status(checked_in)),
            VersioningMode::MajorOnly => Outcome::created(VersionArithmetic::next_non_public(
                policy.mode,
                number,
                checked_in,
            )?),
            VersioningMode::MajorAndMinor => Outcome::created(VersionArithmetic::next_non_public(
                policy.mode,
                number,
                VersionStatus::Draft,
            )?),
        };
        Ok(outcome)
    }
}
