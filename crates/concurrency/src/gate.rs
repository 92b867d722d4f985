//! Permission gate
//!
//! Consulted before the transition table. Checks, in order:
//!
//! 1. `Modify` on the item (on the parent container for a new item)
//! 2. `ManageContainer` when the item's type is container-like
//! 3. `Publish` for publish, `Approve` for approve/reject
//! 4. the check-out lock, when somebody other than the actor holds it
//!
//! Lock rules for an item checked out to another principal:
//! - `Save` and `SaveAndCheckIn` are always refused
//! - `CheckIn`, `UndoCheckOut` and `Publish` need `ForceCheckIn`
//! - `CheckOut`, `Approve` and `Reject` are left to the transition table
//!
//! The gate is deterministic and side-effect free.

use folio_core::{
    Authorizer, Capability, ContentId, ContentItem, Error, PrincipalId, Result, StateAction,
};

/// How the actor relates to the item's check-out lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockAccess {
    /// Nobody holds the lock
    Unlocked,
    /// The actor holds the lock
    Owner,
    /// Somebody else holds the lock and the actor overrides it
    Forced {
        /// The principal whose lock is overridden
        owner: PrincipalId,
    },
    /// Somebody else holds the lock; the action does not touch it
    Foreign {
        /// Current lock owner
        owner: PrincipalId,
    },
}

/// Capability and lock-ownership checks
pub struct PermissionGate;

impl PermissionGate {
    /// Check whether `actor` may request `action` on `item`
    ///
    /// # Errors
    ///
    /// - `NotEnoughPermissions` naming the first missing capability
    /// - `CheckedOutToAnotherPrincipal` when the lock rules refuse
    pub fn check(
        authorizer: &dyn Authorizer,
        item: &ContentItem,
        actor: PrincipalId,
        action: StateAction,
    ) -> Result<LockAccess> {
        let target = Self::permission_target(item);

        for capability in Self::required_capabilities(item, action) {
            if !authorizer.has_capability(actor, target, capability) {
                return Err(Error::NotEnoughPermissions { action, capability });
            }
        }

        let owner = match item.lock_owner {
            None => return Ok(LockAccess::Unlocked),
            Some(owner) if owner == actor => return Ok(LockAccess::Owner),
            Some(owner) => owner,
        };

        match action {
            StateAction::Save | StateAction::SaveAndCheckIn => {
                Err(Error::CheckedOutToAnotherPrincipal { action, owner })
            }
            StateAction::CheckIn | StateAction::UndoCheckOut | StateAction::Publish => {
                if authorizer.can_force_check_in(actor, target) {
                    Ok(LockAccess::Forced { owner })
                } else {
                    Err(Error::CheckedOutToAnotherPrincipal { action, owner })
                }
            }
            StateAction::CheckOut | StateAction::Approve | StateAction::Reject => {
                Ok(LockAccess::Foreign { owner })
            }
        }
    }

    /// Capabilities `action` needs on `item`, in the order they are checked
    pub fn required_capabilities(item: &ContentItem, action: StateAction) -> Vec<Capability> {
        let mut required = vec![Capability::Modify];
        if item.content_type.is_container {
            required.push(Capability::ManageContainer);
        }
        match action {
            StateAction::Publish => required.push(Capability::Publish),
            StateAction::Approve | StateAction::Reject => required.push(Capability::Approve),
            _ => {}
        }
        required
    }

    /// The item permissions are checked against: the parent for new items
    pub fn permission_target(item: &ContentItem) -> ContentId {
        match (item.is_new(), item.parent_id) {
            (true, Some(parent)) => parent,
            _ => item.id,
        }
    }
}
