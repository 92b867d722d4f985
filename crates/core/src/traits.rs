//! Collaborator traits
//!
//! The state machine never computes permissions itself. It asks an
//! [`Authorizer`] boolean capability questions about a principal and a
//! target item, so the security layer can be swapped without touching the
//! transition logic.

use crate::types::{ContentId, PrincipalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A capability the permission gate may ask about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Edit the item (or create children, when asked about a parent)
    Modify,
    /// Edit container-like items
    ManageContainer,
    /// Release versions
    Publish,
    /// Approve or reject pending versions
    Approve,
    /// Check in or undo another principal's check-out
    ForceCheckIn,
}

impl Capability {
    /// Get the capability name for observability
    pub const fn name(&self) -> &'static str {
        match self {
            Capability::Modify => "modify",
            Capability::ManageContainer => "manage_container",
            Capability::Publish => "publish",
            Capability::Approve => "approve",
            Capability::ForceCheckIn => "force_check_in",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Authorization collaborator
///
/// Thread safety: implementations are shared across request threads
/// (requires Send + Sync).
pub trait Authorizer: Send + Sync {
    /// May `principal` modify `target`?
    fn can_modify(&self, principal: PrincipalId, target: ContentId) -> bool;

    /// May `principal` edit the container `target`?
    fn can_manage_container(&self, principal: PrincipalId, target: ContentId) -> bool;

    /// May `principal` publish versions of `target`?
    fn can_publish(&self, principal: PrincipalId, target: ContentId) -> bool;

    /// May `principal` approve or reject versions of `target`?
    fn can_approve(&self, principal: PrincipalId, target: ContentId) -> bool;

    /// May `principal` release somebody else's lock on `target`?
    fn can_force_check_in(&self, principal: PrincipalId, target: ContentId) -> bool;

    /// Dispatch a capability to the matching question
    fn has_capability(&self, principal: PrincipalId, target: ContentId, capability: Capability) -> bool {
        match capability {
            Capability::Modify => self.can_modify(principal, target),
            Capability::ManageContainer => self.can_manage_container(principal, target),
            Capability::Publish => self.can_publish(principal, target),
            Capability::Approve => self.can_approve(principal, target),
            Capability::ForceCheckIn => self.can_force_check_in(principal, target),
        }
    }
}

/// Grants a fixed set of capabilities on every target
///
/// Useful for tests and for service accounts whose rights do not vary per
/// item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    granted: BTreeSet<Capability>,
}

impl CapabilitySet {
    /// No capabilities
    pub fn none() -> Self {
        Self::default()
    }

    /// Every capability
    pub fn all() -> Self {
        [
            Capability::Modify,
            Capability::ManageContainer,
            Capability::Publish,
            Capability::Approve,
            Capability::ForceCheckIn,
        ]
        .into_iter()
        .collect()
    }

    /// Add a capability
    pub fn with(mut self, capability: Capability) -> Self {
        self.granted.insert(capability);
        self
    }

    /// Remove a capability
    pub fn without(mut self, capability: Capability) -> Self {
        self.granted.remove(&capability);
        self
    }

    /// Whether the capability is granted
    pub fn contains(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        CapabilitySet {
            granted: iter.into_iter().collect(),
        }
    }
}

impl Authorizer for CapabilitySet {
    fn can_modify(&self, _principal: PrincipalId, _target: ContentId) -> bool {
        self.contains(Capability::Modify)
    }

    fn can_manage_container(&self, _principal: PrincipalId, _target: ContentId) -> bool {
        self.contains(Capability::ManageContainer)
    }

    fn can_publish(&self, _principal: PrincipalId, _target: ContentId) -> bool {
        self.contains(Capability::Publish)
    }

    fn can_approve(&self, _principal: PrincipalId, _target: ContentId) -> bool {
        self.contains(Capability::Approve)
    }

    fn can_force_check_in(&self, _principal: PrincipalId, _target: ContentId) -> bool {
        self.contains(Capability::ForceCheckIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_set_all_and_none() {
        let principal = PrincipalId::new(1);
        let target = ContentId::new();
        let all = CapabilitySet::all();
        let none = CapabilitySet::none();
        for capability in [
            Capability::Modify,
            Capability::ManageContainer,
            Capability::Publish,
            Capability::Approve,
            Capability::ForceCheckIn,
        ] {
            assert!(all.has_capability(principal, target, capability));
            assert!(!none.has_capability(principal, target, capability));
        }
    }

    #[test]
    fn test_without_removes_single_capability() {
        let set = CapabilitySet::all().without(Capability::Approve);
        assert!(!set.contains(Capability::Approve));
        assert!(set.contains(Capability::Publish));
    }

    #[test]
    fn test_capability_names() {
        assert_eq!(Capability::ForceCheckIn.to_string(), "force_check_in");
        assert_eq!(Capability::ManageContainer.name(), "manage_container");
    }
}
