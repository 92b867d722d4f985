//! Identifiers and the content item record
//!
//! This module defines the identity types and the slice of a content item
//! the version state machine reads: its position (parent, name), its
//! content type, its policy settings, and its lock and version pointers.

use crate::contract::PolicySettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a content item
///
/// A ContentId is a wrapper around a UUID v4. It is assigned when the item
/// object is created, before the first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(Uuid);

impl ContentId {
    /// Create a new random ContentId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a ContentId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse a ContentId from a string representation
    ///
    /// # Errors
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this ContentId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of one stored version, assigned by persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionId(u64);

impl VersionId {
    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        VersionId(raw)
    }

    /// Get the raw id
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version:{}", self.0)
    }
}

/// Identity of an acting user or service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrincipalId(u64);

impl PrincipalId {
    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        PrincipalId(raw)
    }

    /// Get the raw id
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

/// The parts of a content type the state machine depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    /// Type name, e.g. `"File"` or `"Folder"`
    pub name: String,
    /// Container-like types need the manage-container capability to edit
    pub is_container: bool,
    /// Type-level policy settings
    #[serde(default)]
    pub policy: PolicySettings,
}

impl ContentType {
    /// A leaf content type with inherited policy
    pub fn new(name: impl Into<String>) -> Self {
        ContentType {
            name: name.into(),
            is_container: false,
            policy: PolicySettings::inherited(),
        }
    }

    /// A container content type with inherited policy
    pub fn container(name: impl Into<String>) -> Self {
        ContentType {
            is_container: true,
            ..ContentType::new(name)
        }
    }

    /// Set the type-level policy settings
    pub fn with_policy(mut self, policy: impl Into<PolicySettings>) -> Self {
        self.policy = policy.into();
        self
    }
}

/// A content item as seen by the version state machine
///
/// `current_version_id` is `None` until the first save commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Item identity
    pub id: ContentId,
    /// Parent container, `None` for a root
    pub parent_id: Option<ContentId>,
    /// Name, unique among siblings
    pub name: String,
    /// Content type
    pub content_type: ContentType,
    /// Item-level policy settings
    #[serde(default)]
    pub policy: PolicySettings,
    /// Live version pointer
    pub current_version_id: Option<VersionId>,
    /// Principal holding the check-out lock
    pub lock_owner: Option<PrincipalId>,
    /// Whether a multistep save is open
    #[serde(default)]
    pub multistep_in_progress: bool,
}

impl ContentItem {
    /// Create a new, never-saved item
    pub fn new(parent_id: Option<ContentId>, name: impl Into<String>, content_type: ContentType) -> Self {
        ContentItem {
            id: ContentId::new(),
            parent_id,
            name: name.into(),
            content_type,
            policy: PolicySettings::inherited(),
            current_version_id: None,
            lock_owner: None,
            multistep_in_progress: false,
        }
    }

    /// Set the item-level policy settings
    pub fn with_policy(mut self, policy: impl Into<PolicySettings>) -> Self {
        self.policy = policy.into();
        self
    }

    /// Whether the item was never saved
    #[inline]
    pub fn is_new(&self) -> bool {
        self.current_version_id.is_none()
    }

    /// Whether the item is checked out by anyone
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lock_owner.is_some()
    }

    /// The lock owner, if it is somebody other than `principal`
    pub fn locked_by_other(&self, principal: PrincipalId) -> Option<PrincipalId> {
        self.lock_owner.filter(|owner| *owner != principal)
    }
}
