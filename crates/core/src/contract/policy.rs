//! Versioning policy
//!
//! Two orthogonal settings govern how versions evolve:
//!
//! - **VersioningMode**: `None`, `MajorOnly` or `MajorAndMinor`
//! - **Approval**: whether new versions must pass `Pending` before release
//!
//! Together they form one of six [`VersionPolicy`] buckets. Items and
//! content types can leave either axis `Inherited`; resolution walks
//! item → content type → repository default and takes the first explicit
//! value on each axis independently.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Versioning granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersioningMode {
    /// Only the latest version is kept; every change advances the major number
    None,
    /// Every change advances the major number; history is kept
    MajorOnly,
    /// Drafts advance the minor number; releases start a new major line
    MajorAndMinor,
}

impl VersioningMode {
    /// All modes, in declaration order
    pub const ALL: [VersioningMode; 3] = [
        VersioningMode::None,
        VersioningMode::MajorOnly,
        VersioningMode::MajorAndMinor,
    ];

    /// Get the mode name for observability
    pub const fn name(&self) -> &'static str {
        match self {
            VersioningMode::None => "None",
            VersioningMode::MajorOnly => "MajorOnly",
            VersioningMode::MajorAndMinor => "MajorAndMinor",
        }
    }
}

impl fmt::Display for VersioningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved versioning policy: one of six buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionPolicy {
    /// Versioning granularity
    pub mode: VersioningMode,
    /// Whether versions must be approved before becoming public
    pub approval: bool,
}

impl VersionPolicy {
    /// All six policy buckets
    pub const ALL: [VersionPolicy; 6] = [
        VersionPolicy::new(VersioningMode::None, false),
        VersionPolicy::new(VersioningMode::None, true),
        VersionPolicy::new(VersioningMode::MajorOnly, false),
        VersionPolicy::new(VersioningMode::MajorOnly, true),
        VersionPolicy::new(VersioningMode::MajorAndMinor, false),
        VersionPolicy::new(VersioningMode::MajorAndMinor, true),
    ];

    /// Create a policy from its two axes
    pub const fn new(mode: VersioningMode, approval: bool) -> Self {
        VersionPolicy { mode, approval }
    }

    /// Resolve a policy from a chain of possibly-inherited settings
    ///
    /// Each axis takes the first explicit value from `item`, then
    /// `content_type`, falling back to `default`.
    pub fn resolve(item: PolicySettings, content_type: PolicySettings, default: VersionPolicy) -> Self {
        let mode = item
            .versioning
            .explicit()
            .or_else(|| content_type.versioning.explicit())
            .unwrap_or(default.mode);
        let approval = item
            .approval
            .explicit()
            .or_else(|| content_type.approval.explicit())
            .unwrap_or(default.approval);
        VersionPolicy::new(mode, approval)
    }

    /// Whether drafts advance the minor number
    #[inline]
    pub const fn is_major_and_minor(&self) -> bool {
        matches!(self.mode, VersioningMode::MajorAndMinor)
    }
}

impl Default for VersionPolicy {
    fn default() -> Self {
        VersionPolicy::new(VersioningMode::None, false)
    }
}

impl fmt::Display for VersionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let approval = if self.approval { "on" } else { "off" };
        write!(f, "{}/approval={}", self.mode, approval)
    }
}

/// Versioning setting as configured on an item or content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersioningSetting {
    /// Take the value from the next level up
    #[default]
    Inherited,
    /// Explicit [`VersioningMode::None`]
    None,
    /// Explicit [`VersioningMode::MajorOnly`]
    MajorOnly,
    /// Explicit [`VersioningMode::MajorAndMinor`]
    MajorAndMinor,
}

impl VersioningSetting {
    /// The explicit mode, if any
    pub const fn explicit(&self) -> Option<VersioningMode> {
        match self {
            VersioningSetting::Inherited => None,
            VersioningSetting::None => Some(VersioningMode::None),
            VersioningSetting::MajorOnly => Some(VersioningMode::MajorOnly),
            VersioningSetting::MajorAndMinor => Some(VersioningMode::MajorAndMinor),
        }
    }
}

impl From<VersioningMode> for VersioningSetting {
    fn from(mode: VersioningMode) -> Self {
        match mode {
            VersioningMode::None => VersioningSetting::None,
            VersioningMode::MajorOnly => VersioningSetting::MajorOnly,
            VersioningMode::MajorAndMinor => VersioningSetting::MajorAndMinor,
        }
    }
}

/// Approval setting as configured on an item or content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalSetting {
    /// Take the value from the next level up
    #[default]
    Inherited,
    /// Approval not required
    Off,
    /// Approval required
    On,
}

impl ApprovalSetting {
    /// The explicit flag, if any
    pub const fn explicit(&self) -> Option<bool> {
        match self {
            ApprovalSetting::Inherited => None,
            ApprovalSetting::Off => Some(false),
            ApprovalSetting::On => Some(true),
        }
    }
}

impl From<bool> for ApprovalSetting {
    fn from(approval: bool) -> Self {
        if approval {
            ApprovalSetting::On
        } else {
            ApprovalSetting::Off
        }
    }
}

/// Both policy axes at one configuration level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Versioning axis
    #[serde(default)]
    pub versioning: VersioningSetting,
    /// Approval axis
    #[serde(default)]
    pub approval: ApprovalSetting,
}

impl PolicySettings {
    /// Both axes inherited
    pub const fn inherited() -> Self {
        PolicySettings {
            versioning: VersioningSetting::Inherited,
            approval: ApprovalSetting::Inherited,
        }
    }

    /// Both axes explicit
    pub fn explicit(mode: VersioningMode, approval: bool) -> Self {
        PolicySettings {
            versioning: mode.into(),
            approval: approval.into(),
        }
    }
}

impl From<VersionPolicy> for PolicySettings {
    fn from(policy: VersionPolicy) -> Self {
        PolicySettings::explicit(policy.mode, policy.approval)
    }
}
