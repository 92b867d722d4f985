//! Version numbers and lifecycle status
//!
//! A version is identified by a `(major, minor)` pair plus a lifecycle
//! status. Numbers only ever grow within a history; the status is metadata
//! that can change in place (for example `Pending` → `Rejected`).
//!
//! ## Text form
//!
//! Versions render as `V{major}.{minor}.{status}` where the status is one
//! letter: `D`raft, `P`ending, `A`pproved, `R`ejected, `L`ocked. The same
//! form is accepted by [`VersionNumber::from_str`](std::str::FromStr).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a single version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionStatus {
    /// Work in progress, visible to editors only
    Draft,
    /// Submitted and waiting for an approve/reject decision
    Pending,
    /// Public version
    Approved,
    /// Declined by an approver
    Rejected,
    /// Checked out by exactly one principal
    Locked,
}

impl VersionStatus {
    /// All statuses, in declaration order
    pub const ALL: [VersionStatus; 5] = [
        VersionStatus::Draft,
        VersionStatus::Pending,
        VersionStatus::Approved,
        VersionStatus::Rejected,
        VersionStatus::Locked,
    ];

    /// One-letter code used in the text form
    pub const fn code(&self) -> char {
        match self {
            VersionStatus::Draft => 'D',
            VersionStatus::Pending => 'P',
            VersionStatus::Approved => 'A',
            VersionStatus::Rejected => 'R',
            VersionStatus::Locked => 'L',
        }
    }

    /// Parse a one-letter status code (case-insensitive)
    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(VersionStatus::Draft),
            'P' => Some(VersionStatus::Pending),
            'A' => Some(VersionStatus::Approved),
            'R' => Some(VersionStatus::Rejected),
            'L' => Some(VersionStatus::Locked),
            _ => None,
        }
    }

    /// Whether readers without edit rights can see this version
    #[inline]
    pub const fn is_public(&self) -> bool {
        matches!(self, VersionStatus::Approved)
    }

    /// Whether this status records an approver's decision
    #[inline]
    pub const fn is_decision(&self) -> bool {
        matches!(self, VersionStatus::Approved | VersionStatus::Rejected)
    }

    /// Get the status name for observability
    pub const fn name(&self) -> &'static str {
        match self {
            VersionStatus::Draft => "Draft",
            VersionStatus::Pending => "Pending",
            VersionStatus::Approved => "Approved",
            VersionStatus::Rejected => "Rejected",
            VersionStatus::Locked => "Locked",
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            VersionStatus::Draft => 0,
            VersionStatus::Pending => 1,
            VersionStatus::Approved => 2,
            VersionStatus::Rejected => 3,
            VersionStatus::Locked => 4,
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable `(major, minor, status)` version number
///
/// ## Invariants
///
/// - Ordering is by `(major, minor)`. The status only breaks ties so that
///   `Ord` agrees with `Eq`; a valid history never holds two entries with
///   the same pair.
/// - `with_status` never changes the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionNumber {
    /// Major component, advanced on every public release
    pub major: u32,
    /// Minor component, advanced by drafts under major-and-minor versioning
    pub minor: u32,
    /// Lifecycle status
    pub status: VersionStatus,
}

impl VersionNumber {
    /// Create a version number
    pub const fn new(major: u32, minor: u32, status: VersionStatus) -> Self {
        VersionNumber {
            major,
            minor,
            status,
        }
    }

    /// Copy with the status replaced
    #[inline]
    pub const fn with_status(&self, status: VersionStatus) -> Self {
        VersionNumber::new(self.major, self.minor, status)
    }

    /// The `(major, minor)` pair
    #[inline]
    pub const fn pair(&self) -> (u32, u32) {
        (self.major, self.minor)
    }

    /// Compare only the numeric part, ignoring status
    #[inline]
    pub fn cmp_number(&self, other: &Self) -> Ordering {
        self.pair().cmp(&other.pair())
    }

    /// Whether both versions carry the same `(major, minor)` pair
    #[inline]
    pub fn same_number(&self, other: &Self) -> bool {
        self.pair() == other.pair()
    }

    /// Whether this is a major (public-line) number, i.e. minor is zero
    #[inline]
    pub const fn is_major(&self) -> bool {
        self.minor == 0
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_number(other)
            .then_with(|| self.status.rank().cmp(&other.status.rank()))
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}.{}.{}", self.major, self.minor, self.status.code())
    }
}

/// Error returned when a version string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError(String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid version '{}': expected V<major>.<minor>.<D|P|A|R|L>",
            self.0
        )
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for VersionNumber {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_string());
        let body = s
            .strip_prefix('V')
            .or_else(|| s.strip_prefix('v'))
            .ok_or_else(err)?;

        let mut parts = body.split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let status = parts
            .next()
            .and_then(|p| {
                let mut chars = p.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => VersionStatus::from_code(c),
                    _ => None,
                }
            })
            .ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }

        Ok(VersionNumber::new(major, minor, status))
    }
}
