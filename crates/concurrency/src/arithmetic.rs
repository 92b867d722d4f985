//! Version arithmetic
//!
//! Three ways to get the next number:
//!
//! - **non-public**: `MajorAndMinor` bumps the minor and keeps the major;
//!   `None`/`MajorOnly` bump the major and reset the minor
//! - **public**: always `(base.major + 1, 0)`; a release starts a new major
//!   line regardless of mode
//! - **promotion**: a public number for the current version; the base is the
//!   major line the current version builds on, so `V2.0.P` becomes `V2.0.A`
//!   and `V1.3.D` becomes `V2.0.A`
//! - **in place**: [`VersionNumber::with_status`] keeps the pair
//!
//! Which one an operation uses is decided by the planner.
//!
//! Every step strictly increases `(major, minor)`. A component that would
//! pass `u32::MAX` fails with `InvalidHistory` instead of wrapping.

use folio_core::{Error, Result, VersionNumber, VersionPolicy, VersionStatus, VersioningMode};

/// Pure version-number computations
pub struct VersionArithmetic;

impl VersionArithmetic {
    /// Number given to the first version of a new item
    ///
    /// - `None`/`MajorOnly` without approval: `V1.0.A`
    /// - `None`/`MajorOnly` with approval: `V1.0.P`
    /// - `MajorAndMinor`: `V0.1.D`
    pub const fn initial_version(policy: VersionPolicy) -> VersionNumber {
        match (policy.mode, policy.approval) {
            (VersioningMode::MajorAndMinor, _) => VersionNumber::new(0, 1, VersionStatus::Draft),
            (_, false) => VersionNumber::new(1, 0, VersionStatus::Approved),
            (_, true) => VersionNumber::new(1, 0, VersionStatus::Pending),
        }
    }

    /// Next working (non-public) number after `current`
    ///
    /// # Errors
    ///
    /// `InvalidHistory` if the bumped component is exhausted.
    pub fn next_non_public(
        mode: VersioningMode,
        current: VersionNumber,
        status: VersionStatus,
    ) -> Result<VersionNumber> {
        match mode {
            VersioningMode::MajorAndMinor => {
                Ok(VersionNumber::new(current.major, bump(current.minor)?, status))
            }
            VersioningMode::None | VersioningMode::MajorOnly => {
                Ok(VersionNumber::new(bump(current.major)?, 0, status))
            }
        }
    }

    /// Next public-line number after `base`: `(base.major + 1, 0)`
    ///
    /// # Errors
    ///
    /// `InvalidHistory` if the major component is exhausted.
    pub fn next_public(base: VersionNumber, status: VersionStatus) -> Result<VersionNumber> {
        Ok(VersionNumber::new(bump(base.major)?, 0, status))
    }

    /// Public number a publish or approve gives `current`
    ///
    /// A working version with minor `0` already sits on the new major line
    /// (`None`/`MajorOnly` working versions always do), so its base is the
    /// line before it. Never smaller than `current`.
    ///
    /// # Errors
    ///
    /// `InvalidHistory` if the major component is exhausted.
    pub fn promote(current: VersionNumber) -> Result<VersionNumber> {
        let base_major = if current.minor == 0 {
            current.major.saturating_sub(1)
        } else {
            current.major
        };
        Self::next_public(
            VersionNumber::new(base_major, 0, VersionStatus::Approved),
            VersionStatus::Approved,
        )
    }

    /// Status a version takes when it is checked in
    ///
    /// `Pending` with approval, otherwise `Draft` for `MajorAndMinor` and
    /// `Approved` for the other modes.
    pub const fn checked_in_status(policy: VersionPolicy) -> VersionStatus {
        match (policy.approval, policy.mode) {
            (true, _) => VersionStatus::Pending,
            (false, VersioningMode::MajorAndMinor) => VersionStatus::Draft,
            (false, VersioningMode::None | VersioningMode::MajorOnly) => VersionStatus::Approved,
        }
    }
}

fn bump(component: u32) -> Result<u32> {
    component
        .checked_add(1)
        .ok_or_else(|| Error::invalid_history("version number exhausted"))
}
