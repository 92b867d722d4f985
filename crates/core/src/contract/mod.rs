//! Contract types for the version state machine
//!
//! ## Module Structure
//!
//! - `version`: version numbers and lifecycle status
//! - `policy`: versioning mode, approval flag and their inheritance
//! - `action`: the editing operations that drive transitions
//! - `versioned_history`: the ordered history of one item

pub mod action;
pub mod policy;
pub mod version;
pub mod versioned_history;

// Re-exports
pub use action::StateAction;
pub use policy::{ApprovalSetting, PolicySettings, VersionPolicy, VersioningMode, VersioningSetting};
pub use version::{ParseVersionError, VersionNumber, VersionStatus};
pub use versioned_history::{VersionHistory, VersionHistoryEntry};
