//! Core types and traits for Folio
//!
//! This crate defines the foundational types used throughout the system:
//! - VersionNumber / VersionStatus: `(major, minor, status)` version identity
//! - VersioningMode / VersionPolicy: the six policy buckets and their inheritance
//! - StateAction: the editing operations that drive the state machine
//! - VersionHistory: the ordered history of one content item
//! - ContentItem / ContentType: the item record the state machine reads
//! - Error: Error taxonomy
//! - Traits: Authorizer collaborator and Capability

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use contract::{
    ApprovalSetting, ParseVersionError, PolicySettings, StateAction, VersionHistory,
    VersionHistoryEntry, VersionNumber, VersionPolicy, VersionStatus, VersioningMode,
    VersioningSetting,
};
pub use error::{Error, ErrorKind, Result};
pub use traits::{Authorizer, Capability, CapabilitySet};
pub use types::{ContentId, ContentItem, ContentType, PrincipalId, VersionId};
