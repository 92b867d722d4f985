//! Content engine for Folio
//!
//! This crate runs editing operations end to end:
//! - ContentService: load → plan → commit, with rename-and-retry on insert
//! - Collaborator traits: HistorySource, Persistence, NameCandidates
//! - MemoryRepository: thread-safe in-memory reference collaborator
//! - FolioConfig: repository configuration from `folio.toml`
//!
//! The engine is the only component that talks to storage. Deciding what
//! an operation does is left to `folio-concurrency`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod memory;
pub mod naming;
pub mod service;
pub mod store;

pub use config::{FolioConfig, PolicyDefaults, CONFIG_FILE_NAME};
pub use memory::{MemoryRepository, VersionRecord};
pub use naming::{next_available_name, NameCandidates, NumberedSuffix};
pub use service::{ContentService, ServiceStats};
pub use store::{CommitError, CommitOutcome, HistorySource, Persistence};
