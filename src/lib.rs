//! Folio - version and approval state machine for a content repository
//!
//! Folio decides what an editing operation (save, check-out, check-in,
//! publish, approve, ...) does to a content item's version history under one
//! of six versioning policies, and commits the result atomically.
//!
//! # Quick Start
//!
//! ```ignore
//! use folio::{CapabilitySet, ContentItem, ContentService, ContentType, FolioConfig};
//! use folio::{MemoryRepository, PrincipalId, SaveRequest, StateAction};
//! use std::sync::Arc;
//!
//! let repo = Arc::new(MemoryRepository::new());
//! let alice = PrincipalId::new(1);
//! repo.grant(alice, CapabilitySet::all());
//!
//! let service = ContentService::with_repository(&FolioConfig::default(), repo);
//! let item = ContentItem::new(None, "report.docx", ContentType::new("File"));
//! let created = service.create(item, SaveRequest::new(StateAction::Save, alice))?;
//! service.check_out(created.content_id, alice)?;
//! ```
//!
//! # Architecture
//!
//! - `folio-core`: version numbers, policies, histories, errors, collaborator traits
//! - `folio-concurrency`: transition rules, permission gate, arithmetic,
//!   pruning and the transaction planner
//! - `folio-engine`: the content service, configuration and the in-memory
//!   reference repository

pub use folio_concurrency::*;
pub use folio_core::*;
pub use folio_engine::*;
