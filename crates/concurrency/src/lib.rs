//! Version state machine for Folio
//!
//! This crate decides what an editing operation does to a content item:
//! - TransitionRules: which action is legal in which state, per policy bucket
//! - PermissionGate: capability and check-out lock checks
//! - VersionArithmetic: initial, non-public, public and promoted numbers
//! - HistoryPruner: which historical versions become garbage
//! - TransactionPlanner: composes the above into a SaveTransaction
//!
//! Everything here is pure. Committing a transaction is the engine's job.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arithmetic;
pub mod gate;
pub mod planner;
pub mod pruner;
pub mod rules;
pub mod transaction;

pub use arithmetic::VersionArithmetic;
pub use gate::{LockAccess, PermissionGate};
pub use planner::{SaveRequest, TransactionPlanner};
pub use pruner::{HistoryPruner, PruneStrategy};
pub use rules::TransitionRules;
pub use transaction::{SaveTransaction, TargetVersionId};
