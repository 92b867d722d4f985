//! Version history of a single content item
//!
//! `VersionHistory` wraps a `Vec<VersionHistoryEntry>` ordered oldest-first.
//! It is empty for an item that was never saved. The live entry is always
//! the last one; [`VersionHistory::validate`] checks that together with the
//! other structural invariants before the planner trusts the data.

use super::{VersionNumber, VersionStatus};
use crate::error::{Error, Result};
use crate::types::VersionId;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// One stored version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionHistoryEntry {
    /// Persistence-assigned id
    pub version_id: VersionId,
    /// Version number including status
    pub number: VersionNumber,
}

impl VersionHistoryEntry {
    /// Create an entry
    pub const fn new(version_id: VersionId, number: VersionNumber) -> Self {
        VersionHistoryEntry { version_id, number }
    }

    /// Shorthand for the entry's status
    #[inline]
    pub const fn status(&self) -> VersionStatus {
        self.number.status
    }
}

/// Ordered version history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistory {
    entries: Vec<VersionHistoryEntry>,
}

impl VersionHistory {
    /// Empty history of a new item
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap entries ordered oldest-first. No validation is done here.
    pub fn new(entries: Vec<VersionHistoryEntry>) -> Self {
        VersionHistory { entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the item was never saved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first
    pub fn entries(&self) -> &[VersionHistoryEntry] {
        &self.entries
    }

    /// The live (last) entry
    pub fn current(&self) -> Option<&VersionHistoryEntry> {
        self.entries.last()
    }

    /// The entry just before the live one
    pub fn previous(&self) -> Option<&VersionHistoryEntry> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    /// Status of the live entry; `None` for a new item
    pub fn current_status(&self) -> Option<VersionStatus> {
        self.current().map(VersionHistoryEntry::status)
    }

    /// Find an entry by id
    pub fn get(&self, version_id: VersionId) -> Option<&VersionHistoryEntry> {
        self.entries.iter().find(|e| e.version_id == version_id)
    }

    /// Index of the newest entry matching `predicate`
    pub fn rposition(&self, predicate: impl Fn(&VersionHistoryEntry) -> bool) -> Option<usize> {
        self.entries.iter().rposition(predicate)
    }

    /// Index of the newest `Approved` entry
    pub fn last_approved_index(&self) -> Option<usize> {
        self.rposition(|e| e.status() == VersionStatus::Approved)
    }

    /// Check the structural invariants against the item's pointers
    ///
    /// - `(major, minor)` strictly increases along the history
    /// - at most one `Locked` entry, and only as the last entry
    /// - `current_version_id` names the last entry (`None` iff empty)
    /// - the item is locked iff the last entry is `Locked`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHistory` describing the first violation.
    pub fn validate(&self, current_version_id: Option<VersionId>, is_locked: bool) -> Result<()> {
        for pair in self.entries.windows(2) {
            if pair[0].number.cmp_number(&pair[1].number) != std::cmp::Ordering::Less {
                return Err(Error::invalid_history(format!(
                    "{} is not newer than {}",
                    pair[1].number, pair[0].number
                )));
            }
        }

        if let Some(i) = self.rposition(|e| e.status() == VersionStatus::Locked) {
            if i + 1 != self.entries.len() {
                return Err(Error::invalid_history(format!(
                    "locked entry {} is not the last entry",
                    self.entries[i].number
                )));
            }
            let locked = self
                .entries
                .iter()
                .filter(|e| e.status() == VersionStatus::Locked)
                .count();
            if locked > 1 {
                return Err(Error::invalid_history(format!(
                    "{} locked entries, at most one allowed",
                    locked
                )));
            }
        }

        match (self.current(), current_version_id) {
            (None, None) => {}
            (Some(last), Some(id)) if last.version_id == id => {}
            (Some(last), Some(id)) => {
                return Err(Error::invalid_history(format!(
                    "live version {} is not the last entry {}",
                    id, last.version_id
                )));
            }
            (None, Some(id)) => {
                return Err(Error::invalid_history(format!(
                    "live version {} but the history is empty",
                    id
                )));
            }
            (Some(_), None) => {
                return Err(Error::invalid_history("history exists but no live version"));
            }
        }

        let last_locked = self.current_status() == Some(VersionStatus::Locked);
        if last_locked != is_locked {
            return Err(Error::invalid_history(if is_locked {
                "item has a lock owner but the live version is not locked"
            } else {
                "live version is locked but the item has no lock owner"
            }));
        }

        Ok(())
    }
}

impl Index<usize> for VersionHistory {
    type Output = VersionHistoryEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl FromIterator<VersionHistoryEntry> for VersionHistory {
    fn from_iter<I: IntoIterator<Item = VersionHistoryEntry>>(iter: I) -> Self {
        VersionHistory::new(iter.into_iter().collect())
    }
}
