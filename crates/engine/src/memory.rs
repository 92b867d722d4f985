//! MemoryRepository: in-memory reference collaborator
//!
//! Implements [`HistorySource`], [`Persistence`] and [`Authorizer`] over
//! `parking_lot::RwLock`-guarded maps.
//!
//! # Design Notes
//!
//! - **One write lock per commit**: the compare-and-set on the live version
//!   id and lock owner, the sibling-name check and every mutation happen
//!   under the same guard, so a commit is all-or-nothing.
//! - **Repository-wide version ids**: allocated from one counter and never
//!   reused, even after pruning.
//! - **Grants are per principal**: the capability set applies to every
//!   target. Finer-grained policies plug in their own `Authorizer`.

use crate::store::{CommitError, CommitOutcome, HistorySource, Persistence};
use chrono::{DateTime, Utc};
use folio_concurrency::{SaveTransaction, TargetVersionId};
use folio_core::{
    Authorizer, Capability, CapabilitySet, ContentId, ContentItem, Error, PrincipalId, Result,
    VersionHistory, VersionHistoryEntry, VersionId, VersionNumber,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One stored version as exposed to readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Version id
    pub version_id: VersionId,
    /// Current number of the version
    pub number: VersionNumber,
    /// Principal whose transaction created the version
    pub author: PrincipalId,
    /// When the version was created
    pub created_at: DateTime<Utc>,
    /// When the version was last renumbered or re-statused
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredItem {
    item: ContentItem,
    /// Oldest first
    versions: Vec<VersionRecord>,
}

impl StoredItem {
    fn history(&self) -> VersionHistory {
        self.versions
            .iter()
            .map(|v| VersionHistoryEntry::new(v.version_id, v.number))
            .collect()
    }
}

#[derive(Debug, Default)]
struct State {
    items: FxHashMap<ContentId, StoredItem>,
    next_version_id: u64,
}

impl State {
    fn name_taken(&self, parent_id: Option<ContentId>, name: &str, except: ContentId) -> bool {
        self.items.values().any(|stored| {
            stored.item.id != except
                && stored.item.parent_id == parent_id
                && stored.item.name == name
        })
    }

    fn allocate_version_id(&mut self) -> VersionId {
        self.next_version_id += 1;
        VersionId::new(self.next_version_id)
    }
}

/// Thread-safe in-memory content repository
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
    grants: RwLock<FxHashMap<PrincipalId, CapabilitySet>>,
}

impl MemoryRepository {
    /// Create an empty repository with no grants
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the capabilities of `principal`
    pub fn grant(&self, principal: PrincipalId, capabilities: CapabilitySet) {
        self.grants.write().insert(principal, capabilities);
    }

    /// Remove one capability from `principal`
    pub fn revoke(&self, principal: PrincipalId, capability: Capability) {
        if let Some(set) = self.grants.write().get_mut(&principal) {
            *set = std::mem::take(set).without(capability);
        }
    }

    /// Insert a never-versioned item such as a root folder
    ///
    /// # Errors
    ///
    /// `PersistenceConflict` if the name is taken among its siblings.
    pub fn insert_unversioned(&self, item: ContentItem) -> Result<()> {
        let mut state = self.state.write();
        if state.name_taken(item.parent_id, &item.name, item.id) {
            return Err(CommitError::NameConflict { name: item.name }.into());
        }
        state.items.insert(
            item.id,
            StoredItem {
                item,
                versions: Vec::new(),
            },
        );
        Ok(())
    }

    /// Every stored version of an item, oldest first
    ///
    /// # Errors
    ///
    /// `ItemNotFound` if no item has this id.
    pub fn versions(&self, id: ContentId) -> Result<Vec<VersionRecord>> {
        self.state
            .read()
            .items
            .get(&id)
            .map(|stored| stored.versions.clone())
            .ok_or(Error::ItemNotFound(id))
    }

    /// Ids of the children of `parent`
    pub fn children(&self, parent: ContentId) -> Vec<ContentId> {
        self.state
            .read()
            .items
            .values()
            .filter(|stored| stored.item.parent_id == Some(parent))
            .map(|stored| stored.item.id)
            .collect()
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    /// Whether the repository holds no items
    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    fn commit_locked(
        state: &mut State,
        item: &ContentItem,
        txn: &SaveTransaction,
    ) -> std::result::Result<CommitOutcome, CommitError> {
        let now = Utc::now();
        let id = txn.content_id();

        // Compare-and-set against what the planner saw.
        let (actual_version, actual_owner) = match state.items.get(&id) {
            Some(stored) => (stored.item.current_version_id, stored.item.lock_owner),
            None => (None, None),
        };
        if actual_version != txn.expected_version_id() {
            return Err(CommitError::StaleHistory {
                expected: txn.expected_version_id(),
                actual: actual_version,
            });
        }
        if actual_owner != txn.expected_lock_owner() {
            return Err(CommitError::LockConflict {
                expected: txn.expected_lock_owner(),
                actual: actual_owner,
            });
        }

        if !state.items.contains_key(&id) {
            if state.name_taken(item.parent_id, &item.name, id) {
                return Err(CommitError::NameConflict {
                    name: item.name.clone(),
                });
            }
            state.items.insert(
                id,
                StoredItem {
                    item: item.clone(),
                    versions: Vec::new(),
                },
            );
        }

        let new_version_id = match txn.target_version_id() {
            TargetVersionId::New => Some(state.allocate_version_id()),
            TargetVersionId::Existing(_) => None,
        };
        let stored = state
            .items
            .get_mut(&id)
            .ok_or_else(|| CommitError::Storage(format!("item {} vanished during commit", id)))?;

        let live = match (txn.target_version_id(), new_version_id) {
            (TargetVersionId::Existing(target), _) => {
                let record = stored
                    .versions
                    .iter_mut()
                    .find(|v| v.version_id == target)
                    .ok_or(CommitError::StaleHistory {
                        expected: Some(target),
                        actual: stored.item.current_version_id,
                    })?;
                if record.number != txn.target_version() {
                    record.number = txn.target_version();
                    record.modified_at = now;
                }
                target
            }
            (TargetVersionId::New, Some(version_id)) => {
                stored.versions.push(VersionRecord {
                    version_id,
                    number: txn.target_version(),
                    author: txn.actor(),
                    created_at: now,
                    modified_at: now,
                });
                version_id
            }
            (TargetVersionId::New, None) => {
                return Err(CommitError::Storage("no version id allocated".to_string()));
            }
        };

        let before = stored.versions.len();
        stored
            .versions
            .retain(|v| !txn.deletable_version_ids().contains(&v.version_id));
        let deleted = before - stored.versions.len();

        stored.item.current_version_id = Some(live);
        stored.item.lock_owner = txn.lock_owner();
        stored.item.multistep_in_progress = txn.multistep_in_progress();

        Ok(CommitOutcome {
            content_id: id,
            name: stored.item.name.clone(),
            version_id: live,
            version: txn.target_version(),
            lock_owner: txn.lock_owner(),
            deleted,
            force_refresh: txn.force_refresh(),
        })
    }
}

impl HistorySource for MemoryRepository {
    fn load_item(&self, id: ContentId) -> Result<ContentItem> {
        self.state
            .read()
            .items
            .get(&id)
            .map(|stored| stored.item.clone())
            .ok_or(Error::ItemNotFound(id))
    }

    fn load_history(&self, id: ContentId) -> Result<VersionHistory> {
        self.state
            .read()
            .items
            .get(&id)
            .map(StoredItem::history)
            .ok_or(Error::ItemNotFound(id))
    }

    fn contains(&self, id: ContentId) -> bool {
        self.state.read().items.contains_key(&id)
    }

    fn load(&self, id: ContentId) -> Result<(ContentItem, VersionHistory)> {
        self.state
            .read()
            .items
            .get(&id)
            .map(|stored| (stored.item.clone(), stored.history()))
            .ok_or(Error::ItemNotFound(id))
    }
}

impl Persistence for MemoryRepository {
    fn commit(
        &self,
        item: &ContentItem,
        txn: &SaveTransaction,
    ) -> std::result::Result<CommitOutcome, CommitError> {
        let mut state = self.state.write();
        Self::commit_locked(&mut state, item, txn)
    }
}

impl Authorizer for MemoryRepository {
    fn can_modify(&self, principal: PrincipalId, target: ContentId) -> bool {
        self.has_capability(principal, target, Capability::Modify)
    }

    fn can_manage_container(&self, principal: PrincipalId, target: ContentId) -> bool {
        self.has_capability(principal, target, Capability::ManageContainer)
    }

    fn can_publish(&self, principal: PrincipalId, target: ContentId) -> bool {
        self.has_capability(principal, target, Capability::Publish)
    }

    fn can_approve(&self, principal: PrincipalId, target: ContentId) -> bool {
        self.has_capability(principal, target, Capability::Approve)
    }

    fn can_force_check_in(&self, principal: PrincipalId, target: ContentId) -> bool {
        self.has_capability(principal, target, Capability::ForceCheckIn)
    }

    fn has_capability(&self, principal: PrincipalId, _target: ContentId, capability: Capability) -> bool {
        self.grants
            .read()
            .get(&principal)
            .map_or(false, |set| set.contains(capability))
    }
}
