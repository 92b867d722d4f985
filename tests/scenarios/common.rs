//! Shared fixture for the scenario suites

#![allow(dead_code)]

use folio::{
    Capability, CapabilitySet, CommitOutcome, ContentId, ContentItem, ContentService, ContentType,
    FolioConfig, HistorySource, MemoryRepository, PolicyDefaults, PrincipalId, SaveRequest,
    StateAction, VersionPolicy,
};
use std::sync::Arc;

/// Can edit and publish
pub const AUTHOR: PrincipalId = PrincipalId::new(1);
/// Can edit, publish and approve
pub const APPROVER: PrincipalId = PrincipalId::new(2);
/// Holds every capability, including force check-in
pub const ADMIN: PrincipalId = PrincipalId::new(3);
/// Can edit only
pub const CONTRIBUTOR: PrincipalId = PrincipalId::new(4);

pub struct Repo {
    pub service: ContentService,
    pub store: Arc<MemoryRepository>,
}

impl Repo {
    /// A repository whose default policy is `policy`
    pub fn with_policy(policy: VersionPolicy) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let store = Arc::new(MemoryRepository::new());
        let contributor = CapabilitySet::none().with(Capability::Modify);
        let author = contributor.clone().with(Capability::Publish);
        store.grant(CONTRIBUTOR, contributor);
        store.grant(AUTHOR, author.clone());
        store.grant(APPROVER, author.with(Capability::Approve));
        store.grant(ADMIN, CapabilitySet::all());

        let config = FolioConfig {
            defaults: PolicyDefaults {
                versioning: policy.mode,
                approval: policy.approval,
            },
            ..FolioConfig::default()
        };
        Repo {
            service: ContentService::with_repository(&config, store.clone()),
            store,
        }
    }

    /// Create `name` at the root and return its id
    pub fn create(&self, name: &str) -> ContentId {
        self.service
            .create(
                ContentItem::new(None, name, ContentType::new("File")),
                SaveRequest::new(StateAction::Save, AUTHOR),
            )
            .unwrap()
            .content_id
    }

    /// Stored version numbers, oldest first
    pub fn numbers(&self, id: ContentId) -> Vec<String> {
        self.store
            .load_history(id)
            .unwrap()
            .entries()
            .iter()
            .map(|e| e.number.to_string())
            .collect()
    }

    /// Assert the stored item and history are consistent
    pub fn assert_consistent(&self, id: ContentId) {
        let (item, history) = self.store.load(id).unwrap();
        history
            .validate(item.current_version_id, item.is_locked())
            .unwrap();
    }
}

/// The committed version as text
pub fn v(outcome: &CommitOutcome) -> String {
    outcome.version.to_string()
}
