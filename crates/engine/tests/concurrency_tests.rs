//! Multi-threaded commit tests
//!
//! Planning is pure, so any number of threads may plan against the same
//! item at once. Only one of them may win the commit; the repository's
//! compare-and-set must turn every other attempt into a clean refusal.

use folio_core::{
    CapabilitySet, ContentItem, ContentType, ErrorKind, PrincipalId, StateAction, VersionPolicy,
    VersionStatus, VersioningMode,
};
use folio_concurrency::SaveRequest;
use folio_engine::{ContentService, FolioConfig, HistorySource, MemoryRepository};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: u64 = 8;

fn principal(i: u64) -> PrincipalId {
    PrincipalId::new(i + 1)
}

fn setup(policy: VersionPolicy) -> (Arc<ContentService>, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    for i in 0..THREADS {
        repo.grant(principal(i), CapabilitySet::all());
    }
    let config = FolioConfig {
        defaults: folio_engine::PolicyDefaults {
            versioning: policy.mode,
            approval: policy.approval,
        },
        ..FolioConfig::default()
    };
    (Arc::new(ContentService::with_repository(&config, repo.clone())), repo)
}

fn file(name: &str) -> ContentItem {
    ContentItem::new(None, name, ContentType::new("File"))
}

// ============================================================================
// Lock Acquisition
// ============================================================================

#[test]
fn test_only_one_check_out_wins() {
    let (service, repo) = setup(VersionPolicy::new(VersioningMode::MajorOnly, false));
    let created = service
        .create(file("shared.txt"), SaveRequest::new(StateAction::Save, principal(0)))
        .unwrap();
    let id = created.content_id;

    let barrier = Arc::new(Barrier::new(THREADS as usize));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                service.check_out(id, principal(i))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);

    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(
            matches!(
                err.kind(),
                ErrorKind::PersistenceConflict | ErrorKind::InvalidStateAction
            ),
            "unexpected error: {}",
            err
        );
    }

    let item = repo.load_item(id).unwrap();
    let history = repo.load_history(id).unwrap();
    assert_eq!(item.lock_owner, winners[0].lock_owner);
    assert!(history.validate(item.current_version_id, item.is_locked()).is_ok());
    assert_eq!(history.len(), 2);
    assert_eq!(history.current_status(), Some(VersionStatus::Locked));
}

// ============================================================================
// Caller-Driven Retry
// ============================================================================

/// Losers reload and try again; every save eventually lands exactly once.
#[test]
fn test_retrying_saves_all_land() {
    let (service, repo) = setup(VersionPolicy::new(VersioningMode::MajorAndMinor, false));
    let created = service
        .create(file("log.txt"), SaveRequest::new(StateAction::Save, principal(0)))
        .unwrap();
    let id = created.content_id;

    let barrier = Arc::new(Barrier::new(THREADS as usize));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                loop {
                    match service.save_and_check_in(id, principal(i)) {
                        Ok(outcome) => return outcome,
                        Err(e) if e.is_retryable() => continue,
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
            })
        })
        .collect();

    let versions: HashSet<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().version)
        .collect();
    assert_eq!(versions.len(), THREADS as usize);

    let item = repo.load_item(id).unwrap();
    let history = repo.load_history(id).unwrap();
    assert!(history.validate(item.current_version_id, item.is_locked()).is_ok());
    // Each check-in drops the draft it supersedes.
    assert_eq!(history.len(), 1);
    assert_eq!(history.current().unwrap().number.to_string(), format!("V0.{}.D", THREADS + 1));
    assert_eq!(service.stats().committed, THREADS + 1);
}

// ============================================================================
// Name Collisions
// ============================================================================

#[test]
fn test_concurrent_creates_get_distinct_names() {
    let (service, repo) = setup(VersionPolicy::default());
    let barrier = Arc::new(Barrier::new(THREADS as usize));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                service
                    .create(file("report.docx"), SaveRequest::new(StateAction::Save, principal(i)))
                    .unwrap()
                    .name
            })
        })
        .collect();

    let names: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let expected: HashSet<String> = std::iter::once("report.docx".to_string())
        .chain((1..THREADS).map(|n| format!("report({}).docx", n)))
        .collect();
    assert_eq!(names, expected);
    assert_eq!(repo.len(), THREADS as usize);
}
