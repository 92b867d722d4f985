//! One complete lifecycle per policy bucket

use crate::common::*;
use folio::{ErrorKind, HistorySource, VersionPolicy, VersioningMode};

// ============================================================================
// No Versioning
// ============================================================================

#[test]
fn none_without_approval_keeps_one_version() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::None, false));
    let id = repo.create("readme.txt");
    assert_eq!(repo.numbers(id), ["V1.0.A"]);

    let saved = repo.service.save(id, AUTHOR).unwrap();
    assert_eq!(v(&saved), "V1.0.A");

    let checked_out = repo.service.check_out(id, AUTHOR).unwrap();
    assert_eq!(v(&checked_out), "V2.0.L");
    assert_eq!(repo.numbers(id), ["V1.0.A", "V2.0.L"]);

    let checked_in = repo.service.check_in(id, AUTHOR).unwrap();
    assert_eq!(v(&checked_in), "V2.0.A");
    assert_eq!(checked_in.lock_owner, None);
    assert_eq!(repo.numbers(id), ["V2.0.A"]);
    repo.assert_consistent(id);
}

#[test]
fn none_with_approval_keeps_last_decision() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::None, true));
    let id = repo.create("policy.pdf");
    assert_eq!(repo.numbers(id), ["V1.0.P"]);

    assert_eq!(v(&repo.service.approve(id, APPROVER).unwrap()), "V1.0.A");

    let resubmitted = repo.service.save(id, AUTHOR).unwrap();
    assert_eq!(v(&resubmitted), "V2.0.P");
    assert_eq!(repo.numbers(id), ["V1.0.A", "V2.0.P"]);

    assert_eq!(v(&repo.service.reject(id, APPROVER).unwrap()), "V2.0.R");
    assert_eq!(v(&repo.service.save(id, AUTHOR).unwrap()), "V2.0.P");

    repo.service.check_out(id, AUTHOR).unwrap();
    let checked_in = repo.service.check_in(id, AUTHOR).unwrap();
    assert_eq!(v(&checked_in), "V3.0.P");
    assert_eq!(repo.numbers(id), ["V1.0.A", "V3.0.P"]);

    let approved = repo.service.approve(id, APPROVER).unwrap();
    assert_eq!(v(&approved), "V3.0.A");
    assert_eq!(repo.numbers(id), ["V3.0.A"]);
    repo.assert_consistent(id);
}

// ============================================================================
// Major Versions
// ============================================================================

#[test]
fn major_only_with_approval() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorOnly, true));
    let id = repo.create("contract.docx");
    let first = repo.store.load_item(id).unwrap().current_version_id;

    let rejected = repo.service.reject(id, APPROVER).unwrap();
    assert_eq!(v(&rejected), "V1.0.R");
    assert_eq!(Some(rejected.version_id), first);

    repo.service.check_out(id, AUTHOR).unwrap();
    let checked_in = repo.service.check_in(id, AUTHOR).unwrap();
    assert_eq!(v(&checked_in), "V2.0.P");
    assert_eq!(repo.numbers(id), ["V2.0.P"]);

    assert_eq!(v(&repo.service.approve(id, APPROVER).unwrap()), "V2.0.A");

    assert_eq!(v(&repo.service.save(id, AUTHOR).unwrap()), "V3.0.P");
    assert_eq!(repo.numbers(id), ["V2.0.A", "V3.0.P"]);

    let err = repo.service.publish(id, AUTHOR).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidStateAction);
    repo.assert_consistent(id);
}

#[test]
fn major_only_without_approval_keeps_every_release() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorOnly, false));
    let id = repo.create("logo.svg");
    repo.service.save(id, AUTHOR).unwrap();
    repo.service.save_and_check_in(id, AUTHOR).unwrap();
    repo.service.check_out(id, AUTHOR).unwrap();
    repo.service.check_in(id, AUTHOR).unwrap();

    assert_eq!(repo.numbers(id), ["V1.0.A", "V2.0.A", "V3.0.A", "V4.0.A"]);
    repo.assert_consistent(id);
}

// ============================================================================
// Major and Minor Versions
// ============================================================================

#[test]
fn major_and_minor_without_approval() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorAndMinor, false));
    let id = repo.create("handbook.md");
    assert_eq!(repo.numbers(id), ["V0.1.D"]);

    assert_eq!(v(&repo.service.publish(id, AUTHOR).unwrap()), "V1.0.A");

    repo.service.check_out(id, AUTHOR).unwrap();
    assert_eq!(v(&repo.service.check_in(id, AUTHOR).unwrap()), "V1.1.D");
    assert_eq!(v(&repo.service.save(id, AUTHOR).unwrap()), "V1.2.D");
    assert_eq!(v(&repo.service.publish(id, AUTHOR).unwrap()), "V2.0.A");

    assert_eq!(repo.numbers(id), ["V1.0.A", "V1.1.D", "V2.0.A"]);
    repo.assert_consistent(id);
}

#[test]
fn major_and_minor_with_approval() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorAndMinor, true));
    let id = repo.create("release-notes.md");
    repo.service.save(id, AUTHOR).unwrap();
    repo.service.save(id, AUTHOR).unwrap();
    assert_eq!(repo.numbers(id), ["V0.1.D", "V0.2.D", "V0.3.D"]);

    let submitted = repo.service.publish(id, AUTHOR).unwrap();
    assert_eq!(v(&submitted), "V0.3.P");

    let err = repo.service.approve(id, AUTHOR).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEnoughPermissions);
    assert_eq!(repo.numbers(id), ["V0.1.D", "V0.2.D", "V0.3.P"]);

    let approved = repo.service.approve(id, APPROVER).unwrap();
    assert_eq!(v(&approved), "V1.0.A");
    assert_eq!(approved.deleted, 2);
    assert_eq!(repo.numbers(id), ["V1.0.A"]);
    repo.assert_consistent(id);
}
