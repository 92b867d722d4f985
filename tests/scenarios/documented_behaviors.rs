//! Behaviors kept as they are although they look asymmetric

use crate::common::*;
use folio::{ErrorKind, HistorySource, VersionPolicy, VersioningMode};

/// Check-ins under major-and-minor versioning with approval never prune.
/// Approvals do.
#[test]
fn major_and_minor_check_in_with_approval_keeps_every_draft() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorAndMinor, true));
    let id = repo.create("draft.md");
    for _ in 0..3 {
        repo.service.check_out(id, AUTHOR).unwrap();
        repo.service.check_in(id, AUTHOR).unwrap();
    }
    assert_eq!(repo.numbers(id), ["V0.1.D", "V0.2.P", "V0.3.P", "V0.4.P"]);
    repo.assert_consistent(id);
}

/// Without approval the same check-ins drop the drafts above the last
/// approved version.
#[test]
fn major_and_minor_check_in_without_approval_drops_working_tail() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorAndMinor, false));
    let id = repo.create("draft.md");
    for _ in 0..3 {
        repo.service.check_out(id, AUTHOR).unwrap();
        repo.service.check_in(id, AUTHOR).unwrap();
    }
    assert_eq!(repo.numbers(id), ["V0.4.D"]);

    repo.service.publish(id, AUTHOR).unwrap();
    repo.service.check_out(id, AUTHOR).unwrap();
    repo.service.check_in(id, AUTHOR).unwrap();
    repo.service.check_out(id, AUTHOR).unwrap();
    repo.service.check_in(id, AUTHOR).unwrap();
    assert_eq!(repo.numbers(id), ["V1.0.A", "V1.2.D"]);
    repo.assert_consistent(id);
}

/// The modes with only a major line prune the working tail on check-in.
#[test]
fn major_only_check_in_prunes_working_tail() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorOnly, true));
    let id = repo.create("draft.md");
    for _ in 0..3 {
        repo.service.check_out(id, AUTHOR).unwrap();
        repo.service.check_in(id, AUTHOR).unwrap();
    }
    assert_eq!(repo.numbers(id), ["V4.0.P"]);
}

/// Publishing straight from a check-out is only offered under
/// major-and-minor versioning.
#[test]
fn publish_from_check_out_only_under_major_and_minor() {
    for policy in VersionPolicy::ALL {
        let repo = Repo::with_policy(policy);
        let id = repo.create("page.html");
        repo.service.check_out(id, AUTHOR).unwrap();

        let result = repo.service.publish(id, AUTHOR);
        if policy.mode == VersioningMode::MajorAndMinor {
            let outcome = result.unwrap();
            assert_eq!(outcome.lock_owner, None);
        } else {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidStateAction);
        }
        repo.assert_consistent(id);
    }
}

/// Renaming on collision is the only retry the service performs.
#[test]
fn name_collisions_are_renamed() {
    let repo = Repo::with_policy(VersionPolicy::default());
    repo.create("report.docx");
    let second = repo.create("report.docx");
    let third = repo.create("report.docx");

    assert_eq!(repo.store.load_item(second).unwrap().name, "report(1).docx");
    assert_eq!(repo.store.load_item(third).unwrap().name, "report(2).docx");
}
