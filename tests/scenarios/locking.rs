//! Check-out locks, forced check-in and multistep saves

use crate::common::*;
use folio::{
    Error, ErrorKind, HistorySource, SaveRequest, StateAction, VersionPolicy, VersioningMode,
};

#[test]
fn foreign_check_in_refused_under_every_policy() {
    for policy in VersionPolicy::ALL {
        let repo = Repo::with_policy(policy);
        let id = repo.create("shared.xlsx");
        repo.service.check_out(id, AUTHOR).unwrap();

        let err = repo.service.check_in(id, APPROVER).unwrap_err();
        assert_eq!(
            err,
            Error::CheckedOutToAnotherPrincipal {
                action: StateAction::CheckIn,
                owner: AUTHOR
            },
            "policy={}",
            policy
        );
        repo.assert_consistent(id);
    }
}

#[test]
fn foreign_undo_needs_force_check_in() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorOnly, false));
    let id = repo.create("shared.xlsx");
    repo.service.check_out(id, AUTHOR).unwrap();

    let err = repo.service.undo_check_out(id, APPROVER).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CheckedOutToAnotherPrincipal);

    let undone = repo.service.undo_check_out(id, ADMIN).unwrap();
    assert_eq!(v(&undone), "V1.0.A");
    assert!(undone.force_refresh);
    assert_eq!(repo.numbers(id), ["V1.0.A"]);
}

#[test]
fn foreign_save_refused_even_for_admin() {
    let repo = Repo::with_policy(VersionPolicy::default());
    let id = repo.create("shared.xlsx");
    repo.service.check_out(id, AUTHOR).unwrap();

    for result in [
        repo.service.save(id, ADMIN),
        repo.service.save_and_check_in(id, ADMIN),
    ] {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::CheckedOutToAnotherPrincipal);
    }
}

#[test]
fn publish_needs_publish_capability() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorAndMinor, false));
    let id = repo.create("draft.md");
    let err = repo.service.publish(id, CONTRIBUTOR).unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(repo.numbers(id), ["V0.1.D"]);
}

#[test]
fn undo_on_unlocked_item_is_a_state_error() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::None, false));
    let id = repo.create("notes.txt");
    let err = repo.service.undo_check_out(id, AUTHOR).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidStateAction);
}

#[test]
fn multistep_save_on_existing_item() {
    let repo = Repo::with_policy(VersionPolicy::new(VersioningMode::MajorAndMinor, false));
    let id = repo.create("upload.zip");

    let opened = repo.service.save_multistep(id, AUTHOR).unwrap();
    assert_eq!(v(&opened), "V0.2.L");
    assert_eq!(opened.lock_owner, Some(AUTHOR));

    for action in [StateAction::CheckOut, StateAction::Publish, StateAction::SaveAndCheckIn] {
        let err = repo
            .service
            .execute(id, SaveRequest::new(action, AUTHOR))
            .unwrap_err();
        assert_eq!(err, Error::MultistepSaveInProgress { action });
    }

    let undone = repo.service.undo_check_out(id, AUTHOR).unwrap();
    assert_eq!(v(&undone), "V0.1.D");
    assert!(!repo.store.load_item(id).unwrap().multistep_in_progress);
    repo.assert_consistent(id);
}
