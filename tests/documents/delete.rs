//! Idempotent deletes.

use docmeta::Document;

use crate::support::service;

#[test]
fn deleting_missing_id_succeeds() {
    let service = service();
    service.delete("never-existed").unwrap();
    assert_eq!(service.get_by_id("never-existed").unwrap(), None);
}

#[test]
fn deleting_twice_succeeds_both_times() {
    let service = service();
    service.save(&Document::new("d1", 7, 10, 20)).unwrap();

    service.delete("d1").unwrap();
    service.delete("d1").unwrap();
    assert_eq!(service.get_by_id("d1").unwrap(), None);
    assert!(service
        .list_by_owner_and_categories_in(7, &[10])
        .unwrap()
        .is_empty());
}

#[test]
fn delete_ignores_the_version() {
    let service = service();
    let v1 = service.save(&Document::new("d1", 7, 10, 20)).unwrap();
    service.save(&v1).unwrap();

    service.delete(&v1.id).unwrap();
    assert_eq!(service.get_by_id("d1").unwrap(), None);

    let err = service.save(&v1).unwrap_err();
    assert!(err.is_conflict());
}

#[test]
fn deleted_id_can_be_created_again_from_version_one() {
    let service = service();
    let v1 = service.save(&Document::new("d1", 7, 10, 20)).unwrap();
    service.save(&v1).unwrap();
    service.delete("d1").unwrap();

    let again = service.save(&Document::new("d1", 8, 11, 21)).unwrap();
    assert_eq!(again.version, Some(1));
    assert_eq!(service.get_by_id("d1").unwrap().unwrap().owner_id, 8);
}
