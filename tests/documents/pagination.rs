//! Cursor-backed slices and in-memory pages.

use docmeta::{Document, DocumentError, PageRequest};

use crate::support::{now, seed_owner, service};

#[test]
fn list_by_owner_walks_to_the_last_page() {
    let service = service();
    seed_owner(&service, 42, "doc", 5);
    seed_owner(&service, 43, "noise", 3);

    let first = service
        .list_by_owner(42, PageRequest::of(0, 2).unwrap())
        .unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.has_next);

    let second = service
        .list_by_owner(42, first.next_page_request().unwrap())
        .unwrap();
    assert_eq!(second.len(), 2);
    assert!(second.has_next);

    let third = service
        .list_by_owner(42, second.next_page_request().unwrap())
        .unwrap();
    assert_eq!(third.len(), 1);
    assert!(!third.has_next);
    assert!(third.next_page_request().is_none());

    let seen: Vec<_> = [first, second, third]
        .iter()
        .flat_map(|s| s.content.iter().map(|d| d.id.clone()))
        .collect();
    assert_eq!(seen, ["doc-0", "doc-1", "doc-2", "doc-3", "doc-4"]);
}

#[test]
fn list_by_owner_resumes_from_cursor() {
    let service = service();
    seed_owner(&service, 42, "doc", 5);

    let first = service.list_by_owner(42, PageRequest::first(2).unwrap()).unwrap();
    let token = first.cursor.as_ref().unwrap().encode().unwrap();
    service.store().reset_counts();

    let second = service
        .list_by_owner_after(42, &token, first.next_page_request().unwrap())
        .unwrap();
    let ids: Vec<_> = second.content.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["doc-2", "doc-3"]);
    assert_eq!(second.request.page(), 1);
    assert_eq!(service.store().query_count(), 1);
}

#[test]
fn exact_multiple_has_no_trailing_page() {
    let service = service();
    seed_owner(&service, 42, "doc", 4);

    let last = service
        .list_by_owner(42, PageRequest::of(1, 2).unwrap())
        .unwrap();
    assert_eq!(last.len(), 2);
    assert!(!last.has_next);
}

#[test]
fn list_by_owner_skips_documents_without_creation_time() {
    let service = service();
    seed_owner(&service, 42, "doc", 2);
    service.save(&Document::new("undated", 42, 1, 1)).unwrap();

    let all = service
        .list_by_owner(42, PageRequest::first(10).unwrap())
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.content.iter().all(|d| d.id != "undated"));
}

#[test]
fn zero_page_size_is_rejected() {
    assert!(matches!(
        PageRequest::of(0, 0),
        Err(DocumentError::Validation(_))
    ));
}

#[test]
fn updated_by_pages_add_up_to_the_total() {
    let service = service();
    let at = now();
    for i in 0..7 {
        let editor = if i % 3 == 0 { "carol" } else { "dave" };
        let doc = Document::new(format!("u{}", i), 11, 1, 1)
            .created(at, "seeder")
            .updated(at, editor);
        service.save(&doc).unwrap();
    }

    for size in 1..=6 {
        let first = service
            .list_by_owner_and_updated_by(11, "dave", PageRequest::first(size).unwrap())
            .unwrap();
        assert_eq!(first.total_elements, 4);
        assert_eq!(first.total_pages(), 4usize.div_ceil(size));

        let mut collected = first.content.len();
        let mut page = first;
        while let Some(next) = page.next_page_request() {
            page = service
                .list_by_owner_and_updated_by(11, "dave", next)
                .unwrap();
            collected += page.content.len();
        }
        assert_eq!(collected, 4);
        assert!(!page.has_next());
        assert!(page.is_last());
        assert_eq!(page.request.page() + 1, page.total_pages());
    }
}

#[test]
fn updated_by_page_past_the_end_is_empty() {
    let service = service();
    let at = now();
    service
        .save(&Document::new("u0", 11, 1, 1).created(at, "seeder").updated(at, "dave"))
        .unwrap();

    let page = service
        .list_by_owner_and_updated_by(11, "dave", PageRequest::of(3, 5).unwrap())
        .unwrap();
    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 1);
    assert!(!page.has_next());
}

#[test]
fn updated_by_with_no_matches_has_zero_pages() {
    let service = service();
    let page = service
        .list_by_owner_and_updated_by(11, "nobody", PageRequest::first(3).unwrap())
        .unwrap();
    assert_eq!(page.total_elements, 0);
    assert_eq!(page.total_pages(), 0);
    assert!(page.is_last());
}

#[test]
fn updated_by_last_representable_page_is_empty_and_final() {
    let service = service();
    let at = now();
    service
        .save(&Document::new("u0", 11, 1, 1).created(at, "seeder").updated(at, "dave"))
        .unwrap();

    let page = service
        .list_by_owner_and_updated_by(11, "dave", PageRequest::of(usize::MAX, 2).unwrap())
        .unwrap();
    assert!(page.content.is_empty());
    assert!(!page.has_next());
    assert_eq!(page.next_page_request(), None);
}
