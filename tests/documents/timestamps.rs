//! Timestamp precision through the codec and the store.

use chrono::{DateTime, TimeZone, Utc};
use docmeta::{timestamp, Document};

use crate::support::service;

fn samples() -> Vec<DateTime<Utc>> {
    vec![
        Utc.timestamp_opt(0, 0).unwrap(),
        Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap(),
        Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap(),
        Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap(),
        Utc.timestamp_opt(1_700_000_000, 1).unwrap(),
        Utc.timestamp_opt(-86_400, 500_000_000).unwrap(),
    ]
}

#[test]
fn codec_round_trips_every_precision() {
    for ts in samples() {
        let encoded = timestamp::encode(Some(&ts));
        assert_eq!(timestamp::decode(&encoded).unwrap(), Some(ts));
    }
    let null = timestamp::encode(None);
    assert!(null.is_null());
    assert_eq!(timestamp::decode(&null).unwrap(), None);
}

#[test]
fn stored_documents_keep_full_precision() {
    let service = service();
    for (i, ts) in samples().into_iter().enumerate() {
        let id = format!("ts-{}", i);
        let saved = service
            .save(&Document::new(id.clone(), 1, 1, 1).created(ts, "clock").updated(ts, "clock"))
            .unwrap();
        let loaded = service.get_by_id(&id).unwrap().unwrap();
        assert_eq!(loaded.created_at, Some(ts));
        assert_eq!(loaded.updated_at, Some(ts));
        assert_eq!(loaded, saved);
    }

    service.save(&Document::new("no-times", 1, 1, 1)).unwrap();
    let loaded = service.get_by_id("no-times").unwrap().unwrap();
    assert_eq!(loaded.created_at, None);
    assert_eq!(loaded.updated_at, None);
}

#[test]
fn encoded_form_is_utc_iso8601() {
    let ts = Utc.timestamp_opt(1_700_000_000, 120_000_000).unwrap();
    assert_eq!(timestamp::format(&ts), "2023-11-14T22:13:20.120Z");
    assert_eq!(
        timestamp::format(&Utc.timestamp_opt(0, 0).unwrap()),
        "1970-01-01T00:00:00Z"
    );
}
