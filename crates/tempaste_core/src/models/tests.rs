//! Model-level unit tests.

use super::paste::*;
use chrono::{TimeZone, Utc};

fn sample_paste() -> Paste {
    Paste {
        id: "6b1f3c1e-2f0a-4d7e-9a57-0c3f1b1f9d11".to_string(),
        content: vec!["a".to_string(), "b".to_string()],
        name: Some("notes".to_string()),
        file_type: "plaintext".to_string(),
        expires_at: Utc.with_ymd_and_hms(2026, 11, 2, 8, 30, 15).unwrap(),
        access_key: "k".repeat(25),
    }
}

#[test]
fn view_excludes_id_and_access_key() {
    let value = serde_json::to_value(sample_paste().view()).expect("serialize view");
    let object = value.as_object().expect("object");
    assert!(!object.contains_key("id"));
    assert!(!object.contains_key("accessKey"));
    assert_eq!(value["content"], serde_json::json!(["a", "b"]));
    assert_eq!(value["name"], "notes");
    assert_eq!(value["fileType"], "plaintext");
    assert_eq!(value["expiresAt"], "2026-11-02 08:30:15 UTC");
}

#[test]
fn view_omits_missing_name() {
    let mut paste = sample_paste();
    paste.name = None;
    let value = serde_json::to_value(paste.view()).expect("serialize view");
    assert!(value.get("name").is_none());
}

#[test]
fn created_response_carries_key_and_readable_expiry() {
    let paste = sample_paste();
    let value = serde_json::to_value(CreatedPaste::from(&paste)).expect("serialize");
    assert_eq!(value["id"], paste.id.as_str());
    assert_eq!(value["accessKey"], paste.access_key.as_str());
    assert_eq!(value["expiresAt"], "2026-11-02 08:30:15 UTC");
}

#[test]
fn edited_response_has_no_access_key() {
    let value = serde_json::to_value(EditedPaste::from(&sample_paste())).expect("serialize");
    assert!(value.get("accessKey").is_none());
    assert_eq!(value["expiresAt"], "2026-11-02 08:30:15 UTC");
}

#[test]
fn expiry_boundary_counts_as_expired() {
    let paste = sample_paste();
    assert!(!paste.is_expired(paste.expires_at - chrono::Duration::seconds(1)));
    assert!(paste.is_expired(paste.expires_at));
    assert!(paste.view().is_expired(paste.expires_at));
    assert!(paste.key_projection().is_expired(paste.expires_at));
}

#[test]
fn bincode_round_trip_preserves_row() {
    let paste = sample_paste();
    let bytes = bincode::serialize(&paste).expect("encode");
    let decoded: Paste = bincode::deserialize(&bytes).expect("decode");
    assert_eq!(decoded, paste);
}
