use chrono::{Duration, Utc};
use lockbox_model::codec;
use lockbox_model::{
    Card, Entry, File, ModelError, NEVER_EXPIRES, Note, Record, RecordKind, RecordView,
};
use pretty_assertions::assert_eq;

fn sample_entry() -> Entry {
    Entry {
        title: "github".into(),
        username: "octocat".into(),
        password: "hunter2".into(),
        url: "https://github.com".into(),
        notes: "2fa enabled".into(),
        expires: NEVER_EXPIRES.into(),
    }
}

fn sample_card() -> Card {
    Card {
        name: "visa".into(),
        card_type: "credit".into(),
        number: "4111 1111 1111 1111".into(),
        security_code: "123".into(),
        expire_date: "12/30".into(),
        notes: String::new(),
    }
}

// ── Round trips ──────────────────────────────────────────────────

#[test]
fn entry_roundtrip() {
    let entry = sample_entry();
    let bytes = entry.encode().unwrap();
    assert_eq!(Entry::decode(&bytes).unwrap(), entry);
}

#[test]
fn file_roundtrip() {
    let file = File {
        name: "test".into(),
        content: vec![0x1f, 0x8b, 0x08, 0x00, 0xff],
        created_at: 0,
    };
    let bytes = file.encode().unwrap();
    assert_eq!(File::decode(&bytes).unwrap(), file);
}

#[test]
fn note_and_card_roundtrip() {
    let note = Note {
        name: "wifi".into(),
        text: "ssid: home\npsk: ✓✓✓".into(),
    };
    assert_eq!(Note::decode(&note.encode().unwrap()).unwrap(), note);

    let card = sample_card();
    assert_eq!(Card::decode(&card.encode().unwrap()).unwrap(), card);
}

#[test]
fn encoding_starts_with_kind_tag() {
    let bytes = sample_entry().encode().unwrap();
    assert_eq!(bytes[0], RecordKind::Entry.tag());
}

#[test]
fn encoding_is_allocated_once() {
    let file = File {
        name: "disk.img".into(),
        content: vec![0xab; 64 * 1024],
        created_at: 1,
    };
    let bytes = file.encode().unwrap();
    assert_eq!(bytes.capacity(), bytes.len());
}

// ── Rejection ────────────────────────────────────────────────────

#[test]
fn zero_bytes_are_rejected() {
    let zeros = [0u8; 64];
    assert!(matches!(File::decode(&zeros), Err(ModelError::Decode(_))));
    assert!(matches!(File::decode_view(&zeros), Err(ModelError::Decode(_))));
    assert!(matches!(Entry::decode(&zeros), Err(ModelError::Decode(_))));
}

#[test]
fn empty_payload_is_rejected() {
    assert!(matches!(Note::decode(&[]), Err(ModelError::Decode(_))));
}

#[test]
fn payload_of_another_type_is_rejected() {
    let bytes = sample_entry().encode().unwrap();
    assert!(matches!(File::decode(&bytes), Err(ModelError::Decode(_))));
    assert!(matches!(Card::decode(&bytes), Err(ModelError::Decode(_))));
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = Note::default().encode().unwrap();
    bytes.push(0);
    assert!(matches!(Note::decode(&bytes), Err(ModelError::Decode(_))));
}

#[test]
fn truncated_payload_is_rejected() {
    let bytes = sample_entry().encode().unwrap();
    let cut = &bytes[..bytes.len() - 3];
    assert!(matches!(Entry::decode(cut), Err(ModelError::Decode(_))));
}

#[test]
fn huge_length_prefix_is_rejected_without_allocating() {
    let mut bytes = vec![RecordKind::Note.tag()];
    bytes.extend_from_slice(&u64::MAX.to_le_bytes());
    assert!(matches!(Note::decode(&bytes), Err(ModelError::Decode(_))));
}

#[test]
fn raw_codec_tag_check() {
    let bytes = codec::encode(RecordKind::Card, &sample_card()).unwrap();
    let result: Result<Card, _> = codec::decode(RecordKind::Note, &bytes);
    assert!(matches!(result, Err(ModelError::Decode(_))));
}

// ── Views ────────────────────────────────────────────────────────

#[test]
fn file_view_matches_projection() {
    let file = File {
        name: "backup.tar.gz".into(),
        content: vec![7u8; 4096],
        created_at: 1_700_000_000,
    };
    let view = File::decode_view(&file.encode().unwrap()).unwrap();
    assert_eq!(view, file.project());
    assert_eq!(view.size, 4096);
    assert_eq!(view.name(), "backup.tar.gz");
}

#[test]
fn entry_view_drops_secrets() {
    let view = Entry::decode_view(&sample_entry().encode().unwrap()).unwrap();
    assert_eq!(view.name(), "github");
    assert_eq!(view.username, "octocat");
    assert!(!format!("{view:?}").contains("hunter2"));
}

#[test]
fn card_view_drops_number() {
    let view = sample_card().project();
    assert_eq!(view.name(), "visa");
    assert!(!format!("{view:?}").contains("4111"));
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn entry_requires_title() {
    let entry = Entry {
        title: "  ".into(),
        ..sample_entry()
    };
    assert!(matches!(entry.validate(), Err(ModelError::Validation(_))));
}

#[test]
fn entry_rejects_unparseable_expiry() {
    let entry = Entry {
        expires: "next tuesday".into(),
        ..sample_entry()
    };
    assert!(matches!(entry.validate(), Err(ModelError::Validation(_))));
}

#[test]
fn entry_expiry() {
    let now = Utc::now();
    let past = Entry {
        expires: (now - Duration::days(1)).to_rfc3339(),
        ..sample_entry()
    };
    let future = Entry {
        expires: (now + Duration::days(1)).to_rfc3339(),
        ..sample_entry()
    };
    assert!(past.is_expired(now));
    assert!(!future.is_expired(now));
    assert!(!sample_entry().is_expired(now));
    assert!(past.validate().is_ok());
}

#[test]
fn card_number_must_be_numeric() {
    let card = Card {
        number: "4111-abcd".into(),
        ..sample_card()
    };
    assert!(matches!(card.validate(), Err(ModelError::Validation(_))));
    assert!(sample_card().validate().is_ok());
}

#[test]
fn set_name_changes_primary_key() {
    let mut entry = sample_entry();
    entry.set_name("gitlab".into());
    assert_eq!(entry.name(), "gitlab");
    assert_eq!(entry.title, "gitlab");
}

#[test]
fn file_new_stamps_creation_time() {
    let before = Utc::now().timestamp();
    let file = File::new("a", vec![1, 2, 3]);
    assert!(file.created_at >= before);
    assert!(file.created_at_utc().is_some());
}
