//! Tests for the ownership resolver.

use caravel_core::{Attachment, Profile, Video};
use caravel_error::CaravelErrorKind;
use caravel_pipeline::resolve_ownership;
use caravel_storage::{OwnershipTable, ResourceStore};
use tempfile::TempDir;

fn video(id: &str, title: &str) -> Video {
    Video {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        duration: 60,
        grade: "CP".to_string(),
        keywords: vec![],
        profile: "p1".to_string(),
        creation_date: 1,
        publish_date: 2,
        last_modified: 3,
        schema: 1,
        thumbnail: String::new(),
        attachment: Attachment {
            filename: "v.mp4".to_string(),
            hash: "aaaa".to_string(),
            location: "https://example.org/v.mp4".to_string(),
            mimetype: "video/mp4".to_string(),
            size: 1,
        },
        quarantine: false,
    }
}

fn profile(id: &str, email: &str) -> Profile {
    Profile {
        id: id.to_string(),
        name: "Jean".to_string(),
        bio: String::new(),
        email: email.to_string(),
        schema: 1,
        last_modified: 0,
    }
}

fn fixture(csv: &str) -> (TempDir, ResourceStore, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path().join("cache")).unwrap();
    store.put(&video("v1", "Mon, Super.Vidéo"), false).unwrap();
    store.put(&video("v2", "Une autre vidéo"), false).unwrap();
    store
        .put(&profile("p1", "Jean-Paul.Dupont@example.org"), false)
        .unwrap();
    let csv_path = dir.path().join("video_mapping.csv");
    std::fs::write(&csv_path, csv).unwrap();
    (dir, store, csv_path)
}

#[test]
fn fuzzy_match_resolves_owner_to_username() {
    let (dir, store, csv_path) = fixture(
        "name;email\nMon Super Vidéo!!;Jean-Paul.Dupont@example.org\n",
    );
    let out = dir.path().join("mapping_video_user.json");
    let table = OwnershipTable::load(&out).unwrap();

    let report = resolve_ownership(&store, &csv_path, table).unwrap();
    assert_eq!(report.resolved, 1);
    assert!(report.unknown_owners.is_empty());

    let table = OwnershipTable::load(&out).unwrap();
    assert_eq!(table.owner("v1"), Some("jean.paul.dupont"));
    assert_eq!(table.owner("v2"), None);
}

#[test]
fn unknown_owner_email_is_reported_and_skipped() {
    let (dir, store, csv_path) =
        fixture("name;email\nMon Super Vidéo!!;nobody@example.org\n");
    let out = dir.path().join("mapping_video_user.json");
    let table = OwnershipTable::load(&out).unwrap();

    let report = resolve_ownership(&store, &csv_path, table).unwrap();
    assert_eq!(report.resolved, 0);
    assert_eq!(report.unknown_owners, vec!["nobody@example.org".to_string()]);
}

#[test]
fn row_without_email_is_skipped() {
    let (dir, store, csv_path) = fixture("name;email\nMon Super Vidéo!!;\n");
    let out = dir.path().join("mapping_video_user.json");
    let table = OwnershipTable::load(&out).unwrap();

    let report = resolve_ownership(&store, &csv_path, table).unwrap();
    assert_eq!(report.resolved, 0);
    assert_eq!(report.skipped, 1);
}

#[test]
fn unmatched_title_aborts_the_pass() {
    let (dir, store, csv_path) = fixture(
        "name;email\nTitre inconnu du cache;Jean-Paul.Dupont@example.org\n",
    );
    let out = dir.path().join("mapping_video_user.json");
    let table = OwnershipTable::load(&out).unwrap();

    let err = resolve_ownership(&store, &csv_path, table).unwrap_err();
    assert!(matches!(err.kind(), CaravelErrorKind::Ownership(_)));
}
