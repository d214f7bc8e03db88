//! Tests for the local resource store.

use caravel_core::{Attachment, Comment, Profile, Video};
use caravel_storage::ResourceStore;
use tempfile::TempDir;

fn attachment(hash: &str, filename: &str) -> Attachment {
    Attachment {
        filename: filename.to_string(),
        hash: hash.to_string(),
        location: format!("https://files.example.org/{filename}"),
        mimetype: "video/mp4".to_string(),
        size: 10,
    }
}

fn video(id: &str, publish_date: i64) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {id}"),
        description: String::new(),
        duration: 60,
        grade: "CP".to_string(),
        keywords: vec![],
        profile: "p1".to_string(),
        creation_date: 1,
        publish_date,
        last_modified: 2,
        schema: 1,
        thumbnail: String::new(),
        attachment: attachment("aaaa", "a.mp4"),
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

#[test]
fn put_then_list_roundtrips_records() {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path()).unwrap();

    assert!(store.put(&video("v1", 10), false).unwrap());
    assert!(store.put(&video("v2", 20), false).unwrap());
    assert!(store.put(&profile("p1", "p@example.org"), false).unwrap());

    let mut videos: Vec<Video> = store.list().unwrap().map(|r| r.unwrap()).collect();
    videos.sort_by_key(|v| v.publish_date);
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].id, "v1");
    assert_eq!(videos[1].id, "v2");

    // Listing one kind does not see the others.
    let profiles: Vec<Profile> = store.list().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(profiles.len(), 1);
    let comments: Vec<Comment> = store.list().unwrap().map(|r| r.unwrap()).collect();
    assert!(comments.is_empty());
}

#[test]
fn put_is_idempotent_unless_forced() {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path()).unwrap();

    let mut v = video("v1", 10);
    assert!(store.put(&v, false).unwrap());

    // Without force the cached record wins.
    v.title = "Renamed".to_string();
    assert!(!store.put(&v, false).unwrap());
    let cached: Vec<Video> = store.list().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(cached[0].title, "Video v1");

    // Force replaces the whole record.
    assert!(store.put(&v, true).unwrap());
    let cached: Vec<Video> = store.list().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(cached[0].title, "Renamed");
}

#[test]
fn attachments_are_content_addressed() {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path()).unwrap();

    // Identical content hash, different filenames: one cache path.
    let a = attachment("cafe01", "photo de classe.jpg");
    let b = attachment("cafe01", "copy.jpg");
    assert_eq!(store.attachment_path(&a), store.attachment_path(&b));

    let c = attachment("beef02", "photo de classe.jpg");
    assert_ne!(store.attachment_path(&a), store.attachment_path(&c));
}

#[test]
fn record_and_thumbnail_paths_are_stable() {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path()).unwrap();

    assert!(
        store
            .record_path::<Video>("v1")
            .ends_with("video/v1-meta")
    );
    assert!(store.thumbnail_path("v1").ends_with("video/v1-thumbnail"));
}

#[test]
fn thumbnails_do_not_pollute_record_listing() {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path()).unwrap();
    store.put(&video("v1", 10), false).unwrap();
    std::fs::write(store.thumbnail_path("v1"), b"not json").unwrap();

    let videos: Vec<Video> = store.list().unwrap().map(|r| r.unwrap()).collect();
    assert_eq!(videos.len(), 1);
}
