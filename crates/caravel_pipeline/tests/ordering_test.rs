//! Tests for canonical push ordering.

use caravel_core::{Attachment, Comment, Video};
use caravel_pipeline::ordered_records;
use caravel_storage::ResourceStore;
use tempfile::TempDir;

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

fn comment(id: &str, last_modified: i64) -> Comment {
    Comment {
        id: id.to_string(),
        video: "v1".to_string(),
        profile: "p1".to_string(),
        comment: "Bravo !".to_string(),
        schema: 1,
        last_modified,
        attachment: None,
    }
}

#[test]
fn videos_ordered_by_publish_date() {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path()).unwrap();
    store.put(&video("b", 300), false).unwrap();
    store.put(&video("a", 100), false).unwrap();
    store.put(&video("c", 200), false).unwrap();

    let ordered: Vec<Video> = ordered_records(&store).unwrap();
    let ids: Vec<&str> = ordered.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["a", "c", "b"]);
}

#[test]
fn comments_ordered_by_last_modified() {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path()).unwrap();
    store.put(&comment("c3", 30), false).unwrap();
    store.put(&comment("c1", 10), false).unwrap();
    store.put(&comment("c2", 20), false).unwrap();

    let ordered: Vec<Comment> = ordered_records(&store).unwrap();
    let ids: Vec<&str> = ordered.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c1", "c2", "c3"]);
}

#[test]
fn ties_break_by_source_id_for_deterministic_retries() {
    let dir = TempDir::new().unwrap();
    let store = ResourceStore::new(dir.path()).unwrap();
    store.put(&comment("z", 10), false).unwrap();
    store.put(&comment("a", 10), false).unwrap();
    store.put(&comment("m", 10), false).unwrap();

    let first: Vec<Comment> = ordered_records(&store).unwrap();
    let second: Vec<Comment> = ordered_records(&store).unwrap();
    let ids: Vec<&str> = first.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["a", "m", "z"]);
    assert_eq!(
        ids,
        second.iter().map(|c| c.id.as_str()).collect::<Vec<_>>()
    );
}
