//! Tests for the identity mapping store and ownership table.

use caravel_storage::{MappingStore, OwnershipTable};
use tempfile::TempDir;

const STAGING: &str = "https://staging.example.org/api/v1";
const PRODUCTION: &str = "https://peertube.example.org/api/v1";

#[test]
fn set_then_get_roundtrips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapping.json");

    let mut mapping = MappingStore::open(&path, STAGING).unwrap();
    assert!(!mapping.contains("vid1"));
    assert!(mapping.get("vid1").is_err());

    mapping.set("vid1", "uuid-1").unwrap();
    assert!(mapping.contains("vid1"));
    assert_eq!(mapping.get("vid1").unwrap(), "uuid-1");
}

#[test]
fn entries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapping.json");

    {
        let mut mapping = MappingStore::open(&path, STAGING).unwrap();
        mapping.set("vid1", "uuid-1").unwrap();
    }

    let mapping = MappingStore::open(&path, STAGING).unwrap();
    assert!(mapping.contains("vid1"));
    assert_eq!(mapping.get("vid1").unwrap(), "uuid-1");
}

#[test]
fn endpoints_are_isolated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapping.json");

    {
        let mut staging = MappingStore::open(&path, STAGING).unwrap();
        staging.set("vid1", "staging-uuid").unwrap();
    }

    // A production-scoped store over the same file sees nothing, and its
    // writes leave the staging scope untouched.
    let mut production = MappingStore::open(&path, PRODUCTION).unwrap();
    assert!(!production.contains("vid1"));
    production.set("vid1", "production-uuid").unwrap();

    let staging = MappingStore::open(&path, STAGING).unwrap();
    assert_eq!(staging.get("vid1").unwrap(), "staging-uuid");
}

#[test]
fn ownership_table_roundtrips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapping_video_user.json");

    let mut table = OwnershipTable::load(&path).unwrap();
    assert!(table.is_empty());
    table.insert("vid1", "jean.paul.dupont");
    table.write().unwrap();

    let table = OwnershipTable::load(&path).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.owner("vid1"), Some("jean.paul.dupont"));
    assert_eq!(table.owner("vid2"), None);
}
