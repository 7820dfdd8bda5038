use mirrormap::{Error, Format, MirrorMap};
use serde_json::json;

// ---- missing and empty files ------------------------------------------------

#[test]
fn missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.yaml");
    let map = MirrorMap::open_at("fresh.yaml", &path).unwrap();
    assert!(map.is_empty());
    assert!(!path.exists());
}

#[test]
fn empty_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    for format in Format::ALL {
        let token = format!("store.{format}");
        let path = dir.path().join(&token);
        std::fs::write(&path, b"").unwrap();

        let map = MirrorMap::open_at(&token, &path).unwrap();
        assert!(map.is_empty(), "{format} should treat an empty file as empty");
    }
}

// ---- malformed files --------------------------------------------------------

#[test]
fn malformed_file_starts_empty_and_is_left_intact() {
    let garbage: &[u8] = b"\x00\x01\xff not a mapping {{{";
    let dir = tempfile::tempdir().unwrap();
    for format in Format::ALL {
        let token = format!("store.{format}");
        let path = dir.path().join(&token);
        std::fs::write(&path, garbage).unwrap();

        let map = MirrorMap::open_at(&token, &path).unwrap();
        assert!(map.is_empty(), "{format} should shrug off garbage");
        // the file is only replaced once something is written
        assert_eq!(std::fs::read(&path).unwrap(), garbage);
    }
}

#[test]
fn first_write_replaces_a_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let mut map = MirrorMap::open_at("broken.json", &path).unwrap();
    map.set("fixed", true);

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, json!({"fixed": true}));
}

// ---- unwritable destinations ------------------------------------------------

#[test]
fn failed_write_through_keeps_the_memory_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-subdir").join("state.json");

    let mut map = MirrorMap::open_at("state.json", &path).unwrap();
    map.set("a", 1);
    map.set("b", 2);

    assert_eq!(map.get("a").unwrap(), json!(1));
    assert_eq!(map.get("b").unwrap(), json!(2));
    assert!(!path.exists());
    assert!(matches!(map.store(), Err(Error::Io(_))));
}

// ---- atomic replacement -----------------------------------------------------

#[test]
fn no_temp_file_is_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clean.json");
    let mut map = MirrorMap::open_at("clean.json", &path).unwrap();
    map.set("a", 1);

    assert!(path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn rewrite_is_total_not_incremental() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total.csv");
    let mut map = MirrorMap::open_at("total.csv", &path).unwrap();
    map.set("a", "1");
    map.set("b", "2");
    map.set("a", "override");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.matches("a,").count(), 1);
}
