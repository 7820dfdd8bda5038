use mirrormap::MirrorMap;
use serde_json::json;

fn open_in(dir: &tempfile::TempDir, token: &str) -> MirrorMap {
    MirrorMap::open_at(token, dir.path().join(token)).unwrap()
}

// ---- structured formats -----------------------------------------------------

fn round_trip_structured(token: &str) {
    let dir = tempfile::tempdir().unwrap();
    let nested = json!({
        "safelist": {"member_01": {"ids": [11, 12, 13]}},
        "enabled": true,
        "ratio": 0.5,
    });
    {
        let mut map = open_in(&dir, token);
        map.set("test", true);
        map.set("users", nested.clone());
    }

    let mut reopened = open_in(&dir, token);
    assert_eq!(reopened.get("test").unwrap(), json!(true));
    assert_eq!(reopened.get("users").unwrap(), nested);
}

#[test]
fn yaml_round_trips_nested_values() {
    round_trip_structured("conf.yaml");
}

#[test]
fn json_round_trips_nested_values() {
    round_trip_structured("conf.json");
}

#[test]
fn messagepack_round_trips_nested_values() {
    round_trip_structured("conf.binary");
}

// ---- xml --------------------------------------------------------------------

#[test]
fn xml_round_trips_flat_strings() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut map = open_in(&dir, "flags.xml");
        map.set("test", "True");
        map.set("mode", "fast");
    }

    let mut reopened = open_in(&dir, "flags.xml");
    assert_eq!(reopened.get("test").unwrap(), json!("True"));
    assert_eq!(reopened.get("mode").unwrap(), json!("fast"));
}

#[test]
fn xml_erodes_scalars_to_text() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut map = open_in(&dir, "flags.xml");
        map.set("count", 1);
        map.set("on", true);
    }

    let mut reopened = open_in(&dir, "flags.xml");
    assert_eq!(reopened.get("count").unwrap(), json!("1"));
    assert_eq!(reopened.get("on").unwrap(), json!("true"));
}

#[test]
fn xml_folds_list_items_under_a_wrapper() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut map = open_in(&dir, "lists.xml");
        map.set("ids", json!([11, 12, 13]));
    }

    let mut reopened = open_in(&dir, "lists.xml");
    assert_eq!(
        reopened.get("ids").unwrap(),
        json!({"item": ["11", "12", "13"]})
    );
}

#[test]
fn xml_nested_mapping_comes_back_as_text_leaves() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut map = open_in(&dir, "tree.xml");
        map.set("users", json!({"safelist": {"member_01": {"ids": [11, 12, 13]}}}));
    }

    let mut reopened = open_in(&dir, "tree.xml");
    assert_eq!(
        reopened.get("users").unwrap(),
        json!({"safelist": {"member_01": {"ids": {"item": ["11", "12", "13"]}}}})
    );
}

#[test]
fn xml_file_wraps_entries_in_a_root_element() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.xml");
    let mut map = MirrorMap::open_at("doc.xml", &path).unwrap();
    map.set("mode", "fast");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("<?xml"));
    assert!(raw.contains("<root><mode>fast</mode></root>"));
}

// ---- csv --------------------------------------------------------------------

#[test]
fn csv_round_trips_flat_strings() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut map = open_in(&dir, "flags.csv");
        map.set("test", "True");
        map.set("mode", "fast");
    }

    let mut reopened = open_in(&dir, "flags.csv");
    assert_eq!(reopened.get("test").unwrap(), json!("True"));
    assert_eq!(reopened.get("mode").unwrap(), json!("fast"));
}

#[test]
fn csv_stringifies_everything_else() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut map = open_in(&dir, "audit.csv");
        map.set("count", 7);
        map.set("cfg", json!({"a": 1}));
    }

    let mut reopened = open_in(&dir, "audit.csv");
    assert_eq!(reopened.get("count").unwrap(), json!("7"));
    assert_eq!(reopened.get("cfg").unwrap(), json!(r#"{"a":1}"#));
}

#[test]
fn csv_quotes_embedded_commas() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut map = open_in(&dir, "notes.csv");
        map.set("note", "a, b and \"c\"");
    }

    let mut reopened = open_in(&dir, "notes.csv");
    assert_eq!(reopened.get("note").unwrap(), json!("a, b and \"c\""));
}

// ---- json on disk -----------------------------------------------------------

#[test]
fn json_files_are_written_with_sorted_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let mut map = MirrorMap::open_at("prefs.json", &path).unwrap();
    map.set("b", 1);
    map.set("a", 2);
    map.set("c", 3);

    let raw = std::fs::read_to_string(&path).unwrap();
    let a = raw.find("\"a\"").unwrap();
    let b = raw.find("\"b\"").unwrap();
    let c = raw.find("\"c\"").unwrap();
    assert!(a < b && b < c);

    // enumeration order is still insertion order
    assert_eq!(map.keys(), ["b", "a", "c"]);
}

#[test]
fn users_file_matches_an_independent_parse() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    let mut map = MirrorMap::open_at("users.json", &path).unwrap();
    map.set("Users", json!({"safelist": {"member_01": {"ids": [11, 12, 13]}}}));

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        parsed,
        json!({"Users": {"safelist": {"member_01": {"ids": [11, 12, 13]}}}})
    );
}

// ---- yaml on disk -----------------------------------------------------------

#[test]
fn yaml_file_is_a_plain_mapping_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.yaml");
    let mut map = MirrorMap::open_at("plain.yaml", &path).unwrap();
    map.set("greeting", "hello");
    map.set("answer", 42);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("greeting: hello"));
    assert!(raw.contains("answer: 42"));
}

// ---- write-through ----------------------------------------------------------

#[test]
fn every_set_lands_on_disk_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wt.yaml");
    let mut map = MirrorMap::open_at("wt.yaml", &path).unwrap();

    assert!(!path.exists());
    map.set("one", 1);
    let first = std::fs::read(&path).unwrap();
    assert!(!first.is_empty());

    map.set("two", 2);
    let second = std::fs::read(&path).unwrap();
    assert_ne!(first, second);
}

#[test]
fn update_persists_every_pair() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut map = open_in(&dir, "bulk.binary");
        map.update([("a", json!(1)), ("b", json!([1, 2]))]);
    }

    let mut reopened = open_in(&dir, "bulk.binary");
    assert_eq!(reopened.get("a").unwrap(), json!(1));
    assert_eq!(reopened.get("b").unwrap(), json!([1, 2]));
}
