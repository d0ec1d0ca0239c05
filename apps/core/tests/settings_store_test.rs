use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use quicknav_core::blocklist::BlockList;
use quicknav_core::settings_store::{
    SettingsStore, DEFAULT_SEARCH_STRING, KEY_BLOCKLIST, KEY_SEARCH_STRING,
};

fn unique_store_path(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("quicknav-{label}-{unique}/prefs.json"))
}

#[test]
fn missing_file_opens_empty_and_defaults_are_seeded() {
    let path = unique_store_path("settings-defaults");

    let mut store = SettingsStore::open(path.clone()).unwrap();
    assert_eq!(store.get(KEY_BLOCKLIST), None);

    store.ensure_defaults().unwrap();
    assert_eq!(store.get(KEY_BLOCKLIST), Some("[]"));
    assert_eq!(store.get(KEY_SEARCH_STRING), Some(DEFAULT_SEARCH_STRING));

    // Seeding wrote the file, so a fresh open sees the same values.
    let reopened = SettingsStore::open(path.clone()).unwrap();
    assert_eq!(reopened.get(KEY_SEARCH_STRING), Some(DEFAULT_SEARCH_STRING));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn ensure_defaults_keeps_existing_values() {
    let path = unique_store_path("settings-keep");

    let mut store = SettingsStore::open(path.clone()).unwrap();
    store
        .set(KEY_SEARCH_STRING, "https://example.org/?q={query}")
        .unwrap();
    store.ensure_defaults().unwrap();

    assert_eq!(
        store.get(KEY_SEARCH_STRING),
        Some("https://example.org/?q={query}")
    );

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn set_persists_immediately() {
    let path = unique_store_path("settings-persist");

    let mut store = SettingsStore::open(path.clone()).unwrap();
    store.set("favorite", "calc.exe").unwrap();

    let reopened = SettingsStore::open(path.clone()).unwrap();
    assert_eq!(reopened.get("favorite"), Some("calc.exe"));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn malformed_settings_file_is_a_parse_error() {
    let path = unique_store_path("settings-bad");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{not json").unwrap();

    assert!(SettingsStore::open(path.clone()).is_err());

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn blocklist_round_trips_through_the_store() {
    let path = unique_store_path("settings-blocklist");

    let mut store = SettingsStore::open(path.clone()).unwrap();
    let mut blocklist = BlockList::load(&store);
    assert!(blocklist.is_empty());

    blocklist.add(&mut store, r"C:\Apps\Noisy.exe").unwrap();
    blocklist.add(&mut store, r"c:\tools\other.exe").unwrap();
    assert!(blocklist.matches(r"C:\APPS\NOISY.EXE"));
    assert!(!blocklist.matches(r"c:\apps\paint.exe"));

    let reloaded = BlockList::load(&SettingsStore::open(path.clone()).unwrap());
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.fragments()[0], r"c:\apps\noisy.exe");

    blocklist.clear(&mut store).unwrap();
    let cleared = BlockList::load(&SettingsStore::open(path.clone()).unwrap());
    assert!(cleared.is_empty());

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
