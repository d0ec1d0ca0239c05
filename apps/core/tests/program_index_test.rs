use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use quicknav_core::blocklist::BlockList;
use quicknav_core::platform::{RegistryProgram, StubOs};
use quicknav_core::program_index::ProgramIndexer;
use quicknav_core::settings_store::SettingsStore;

fn registry_program(name: &str, icon: &str) -> RegistryProgram {
    RegistryProgram {
        display_name: name.to_string(),
        display_icon: icon.to_string(),
        ..RegistryProgram::default()
    }
}

fn unique_temp_dir(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("quicknav-{label}-{unique}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn registry_entries_are_filtered_and_normalized() {
    let os = StubOs {
        programs: vec![
            registry_program("Zed Editor", r"C:\Apps\Zed.exe,0"),
            registry_program("   ", r"C:\Apps\Anon.exe"),
            registry_program("Icon Only", r"C:\Apps\icon.ico"),
            RegistryProgram {
                system_component: 1,
                ..registry_program("Hidden Component", r"C:\Apps\Hidden.exe")
            },
            RegistryProgram {
                release_type: "Security Update".to_string(),
                ..registry_program("KB500123", r"C:\Apps\patch.exe")
            },
        ],
        ..StubOs::default()
    };

    let indexer = ProgramIndexer::new(Arc::new(os), Vec::new());
    let snapshot = indexer.build(&BlockList::default());

    let names: Vec<&str> = snapshot.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Calculator", "Zed Editor"]);
    assert_eq!(snapshot[1].path, r"c:\apps\zed.exe");
}

#[test]
fn noise_fragments_exclude_entries_by_name_or_path() {
    let os = StubOs {
        programs: vec![
            registry_program("VC++ Redistributable", r"C:\Apps\vcredist.exe"),
            registry_program("Paint Tool", r"C:\Apps\unins000.exe"),
            registry_program("Paint", r"C:\Apps\paint.exe"),
        ],
        ..StubOs::default()
    };

    let indexer = ProgramIndexer::new(Arc::new(os), Vec::new());
    let snapshot = indexer.build(&BlockList::default());

    let names: Vec<&str> = snapshot.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Calculator", "Paint"]);
}

#[test]
fn shortcut_targets_are_folded_in_and_deduplicated() {
    let dir = unique_temp_dir("shortcuts");
    let editor_lnk = dir.join("Editor.LNK");
    let zed_lnk = dir.join("Zed Editor.lnk");
    let broken_lnk = dir.join("Broken.lnk");
    let readme = dir.join("Readme.txt");
    for file in [&editor_lnk, &zed_lnk, &broken_lnk, &readme] {
        std::fs::write(file, b"x").unwrap();
    }

    let mut shortcut_targets = BTreeMap::new();
    shortcut_targets.insert(editor_lnk, PathBuf::from(r"C:\Tools\Editor.exe"));
    // Same name as the registry entry, so the shortcut is a duplicate.
    shortcut_targets.insert(zed_lnk, PathBuf::from(r"C:\Other\Zed.exe"));

    let os = StubOs {
        programs: vec![registry_program("Zed Editor", r"C:\Apps\Zed.exe")],
        shortcut_targets,
        ..StubOs::default()
    };

    let indexer = ProgramIndexer::new(Arc::new(os), vec![dir.clone()]);
    let snapshot = indexer.build(&BlockList::default());

    let names: Vec<&str> = snapshot.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Calculator", "Editor", "Zed Editor"]);
    // Shortcut targets are lowercased on the way in.
    assert_eq!(snapshot[1].path, r"c:\tools\editor.exe");
    assert_eq!(snapshot[2].path, r"c:\apps\zed.exe");

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn blocked_fragments_remove_matching_programs() {
    let store_path = unique_temp_dir("blocklist").join("prefs.json");
    let mut store = SettingsStore::open(store_path).unwrap();
    let mut blocklist = BlockList::default();
    blocklist.add(&mut store, r"c:\apps\zed.exe").unwrap();

    let os = StubOs {
        programs: vec![
            registry_program("Zed Editor", r"C:\Apps\Zed.exe"),
            registry_program("Paint", r"C:\Apps\paint.exe"),
        ],
        ..StubOs::default()
    };

    let indexer = ProgramIndexer::new(Arc::new(os), Vec::new());
    let snapshot = indexer.build(&blocklist);

    let names: Vec<&str> = snapshot.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Calculator", "Paint"]);
}
