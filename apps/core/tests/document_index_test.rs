use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use quicknav_core::document_index::DocumentIndexer;

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
fn only_document_extensions_are_indexed() {
    let root = unique_temp_dir("docs-ext");
    std::fs::write(root.join("report.pdf"), b"x").unwrap();
    std::fs::write(root.join("Budget.XLSX"), b"x").unwrap();
    std::fs::write(root.join("photo.png"), b"x").unwrap();
    std::fs::write(root.join("notes"), b"x").unwrap();

    let snapshot = DocumentIndexer::new(root.clone()).build();

    let mut names: Vec<&str> = snapshot.iter().map(|r| r.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Budget.XLSX", "report.pdf"]);

    std::fs::remove_dir_all(root).unwrap();
}

#[test]
fn dot_and_junk_directories_are_not_descended() {
    let root = unique_temp_dir("docs-skip");
    let hidden = root.join(".stash");
    let junk = root.join("node_modules");
    let kept = root.join("projects");
    for dir in [&hidden, &junk, &kept] {
        std::fs::create_dir_all(dir).unwrap();
    }
    std::fs::write(hidden.join("secret.pdf"), b"x").unwrap();
    std::fs::write(junk.join("bundled.pdf"), b"x").unwrap();
    std::fs::write(kept.join("plan.docx"), b"x").unwrap();

    let snapshot = DocumentIndexer::new(root.clone()).build();

    let names: Vec<&str> = snapshot.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["plan.docx"]);

    std::fs::remove_dir_all(root).unwrap();
}

#[test]
fn missing_root_yields_an_empty_snapshot() {
    let root = unique_temp_dir("docs-missing").join("does-not-exist");
    let snapshot = DocumentIndexer::new(root).build();
    assert!(snapshot.is_empty());
}
