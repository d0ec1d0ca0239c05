use quicknav_core::action_executor::{launch_program, open_document, open_url, LaunchError};

#[test]
fn blank_targets_never_reach_the_shell() {
    assert_eq!(launch_program(""), Err(LaunchError::EmptyTarget));
    assert_eq!(open_document("   "), Err(LaunchError::EmptyTarget));
    assert_eq!(open_url("\t"), Err(LaunchError::EmptyTarget));
}

#[test]
fn launching_a_nonexistent_path_reports_the_path() {
    let missing = std::env::temp_dir().join("quicknav-missing-launch-target.exe");
    let error = launch_program(missing.to_string_lossy().as_ref()).unwrap_err();

    match error {
        LaunchError::MissingPath(path) => assert_eq!(path, missing),
        other => panic!("expected missing path error, got {other:?}"),
    }
}

#[test]
fn documents_are_existence_checked_before_opening() {
    let missing = std::env::temp_dir().join("quicknav-missing-document.pdf");
    assert!(matches!(
        open_document(missing.to_string_lossy().as_ref()),
        Err(LaunchError::MissingPath(_))
    ));
}
