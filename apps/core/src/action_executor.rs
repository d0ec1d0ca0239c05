use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    EmptyTarget,
    MissingPath(PathBuf),
    Spawn(String),
}

impl Display for LaunchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTarget => write!(f, "empty launch target"),
            Self::MissingPath(path) => write!(f, "path does not exist: {}", path.display()),
            Self::Spawn(error) => write!(f, "failed to start: {error}"),
        }
    }
}

impl std::error::Error for LaunchError {}

/// Starts a program executable directly.
pub fn launch_program(path: &str) -> Result<(), LaunchError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyTarget);
    }
    if !Path::new(trimmed).exists() {
        return Err(LaunchError::MissingPath(PathBuf::from(trimmed)));
    }

    spawn_direct(trimmed)
}

/// Opens a document with whatever the shell associates with it.
pub fn open_document(path: &str) -> Result<(), LaunchError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyTarget);
    }
    if !Path::new(trimmed).exists() {
        return Err(LaunchError::MissingPath(PathBuf::from(trimmed)));
    }

    shell_open(trimmed)
}

/// Hands a URL to the default browser.
pub fn open_url(url: &str) -> Result<(), LaunchError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyTarget);
    }

    shell_open(trimmed)
}

/// Browser-launch seam. The shell implementation is the real one; tests
/// substitute a recording implementation.
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), LaunchError>;
}

#[derive(Debug, Default)]
pub struct ShellBrowserLauncher;

impl BrowserLauncher for ShellBrowserLauncher {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        open_url(url)
    }
}

#[cfg(target_os = "windows")]
fn spawn_direct(path: &str) -> Result<(), LaunchError> {
    std::process::Command::new(path)
        .spawn()
        .map(|_| ())
        .map_err(|error| LaunchError::Spawn(error.to_string()))
}

#[cfg(target_os = "windows")]
fn shell_open(target: &str) -> Result<(), LaunchError> {
    std::process::Command::new("cmd")
        .arg("/C")
        .arg("start")
        .arg("")
        .arg(target)
        .spawn()
        .map(|_| ())
        .map_err(|error| LaunchError::Spawn(error.to_string()))
}

#[cfg(not(target_os = "windows"))]
fn spawn_direct(path: &str) -> Result<(), LaunchError> {
    std::process::Command::new(path)
        .spawn()
        .map(|_| ())
        .map_err(|error| LaunchError::Spawn(error.to_string()))
}

#[cfg(not(target_os = "windows"))]
fn shell_open(_target: &str) -> Result<(), LaunchError> {
    // Keeps non-Windows runs inert without desktop integration.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{launch_program, open_document, open_url, LaunchError};

    #[test]
    fn empty_targets_are_rejected() {
        assert_eq!(launch_program("  "), Err(LaunchError::EmptyTarget));
        assert_eq!(open_document(""), Err(LaunchError::EmptyTarget));
        assert_eq!(open_url(" "), Err(LaunchError::EmptyTarget));
    }

    #[test]
    fn missing_paths_are_reported() {
        let missing = std::env::temp_dir().join("quicknav-no-such-target.exe");
        let result = launch_program(missing.to_string_lossy().as_ref());
        assert!(matches!(result, Err(LaunchError::MissingPath(_))));
    }
}
