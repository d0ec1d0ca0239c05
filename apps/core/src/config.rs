use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.toml";
const SETTINGS_FILE_NAME: &str = "prefs.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Flat key/value settings file (blocklist, search string).
    pub settings_path: PathBuf,
    /// Root the document indexer walks.
    pub document_root: PathBuf,
    /// Start-menu style directories scanned for shortcuts.
    pub shortcut_roots: Vec<PathBuf>,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            settings_path: base.join(SETTINGS_FILE_NAME),
            document_root: home_dir(),
            shortcut_roots: default_shortcut_roots(),
            config_path: base.join(CONFIG_FILE_NAME),
        }
    }
}

pub fn validate(config: &Config) -> Result<(), String> {
    if config.settings_path.as_os_str().is_empty() {
        return Err("settings_path is required".into());
    }
    if config.document_root.as_os_str().is_empty() {
        return Err("document_root is required".into());
    }
    Ok(())
}

/// Reads the config file when present, otherwise returns defaults. A missing
/// file is not an error; a malformed one is.
pub fn load(explicit_path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| stable_app_data_dir().join(CONFIG_FILE_NAME));

    if !path.exists() {
        let mut config = Config::default();
        config.config_path = path;
        return Ok(config);
    }

    let raw = std::fs::read_to_string(&path)?;
    let mut config: Config =
        toml::from_str(&raw).map_err(|error| ConfigError::Parse(error.to_string()))?;
    config.config_path = path;
    Ok(config)
}

pub fn save(config: &Config) -> Result<(), ConfigError> {
    let rendered =
        toml::to_string_pretty(config).map_err(|error| ConfigError::Parse(error.to_string()))?;
    if let Some(parent) = config.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config.config_path, rendered)?;
    Ok(())
}

/// Per-user application data directory that survives temp cleanup.
pub fn stable_app_data_dir() -> PathBuf {
    if let Ok(appdata) = std::env::var("APPDATA") {
        if !appdata.is_empty() {
            return PathBuf::from(appdata).join("quicknav");
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return PathBuf::from(home).join(".local").join("share").join("quicknav");
        }
    }
    std::env::temp_dir().join("quicknav")
}

fn home_dir() -> PathBuf {
    if let Ok(profile) = std::env::var("USERPROFILE") {
        if !profile.is_empty() {
            return PathBuf::from(profile);
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    std::env::temp_dir()
}

fn default_shortcut_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    for var in ["APPDATA", "PROGRAMDATA"] {
        if let Ok(base) = std::env::var(var) {
            if !base.is_empty() {
                roots.push(
                    PathBuf::from(base)
                        .join("Microsoft")
                        .join("Windows")
                        .join("Start Menu")
                        .join("Programs"),
                );
            }
        }
    }
    roots
}
