use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const KEY_BLOCKLIST: &str = "blocklist";
pub const KEY_SEARCH_STRING: &str = "searchstring";
pub const DEFAULT_SEARCH_STRING: &str = "https://duckduckgo.com/?q={query}";

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Flat string-to-string settings persisted as one pretty-printed JSON
/// object. Every mutation is written back immediately; a failed write
/// leaves the in-memory state untouched.
pub struct SettingsStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl SettingsStore {
    /// Loads the settings file, tolerating a missing one (first run).
    pub fn open(path: PathBuf) -> Result<Self, SettingsError> {
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|error| SettingsError::Parse(error.to_string()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(SettingsError::Io(err)),
        };

        Ok(Self { path, values })
    }

    /// Seeds the keys the engine requires when they are absent or empty.
    pub fn ensure_defaults(&mut self) -> Result<(), SettingsError> {
        if self.get(KEY_BLOCKLIST).map(str::is_empty).unwrap_or(true) {
            self.set(KEY_BLOCKLIST, "[]")?;
        }
        if self
            .get(KEY_SEARCH_STRING)
            .map(str::is_empty)
            .unwrap_or(true)
        {
            self.set(KEY_SEARCH_STRING, DEFAULT_SEARCH_STRING)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut next = self.values.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_to_disk(&next)?;
        self.values = next;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn write_to_disk(&self, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = serde_json::to_string_pretty(values)
            .map_err(|error| SettingsError::Parse(error.to_string()))?;
        std::fs::write(&self.path, rendered)?;
        Ok(())
    }
}
