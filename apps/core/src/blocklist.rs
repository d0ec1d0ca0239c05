use crate::settings_store::{SettingsError, SettingsStore, KEY_BLOCKLIST};

/// Persisted set of excluded executable-path fragments, stored as a JSON
/// array under the `blocklist` settings key. The set is consulted only when
/// a program snapshot is built; hiding an already-visible entry right away
/// is the index service's concern.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockList {
    fragments: Vec<String>,
}

impl BlockList {
    pub fn load(store: &SettingsStore) -> Self {
        let raw = store.get(KEY_BLOCKLIST).unwrap_or("[]");
        let fragments = match serde_json::from_str::<Vec<String>>(raw) {
            Ok(list) => list,
            Err(error) => {
                crate::logging::warn(&format!("unreadable blocklist setting: {error}"));
                Vec::new()
            }
        };
        Self { fragments }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// True when the lowercased path contains any blocked fragment.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.fragments.iter().any(|fragment| path.contains(fragment))
    }

    /// Appends a path and persists immediately. The in-memory set only
    /// changes once the write has succeeded.
    pub fn add(&mut self, store: &mut SettingsStore, path: &str) -> Result<(), SettingsError> {
        let mut next = self.fragments.clone();
        next.push(path.to_lowercase());
        Self::persist(store, &next)?;
        self.fragments = next;
        Ok(())
    }

    /// Empties the persisted set. Callers rebuild the program snapshot
    /// afterwards so cleared entries reappear.
    pub fn clear(&mut self, store: &mut SettingsStore) -> Result<(), SettingsError> {
        Self::persist(store, &[])?;
        self.fragments.clear();
        Ok(())
    }

    fn persist(store: &mut SettingsStore, fragments: &[String]) -> Result<(), SettingsError> {
        let rendered = serde_json::to_string(fragments)
            .map_err(|error| SettingsError::Parse(error.to_string()))?;
        store.set(KEY_BLOCKLIST, &rendered)
    }
}
