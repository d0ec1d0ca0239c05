use std::sync::{Arc, Mutex};

use crate::platform::{OsCapabilities, WindowHandle};
use crate::text::truncate_title;

const TITLE_LIMIT: usize = 64;
const TITLE_KEEP: usize = 60;

/// Ordinal access to open top-level windows. Each `list` call rebuilds the
/// ordinal table; ordinals from an earlier call are stale the moment a new
/// enumeration runs.
pub struct WindowSwitcher {
    os: Arc<dyn OsCapabilities>,
    ordinals: Mutex<Vec<WindowHandle>>,
}

impl WindowSwitcher {
    pub fn new(os: Arc<dyn OsCapabilities>) -> Self {
        Self {
            os,
            ordinals: Mutex::new(Vec::new()),
        }
    }

    /// One display line per visible titled window, sorted by title, with
    /// 1-based ordinals. Titles are truncated without splitting codepoints.
    pub fn list(&self) -> Vec<String> {
        let mut windows = self.os.enumerate_windows();
        windows.retain(|window| !window.title.is_empty());
        windows.sort_by(|a, b| a.title.cmp(&b.title));

        let mut table = Vec::with_capacity(windows.len());
        let mut lines = Vec::with_capacity(windows.len());
        for (index, window) in windows.iter().enumerate() {
            table.push(window.handle);
            let title = truncate_title(&window.title, TITLE_LIMIT, TITLE_KEEP);
            lines.push(format!("[ {} ] {title}", index + 1));
        }

        if let Ok(mut ordinals) = self.ordinals.lock() {
            *ordinals = table;
        }
        lines
    }

    /// Focuses the window behind a 1-based ordinal from the latest `list`
    /// call. Out-of-range ordinals are silent no-ops, and a refused
    /// foreground switch is not an error.
    pub fn focus(&self, ordinal: i64) {
        let Ok(ordinals) = self.ordinals.lock() else {
            return;
        };
        if ordinal <= 0 || ordinal as usize > ordinals.len() {
            return;
        }
        let handle = ordinals[ordinal as usize - 1];
        drop(ordinals);

        if !self.os.focus_window(handle) {
            crate::logging::info(&format!("focus refused for window ordinal {ordinal}"));
        }
    }
}
