use std::path::PathBuf;
use std::sync::Arc;

use walkdir::WalkDir;

use crate::blocklist::BlockList;
use crate::model::{Resource, Snapshot};
use crate::platform::OsCapabilities;

/// Release types that mark an entry as an update rather than a program.
const SKIP_RELEASE_TYPES: [&str; 4] = ["hotfix", "security update", "service pack", "update"];

/// Installer/runtime noise dropped from the merged list when the fragment
/// appears in either the path or the lowercased name.
const NOISE_FRAGMENTS: [&str; 9] = [
    "speech recognition",
    "redistributable",
    "x64-based systems",
    "application verifier",
    "install",
    "unins",
    "sdk",
    "runtime",
    "rundll32.exe",
];

/// Programs the registry never exposes directly.
const BUILTIN_PROGRAMS: [(&str, &str); 1] = [("Calculator", "calc.exe")];

pub struct ProgramIndexer {
    os: Arc<dyn OsCapabilities>,
    shortcut_roots: Vec<PathBuf>,
}

impl ProgramIndexer {
    pub fn new(os: Arc<dyn OsCapabilities>, shortcut_roots: Vec<PathBuf>) -> Self {
        Self { os, shortcut_roots }
    }

    /// Builds one complete program snapshot: registry entries, seeded
    /// built-ins, shortcut targets, then the exclusion pass and a stable
    /// name sort. Every per-entry failure is skipped, never fatal.
    pub fn build(&self, blocklist: &BlockList) -> Snapshot {
        let mut programs: Vec<Resource> = Vec::new();

        for (name, path) in BUILTIN_PROGRAMS {
            programs.push(Resource::new(name, path));
        }

        for entry in self.os.enumerate_programs() {
            let name = entry.display_name.trim();
            if name.is_empty() {
                continue;
            }
            if entry.system_component > 0 {
                continue;
            }
            let release = entry.release_type.to_lowercase();
            if SKIP_RELEASE_TYPES.contains(&release.as_str()) {
                continue;
            }
            let path = clean_executable_path(&entry.display_icon);
            if path.is_empty() {
                continue;
            }
            programs.push(Resource::new(name, path));
        }

        self.scan_shortcuts(&mut programs);

        programs.retain(|program| {
            let name = program.name.to_lowercase();
            program.path.contains(".exe")
                && !contains_any(&program.path, &NOISE_FRAGMENTS)
                && !contains_any(&name, &NOISE_FRAGMENTS)
                && !blocklist.matches(&program.path)
        });

        // Stable sort keeps encounter order for equal names.
        programs.sort_by_key(|program| program.name.to_lowercase());

        Arc::new(programs)
    }

    /// Walks the start-menu style roots for shortcut files and folds their
    /// resolved targets in, deduplicating against what is already indexed.
    fn scan_shortcuts(&self, programs: &mut Vec<Resource>) {
        for root in &self.shortcut_roots {
            for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let file_name = entry.file_name().to_string_lossy();
                let Some(stem) = strip_suffix_ignore_case(&file_name, ".lnk") else {
                    continue;
                };

                let target = match self.os.resolve_shortcut(entry.path()) {
                    Ok(target) => target.to_string_lossy().to_lowercase(),
                    Err(error) => {
                        crate::logging::info(&format!(
                            "skipping shortcut {}: {error}",
                            entry.path().display()
                        ));
                        continue;
                    }
                };
                if target.is_empty() || !target.ends_with(".exe") {
                    continue;
                }

                let name = stem.trim();
                let duplicate = programs.iter().any(|existing| {
                    existing.path.eq_ignore_ascii_case(&target)
                        || existing.name.eq_ignore_ascii_case(name)
                });
                if duplicate {
                    continue;
                }

                programs.push(Resource::new(name, target));
            }
        }
    }
}

/// DisplayIcon values often carry a trailing `,<icon index>`; the path is
/// everything before the first comma, trimmed and lowercased for matching.
pub fn clean_executable_path(raw: &str) -> String {
    let path = match raw.find(',') {
        Some(index) => &raw[..index],
        None => raw,
    };
    path.trim().to_lowercase()
}

fn contains_any(haystack: &str, fragments: &[&str]) -> bool {
    fragments.iter().any(|fragment| haystack.contains(fragment))
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if name.len() < suffix.len() || !name.is_char_boundary(name.len() - suffix.len()) {
        return None;
    }
    let (stem, tail) = name.split_at(name.len() - suffix.len());
    if tail.eq_ignore_ascii_case(suffix) {
        Some(stem)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_executable_path, strip_suffix_ignore_case};

    #[test]
    fn icon_index_suffix_is_removed() {
        assert_eq!(
            clean_executable_path(r"C:\Tools\App.exe,0"),
            r"c:\tools\app.exe"
        );
        assert_eq!(
            clean_executable_path(r"  C:\Tools\App.exe  "),
            r"c:\tools\app.exe"
        );
    }

    #[test]
    fn shortcut_suffix_match_is_case_insensitive() {
        assert_eq!(strip_suffix_ignore_case("Editor.LNK", ".lnk"), Some("Editor"));
        assert_eq!(strip_suffix_ignore_case("Editor.txt", ".lnk"), None);
        assert_eq!(strip_suffix_ignore_case("a", ".lnk"), None);
    }
}
