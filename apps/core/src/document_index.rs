use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use crate::model::{Resource, Snapshot};

/// Document file types worth indexing.
const DOCUMENT_EXTENSIONS: [&str; 9] = [
    "doc", "docx", "pdf", "rtf", "odt", "xls", "xlsx", "ppt", "pptx",
];

/// Directories nobody wants documents from: build caches, virtual
/// environments, SDK manifests. Matched as lowercase full-path fragments.
const JUNK_DIR_FRAGMENTS: [&str; 6] = [
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "windows kits",
    ".cache",
];

pub struct DocumentIndexer {
    root: PathBuf,
}

impl DocumentIndexer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Walks the root for document files. Hidden and junk directories are
    /// never descended into; individual walk errors are skipped. A root
    /// that cannot be walked at all just ends that root with a warning.
    pub fn build(&self) -> Snapshot {
        let mut documents: Vec<Resource> = Vec::new();

        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| !should_skip_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    if error.path() == Some(self.root.as_path()) {
                        crate::logging::warn(&format!(
                            "failed to walk {}: {error}",
                            self.root.display()
                        ));
                        break;
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if !has_document_extension(entry.path()) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path().to_string_lossy().to_string();
            documents.push(Resource::new(name, path));
        }

        Arc::new(documents)
    }
}

fn should_skip_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    if has_hidden_attribute(entry.path()) {
        return true;
    }

    let full_path = entry.path().to_string_lossy().to_lowercase();
    JUNK_DIR_FRAGMENTS
        .iter()
        .any(|fragment| full_path.contains(fragment))
}

fn has_document_extension(path: &Path) -> bool {
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    DOCUMENT_EXTENSIONS
        .iter()
        .any(|candidate| extension.eq_ignore_ascii_case(candidate))
}

#[cfg(target_os = "windows")]
fn has_hidden_attribute(path: &Path) -> bool {
    use windows_sys::Win32::Storage::FileSystem::{
        GetFileAttributesW, FILE_ATTRIBUTE_HIDDEN, INVALID_FILE_ATTRIBUTES,
    };

    let wide: Vec<u16> = path
        .to_string_lossy()
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();
    let attributes = unsafe { GetFileAttributesW(wide.as_ptr()) };
    attributes != INVALID_FILE_ATTRIBUTES && (attributes & FILE_ATTRIBUTE_HIDDEN) != 0
}

#[cfg(not(target_os = "windows"))]
fn has_hidden_attribute(_path: &Path) -> bool {
    false
}
