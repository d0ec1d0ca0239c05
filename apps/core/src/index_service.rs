use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::blocklist::BlockList;
use crate::document_index::DocumentIndexer;
use crate::model::{empty_snapshot, Snapshot};
use crate::program_index::ProgramIndexer;
use crate::settings_store::{SettingsError, SettingsStore, DEFAULT_SEARCH_STRING, KEY_SEARCH_STRING};

/// Owns both resource snapshots and the persisted launcher state. Snapshots
/// are swapped by reference under a single writer, so readers always see
/// one complete generation. Rebuilds carry a generation stamp; a rebuild
/// that was superseded while running is discarded at install time.
pub struct IndexService {
    programs: RwLock<Snapshot>,
    documents: RwLock<Snapshot>,
    documents_ready: AtomicBool,
    program_generation: AtomicU64,
    document_generation: AtomicU64,
    store: Mutex<SettingsStore>,
    blocklist: Mutex<BlockList>,
    program_indexer: ProgramIndexer,
    document_indexer: DocumentIndexer,
}

impl IndexService {
    pub fn new(
        store: SettingsStore,
        program_indexer: ProgramIndexer,
        document_indexer: DocumentIndexer,
    ) -> Self {
        let blocklist = BlockList::load(&store);
        Self {
            programs: RwLock::new(empty_snapshot()),
            documents: RwLock::new(empty_snapshot()),
            documents_ready: AtomicBool::new(false),
            program_generation: AtomicU64::new(0),
            document_generation: AtomicU64::new(0),
            store: Mutex::new(store),
            blocklist: Mutex::new(blocklist),
            program_indexer,
            document_indexer,
        }
    }

    pub fn program_snapshot(&self) -> Snapshot {
        self.programs
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|_| empty_snapshot())
    }

    pub fn document_snapshot(&self) -> Snapshot {
        self.documents
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|_| empty_snapshot())
    }

    pub fn documents_ready(&self) -> bool {
        self.documents_ready.load(Ordering::Acquire)
    }

    /// Builds a fresh program snapshot and installs it unless a newer
    /// rebuild was requested while this one ran.
    pub fn rebuild_programs(&self) {
        let generation = self.program_generation.fetch_add(1, Ordering::SeqCst) + 1;
        crate::logging::info("indexing programs");

        let blocklist = self
            .blocklist
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        let snapshot = self.program_indexer.build(&blocklist);

        if self.program_generation.load(Ordering::SeqCst) != generation {
            crate::logging::info("discarding superseded program snapshot");
            return;
        }
        if let Ok(mut programs) = self.programs.write() {
            *programs = snapshot;
        }
        crate::logging::info("programs indexed");
    }

    /// Builds a fresh document snapshot. The completion flag the
    /// document-mode placeholder reads rises after the first successful
    /// build and stays up; a re-index keeps serving the previous snapshot,
    /// which is still fully searchable.
    pub fn rebuild_documents(&self) {
        let generation = self.document_generation.fetch_add(1, Ordering::SeqCst) + 1;
        crate::logging::info("indexing documents");

        let snapshot = self.document_indexer.build();

        if self.document_generation.load(Ordering::SeqCst) != generation {
            crate::logging::info("discarding superseded document snapshot");
            return;
        }
        if let Ok(mut documents) = self.documents.write() {
            *documents = snapshot;
        }
        self.documents_ready.store(true, Ordering::Release);
        crate::logging::info("documents indexed");
    }

    /// Kicks both indexers off the interactive path.
    pub fn spawn_rebuild_all(self: &Arc<Self>) {
        let for_programs = Arc::clone(self);
        std::thread::spawn(move || for_programs.rebuild_programs());

        let for_documents = Arc::clone(self);
        std::thread::spawn(move || for_documents.rebuild_documents());
    }

    /// Persists a blocklist entry and splices the entry out of the visible
    /// snapshot right away. The authoritative exclusion happens on the next
    /// rebuild; the splice only keeps the display honest meanwhile.
    pub fn hide_program(&self, path: &str) -> Result<(), SettingsError> {
        {
            let (Ok(mut store), Ok(mut blocklist)) = (self.store.lock(), self.blocklist.lock())
            else {
                return Ok(());
            };
            blocklist.add(&mut store, path)?;
        }

        if let Ok(mut programs) = self.programs.write() {
            let remaining: Vec<_> = programs
                .iter()
                .filter(|program| !program.path.eq_ignore_ascii_case(path))
                .cloned()
                .collect();
            *programs = Arc::new(remaining);
        }
        Ok(())
    }

    /// Empties the blocklist and rebuilds programs so the cleared entries
    /// reappear.
    pub fn clear_blocklist(&self) -> Result<(), SettingsError> {
        {
            let (Ok(mut store), Ok(mut blocklist)) = (self.store.lock(), self.blocklist.lock())
            else {
                return Ok(());
            };
            blocklist.clear(&mut store)?;
        }
        self.rebuild_programs();
        Ok(())
    }

    pub fn blocklist_len(&self) -> usize {
        self.blocklist.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn search_string(&self) -> String {
        self.store
            .lock()
            .ok()
            .and_then(|store| store.get(KEY_SEARCH_STRING).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_SEARCH_STRING.to_string())
    }

    pub fn set_search_string(&self, template: &str) -> Result<(), SettingsError> {
        let Ok(mut store) = self.store.lock() else {
            return Ok(());
        };
        store.set(KEY_SEARCH_STRING, template)
    }
}
