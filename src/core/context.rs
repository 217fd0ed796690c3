// Build session state for app file generation
// The ledger survives incremental rebuilds; everything else is per build

use crate::core::models::{Diagnostic, Severity};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Last emitted content per logical output key (`core`, `core.pf`, `loader`, ...).
///
/// Used only for change detection: a key whose content is unchanged since the
/// previous build is not added to the write set again.
#[derive(Debug, Default)]
pub struct BuildLedger {
    entries: DashMap<String, String>,
}

impl BuildLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, key: &str, content: &str) {
        self.entries.insert(key.to_string(), content.to_string());
    }

    pub fn is_unchanged(&self, key: &str, content: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| entry.value() == content)
            .unwrap_or(false)
    }

    /// Records `content` under `key`, returning false when it was already there.
    pub fn record(&self, key: &str, content: &str) -> bool {
        if self.is_unchanged(key, content) {
            return false;
        }
        self.put(key, content);
        true
    }
}

/// Append-only diagnostics shared by concurrent tasks of one build.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.items.lock().push(diagnostic);
    }

    pub fn extend(&self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.lock().extend(diagnostics);
    }

    pub fn has_fatal(&self) -> bool {
        self.items.lock().iter().any(|d| d.severity == Severity::Fatal)
    }

    pub fn has_errors(&self) -> bool {
        self.items.lock().iter().any(|d| d.severity >= Severity::Error)
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

/// One build session. Create with [`BuildContext::new`] for a fresh build and
/// [`BuildContext::next_build`] for an incremental rebuild.
#[derive(Debug)]
pub struct BuildContext {
    ledger: Arc<BuildLedger>,
    pub diagnostics: Diagnostics,
    files_to_write: DashMap<PathBuf, String>,
    files_changed: AtomicUsize,
    is_rebuild: bool,
}

impl BuildContext {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(BuildLedger::new()),
            diagnostics: Diagnostics::new(),
            files_to_write: DashMap::new(),
            files_changed: AtomicUsize::new(0),
            is_rebuild: false,
        }
    }

    /// Starts a rebuild that shares this session's ledger.
    pub fn next_build(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            diagnostics: Diagnostics::new(),
            files_to_write: DashMap::new(),
            files_changed: AtomicUsize::new(0),
            is_rebuild: true,
        }
    }

    pub fn ledger(&self) -> &BuildLedger {
        &self.ledger
    }

    pub fn is_rebuild(&self) -> bool {
        self.is_rebuild
    }

    pub fn queue_write(&self, path: PathBuf, content: &str) {
        self.files_to_write.insert(path, content.to_string());
    }

    pub fn pending_writes(&self) -> usize {
        self.files_to_write.len()
    }

    pub fn pending_content(&self, path: &std::path::Path) -> Option<String> {
        self.files_to_write.get(path).map(|entry| entry.value().clone())
    }

    /// Drains the write set, sorted by path.
    pub fn take_files_to_write(&self) -> Vec<(PathBuf, String)> {
        let keys: Vec<PathBuf> = self.files_to_write.iter().map(|e| e.key().clone()).collect();
        let mut files: Vec<(PathBuf, String)> = keys
            .into_iter()
            .filter_map(|key| self.files_to_write.remove(&key))
            .collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files
    }

    pub fn increment_files_changed(&self) {
        self.files_changed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn files_changed(&self) -> usize {
        self.files_changed.load(Ordering::SeqCst)
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}
