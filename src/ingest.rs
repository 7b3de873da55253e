/*!
 * Tree ingestion
 *
 * Builds a [`FileEntry`] tree from any [`DirectorySource`]. Children of a
 * directory are processed in parallel; every subtree returns its own
 * handles, which the parent merges, so the content store is populated
 * without shared mutable state.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::error::IngestError;
use crate::source::{DirectorySource, SharedHandle, SourceEntry};
use crate::store::ContentStore;
use crate::types::{child_path, Children, EntryKind, FileEntry};
use crate::utils::is_ignored_directory_name;

/// A subtree together with the handles of the files it contains
struct Subtree {
    node: FileEntry,
    handles: Vec<(String, SharedHandle)>,
}

/// Ingestion statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Files recorded in the tree
    pub files: usize,
    /// Sum of file sizes in bytes
    pub total_size: u64,
}

/// Builds trees from directory sources
pub struct Ingestor {
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Set to abort a running ingestion
    cancel: Arc<AtomicBool>,
}

impl Ingestor {
    /// Create a new ingestor
    pub fn new(progress: Arc<ProgressBar>) -> Self {
        Self {
            progress,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ingestor without visible progress
    pub fn hidden() -> Self {
        Self::new(Arc::new(ProgressBar::hidden()))
    }

    /// Share a cancellation flag with the caller
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Flag that aborts ingestion once set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Ingest `source`, replacing the contents of `store` on success.
    ///
    /// Unreadable directories and files are logged and left out; only a
    /// failure to open the root or a cancellation fails the run. The store is
    /// left untouched when the run fails.
    pub fn ingest<S: DirectorySource>(
        &self,
        source: &S,
        store: &mut ContentStore,
    ) -> Result<FileEntry, IngestError> {
        self.check_cancelled()?;
        let (name, root) = source.root()?;
        log::info!("Ingesting directory {}", name);

        let path = name.clone();
        let subtree = self.ingest_directory(source, &root, name, path)?;

        log::info!(
            "Ingested {} files under {}",
            subtree.handles.len(),
            subtree.node.path
        );
        store.replace(subtree.handles);
        Ok(subtree.node)
    }

    fn check_cancelled(&self) -> Result<(), IngestError> {
        if self.cancel.load(Ordering::Relaxed) {
            Err(IngestError::Aborted)
        } else {
            Ok(())
        }
    }

    /// Ingest one directory and everything below it
    fn ingest_directory<S: DirectorySource>(
        &self,
        source: &S,
        dir: &S::Handle,
        name: String,
        path: String,
    ) -> Result<Subtree, IngestError> {
        self.check_cancelled()?;

        let mut entries = Vec::new();
        if let Err(e) = source.list_entries(dir, &mut entries) {
            // Keep whatever was listed before the failure
            log::warn!("Error reading directory {}: {}", path, e);
        }

        let subtrees = entries
            .into_par_iter()
            .map(|entry| self.ingest_entry(source, entry, &path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut children = Children::with_capacity(subtrees.len());
        let mut handles = Vec::new();
        for subtree in subtrees.into_iter().flatten() {
            handles.extend(subtree.handles);
            children.insert(subtree.node.name.clone(), Arc::new(subtree.node));
        }

        Ok(Subtree {
            node: FileEntry::directory_with(name, path, children),
            handles,
        })
    }

    /// Ingest one child; `None` when it is skipped
    fn ingest_entry<S: DirectorySource>(
        &self,
        source: &S,
        entry: SourceEntry<S::Handle>,
        parent_path: &str,
    ) -> Result<Option<Subtree>, IngestError> {
        let path = child_path(parent_path, &entry.name);

        match entry.kind {
            EntryKind::Directory => {
                if is_ignored_directory_name(&entry.name) {
                    log::debug!("Skipping ignored directory {}", path);
                    return Ok(None);
                }
                self.ingest_directory(source, &entry.handle, entry.name, path)
                    .map(Some)
            }
            EntryKind::File => {
                self.check_cancelled()?;
                self.report_progress(&entry.name);

                match source.open_file(&entry.handle) {
                    Ok(opened) => Ok(Some(Subtree {
                        node: FileEntry::file(
                            entry.name,
                            path.clone(),
                            opened.size,
                            opened.last_modified,
                        ),
                        handles: vec![(path, opened.handle)],
                    })),
                    Err(e) => {
                        log::warn!("Error opening file {}: {}", path, e);
                        Ok(None)
                    }
                }
            }
        }
    }

    fn report_progress(&self, file_name: &str) {
        self.progress.inc(1);

        // Truncate long names to avoid display issues
        let display_name = if file_name.chars().count() > 40 {
            let tail: String = file_name
                .chars()
                .rev()
                .take(37)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{}", tail)
        } else {
            file_name.to_string()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));
    }
}

/// Count files and their total size in a tree
pub fn summarize(tree: &FileEntry) -> IngestSummary {
    tree.files()
        .iter()
        .fold(IngestSummary::default(), |acc, file| IngestSummary {
            files: acc.files + 1,
            total_size: acc.total_size + file.size,
        })
}
