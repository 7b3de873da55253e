/*!
 * Workspace: the currently opened tree, its content handles and selection
 */

use std::collections::HashSet;

use crate::error::{CodePackError, IngestError, Result};
use crate::filter::{apply_filters, collect_file_paths};
use crate::ingest::Ingestor;
use crate::source::{DirectorySource, DropPayload, LegacyEntry};
use crate::store::ContentStore;
use crate::types::{child_path, is_within, FileEntry, FilterConfig};
use crate::writer::BundleWriter;

/// Result of opening a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A new tree replaced the previous one
    Loaded,
    /// The user cancelled; nothing changed
    Cancelled,
    /// Ingestion failed; see [`Workspace::error`]
    Failed,
}

/// Owns one ingested tree and the handles that belong to it
pub struct Workspace {
    ingestor: Ingestor,
    tree: Option<FileEntry>,
    store: ContentStore,
    selected: HashSet<String>,
    error: Option<String>,
}

impl Workspace {
    pub fn new(ingestor: Ingestor) -> Self {
        Self {
            ingestor,
            tree: None,
            store: ContentStore::new(),
            selected: HashSet::new(),
            error: None,
        }
    }

    pub fn tree(&self) -> Option<&FileEntry> {
        self.tree.as_ref()
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Message of the last failed open, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    /// Open the source produced by a picker or a drop.
    ///
    /// `picked` is the outcome of choosing the source; an
    /// [`IngestError::Aborted`] there or during ingestion leaves the
    /// workspace unchanged and is not recorded as an error.
    pub fn open<S: DirectorySource>(&mut self, picked: std::result::Result<S, IngestError>) -> LoadOutcome {
        self.error = None;

        let result = picked.and_then(|source| self.ingestor.ingest(&source, &mut self.store));
        match result {
            Ok(tree) => {
                self.tree = Some(tree);
                self.selected.clear();
                LoadOutcome::Loaded
            }
            Err(e) if e.is_aborted() => {
                log::info!("Directory selection cancelled");
                LoadOutcome::Cancelled
            }
            Err(e) => {
                log::error!("Error opening directory: {}", e);
                self.error = Some(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Open the first entry of a drop event
    pub fn open_dropped<E: LegacyEntry>(&mut self, payload: DropPayload<E>) -> LoadOutcome {
        self.open(payload.into_source())
    }

    /// Filtered view of the current tree
    pub fn filtered(&self, config: &FilterConfig) -> Option<FileEntry> {
        self.tree.as_ref().and_then(|tree| apply_filters(tree, config))
    }

    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn select(&mut self, path: impl Into<String>) {
        self.selected.insert(path.into());
    }

    pub fn deselect(&mut self, path: &str) {
        self.selected.remove(path);
    }

    /// Select every file of `view`
    pub fn select_all(&mut self, view: &FileEntry) {
        self.selected = collect_file_paths(view).into_iter().collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Select the files of `view` at or below `relative`, a path relative to
    /// the root. Returns the number of files selected.
    pub fn select_matching(&mut self, view: &FileEntry, relative: &str) -> usize {
        let relative = relative.trim_matches('/');
        let target = if relative.is_empty() || relative == "." {
            view.path.clone()
        } else {
            child_path(&view.path, relative)
        };

        let matches: Vec<String> = collect_file_paths(view)
            .into_iter()
            .filter(|path| is_within(path, &target))
            .collect();
        let count = matches.len();
        self.selected.extend(matches);
        count
    }

    /// Serialize the selection, restricted to files visible under `config`
    pub fn bundle(&self, config: &FilterConfig, writer: &BundleWriter) -> Result<String> {
        let view = self.filtered(config).ok_or(CodePackError::EmptySelection)?;
        let visible: HashSet<String> = collect_file_paths(&view)
            .into_iter()
            .filter(|path| self.selected.contains(path))
            .collect();

        writer.serialize(Some(&view), &visible, &self.store)
    }
}
