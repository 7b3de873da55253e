/*!
 * Legacy drag-and-drop backend
 *
 * Dropped entries expose a directory reader that returns children in
 * batches. A single read is not guaranteed to return every child, so a
 * directory is only complete once a read returns an empty batch.
 */

use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::IngestError;
use crate::source::fs::{entry_name, open_path};
use crate::source::{DirectorySource, OpenedFile, SourceEntry};
use crate::types::EntryKind;

/// Number of children returned per read by [`ReadDirBatches`]
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Reported in place of an entry name when a drop carries no entry
pub const EMPTY_PAYLOAD: &str = "empty drop payload";

/// Batched reader over a dropped directory
pub trait DirectoryReader: Send {
    /// Entry type yielded by this reader
    type Entry;

    /// Read the next batch; an empty batch means the directory is drained
    fn read_entries(&mut self) -> io::Result<Vec<Self::Entry>>;
}

/// A dropped file-system entry
pub trait LegacyEntry: Clone + Send + Sync + Sized {
    /// Reader returned by [`LegacyEntry::create_reader`]
    type Reader: DirectoryReader<Entry = Self>;

    fn name(&self) -> String;
    fn is_file(&self) -> bool;
    fn is_directory(&self) -> bool;

    /// Start reading the children of a directory entry
    fn create_reader(&self) -> io::Result<Self::Reader>;

    /// Open a file entry
    fn file(&self) -> io::Result<OpenedFile>;
}

/// The entries of one drop event
#[derive(Debug, Clone)]
pub struct DropPayload<E> {
    entries: Vec<E>,
}

impl<E: LegacyEntry> DropPayload<E> {
    pub fn new(entries: Vec<E>) -> Self {
        Self { entries }
    }

    /// Resolve the payload to a source rooted at its first entry.
    ///
    /// The first entry must be a directory; a bare file or an empty payload
    /// is rejected with [`IngestError::NotADirectory`].
    pub fn into_source(self) -> Result<LegacySource<E>, IngestError> {
        let root = self
            .entries
            .into_iter()
            .next()
            .ok_or_else(|| IngestError::NotADirectory(EMPTY_PAYLOAD.to_string()))?;

        if !root.is_directory() {
            return Err(IngestError::NotADirectory(root.name()));
        }

        Ok(LegacySource { root })
    }
}

impl DropPayload<DroppedPath> {
    /// Build a payload from dropped paths, discarding paths that do not exist.
    ///
    /// Dropped paths are resolved through symlinks, the same way the
    /// capability backend resolves its root.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let entries = paths
            .into_iter()
            .map(Into::into)
            .filter_map(|path: PathBuf| match DroppedPath::resolve(&path) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Ignoring dropped path {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        Self::new(entries)
    }
}

/// Source that walks a dropped directory entry
#[derive(Debug, Clone)]
pub struct LegacySource<E> {
    root: E,
}

impl<E: LegacyEntry> DirectorySource for LegacySource<E> {
    type Handle = E;

    fn root(&self) -> Result<(String, E), IngestError> {
        Ok((self.root.name(), self.root.clone()))
    }

    fn list_entries(&self, dir: &E, entries: &mut Vec<SourceEntry<E>>) -> io::Result<()> {
        let mut reader = dir.create_reader()?;

        loop {
            let batch = reader.read_entries()?;
            if batch.is_empty() {
                return Ok(());
            }

            for entry in batch {
                let kind = if entry.is_directory() {
                    EntryKind::Directory
                } else if entry.is_file() {
                    EntryKind::File
                } else {
                    log::debug!("Skipping dropped entry of unknown type: {}", entry.name());
                    continue;
                };
                entries.push(SourceEntry {
                    name: entry.name(),
                    kind,
                    handle: entry,
                });
            }
        }
    }

    fn open_file(&self, file: &E) -> io::Result<OpenedFile> {
        file.file()
    }
}

/// A dropped path on the local file system
#[derive(Debug, Clone)]
pub struct DroppedPath {
    path: PathBuf,
    name: String,
    batch_size: usize,
}

impl DroppedPath {
    /// Entry for `path` as given; symlinks are not followed
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: entry_name(&path),
            path,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Entry for the canonical form of `path`
    pub fn resolve(path: &Path) -> io::Result<Self> {
        Ok(Self::new(fs::canonicalize(path)?))
    }

    /// Override the number of children returned per read
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LegacyEntry for DroppedPath {
    type Reader = ReadDirBatches;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_file(&self) -> bool {
        fs::symlink_metadata(&self.path).is_ok_and(|m| m.is_file())
    }

    fn is_directory(&self) -> bool {
        fs::symlink_metadata(&self.path).is_ok_and(|m| m.is_dir())
    }

    fn create_reader(&self) -> io::Result<ReadDirBatches> {
        Ok(ReadDirBatches {
            inner: Some(fs::read_dir(&self.path)?),
            batch_size: self.batch_size,
            pending_error: None,
        })
    }

    fn file(&self) -> io::Result<OpenedFile> {
        open_path(&self.path)
    }
}

/// Reads a directory in fixed-size batches
#[derive(Debug)]
pub struct ReadDirBatches {
    inner: Option<ReadDir>,
    batch_size: usize,
    pending_error: Option<io::Error>,
}

impl DirectoryReader for ReadDirBatches {
    type Entry = DroppedPath;

    fn read_entries(&mut self) -> io::Result<Vec<DroppedPath>> {
        // An error hit while filling the previous batch is reported on its own
        if let Some(e) = self.pending_error.take() {
            self.inner = None;
            return Err(e);
        }

        let Some(inner) = self.inner.as_mut() else {
            return Ok(Vec::new());
        };

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match inner.next() {
                Some(Ok(entry)) => batch.push(DroppedPath {
                    name: entry.file_name().to_string_lossy().to_string(),
                    path: entry.path(),
                    batch_size: self.batch_size,
                }),
                Some(Err(e)) if batch.is_empty() => {
                    self.inner = None;
                    return Err(e);
                }
                Some(Err(e)) => {
                    self.pending_error = Some(e);
                    break;
                }
                None => {
                    self.inner = None;
                    break;
                }
            }
        }

        // Keep the listing deterministic within a batch
        batch.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_payload_requires_directory() -> io::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("main.rs");
        File::create(&file_path)?;

        let payload = DropPayload::from_paths([file_path, dir.path().to_path_buf()]);
        assert!(matches!(
            payload.into_source(),
            Err(IngestError::NotADirectory(name)) if name == "main.rs"
        ));
        Ok(())
    }

    #[test]
    fn test_payload_skips_missing_paths() -> io::Result<()> {
        let dir = tempdir()?;
        let payload = DropPayload::from_paths([dir.path().join("gone"), dir.path().to_path_buf()]);
        let source = payload.into_source().map_err(io::Error::other)?;
        let (name, _) = source.root().map_err(io::Error::other)?;
        assert_eq!(name, entry_name(&fs::canonicalize(dir.path())?));

        let empty = DropPayload::<DroppedPath>::from_paths(Vec::<PathBuf>::new());
        assert!(matches!(
            empty.into_source(),
            Err(IngestError::NotADirectory(name)) if name == EMPTY_PAYLOAD
        ));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_link_resolved_for_root_only() -> io::Result<()> {
        use std::os::unix::fs::symlink;

        let dir = tempdir()?;
        let target = dir.path().join("proj");
        fs::create_dir(&target)?;
        File::create(target.join("a.txt"))?;
        symlink(&target, dir.path().join("linked"))?;
        symlink(target.join("a.txt"), target.join("b.txt"))?;

        let root = DroppedPath::resolve(&dir.path().join("linked"))?;
        assert_eq!(root.name(), "proj");
        assert!(root.is_directory());

        let children = root.create_reader()?.read_entries()?;
        let names: Vec<String> = children.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        // A linked child keeps its own name and is skipped
        assert!(!children[1].is_file() && !children[1].is_directory());
        Ok(())
    }

    #[test]
    fn test_reader_drains_all_batches() -> io::Result<()> {
        let dir = tempdir()?;
        for i in 0..7 {
            File::create(dir.path().join(format!("f{}.txt", i)))?;
        }

        let entry = DroppedPath::new(dir.path()).with_batch_size(3);
        let mut reader = entry.create_reader()?;
        let mut sizes = Vec::new();
        loop {
            let batch = reader.read_entries()?;
            if batch.is_empty() {
                break;
            }
            sizes.push(batch.len());
        }
        assert_eq!(sizes, vec![3, 3, 1]);

        let source = DropPayload::new(vec![entry]).into_source().map_err(io::Error::other)?;
        let (_, root) = source.root().map_err(io::Error::other)?;
        let mut entries = Vec::new();
        source.list_entries(&root, &mut entries)?;
        assert_eq!(entries.len(), 7);
        Ok(())
    }
}
