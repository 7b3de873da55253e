/*!
 * Capability backend over the local file system
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::error::IngestError;
use crate::source::{ContentHandle, DirectorySource, OpenedFile, SourceEntry};
use crate::types::EntryKind;

/// Directory handle rooted at a local path
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source for the directory at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path this source was created with
    pub fn path(&self) -> &Path {
        &self.root
    }
}

/// Content handle that reads a file lazily from disk
#[derive(Debug, Clone)]
pub struct FsFile {
    path: PathBuf,
}

impl ContentHandle for FsFile {
    fn read_text(&self) -> io::Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Name of the last component of `path`, or the whole path for `/`
pub(crate) fn entry_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => path.display().to_string(),
    }
}

/// Open a file on disk and describe it
pub(crate) fn open_path(path: &Path) -> io::Result<OpenedFile> {
    let metadata = fs::metadata(path)?;
    let last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);

    Ok(OpenedFile {
        size: metadata.len(),
        last_modified,
        handle: std::sync::Arc::new(FsFile {
            path: path.to_path_buf(),
        }),
    })
}

impl DirectorySource for FsSource {
    type Handle = PathBuf;

    fn root(&self) -> Result<(String, PathBuf), IngestError> {
        let abs_path = fs::canonicalize(&self.root)?;
        let metadata = fs::metadata(&abs_path)?;

        if metadata.is_file() {
            return Err(IngestError::NotADirectory(self.root.display().to_string()));
        }
        if !metadata.is_dir() {
            return Err(IngestError::BackendUnsupported(format!(
                "{} is neither a file nor a directory",
                self.root.display()
            )));
        }

        Ok((entry_name(&abs_path), abs_path))
    }

    fn list_entries(
        &self,
        dir: &PathBuf,
        entries: &mut Vec<SourceEntry<PathBuf>>,
    ) -> io::Result<()> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                log::debug!("Skipping special entry {}", entry.path().display());
                continue;
            };

            entries.push(SourceEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                kind,
                handle: entry.into_path(),
            });
        }

        Ok(())
    }

    fn open_file(&self, file: &PathBuf) -> io::Result<OpenedFile> {
        open_path(file)
    }
}
