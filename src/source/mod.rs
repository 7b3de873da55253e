//! Ingestion backends
//!
//! Both backends expose the same two capabilities, listing a directory and
//! opening a file, so the recursive descent in [`crate::ingest`] is written
//! once against [`DirectorySource`].

use std::fmt;
use std::io;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::IngestError;
use crate::types::EntryKind;

pub mod fs;
pub mod legacy;

#[cfg(test)]
pub(crate) mod memory;

pub use self::fs::FsSource;
pub use self::legacy::{DirectoryReader, DropPayload, DroppedPath, LegacyEntry, LegacySource};

/// An opaque, readable handle to one file's content
pub trait ContentHandle: Send + Sync + fmt::Debug {
    /// Read the whole content as text, replacing invalid UTF-8
    fn read_text(&self) -> io::Result<String>;
}

/// Content handle shared between the ingestor and the content store
pub type SharedHandle = Arc<dyn ContentHandle>;

/// A file that has been opened by a backend
#[derive(Debug, Clone)]
pub struct OpenedFile {
    /// Size in bytes
    pub size: u64,
    /// Last modification time, if known
    pub last_modified: Option<DateTime<Utc>>,
    /// Handle used later to read the content
    pub handle: SharedHandle,
}

/// One child yielded while listing a directory
#[derive(Debug, Clone)]
pub struct SourceEntry<H> {
    /// Entry name (last path segment)
    pub name: String,
    /// File or directory
    pub kind: EntryKind,
    /// Backend handle used to descend or open
    pub handle: H,
}

/// A backend able to enumerate directories and open files
pub trait DirectorySource: Sync {
    /// Backend-specific handle for a directory or file
    type Handle: Send + Sync;

    /// Name and handle of the root directory
    fn root(&self) -> Result<(String, Self::Handle), IngestError>;

    /// Append the children of `dir` to `entries` in backend order.
    ///
    /// On failure the entries appended before the error stay in `entries`.
    fn list_entries(
        &self,
        dir: &Self::Handle,
        entries: &mut Vec<SourceEntry<Self::Handle>>,
    ) -> io::Result<()>;

    /// Open a file entry
    fn open_file(&self, file: &Self::Handle) -> io::Result<OpenedFile>;
}
