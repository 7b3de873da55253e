//! In-memory backends used by the test suite

use std::io;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::IngestError;
use crate::source::{
    ContentHandle, DirectoryReader, DirectorySource, LegacyEntry, OpenedFile, SourceEntry,
};
use crate::types::EntryKind;

/// A node of an in-memory file system
#[derive(Debug, Clone)]
pub enum MemNode {
    File {
        name: String,
        content: Option<Arc<str>>,
        size: u64,
        modified: Option<DateTime<Utc>>,
    },
    Dir {
        name: String,
        children: Vec<MemNode>,
        /// Listing fails after yielding this many children
        fail_after: Option<usize>,
    },
}

impl MemNode {
    pub fn file(name: &str, content: &str) -> Self {
        MemNode::File {
            name: name.to_string(),
            size: content.len() as u64,
            content: Some(Arc::from(content)),
            modified: None,
        }
    }

    /// A file of the given size whose content cannot be read
    pub fn unreadable(name: &str, size: u64) -> Self {
        MemNode::File {
            name: name.to_string(),
            content: None,
            size,
            modified: None,
        }
    }

    pub fn dir(name: &str, children: Vec<MemNode>) -> Self {
        MemNode::Dir {
            name: name.to_string(),
            children,
            fail_after: None,
        }
    }

    /// Make listing this directory fail after `count` children
    pub fn failing_after(self, count: usize) -> Self {
        match self {
            MemNode::Dir { name, children, .. } => MemNode::Dir {
                name,
                children,
                fail_after: Some(count),
            },
            file => file,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MemNode::File { name, .. } | MemNode::Dir { name, .. } => name,
        }
    }

    fn open(&self) -> io::Result<OpenedFile> {
        match self {
            MemNode::File {
                content,
                size,
                modified,
                ..
            } => Ok(OpenedFile {
                size: *size,
                last_modified: *modified,
                handle: Arc::new(MemContent(content.clone())),
            }),
            MemNode::Dir { name, .. } => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", name),
            )),
        }
    }

    /// Children visible before the configured failure
    fn visible_children(&self) -> (&[MemNode], bool) {
        match self {
            MemNode::Dir {
                children,
                fail_after: Some(n),
                ..
            } => (&children[..(*n).min(children.len())], true),
            MemNode::Dir { children, .. } => (children.as_slice(), false),
            MemNode::File { .. } => (&[][..], false),
        }
    }
}

fn listing_failure() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "listing interrupted")
}

#[derive(Debug)]
struct MemContent(Option<Arc<str>>);

impl ContentHandle for MemContent {
    fn read_text(&self) -> io::Result<String> {
        self.0
            .as_deref()
            .map(str::to_string)
            .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "access denied"))
    }
}

/// Capability-style source over an in-memory tree
pub struct MemorySource {
    pub root: MemNode,
}

impl DirectorySource for MemorySource {
    type Handle = MemNode;

    fn root(&self) -> Result<(String, MemNode), IngestError> {
        match &self.root {
            MemNode::Dir { name, .. } => Ok((name.clone(), self.root.clone())),
            file => Err(IngestError::NotADirectory(file.name().to_string())),
        }
    }

    fn list_entries(&self, dir: &MemNode, entries: &mut Vec<SourceEntry<MemNode>>) -> io::Result<()> {
        let (children, fails) = dir.visible_children();
        for child in children {
            let kind = match child {
                MemNode::File { .. } => EntryKind::File,
                MemNode::Dir { .. } => EntryKind::Directory,
            };
            entries.push(SourceEntry {
                name: child.name().to_string(),
                kind,
                handle: child.clone(),
            });
        }
        if fails {
            Err(listing_failure())
        } else {
            Ok(())
        }
    }

    fn open_file(&self, file: &MemNode) -> io::Result<OpenedFile> {
        file.open()
    }
}

/// Drag-and-drop style entry over an in-memory tree
#[derive(Debug, Clone)]
pub struct MemEntry {
    pub node: MemNode,
    pub batch_size: usize,
}

impl MemEntry {
    pub fn new(node: MemNode, batch_size: usize) -> Self {
        Self { node, batch_size }
    }
}

pub struct MemReader {
    pending: Vec<MemNode>,
    fails: bool,
    batch_size: usize,
}

impl DirectoryReader for MemReader {
    type Entry = MemEntry;

    fn read_entries(&mut self) -> io::Result<Vec<MemEntry>> {
        if self.pending.is_empty() {
            if self.fails {
                self.fails = false;
                return Err(listing_failure());
            }
            return Ok(Vec::new());
        }
        let batch_size = self.batch_size;
        let take = batch_size.min(self.pending.len());
        Ok(self
            .pending
            .drain(..take)
            .map(|node| MemEntry::new(node, batch_size))
            .collect())
    }
}

impl LegacyEntry for MemEntry {
    type Reader = MemReader;

    fn name(&self) -> String {
        self.node.name().to_string()
    }

    fn is_file(&self) -> bool {
        matches!(self.node, MemNode::File { .. })
    }

    fn is_directory(&self) -> bool {
        matches!(self.node, MemNode::Dir { .. })
    }

    fn create_reader(&self) -> io::Result<MemReader> {
        let (children, fails) = self.node.visible_children();
        Ok(MemReader {
            pending: children.to_vec(),
            fails,
            batch_size: self.batch_size.max(1),
        })
    }

    fn file(&self) -> io::Result<OpenedFile> {
        self.node.open()
    }
}
