/*!
 * Core types and data structures for CodePack
 */

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default upper bound for a file to survive filtering (500 KiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500 * 1024;

/// Sentinel include entry meaning "every file"
pub const INCLUDE_ALL: &str = "*";

/// Kind of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory containing other entries
    Directory,
}

/// Children of a directory keyed by child name, in backend insertion order
pub type Children = IndexMap<String, Arc<FileEntry>>;

/// A node of an ingested tree.
///
/// The tree carries metadata only; readable handles live in the
/// [`ContentStore`](crate::store::ContentStore) keyed by `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Last path segment
    pub name: String,
    /// `/`-joined path from the root, unique within a tree
    pub path: String,
    /// File or directory
    pub kind: EntryKind,
    /// Size in bytes, always 0 for directories
    pub size: u64,
    /// Last modification time, when the backend reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Directory contents, `None` for files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

impl FileEntry {
    /// Create a file node
    pub fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        size: u64,
        last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File,
            size,
            last_modified,
            children: None,
        }
    }

    /// Create an empty, fully expanded directory node
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory,
            size: 0,
            last_modified: None,
            children: Some(Children::new()),
        }
    }

    /// Create a directory node holding `children`
    pub fn directory_with(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Children,
    ) -> Self {
        Self {
            children: Some(children),
            ..Self::directory(name, path)
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Iterate over direct children (empty for files)
    pub fn children(&self) -> impl Iterator<Item = &Arc<FileEntry>> {
        self.children.iter().flat_map(|c| c.values())
    }

    /// Find the node with the given path in this subtree
    pub fn find(&self, path: &str) -> Option<&FileEntry> {
        if self.path == path {
            return Some(self);
        }
        // Only descend into directories whose path is a prefix of the target
        self.children()
            .filter(|child| child.is_file() || is_within(path, &child.path))
            .find_map(|child| child.find(path))
    }

    /// Collect every file node in this subtree, depth-first
    pub fn files(&self) -> Vec<&FileEntry> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a FileEntry>) {
        if self.is_file() {
            out.push(self);
            return;
        }
        for child in self.children() {
            child.collect_files(out);
        }
    }
}

/// Path of a child named `name` under `parent`
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else if parent.ends_with('/') {
        // A `/` root already ends with the separator
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Whether `path` equals `dir` or lies below it
pub fn is_within(path: &str, dir: &str) -> bool {
    path == dir
        || (path.len() > dir.len()
            && path.starts_with(dir)
            && (dir.ends_with('/') || path.as_bytes()[dir.len()] == b'/'))
}

/// Named rule-set that produced a [`FilterConfig`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PresetType {
    Python,
    Javascript,
    Typescript,
    Java,
    Go,
    Web,
    All,
    /// Hand-edited rules
    #[default]
    Custom,
}

impl PresetType {
    /// Every preset, in display order
    pub const ALL: [PresetType; 8] = [
        PresetType::Python,
        PresetType::Javascript,
        PresetType::Typescript,
        PresetType::Java,
        PresetType::Go,
        PresetType::Web,
        PresetType::All,
        PresetType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetType::Python => "python",
            PresetType::Javascript => "javascript",
            PresetType::Typescript => "typescript",
            PresetType::Java => "java",
            PresetType::Go => "go",
            PresetType::Web => "web",
            PresetType::All => "all",
            PresetType::Custom => "custom",
        }
    }
}

impl fmt::Display for PresetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter rules applied to an ingested tree.
///
/// This is the only state persisted between runs; its JSON shape uses the
/// camel-cased field names below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Inclusive upper bound on file size in bytes
    pub max_file_size: u64,
    /// Dotted extensions (`.py`) or literal file names (`Dockerfile`); `*` means all
    #[serde(default)]
    pub include_extensions: Vec<String>,
    /// Regular expressions, or plain substrings when they do not compile
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Rule-set that produced this config
    #[serde(default)]
    pub preset: PresetType,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            include_extensions: Vec::new(),
            exclude_patterns: Vec::new(),
            preset: PresetType::Custom,
        }
    }
}

impl FilterConfig {
    /// Whether the include list places no restriction on files
    pub fn includes_everything(&self) -> bool {
        self.include_extensions.is_empty()
            || self.include_extensions.iter().any(|e| e == INCLUDE_ALL)
    }
}
