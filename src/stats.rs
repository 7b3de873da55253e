/*!
 * File statistics for a tree
 */

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::FileEntry;

/// Key used for files without an extension
pub const NO_EXTENSION: &str = "no-extension";

/// Count and size of the files sharing one extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionStats {
    pub count: usize,
    pub size: u64,
}

/// Totals over every file of a tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_extension: BTreeMap<String, ExtensionStats>,
}

impl FileStats {
    /// Collect statistics for `tree`
    pub fn collect(tree: &FileEntry) -> Self {
        Self::from_files(tree.files())
    }

    /// Collect statistics for an explicit set of files
    pub fn from_files<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = &'a FileEntry>,
    {
        let mut stats = FileStats::default();
        for file in files.into_iter().filter(|f| f.is_file()) {
            stats.total_files += 1;
            stats.total_size += file.size;

            let entry = stats
                .files_by_extension
                .entry(extension_key(&file.name))
                .or_default();
            entry.count += 1;
            entry.size += file.size;
        }
        stats
    }
}

/// `.ext` in lower case, or [`NO_EXTENSION`]
fn extension_key(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext.to_lowercase()),
        None => NO_EXTENSION.to_string(),
    }
}
